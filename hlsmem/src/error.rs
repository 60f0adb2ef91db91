use std::{io, path::PathBuf};

use thiserror::Error;

/// Failures while producing the placement report.
///
/// The analysis itself cannot fail an invocation: per-allocation problems
/// are logged and the record skipped (see [`crate::size::SizeError`]). The
/// only fatal surface is I/O on the report destination.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The report destination could not be created or opened for writing.
    #[error("cannot open report destination `{path}`: {source}")]
    OutputUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing the report body failed after the destination was opened.
    #[error("failed writing the placement report: {0}")]
    Write(#[from] io::Error),
}
