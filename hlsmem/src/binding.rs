//! The memory-binding driver.
//!
//! Walks one module in declaration order, classifies every annotated stack
//! allocation, and streams the verdicts into the XML report. Record order is
//! part of the report's contract: functions in module declaration order
//! (bodies only), instructions in program order within each function.
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use hlsinstr::{
    modules::{Function, Module, instructions::Instr},
    types::TypeRegistry,
};
use log::{debug, warn};

use crate::{
    classify::Placement,
    config::BindingConfig,
    error::ReportError,
    extract::annotation_name,
    report::write_allocation_report,
    size::allocation_bits,
};

/// Name of the report file, fixed by the downstream synthesis flow.
pub const REPORT_FILE_NAME: &str = "memory_allocation.xml";

/// One classified allocation: the enclosing function, the annotated object
/// name, and the placement verdict.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AllocationRecord {
    pub scope: String,
    pub name: String,
    pub placement: Placement,
}

/// One memory-binding run over one module.
///
/// The module and registry are only read; the binding owns nothing but its
/// configuration, so constructing one is free and running it twice yields
/// identical output.
pub struct MemoryBinding<'a> {
    module: &'a Module,
    registry: &'a TypeRegistry,
    config: BindingConfig,
}

impl<'a> MemoryBinding<'a> {
    pub fn new(module: &'a Module, registry: &'a TypeRegistry, config: BindingConfig) -> Self {
        Self {
            module,
            registry,
            config,
        }
    }

    /// Classified allocations in encounter order.
    ///
    /// Declaration-only functions contribute nothing. Annotated allocations
    /// whose size cannot be resolved are logged and skipped: they are
    /// neither internal nor external, and defaulting either way would
    /// silently misplace real storage.
    pub fn records(&self) -> impl Iterator<Item = AllocationRecord> + '_ {
        self.module
            .defined_functions()
            .flat_map(move |function| {
                function
                    .instructions()
                    .filter_map(move |instr| self.record_for(function, instr))
            })
    }

    fn record_for(&self, function: &Function, instr: &Instr) -> Option<AllocationRecord> {
        let alloca = instr.try_as_m_alloca_ref()?;
        let name = annotation_name(alloca)?;
        match allocation_bits(alloca, self.registry, &self.module.layout) {
            Ok(total_bits) => {
                let placement = Placement::classify(total_bits, self.config.threshold_bits);
                debug!(
                    "`{}` in `{}` occupies {} bits -> {}",
                    name, function.name, total_bits, placement
                );
                Some(AllocationRecord {
                    scope: function.name.clone(),
                    name: name.to_owned(),
                    placement,
                })
            }
            Err(err) => {
                warn!(
                    "skipping annotated allocation `{}` in `{}`: {}",
                    name, function.name, err
                );
                None
            }
        }
    }

    /// Stream the report document into `out`.
    pub fn write_report<W: Write>(&self, out: W) -> io::Result<()> {
        write_allocation_report(self.records(), out)
    }

    /// Write `memory_allocation.xml` under `dir`, truncating any previous
    /// report, and return its path.
    pub fn write_report_file(&self, dir: impl AsRef<Path>) -> Result<PathBuf, ReportError> {
        let path = dir.as_ref().join(REPORT_FILE_NAME);
        let file = File::create(&path).map_err(|source| ReportError::OutputUnavailable {
            path: path.clone(),
            source,
        })?;
        let mut out = BufWriter::new(file);
        self.write_report(&mut out)?;
        out.flush()?;
        Ok(path)
    }
}
