//! Memory-placement analysis for hardware synthesis.
//!
//! Given an [`hlsinstr`] module, this crate decides for every *annotated*
//! stack allocation whether the storage it reserves fits the fast on-chip
//! memory of the synthesis target ("internal") or must be placed in the
//! larger external backing store, and writes the verdicts as the
//! `memory_allocation.xml` report the downstream synthesis flow consumes.
//!
//! The pipeline is deliberately small: [`extract`] reads the annotation that
//! names an allocation, [`size`] resolves the allocation's total bit size
//! against the module's data layout, [`classify`] applies the placement
//! threshold, and [`report`] serializes the records. [`binding`] ties the
//! four together over one module. Most consumers only need
//! [`MemoryBinding`]:
//!
//! ```no_run
//! # use hlsinstr::{modules::Module, types::TypeRegistry};
//! # use hlsmem::{BindingConfig, MemoryBinding};
//! # let module = Module::default();
//! # let registry = TypeRegistry::new();
//! let binding = MemoryBinding::new(&module, &registry, BindingConfig::default());
//! let report = binding.write_report_file(".")?;
//! # Ok::<(), hlsmem::ReportError>(())
//! ```
pub mod binding;
pub mod classify;
pub mod config;
pub mod error;
pub mod extract;
pub mod report;
pub mod size;

pub use binding::{AllocationRecord, MemoryBinding, REPORT_FILE_NAME};
pub use classify::Placement;
pub use config::{BindingConfig, DEFAULT_THRESHOLD_BITS};
pub use error::ReportError;
