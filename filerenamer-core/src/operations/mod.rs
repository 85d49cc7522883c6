//! High-level operations that correspond to CLI commands
//!
//! These modules contain the business logic for each filerenamer command,
//! separated from CLI concerns like argument parsing and output formatting.

pub mod plan;
pub mod rename;

pub use plan::{build_plan, plan_operation, resolve_name_rules, BatchRequest, NameSource};
pub use rename::{rename_operation, RenameOperationResult, RenameOptions};
