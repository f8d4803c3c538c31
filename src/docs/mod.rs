//! AsciiDoc generation for component configuration.
//!
//! Flattens each component's configuration tree, renders visibility
//! conditions as prose and lays everything out as one table per component.
//! Output is deterministic: the same components always produce the same
//! bytes.

mod assembler;
mod condition;
mod flatten;
mod generator;
mod table;

pub use assembler::{assemble, write_atomically};
pub use condition::{
    ALL_CONDITIONS_MET, ALWAYS_ENABLED, ConditionResolver, render_clause, render_condition,
};
pub use flatten::flatten;
pub use generator::{DocsGenerator, GenerationReport};
pub use table::{RenderedRow, render_component};
