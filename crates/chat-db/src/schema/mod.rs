//! Runtime schema introspection and self-healing for optional columns

mod columns;
mod probe;

pub use columns::OptionalColumn;
pub use probe::SchemaProbe;
