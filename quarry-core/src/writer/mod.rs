mod context;
mod sql_writer;

pub use context::*;
pub use sql_writer::*;
