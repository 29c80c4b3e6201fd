use crate::{AsValue, Result, Value};
use std::{
    collections::BTreeMap,
    fmt::{Debug, Display},
};

/// A backend prepared statement.
///
/// Positional binding appends or targets an index (from 0), named binding
/// targets the `:name` placeholders that rendered conditions use.
/// Methods return `&mut Self` for fluent chaining:
/// ```rust,ignore
/// prepared.bind_named("p1", 42.into())?.bind_named("name", "Albedo".into())?;
/// ```
pub trait Prepared: Send + Sync + Debug + Display {
    /// Remove all the previously bound values.
    fn clear_bindings(&mut self) -> Result<&mut Self>;
    /// Append a parameter value.
    fn bind<V: AsValue>(&mut self, value: V) -> Result<&mut Self>;
    /// Bind a value at a specific index.
    fn bind_index<V: AsValue>(&mut self, value: V, index: u64) -> Result<&mut Self>;
    /// Bind the value of the `:name` placeholder.
    fn bind_named(&mut self, name: &str, value: Value) -> Result<&mut Self>;

    fn bind_parameters(&mut self, parameters: &BTreeMap<String, Value>) -> Result<&mut Self> {
        for (name, value) in parameters {
            self.bind_named(name, value.clone())?;
        }
        Ok(self)
    }
}
