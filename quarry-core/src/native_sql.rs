use crate::{Value, parametrized_sql::write_parametrized};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fmt::{self, Display},
};

/// Raw SQL spliced verbatim into a rendered condition, with its own `:name` parameters.
///
/// ```rust,ignore
/// let condition: Condition = NativeSql::new("age > :age").bind("age", 25).into();
/// ```
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeSql {
    pub sql: String,
    pub parameters: BTreeMap<String, Value>,
}

impl NativeSql {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            parameters: Default::default(),
        }
    }

    pub fn bind(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }
}

impl Display for NativeSql {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_parametrized(f, &self.sql, &self.parameters)
    }
}
