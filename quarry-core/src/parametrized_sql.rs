use crate::Value;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fmt::{self, Display},
};

/// A rendered SQL fragment and the values of its `:name` placeholders.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParametrizedSql {
    pub sql: String,
    pub parameters: BTreeMap<String, Value>,
}

impl ParametrizedSql {
    /// Fragment of a condition that matches every row.
    pub const MATCH_ALL: &'static str = "1=1";

    pub fn new(sql: impl Into<String>, parameters: BTreeMap<String, Value>) -> Self {
        Self {
            sql: sql.into(),
            parameters,
        }
    }

    pub fn match_all() -> Self {
        Self::new(Self::MATCH_ALL, Default::default())
    }

    pub fn is_match_all(&self) -> bool {
        self.sql == Self::MATCH_ALL && self.parameters.is_empty()
    }
}

/// `'sql'{a=1, b=foo}`, parameters in name order.
pub(crate) fn write_parametrized(
    f: &mut fmt::Formatter<'_>,
    sql: &str,
    parameters: &BTreeMap<String, Value>,
) -> fmt::Result {
    write!(f, "'{}'{{", sql)?;
    for (i, (name, value)) in parameters.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}={}", name, value)?;
    }
    f.write_str("}")
}

impl Display for ParametrizedSql {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_parametrized(f, &self.sql, &self.parameters)
    }
}
