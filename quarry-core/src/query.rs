use crate::{AsValue, Driver, Error, Prepared, Result, Value, truncate_long};
use std::{
    collections::BTreeMap,
    fmt::{self, Display},
    sync::Arc,
};

/// Statement handed to an [`crate::Executor`], either plain text or a driver prepared handle.
#[derive(Debug)]
pub enum Query<D: Driver> {
    /// Plain SQL text, nothing can be bound to it.
    Raw(String),
    Prepared(D::Prepared),
}

impl<D: Driver> Query<D> {
    fn as_prepared(&mut self, operation: &str) -> Result<&mut D::Prepared> {
        match self {
            Query::Prepared(prepared) => Ok(prepared),
            Query::Raw(sql) => Err(Error::msg(format!(
                "Cannot {} a raw query: {}",
                operation,
                truncate_long!(sql)
            ))),
        }
    }

    pub fn clear_bindings(&mut self) -> Result<&mut Self> {
        self.as_prepared("clear the bindings of")?.clear_bindings()?;
        Ok(self)
    }

    /// Binds the next positional `?` placeholder.
    pub fn bind(&mut self, value: impl AsValue) -> Result<&mut Self> {
        self.as_prepared("bind a value to")?.bind(value)?;
        Ok(self)
    }

    /// Binds the `:name` placeholder.
    pub fn bind_named(&mut self, name: &str, value: Value) -> Result<&mut Self> {
        self.as_prepared("bind a named value to")?
            .bind_named(name, value)?;
        Ok(self)
    }

    /// Binds every entry of `parameters` by name. A raw query only accepts an empty map.
    pub fn bind_parameters(&mut self, parameters: &BTreeMap<String, Value>) -> Result<&mut Self> {
        if !parameters.is_empty() {
            self.as_prepared("bind the parameters of")?
                .bind_parameters(parameters)?;
        }
        Ok(self)
    }
}

impl<D: Driver> From<&str> for Query<D> {
    fn from(value: &str) -> Self {
        Query::Raw(value.to_string())
    }
}

impl<D: Driver> From<String> for Query<D> {
    fn from(value: String) -> Self {
        Query::Raw(value)
    }
}

impl<D: Driver> Display for Query<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Raw(sql) => f.write_str(&truncate_long!(sql)),
            Query::Prepared(prepared) => prepared.fmt(f),
        }
    }
}

/// Outcome of a statement that modifies rows.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowsAffected {
    pub rows_affected: u64,
    /// Rowid of the last inserted row, when the engine reports one.
    pub last_affected_id: Option<i64>,
}

/// Summing several results keeps the most recent `last_affected_id`.
impl Extend<RowsAffected> for RowsAffected {
    fn extend<T: IntoIterator<Item = RowsAffected>>(&mut self, iter: T) {
        for other in iter {
            self.rows_affected += other.rows_affected;
            self.last_affected_id = other.last_affected_id.or(self.last_affected_id);
        }
    }
}

/// Column labels, shared by every row of one result set.
pub type RowNames = Arc<[String]>;

/// One result row, `values[i]` belongs to the column `labels[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct RowLabeled {
    pub labels: RowNames,
    pub values: Box<[Value]>,
}

impl RowLabeled {
    pub fn new(labels: RowNames, values: Box<[Value]>) -> Self {
        Self { labels, values }
    }

    /// Value of the first column labeled `name`.
    pub fn get_column(&self, name: &str) -> Option<&Value> {
        let index = self.labels.iter().position(|label| label == name)?;
        self.values.get(index)
    }
}

/// Item produced by [`crate::Executor::run`].
#[derive(Debug)]
pub enum QueryResult {
    Row(RowLabeled),
    Affected(RowsAffected),
}

impl From<RowLabeled> for QueryResult {
    fn from(value: RowLabeled) -> Self {
        QueryResult::Row(value)
    }
}

impl From<RowsAffected> for QueryResult {
    fn from(value: RowsAffected) -> Self {
        QueryResult::Affected(value)
    }
}
