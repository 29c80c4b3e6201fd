use crate::{
    CastType, Condition, ConfigurationError, DatabaseVariant, FullTextCondition, Result, SqlWriter, Value,
    writer::Context,
};
use std::fmt::Write;

/// Microsoft SQL Server.
#[derive(Default, Debug, Clone, Copy)]
pub struct MssqlSqlWriter {}

impl MssqlSqlWriter {
    pub const fn new() -> Self {
        Self {}
    }
}

impl SqlWriter for MssqlSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn variant(&self) -> DatabaseVariant {
        DatabaseVariant::Mssql
    }

    fn write_identifier_quoted(&self, out: &mut String, value: &str) {
        out.push('[');
        self.write_escaped(out, value, ']', "]]");
        out.push(']');
    }

    fn if_null_function(&self) -> &'static str {
        "ISNULL"
    }

    fn write_cast_type(&self, out: &mut String, value: CastType) {
        out.push_str(match value {
            CastType::Varchar => "NVARCHAR(MAX)",
            CastType::BigInt => "BIGINT",
            CastType::Double => "FLOAT",
        });
    }

    /// Predicates are not values here, `COALESCE` can't take one.
    fn write_unknown_as_false(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &Condition,
    ) -> Result<()> {
        out.push_str("CASE WHEN ");
        self.write_condition(context, out, value)?;
        out.push_str(" THEN 1 ELSE 0 END = 1");
        Ok(())
    }

    fn write_full_text(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &FullTextCondition,
    ) -> Result<()> {
        let query = value
            .words()
            .iter()
            .map(|v| format!("\"{}*\"", v))
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str("CONTAINS(");
        self.write_expression(context, out, value.arg())?;
        out.push_str(", ");
        self.write_parameter(context, out, Value::Varchar(Some(query)));
        out.push(')');
        Ok(())
    }

    /// `OFFSET .. FETCH` needs an `ORDER BY`, a constant one is added when missing.
    fn write_offset_limit(
        &self,
        out: &mut String,
        offset: Option<u64>,
        limit: Option<u64>,
        ordered: bool,
    ) -> Result<()> {
        if offset.is_none() && limit.is_none() {
            return Ok(());
        }
        if limit == Some(0) {
            return Err(ConfigurationError::Unsupported(
                "SQL Server cannot fetch zero rows, FETCH NEXT requires a positive count".into(),
            )
            .into());
        }
        if !ordered {
            out.push_str(" ORDER BY (SELECT 1)");
        }
        let _ = write!(out, " OFFSET {} ROWS", offset.unwrap_or(0));
        if let Some(limit) = limit {
            let _ = write!(out, " FETCH NEXT {} ROWS ONLY", limit);
        }
        Ok(())
    }
}
