use crate::{
    DatabaseVariant, Expression, FullTextCondition, Result, SqlWriter, Value, writer::Context,
};

/// PostgreSQL and CockroachDB.
#[derive(Default, Debug, Clone, Copy)]
pub struct PostgresSqlWriter {}

impl PostgresSqlWriter {
    pub const fn new() -> Self {
        Self {}
    }
}

impl SqlWriter for PostgresSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn variant(&self) -> DatabaseVariant {
        DatabaseVariant::PostgreSql
    }

    fn if_null_function(&self) -> &'static str {
        "COALESCE"
    }

    /// Boolean columns are compared natively.
    fn write_is_boolean(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &Expression,
        expected: bool,
    ) -> Result<()> {
        self.write_expression(context, out, value)?;
        out.push_str(" = ");
        self.write_parameter(context, out, Value::Boolean(Some(expected)));
        Ok(())
    }

    fn write_like_ignore_case(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &Expression,
        pattern: &Expression,
    ) -> Result<()> {
        self.write_expression(context, out, value)?;
        out.push_str(" ILIKE ");
        self.write_expression(context, out, pattern)
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
            .map(|v| format!("{}:*", v))
            .collect::<Vec<_>>()
            .join(" & ");
        out.push_str("to_tsvector('english', ");
        self.write_expression(context, out, value.arg())?;
        out.push_str(") @@ to_tsquery('english', ");
        self.write_parameter(context, out, Value::Varchar(Some(query)));
        out.push(')');
        Ok(())
    }
}
