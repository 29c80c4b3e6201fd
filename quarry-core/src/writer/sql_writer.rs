use crate::{
    CastType, ColumnName, Condition, ConfigurationError, DatabaseVariant, EntityMeta, Expression,
    FALSE_LITERALS, FullTextCondition, NativeSql, OrderBy, ParametrizedSql, Property, Result,
    TRUE_LITERALS, Value, possibly_parenthesized, separated_by, writer::Context,
};
use std::fmt::Write;

/// Dialect printer turning conditions, expressions and finder statements into SQL.
///
/// Every method has the portable spelling as default, the quirks of each database
/// override the few places where they differ. Values are never inlined, each one
/// becomes a `:name` placeholder bound in the [`Context`].
pub trait SqlWriter: Send + Sync {
    fn as_dyn(&self) -> &dyn SqlWriter;

    fn variant(&self) -> DatabaseVariant;

    /// Escape occurrences of `search` char with `replace` while copying into buffer.
    fn write_escaped(&self, out: &mut String, value: &str, search: char, replace: &str) {
        let mut position = 0;
        for (i, c) in value.char_indices() {
            if c == search {
                out.push_str(&value[position..i]);
                out.push_str(replace);
                position = i + c.len_utf8();
            }
        }
        out.push_str(&value[position..]);
    }

    /// Quote identifiers ("name") doubling inner quotes.
    fn write_identifier_quoted(&self, out: &mut String, value: &str) {
        out.push('"');
        self.write_escaped(out, value, '"', "\"\"");
        out.push('"');
    }

    fn write_column(&self, out: &mut String, value: &ColumnName) {
        self.write_identifier_quoted(out, &value.table);
        out.push('.');
        self.write_identifier_quoted(out, &value.column);
    }

    /// Column reference, qualified by the table or by the alias.
    fn write_property(&self, _context: &mut Context, out: &mut String, value: &Property) -> Result<()> {
        self.write_column(out, &value.column_name()?);
        Ok(())
    }

    fn write_parameter(&self, context: &mut Context, out: &mut String, value: Value) {
        out.push(':');
        out.push_str(&context.bind(value));
    }

    fn if_null_function(&self) -> &'static str {
        "IFNULL"
    }

    fn write_cast_type(&self, out: &mut String, value: CastType) {
        out.push_str(match value {
            CastType::Varchar => "VARCHAR",
            CastType::BigInt => "BIGINT",
            CastType::Double => "DOUBLE PRECISION",
        });
    }

    fn write_function(
        &self,
        context: &mut Context,
        out: &mut String,
        name: &str,
        args: &[&Expression],
    ) -> Result<()> {
        out.push_str(name);
        out.push('(');
        separated_by(
            out,
            args,
            |out, v| self.write_expression(context, out, v),
            ", ",
        )?;
        out.push(')');
        Ok(())
    }

    fn write_expression(&self, context: &mut Context, out: &mut String, value: &Expression) -> Result<()> {
        match value {
            Expression::Value(v) => self.write_parameter(context, out, v.clone()),
            Expression::Property(v) => self.write_property(context, out, v)?,
            Expression::Lower(v) => self.write_function(context, out, "LOWER", &[v])?,
            Expression::Coalesce(a, b) => self.write_function(context, out, "COALESCE", &[a, b])?,
            Expression::IfNull(a, b) => {
                self.write_function(context, out, self.if_null_function(), &[a, b])?
            }
            Expression::NullIf(a, b) => self.write_function(context, out, "NULLIF", &[a, b])?,
            Expression::Cast(v, cast) => {
                out.push_str("CAST(");
                self.write_expression(context, out, v)?;
                out.push_str(" AS ");
                self.write_cast_type(out, *cast);
                out.push(')');
            }
        }
        Ok(())
    }

    /// Binding strength, a child binding weaker than its parent is parenthesized.
    fn condition_precedence(&self, value: &Condition) -> i32 {
        match value {
            Condition::Or(..) => 100,
            Condition::And(..) => 200,
            Condition::Not(..) => 250,
            Condition::Eq(..) | Condition::Op(..) => 300,
            Condition::IsNull(..)
            | Condition::IsNotNull(..)
            | Condition::IsTrue(..)
            | Condition::IsFalse(..)
            | Condition::Like(..)
            | Condition::LikeIgnoreCase(..)
            | Condition::In(..) => 400,
            Condition::NoCondition => 1000,
            Condition::FullText(..) | Condition::Native(..) => 0,
        }
    }

    fn write_condition(&self, context: &mut Context, out: &mut String, value: &Condition) -> Result<()> {
        let precedence = self.condition_precedence(value);
        match value {
            Condition::NoCondition => out.push_str(ParametrizedSql::MATCH_ALL),
            Condition::IsNull(v) => {
                self.write_expression(context, out, v)?;
                out.push_str(" IS NULL");
            }
            Condition::IsNotNull(v) => {
                self.write_expression(context, out, v)?;
                out.push_str(" IS NOT NULL");
            }
            Condition::IsTrue(v) => self.write_is_boolean(context, out, v, true)?,
            Condition::IsFalse(v) => self.write_is_boolean(context, out, v, false)?,
            Condition::Eq(lhs, rhs) => {
                self.write_expression(context, out, lhs)?;
                out.push_str(" = ");
                self.write_expression(context, out, rhs)?;
            }
            Condition::Op(lhs, rhs, op) => {
                self.write_expression(context, out, lhs)?;
                let _ = write!(out, " {} ", op.sql());
                self.write_expression(context, out, rhs)?;
            }
            Condition::Like(lhs, rhs) => {
                self.write_expression(context, out, lhs)?;
                out.push_str(" LIKE ");
                self.write_expression(context, out, rhs)?;
            }
            Condition::LikeIgnoreCase(lhs, rhs) => {
                self.write_like_ignore_case(context, out, lhs, rhs)?
            }
            Condition::In(v, values) => {
                if values.is_empty() {
                    out.push_str("1=0");
                } else {
                    self.write_expression(context, out, v)?;
                    out.push_str(" IN (");
                    separated_by(
                        out,
                        values,
                        |out, v| self.write_expression(context, out, v),
                        ", ",
                    )?;
                    out.push(')');
                }
            }
            Condition::FullText(v) => self.write_full_text(context, out, v)?,
            Condition::And(lhs, rhs) | Condition::Or(lhs, rhs) => {
                possibly_parenthesized!(
                    out,
                    self.condition_precedence(lhs) < precedence,
                    self.write_condition(context, out, lhs)?
                );
                out.push_str(if matches!(value, Condition::And(..)) {
                    " AND "
                } else {
                    " OR "
                });
                possibly_parenthesized!(
                    out,
                    self.condition_precedence(rhs) < precedence,
                    self.write_condition(context, out, rhs)?
                );
            }
            Condition::Not(v) => {
                out.push_str("NOT ");
                if matches!(
                    **v,
                    Condition::IsNull(..) | Condition::IsNotNull(..) | Condition::Not(..)
                ) {
                    possibly_parenthesized!(
                        out,
                        self.condition_precedence(v) <= precedence,
                        self.write_condition(context, out, v)?
                    );
                } else {
                    self.write_unknown_as_false(context, out, v)?;
                }
            }
            Condition::Native(v) => self.write_native(context, out, v)?,
        }
        Ok(())
    }

    /// Writes `value` so that a null comparison reads as false instead of unknown,
    /// negating it then selects the same rows the in memory evaluation does.
    fn write_unknown_as_false(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &Condition,
    ) -> Result<()> {
        out.push_str("COALESCE(");
        self.write_condition(context, out, value)?;
        out.push_str(", FALSE)");
        Ok(())
    }

    /// `IS TRUE` / `IS FALSE` through the accepted lowercase spellings.
    fn write_is_boolean(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &Expression,
        expected: bool,
    ) -> Result<()> {
        self.write_function(context, out, "LOWER", &[value])?;
        out.push_str(" IN (");
        let literals = if expected {
            TRUE_LITERALS
        } else {
            FALSE_LITERALS
        };
        separated_by(
            out,
            literals,
            |out, v| {
                out.push('\'');
                out.push_str(v);
                out.push('\'');
                Ok(())
            },
            ", ",
        )?;
        out.push(')');
        Ok(())
    }

    fn write_like_ignore_case(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &Expression,
        pattern: &Expression,
    ) -> Result<()> {
        self.write_function(context, out, "LOWER", &[value])?;
        out.push_str(" LIKE ");
        self.write_function(context, out, "LOWER", &[pattern])
    }

    fn write_full_text(
        &self,
        _context: &mut Context,
        _out: &mut String,
        value: &FullTextCondition,
    ) -> Result<()> {
        let error = ConfigurationError::Unsupported(format!(
            "Full text search is not supported by {:?}: {}",
            self.variant(),
            value
        ));
        log::error!("{}", error);
        Err(error.into())
    }

    /// Splices the SQL verbatim and merges its parameters.
    fn write_native(&self, context: &mut Context, out: &mut String, value: &NativeSql) -> Result<()> {
        for (name, value) in &value.parameters {
            context.bind_native(name, value)?;
        }
        out.push_str(&value.sql);
        Ok(())
    }

    fn write_where(&self, context: &mut Context, out: &mut String, condition: &Condition) -> Result<()> {
        if !condition.is_no_condition() {
            out.push_str(" WHERE ");
            self.write_condition(context, out, condition)?;
        }
        Ok(())
    }

    fn write_order_by(&self, context: &mut Context, out: &mut String, order_by: &[OrderBy]) -> Result<()> {
        if order_by.is_empty() {
            return Ok(());
        }
        out.push_str(" ORDER BY ");
        separated_by(
            out,
            order_by,
            |out, v| {
                self.write_property(context, out, &v.property)?;
                out.push(' ');
                out.push_str(v.order.sql());
                Ok(())
            },
            ", ",
        )
    }

    fn write_offset_limit(
        &self,
        out: &mut String,
        offset: Option<u64>,
        limit: Option<u64>,
        _ordered: bool,
    ) -> Result<()> {
        if let Some(limit) = limit {
            let _ = write!(out, " LIMIT {}", limit);
        }
        if let Some(offset) = offset {
            let _ = write!(out, " OFFSET {}", offset);
        }
        Ok(())
    }

    fn write_select(
        &self,
        context: &mut Context,
        out: &mut String,
        meta: &EntityMeta,
        condition: &Condition,
        order_by: &[OrderBy],
        offset: Option<u64>,
        limit: Option<u64>,
    ) -> Result<()> {
        out.push_str("SELECT ");
        separated_by(
            out,
            meta.column_names(),
            |out, v| {
                self.write_identifier_quoted(out, v);
                Ok(())
            },
            ", ",
        )?;
        out.push_str(" FROM ");
        self.write_identifier_quoted(out, meta.table_name());
        self.write_where(context, out, condition)?;
        self.write_order_by(context, out, order_by)?;
        self.write_offset_limit(out, offset, limit, !order_by.is_empty())
    }

    fn write_count(
        &self,
        context: &mut Context,
        out: &mut String,
        meta: &EntityMeta,
        condition: &Condition,
    ) -> Result<()> {
        out.push_str("SELECT COUNT(*) FROM ");
        self.write_identifier_quoted(out, meta.table_name());
        self.write_where(context, out, condition)
    }

    fn write_delete(
        &self,
        context: &mut Context,
        out: &mut String,
        meta: &EntityMeta,
        condition: &Condition,
    ) -> Result<()> {
        out.push_str("DELETE FROM ");
        self.write_identifier_quoted(out, meta.table_name());
        self.write_where(context, out, condition)
    }

    /// Condition alone, as it goes after `WHERE`. [`Condition::NoCondition`] gives `1=1`.
    fn render(&self, condition: &Condition) -> Result<ParametrizedSql> {
        let mut context = Context::new();
        let mut out = String::new();
        self.write_condition(&mut context, &mut out, condition)?;
        Ok(context.finish(out))
    }

    fn render_expression(&self, expression: &Expression) -> Result<ParametrizedSql> {
        let mut context = Context::new();
        let mut out = String::new();
        self.write_expression(&mut context, &mut out, expression)?;
        Ok(context.finish(out))
    }

    fn select(
        &self,
        meta: &EntityMeta,
        condition: &Condition,
        order_by: &[OrderBy],
        offset: Option<u64>,
        limit: Option<u64>,
    ) -> Result<ParametrizedSql> {
        let mut context = Context::new();
        let mut out = String::new();
        self.write_select(&mut context, &mut out, meta, condition, order_by, offset, limit)?;
        Ok(context.finish(out))
    }

    fn count(&self, meta: &EntityMeta, condition: &Condition) -> Result<ParametrizedSql> {
        let mut context = Context::new();
        let mut out = String::new();
        self.write_count(&mut context, &mut out, meta, condition)?;
        Ok(context.finish(out))
    }

    fn delete(&self, meta: &EntityMeta, condition: &Condition) -> Result<ParametrizedSql> {
        let mut context = Context::new();
        let mut out = String::new();
        self.write_delete(&mut context, &mut out, meta, condition)?;
        Ok(context.finish(out))
    }
}

/// Portable SQL, used before a database is detected.
#[derive(Default, Debug, Clone, Copy)]
pub struct GenericSqlWriter {}

impl GenericSqlWriter {
    pub const fn new() -> Self {
        Self {}
    }
}

impl SqlWriter for GenericSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn variant(&self) -> DatabaseVariant {
        DatabaseVariant::Unknown
    }
}
