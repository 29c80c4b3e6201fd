use crate::{
    AsValue, Condition, ConfigurationError, Entity, FullTextCondition, Operator, Property,
    Result, Row, TableProperty, Value, value::Numeric,
};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Target type of a `CAST`, the dialect chooses the SQL type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CastType {
    Varchar,
    BigInt,
    Double,
}

impl Display for CastType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CastType::Varchar => "VARCHAR",
            CastType::BigInt => "BIGINT",
            CastType::Double => "DOUBLE",
        })
    }
}

/// A value producing term, computed in memory by [`Expression::calculate`] or
/// rendered by a [`crate::SqlWriter`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    Value(Value),
    Property(Property),
    Lower(Box<Expression>),
    Coalesce(Box<Expression>, Box<Expression>),
    IfNull(Box<Expression>, Box<Expression>),
    NullIf(Box<Expression>, Box<Expression>),
    Cast(Box<Expression>, CastType),
}

pub trait IntoExpression {
    fn into_expression(self) -> Expression;
}

impl IntoExpression for Expression {
    fn into_expression(self) -> Expression {
        self
    }
}

impl IntoExpression for &Expression {
    fn into_expression(self) -> Expression {
        self.clone()
    }
}

impl IntoExpression for Value {
    fn into_expression(self) -> Expression {
        Expression::Value(self)
    }
}

impl<T: AsValue> IntoExpression for T {
    fn into_expression(self) -> Expression {
        Expression::Value(self.as_value())
    }
}

impl IntoExpression for &str {
    fn into_expression(self) -> Expression {
        Expression::Value(Value::Varchar(Some(self.to_string())))
    }
}

impl IntoExpression for Property {
    fn into_expression(self) -> Expression {
        Expression::Property(self)
    }
}

impl IntoExpression for &Property {
    fn into_expression(self) -> Expression {
        Expression::Property(self.clone())
    }
}

impl<E: Entity, V: AsValue> IntoExpression for TableProperty<E, V> {
    fn into_expression(self) -> Expression {
        self.expression()
    }
}

impl<E: Entity, V: AsValue> IntoExpression for &TableProperty<E, V> {
    fn into_expression(self) -> Expression {
        self.expression()
    }
}

impl Expression {
    pub fn value(value: impl Into<Value>) -> Self {
        Expression::Value(value.into())
    }

    pub(crate) fn is_null_literal(&self) -> bool {
        matches!(self, Expression::Value(v) if v.is_null())
    }

    /// Evaluates against `row`, nulls propagate like they do in SQL.
    pub fn calculate(&self, row: &dyn Row) -> Result<Value> {
        Ok(match self {
            Expression::Value(v) => v.clone(),
            Expression::Property(v) => v.calculate(row)?,
            Expression::Lower(v) => {
                let value = v.calculate(row)?;
                match value.to_text() {
                    Some(text) => Value::Varchar(Some(text.to_lowercase())),
                    None => Value::Varchar(None),
                }
            }
            Expression::Coalesce(arg, default) | Expression::IfNull(arg, default) => {
                let value = arg.calculate(row)?;
                if value.is_null() {
                    default.calculate(row)?
                } else {
                    value
                }
            }
            Expression::NullIf(arg, other) => {
                let value = arg.calculate(row)?;
                if value.value_eq(&other.calculate(row)?) {
                    value.as_null()
                } else {
                    value
                }
            }
            Expression::Cast(arg, cast) => cast_value(arg.calculate(row)?, *cast)?,
        })
    }

    pub fn lower(self) -> Expression {
        Expression::Lower(self.into())
    }
    pub fn coalesce(self, default: impl IntoExpression) -> Expression {
        Expression::Coalesce(self.into(), default.into_expression().into())
    }
    pub fn if_null(self, default: impl IntoExpression) -> Expression {
        Expression::IfNull(self.into(), default.into_expression().into())
    }
    pub fn null_if(self, value: impl IntoExpression) -> Expression {
        Expression::NullIf(self.into(), value.into_expression().into())
    }
    pub fn cast(self, cast: CastType) -> Expression {
        Expression::Cast(self.into(), cast)
    }
    pub fn cast_as_varchar(self) -> Expression {
        self.cast(CastType::Varchar)
    }

    pub fn eq(self, value: impl IntoExpression) -> Condition {
        Condition::Eq(self, value.into_expression())
    }
    pub fn op(self, operator: Operator, value: impl IntoExpression) -> Condition {
        Condition::Op(self, value.into_expression(), operator)
    }
    pub fn ne(self, value: impl IntoExpression) -> Condition {
        self.op(Operator::Ne, value)
    }
    pub fn lt(self, value: impl IntoExpression) -> Condition {
        self.op(Operator::Lt, value)
    }
    pub fn le(self, value: impl IntoExpression) -> Condition {
        self.op(Operator::Le, value)
    }
    pub fn gt(self, value: impl IntoExpression) -> Condition {
        self.op(Operator::Gt, value)
    }
    pub fn ge(self, value: impl IntoExpression) -> Condition {
        self.op(Operator::Ge, value)
    }

    /// `self >= min AND self <= max`, a null bound is dropped and two null bounds
    /// give [`Condition::NoCondition`].
    pub fn between(self, min: impl IntoExpression, max: impl IntoExpression) -> Condition {
        let (min, max) = (min.into_expression(), max.into_expression());
        let lower = if min.is_null_literal() {
            Condition::NoCondition
        } else {
            self.clone().ge(min)
        };
        let upper = if max.is_null_literal() {
            Condition::NoCondition
        } else {
            self.le(max)
        };
        lower.and(upper)
    }
    pub fn not_between(self, min: impl IntoExpression, max: impl IntoExpression) -> Condition {
        self.between(min, max).not()
    }

    pub fn is_in<I: IntoExpression>(self, values: impl IntoIterator<Item = I>) -> Condition {
        Condition::In(
            self,
            values.into_iter().map(IntoExpression::into_expression).collect(),
        )
    }
    pub fn not_in<I: IntoExpression>(self, values: impl IntoIterator<Item = I>) -> Condition {
        self.is_in(values).not()
    }

    pub fn like(self, pattern: impl IntoExpression) -> Condition {
        Condition::Like(self, pattern.into_expression())
    }
    pub fn like_ignore_case(self, pattern: impl IntoExpression) -> Condition {
        Condition::LikeIgnoreCase(self, pattern.into_expression())
    }
    pub fn eq_ignore_case(self, value: impl IntoExpression) -> Condition {
        self.lower().eq(value.into_expression().lower())
    }
    pub fn ne_ignore_case(self, value: impl IntoExpression) -> Condition {
        self.lower().ne(value.into_expression().lower())
    }

    pub fn is_null(self) -> Condition {
        Condition::IsNull(self)
    }
    pub fn is_not_null(self) -> Condition {
        Condition::IsNotNull(self)
    }
    pub fn is_true(self) -> Condition {
        Condition::IsTrue(self)
    }
    pub fn is_false(self) -> Condition {
        Condition::IsFalse(self)
    }
    /// `IS TRUE`, `IS FALSE` or `IS NULL`.
    pub fn is(self, value: Option<bool>) -> Condition {
        match value {
            Some(true) => self.is_true(),
            Some(false) => self.is_false(),
            None => self.is_null(),
        }
    }

    pub fn full_text_matches(self, query: &str) -> Condition {
        FullTextCondition::of(self, query)
    }
}

fn cast_value(value: Value, cast: CastType) -> Result<Value> {
    let unsupported = |value: &Value| -> crate::Error {
        ConfigurationError::Unsupported(format!("Cannot cast {} as {}", value, cast)).into()
    };
    Ok(match cast {
        CastType::Varchar => Value::Varchar(value.to_text().map(Into::into)),
        _ if value.is_null() => match cast {
            CastType::BigInt => Value::Int64(None),
            _ => Value::Float64(None),
        },
        CastType::BigInt => match value.as_numeric() {
            Some(Numeric::Integer(v)) => {
                Value::Int64(Some(i64::try_from(v).map_err(|_| unsupported(&value))?))
            }
            Some(Numeric::Float(v)) if v.is_finite() => Value::Int64(Some(v.trunc() as i64)),
            _ => match value {
                Value::Boolean(Some(v)) => Value::Int64(Some(v as i64)),
                _ => return Err(unsupported(&value)),
            },
        },
        CastType::Double => match value.as_numeric() {
            Some(Numeric::Integer(v)) => Value::Float64(Some(v as f64)),
            Some(Numeric::Float(v)) => Value::Float64(Some(v)),
            None => match value {
                Value::Boolean(Some(v)) => Value::Float64(Some(v as i64 as f64)),
                _ => return Err(unsupported(&value)),
            },
        },
    })
}

impl Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Value(v) => v.fmt(f),
            Expression::Property(v) => v.fmt(f),
            Expression::Lower(v) => write!(f, "LOWER({})", v),
            Expression::Coalesce(a, b) => write!(f, "COALESCE({}, {})", a, b),
            Expression::IfNull(a, b) => write!(f, "IFNULL({}, {})", a, b),
            Expression::NullIf(a, b) => write!(f, "NULLIF({}, {})", a, b),
            Expression::Cast(v, cast) => write!(f, "CAST({} AS {})", v, cast),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CastType, Expression};
    use crate::Value;

    #[test]
    fn calculate_without_properties() {
        let lower = Expression::value("AbC").lower();
        assert_eq!(lower.calculate(&()).unwrap(), Value::Varchar(Some("abc".into())));
        let coalesce = Expression::value(Value::Int32(None)).coalesce(5);
        assert_eq!(coalesce.calculate(&()).unwrap(), Value::Int32(Some(5)));
        let null_if = Expression::value(5).null_if(5);
        assert_eq!(null_if.calculate(&()).unwrap(), Value::Int32(None));
        let null_if = Expression::value(5).null_if(6);
        assert_eq!(null_if.calculate(&()).unwrap(), Value::Int32(Some(5)));
        let cast = Expression::value(42i64).cast_as_varchar();
        assert_eq!(cast.calculate(&()).unwrap(), Value::Varchar(Some("42".into())));
        let cast = Expression::value("12.75").cast(CastType::BigInt);
        assert_eq!(cast.calculate(&()).unwrap(), Value::Int64(Some(12)));
        assert!(Expression::value("abc").cast(CastType::Double).calculate(&()).is_err());
    }

    #[test]
    fn nulls_propagate() {
        let lower = Expression::value(Value::Null).lower();
        assert!(lower.calculate(&()).unwrap().is_null());
        let cast = Expression::value(Value::Varchar(None)).cast(CastType::BigInt);
        assert_eq!(cast.calculate(&()).unwrap(), Value::Int64(None));
    }

    #[test]
    fn display() {
        assert_eq!(Expression::value("Foo").lower().to_string(), "LOWER(Foo)");
        assert_eq!(
            Expression::value(Value::Null).coalesce(3).to_string(),
            "COALESCE(null, 3)"
        );
        assert_eq!(Expression::value(1).if_null(2).to_string(), "IFNULL(1, 2)");
        assert_eq!(Expression::value(1).null_if(2).to_string(), "NULLIF(1, 2)");
        assert_eq!(
            Expression::value(1).cast_as_varchar().to_string(),
            "CAST(1 AS VARCHAR)"
        );
    }
}
