use crate::{
    ConfigurationError, DatabaseVariant, Expression, FullTextCondition, NativeSql,
    ParametrizedSql, Result, Row, Value,
};
use serde::{Deserialize, Serialize};
use std::{
    cmp::Ordering,
    fmt::{self, Display},
    ops::{BitAnd, BitOr, Not},
};

/// Ordering comparison between two expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Lt,
    Le,
    Gt,
    Ge,
    Ne,
}

impl Operator {
    /// SQL-92 spelling.
    pub fn sql(&self) -> &'static str {
        match self {
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Ne => "<>",
        }
    }

    /// Null on either side is false for every operator.
    pub fn test(&self, lhs: &Value, rhs: &Value) -> bool {
        if lhs.is_null() || rhs.is_null() {
            return false;
        }
        let ordering = || lhs.compare(rhs);
        match self {
            Operator::Ne => !lhs.text_eq(rhs),
            Operator::Lt => ordering() == Some(Ordering::Less),
            Operator::Le => matches!(ordering(), Some(Ordering::Less | Ordering::Equal)),
            Operator::Gt => ordering() == Some(Ordering::Greater),
            Operator::Ge => matches!(ordering(), Some(Ordering::Greater | Ordering::Equal)),
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql())
    }
}

/// Boolean predicate, evaluated in memory by [`Condition::test`] or rendered to SQL.
///
/// Build it through the fluent methods of [`Expression`] and [`crate::TableProperty`],
/// then compose with [`Condition::and`], [`Condition::or`], [`Condition::not`]
/// (or `&`, `|`, `!`). Composition folds [`Condition::NoCondition`] away eagerly:
/// ```rust,ignore
/// assert_eq!(Condition::NoCondition.and(Person::AGE.eq(5)), Person::AGE.eq(5));
/// ```
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Condition {
    /// Matches everything.
    #[default]
    NoCondition,
    IsNull(Expression),
    IsNotNull(Expression),
    IsTrue(Expression),
    IsFalse(Expression),
    Eq(Expression, Expression),
    Op(Expression, Expression, Operator),
    Like(Expression, Expression),
    LikeIgnoreCase(Expression, Expression),
    In(Expression, Vec<Expression>),
    FullText(FullTextCondition),
    And(Box<Condition>, Box<Condition>),
    Or(Box<Condition>, Box<Condition>),
    Not(Box<Condition>),
    Native(NativeSql),
}

impl Condition {
    pub fn native(sql: NativeSql) -> Self {
        Condition::Native(sql)
    }

    pub fn is_no_condition(&self) -> bool {
        matches!(self, Condition::NoCondition)
    }

    pub fn and(self, other: impl Into<Condition>) -> Condition {
        let other = other.into();
        match (self, other) {
            (Condition::NoCondition, other) => other,
            (this, Condition::NoCondition) => this,
            (this, other) => Condition::And(this.into(), other.into()),
        }
    }

    pub fn or(self, other: impl Into<Condition>) -> Condition {
        let other = other.into();
        match (self, other) {
            (Condition::NoCondition, other) => other,
            (this, Condition::NoCondition) => this,
            (this, other) => Condition::Or(this.into(), other.into()),
        }
    }

    pub fn not(self) -> Condition {
        match self {
            Condition::NoCondition => Condition::NoCondition,
            this => Condition::Not(this.into()),
        }
    }

    /// Evaluates against `row`. Nulls make comparisons false, they never fail.
    ///
    /// Fails only for native SQL, which can't be evaluated, and for properties
    /// that can't be read from `row`.
    pub fn test(&self, row: &dyn Row) -> Result<bool> {
        Ok(match self {
            Condition::NoCondition => true,
            Condition::IsNull(v) => v.calculate(row)?.is_null(),
            Condition::IsNotNull(v) => !v.calculate(row)?.is_null(),
            Condition::IsTrue(v) => v.calculate(row)?.as_truth() == Some(true),
            Condition::IsFalse(v) => v.calculate(row)?.as_truth() == Some(false),
            Condition::Eq(lhs, rhs) => lhs.calculate(row)?.text_eq(&rhs.calculate(row)?),
            Condition::Op(lhs, rhs, op) => op.test(&lhs.calculate(row)?, &rhs.calculate(row)?),
            Condition::Like(value, pattern) => {
                match (value.calculate(row)?.to_text(), pattern.calculate(row)?.to_text()) {
                    (Some(value), Some(pattern)) => like_matches(&value, &pattern),
                    _ => false,
                }
            }
            Condition::LikeIgnoreCase(value, pattern) => {
                match (value.calculate(row)?.to_text(), pattern.calculate(row)?.to_text()) {
                    (Some(value), Some(pattern)) => {
                        like_matches(&value.to_lowercase(), &pattern.to_lowercase())
                    }
                    _ => false,
                }
            }
            Condition::In(value, values) => {
                let value = value.calculate(row)?;
                let mut result = false;
                for candidate in values {
                    if value.text_eq(&candidate.calculate(row)?) {
                        result = true;
                        break;
                    }
                }
                result
            }
            Condition::FullText(v) => v.test(row)?,
            Condition::And(lhs, rhs) => lhs.test(row)? && rhs.test(row)?,
            Condition::Or(lhs, rhs) => lhs.test(row)? || rhs.test(row)?,
            Condition::Not(v) => !v.test(row)?,
            Condition::Native(v) => {
                return Err(ConfigurationError::Unsupported(format!(
                    "Native SQL cannot be evaluated in memory: {}",
                    v
                ))
                .into());
            }
        })
    }

    /// Renders with the writer of the detected [`DatabaseVariant`].
    pub fn to_sql(&self) -> Result<ParametrizedSql> {
        DatabaseVariant::current().sql_writer().render(self)
    }
}

/// Anchored `LIKE` matching, `%` is any run of characters and `_` exactly one.
pub(crate) fn like_matches(value: &str, pattern: &str) -> bool {
    let value = value.chars().collect::<Vec<_>>();
    let pattern = pattern.chars().collect::<Vec<_>>();
    let (mut v, mut p) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;
    while v < value.len() {
        match pattern.get(p) {
            Some('%') => {
                backtrack = Some((p, v));
                p += 1;
            }
            Some(&c) if c == '_' || c == value[v] => {
                v += 1;
                p += 1;
            }
            _ => match backtrack {
                Some((star, consumed)) => {
                    p = star + 1;
                    v = consumed + 1;
                    backtrack = Some((star, consumed + 1));
                }
                None => return false,
            },
        }
    }
    pattern[p..].iter().all(|c| *c == '%')
}

impl BitAnd for Condition {
    type Output = Condition;
    fn bitand(self, rhs: Self) -> Self::Output {
        self.and(rhs)
    }
}

impl BitOr for Condition {
    type Output = Condition;
    fn bitor(self, rhs: Self) -> Self::Output {
        self.or(rhs)
    }
}

impl Not for Condition {
    type Output = Condition;
    fn not(self) -> Self::Output {
        Condition::not(self)
    }
}

impl From<NativeSql> for Condition {
    fn from(value: NativeSql) -> Self {
        Condition::Native(value)
    }
}

impl From<FullTextCondition> for Condition {
    fn from(value: FullTextCondition) -> Self {
        Condition::FullText(value)
    }
}

impl Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::NoCondition => f.write_str("NoCondition"),
            Condition::IsNull(v) => write!(f, "{} IS NULL", v),
            Condition::IsNotNull(v) => write!(f, "{} IS NOT NULL", v),
            Condition::IsTrue(v) => write!(f, "{} IS TRUE", v),
            Condition::IsFalse(v) => write!(f, "{} IS FALSE", v),
            Condition::Eq(lhs, rhs) => write!(f, "{} = {}", lhs, rhs),
            Condition::Op(lhs, rhs, op) => write!(f, "{} {} {}", lhs, op, rhs),
            Condition::Like(lhs, rhs) => write!(f, "{} LIKE {}", lhs, rhs),
            Condition::LikeIgnoreCase(lhs, rhs) => write!(f, "{} ILIKE {}", lhs, rhs),
            Condition::In(value, values) => {
                write!(f, "{} IN (", value)?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    v.fmt(f)?;
                }
                f.write_str(")")
            }
            Condition::FullText(v) => v.fmt(f),
            Condition::And(lhs, rhs) => write!(f, "({}) AND ({})", lhs, rhs),
            Condition::Or(lhs, rhs) => write!(f, "({}) OR ({})", lhs, rhs),
            Condition::Not(v) => write!(f, "NOT({})", v),
            Condition::Native(v) => v.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::like_matches;

    #[test]
    fn like() {
        assert!(like_matches("alpha", "a%"));
        assert!(like_matches("alpha", "%"));
        assert!(like_matches("", "%"));
        assert!(like_matches("alpha", "_lph_"));
        assert!(like_matches("alpha", "%ph%"));
        assert!(like_matches("a%b", "a%b"));
        assert!(like_matches("aaab", "%ab"));
        assert!(!like_matches("alpha", "A%"));
        assert!(!like_matches("alpha", "alp"));
        assert!(!like_matches("alpha", "_lph"));
        assert!(!like_matches("", "_"));
        assert!(like_matches("žluťoučký", "ž_uť%ý"));
    }
}
