use crate::{Condition, Expression, IntoExpression, Result, Row};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Word search over a text column, each dialect spells it its own way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullTextCondition {
    arg: Expression,
    query: String,
}

impl FullTextCondition {
    /// [`Condition::NoCondition`] when the query holds no word.
    pub fn of(arg: impl IntoExpression, query: &str) -> Condition {
        let condition = Self {
            arg: arg.into_expression(),
            query: query.trim().to_string(),
        };
        if condition.words().is_empty() {
            return Condition::NoCondition;
        }
        Condition::FullText(condition)
    }

    pub fn arg(&self) -> &Expression {
        &self.arg
    }

    /// Trimmed user input.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Lowercased words of the query, in order and without duplicates.
    pub fn words(&self) -> Vec<String> {
        let mut result = Vec::<String>::new();
        for word in self
            .query
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|v| !v.is_empty())
        {
            if !result.iter().any(|v| v == word) {
                result.push(word.to_string());
            }
        }
        result
    }

    /// Every whitespace separated token of the query must be a case insensitive
    /// substring of the value.
    pub fn test(&self, row: &dyn Row) -> Result<bool> {
        let tokens = self.query.split_whitespace().collect::<Vec<_>>();
        if tokens.is_empty() {
            return Ok(true);
        }
        let value = self.arg.calculate(row)?;
        let Some(text) = value.to_text() else {
            return Ok(false);
        };
        let text = text.to_lowercase();
        Ok(tokens
            .iter()
            .all(|token| text.contains(&token.to_lowercase())))
    }
}

impl Display for FullTextCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ~ [{}]", self.arg, self.words().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::FullTextCondition;
    use crate::{Condition, Expression, Value};

    #[test]
    fn words() {
        let Condition::FullText(condition) =
            FullTextCondition::of(Expression::value("x"), "  Fat, cat! fat-CAT  ")
        else {
            panic!("Expected a full text condition");
        };
        assert_eq!(condition.words(), ["fat", "cat"]);
        assert_eq!(condition.query(), "Fat, cat! fat-CAT");
        assert_eq!(condition.to_string(), "x ~ [fat, cat]");
    }

    #[test]
    fn blank_query_matches_everything() {
        assert_eq!(
            FullTextCondition::of(Expression::value(Value::Null), ""),
            Condition::NoCondition
        );
        assert_eq!(
            FullTextCondition::of(Expression::value("a"), " ,; "),
            Condition::NoCondition
        );
        assert!(
            FullTextCondition::of(Expression::value(Value::Null), "   ")
                .test(&())
                .unwrap()
        );
    }

    #[test]
    fn containment() {
        let matches = |value: Value, query: &str| {
            FullTextCondition::of(Expression::value(value), query)
                .test(&())
                .unwrap()
        };
        assert!(!matches(Value::Varchar(Some("".into())), "foo"));
        assert!(!matches(Value::Varchar(None), "foo"));
        assert!(matches("fat cat".into(), "f c"));
        assert!(matches("Fat Cat".into(), "CAT fa"));
        assert!(!matches("fat cat".into(), "f k"));
    }
}
