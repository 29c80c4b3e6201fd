//! Typed failures raised by the metadata, rendering and finder layers.
//!
//! Both enums travel inside [`crate::Error`], use `downcast_ref` to match on them:
//! ```rust,ignore
//! match error.downcast_ref::<ConfigurationError>() {
//!     Some(ConfigurationError::UnknownProperty { .. }) => ..,
//!     _ => ..,
//! }
//! ```
use thiserror::Error;

/// The mapping or the query is wrong. Never retried, fix the code instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("There is no such property {property} in {entity}, available fields: {available}")]
    UnknownProperty {
        entity: String,
        property: String,
        available: String,
    },

    #[error("Property {property} of {entity} is transient and has no column")]
    TransientProperty { entity: String, property: String },

    #[error("No entity named `{0}` is registered")]
    UnknownEntity(String),

    #[error("More than one entity is registered as `{0}`")]
    AmbiguousEntity(String),

    #[error("Property {property} belongs to {expected}, it cannot be read from {actual}")]
    ForeignProperty {
        property: String,
        expected: String,
        actual: String,
    },

    #[error("Invalid property name `{0}`")]
    InvalidPropertyName(String),

    #[error("Cannot parse `{input}` as a property: {reason}")]
    InvalidExternalString { input: String, reason: String },

    #[error("Native SQL parameter `{0}` collides with a generated parameter name")]
    ParameterCollision(String),

    #[error("Parameter `{name}` is bound to both {first} and {second}")]
    ParameterConflict {
        name: String,
        first: String,
        second: String,
    },

    #[error("Expected {expected} id values for {entity}, got {actual}")]
    IdArity {
        entity: String,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid mapping of {entity}: {reason}")]
    InvalidMetadata { entity: String, reason: String },

    #[error("{0}")]
    Unsupported(String),
}

/// A finder expected a precise number of rows and the database disagreed.
///
/// `condition` is the display form of the rendered [`crate::ParametrizedSql`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardinalityError {
    #[error("no row matching {entity}: {condition}")]
    NoRow { entity: String, condition: String },

    #[error("too many rows matching {entity}: {condition}")]
    TooManyRows { entity: String, condition: String },
}

#[cfg(test)]
mod tests {
    use super::{CardinalityError, ConfigurationError};
    use crate::Error;

    #[test]
    fn messages() {
        let error = CardinalityError::NoRow {
            entity: "Person".into(),
            condition: "'name = :name'{name=Albedo}".into(),
        };
        assert_eq!(
            error.to_string(),
            "no row matching Person: 'name = :name'{name=Albedo}"
        );
        let error = ConfigurationError::UnknownProperty {
            entity: "Person".into(),
            property: "surname".into(),
            available: "age, id, name".into(),
        };
        assert_eq!(
            error.to_string(),
            "There is no such property surname in Person, available fields: age, id, name"
        );
    }

    #[test]
    fn downcast() {
        let error: Error = ConfigurationError::UnknownEntity("Ghost".into()).into();
        assert!(matches!(
            error.downcast_ref::<ConfigurationError>(),
            Some(ConfigurationError::UnknownEntity(name)) if name == "Ghost"
        ));
    }
}
