use crate::{ConfigurationError, ParametrizedSql, Result, Value};
use std::collections::BTreeMap;

/// Mutable state of one rendering: the parameters collected so far.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Context {
    /// Last synthetic parameter number handed out.
    pub counter: u32,
    pub parameters: BTreeMap<String, Value>,
}

/// Synthetic parameters are `p1`, `p2`, ...
pub fn is_synthetic_parameter(name: &str) -> bool {
    name.strip_prefix('p')
        .is_some_and(|v| !v.is_empty() && v.bytes().all(|c| c.is_ascii_digit()))
}

impl Context {
    pub fn new() -> Self {
        Default::default()
    }

    /// Binds `value` to a fresh synthetic name and returns that name.
    pub fn bind(&mut self, value: Value) -> String {
        self.counter += 1;
        let name = format!("p{}", self.counter);
        self.parameters.insert(name.clone(), value);
        name
    }

    /// Adds a parameter of native SQL, the name is kept as it is.
    pub fn bind_native(&mut self, name: &str, value: &Value) -> Result<()> {
        if is_synthetic_parameter(name) {
            return Err(ConfigurationError::ParameterCollision(name.to_string()).into());
        }
        match self.parameters.get(name) {
            Some(existing) if existing != value => Err(ConfigurationError::ParameterConflict {
                name: name.to_string(),
                first: existing.to_string(),
                second: value.to_string(),
            }
            .into()),
            Some(..) => Ok(()),
            None => {
                self.parameters.insert(name.to_string(), value.clone());
                Ok(())
            }
        }
    }

    pub fn finish(self, sql: String) -> ParametrizedSql {
        ParametrizedSql::new(sql, self.parameters)
    }
}

#[cfg(test)]
mod tests {
    use super::{Context, is_synthetic_parameter};
    use crate::{ConfigurationError, Value};

    #[test]
    fn synthetic_names() {
        assert!(is_synthetic_parameter("p1"));
        assert!(is_synthetic_parameter("p42"));
        assert!(!is_synthetic_parameter("p"));
        assert!(!is_synthetic_parameter("page"));
        assert!(!is_synthetic_parameter("P1"));
        let mut context = Context::new();
        assert_eq!(context.bind(Value::Int32(Some(1))), "p1");
        assert_eq!(context.bind(Value::Int32(Some(1))), "p2");
        assert_eq!(context.parameters.len(), 2);
    }

    #[test]
    fn native_parameters() {
        let mut context = Context::new();
        context.bind_native("name", &"Albedo".into()).unwrap();
        context.bind_native("name", &"Albedo".into()).unwrap();
        let error = context.bind_native("name", &"Shalltear".into()).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<ConfigurationError>(),
            Some(ConfigurationError::ParameterConflict { name, .. }) if name == "name"
        ));
        let error = context.bind_native("p1", &1i32.into()).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<ConfigurationError>(),
            Some(ConfigurationError::ParameterCollision(..))
        ));
    }
}
