use crate::{
    AsValue, Condition, ConfigurationError, Entity, EntityMeta, Error, Expression, OrderBy,
    Result, Row, Value,
};
use serde::{Deserialize, Serialize};
use std::{
    borrow::Cow,
    fmt::{self, Display},
    marker::PhantomData,
    str::FromStr,
};

/// Dot separated path of a field, nested paths go through embedded structs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PropertyName(Cow<'static, str>);

impl PropertyName {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.split('.').any(|v| v.trim().is_empty()) {
            return Err(ConfigurationError::InvalidPropertyName(name).into());
        }
        Ok(Self(Cow::Owned(name)))
    }

    /// Used by the derived constants, the name is checked when it is resolved.
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    pub fn is_nested(&self) -> bool {
        self.0.contains('.')
    }

    /// `prefix.self`
    pub fn nested_in(&self, prefix: &str) -> Self {
        Self(Cow::Owned(format!("{}.{}", prefix, self.0)))
    }
}

impl Display for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PropertyName {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for PropertyName {
    type Error = Error;
    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<PropertyName> for String {
    fn from(value: PropertyName) -> Self {
        value.0.into_owned()
    }
}

/// Database column of a property.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnName {
    /// Table name, or the alias when the property is aliased.
    pub table: String,
    pub column: String,
}

impl ColumnName {
    /// `table.column`, unquoted.
    pub fn qualified(&self) -> String {
        format!("{}.{}", self.table, self.column)
    }
    pub fn unqualified(&self) -> &str {
        &self.column
    }
}

impl Display for ColumnName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

/// A property of a registered entity, optionally seen through a table alias.
///
/// It's a plain value: equality and hashing cover the entity name, the path and
/// the alias. It serializes as its external string, see [`Property::to_external_string`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Property {
    entity: Cow<'static, str>,
    name: PropertyName,
    alias: Option<String>,
}

const ALIAS_SEPARATOR: char = '@';

fn escape(component: &str) -> String {
    urlencoding::encode(component)
        .replace("%3A", ":")
        .replace('.', "%2E")
}

impl Property {
    /// Unchecked, resolution fails later if the entity or the path are unknown.
    pub fn new(entity: impl Into<Cow<'static, str>>, name: PropertyName) -> Self {
        Self {
            entity: entity.into(),
            name,
            alias: None,
        }
    }

    /// Checked against the metadata of `E`, fails for unknown and transient paths.
    pub fn of<E: Entity>(name: &str) -> Result<Self> {
        let name = PropertyName::new(name)?;
        E::meta()?.property(&name)?;
        Ok(Self::new(E::PATH, name))
    }

    /// Module qualified name of the entity, see [`Entity::PATH`].
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Entity name without the module path.
    pub fn entity_name(&self) -> &str {
        self.entity
            .rsplit_once("::")
            .map_or(self.entity.as_ref(), |(_, name)| name)
    }

    pub fn name(&self) -> &PropertyName {
        &self.name
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Same property, read from the table aliased as `alias`.
    pub fn aliased(&self, alias: impl Into<String>) -> Self {
        Self {
            alias: Some(alias.into()),
            ..self.clone()
        }
    }

    pub fn unaliased(&self) -> Self {
        Self {
            alias: None,
            ..self.clone()
        }
    }

    pub fn meta(&self) -> Result<&'static EntityMeta> {
        EntityMeta::by_name(&self.entity)
    }

    /// Column of the property, qualified with the alias when present.
    pub fn column_name(&self) -> Result<ColumnName> {
        let meta = self.meta()?;
        let property = meta.property(&self.name)?;
        Ok(ColumnName {
            table: self
                .alias
                .clone()
                .unwrap_or_else(|| meta.table_name().to_string()),
            column: property.column.clone(),
        })
    }

    /// Typed null of the column, tells how values read from the database decode.
    pub fn value_type(&self) -> Result<Value> {
        Ok(self.meta()?.property(&self.name)?.value.as_null())
    }

    pub fn calculate(&self, row: &dyn Row) -> Result<Value> {
        row.property_value(self)
    }

    pub fn expression(&self) -> Expression {
        Expression::Property(self.clone())
    }

    pub fn asc(&self) -> OrderBy {
        OrderBy::asc(self.clone())
    }

    pub fn desc(&self) -> OrderBy {
        OrderBy::desc(self.clone())
    }

    /// `Entity.path.segments[@alias]`, every component percent encoded and with
    /// dots escaped, parses back with [`Property::from_external_string`].
    pub fn to_external_string(&self) -> String {
        let mut result = escape(&self.entity);
        for segment in self.name.segments() {
            result.push('.');
            result.push_str(&escape(segment));
        }
        if let Some(alias) = &self.alias {
            result.push(ALIAS_SEPARATOR);
            result.push_str(&escape(alias));
        }
        result
    }

    pub fn from_external_string(input: &str) -> Result<Self> {
        let invalid = |reason: &str| -> Error {
            ConfigurationError::InvalidExternalString {
                input: input.to_string(),
                reason: reason.to_string(),
            }
            .into()
        };
        let decode = |component: &str| -> Result<String> {
            urlencoding::decode(component)
                .map(Cow::into_owned)
                .map_err(|_| invalid("a component is not valid percent encoded UTF-8"))
        };
        let (path, alias) = match input.split_once(ALIAS_SEPARATOR) {
            Some((path, alias)) => {
                if alias.contains(ALIAS_SEPARATOR) {
                    return Err(invalid("more than one alias separator"));
                }
                let alias = decode(alias)?;
                if alias.is_empty() {
                    return Err(invalid("empty alias"));
                }
                (path, Some(alias))
            }
            None => (input, None),
        };
        let mut components = path.split('.');
        let entity = decode(components.next().unwrap_or_default())?;
        if entity.is_empty() {
            return Err(invalid("missing entity name"));
        }
        let segments = components.map(decode).collect::<Result<Vec<_>>>()?;
        if segments.is_empty() {
            return Err(invalid("missing property path"));
        }
        if segments.iter().any(|v| v.contains('.')) {
            return Err(invalid("a path segment contains a dot"));
        }
        let name = PropertyName::new(segments.join("."))
            .map_err(|e| invalid(&e.to_string()))?;
        Ok(Self {
            entity: Cow::Owned(entity),
            name,
            alias,
        })
    }
}

impl Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}",
            self.alias.as_deref().unwrap_or(self.entity_name()),
            self.name
        )
    }
}

impl FromStr for Property {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Self::from_external_string(s)
    }
}

impl TryFrom<String> for Property {
    type Error = Error;
    fn try_from(value: String) -> Result<Self> {
        Self::from_external_string(&value)
    }
}

impl From<Property> for String {
    fn from(value: Property) -> Self {
        value.to_external_string()
    }
}

/// Typed handle on a property of `E` holding values of type `V`.
///
/// The derive macro emits one constant per field (`Person::AGE`), the fluent methods
/// only accept values convertible to `V`.
pub struct TableProperty<E, V> {
    name: &'static str,
    _marker: PhantomData<fn() -> (E, V)>,
}

impl<E, V> TableProperty<E, V> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<E, V> Clone for TableProperty<E, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E, V> Copy for TableProperty<E, V> {}

impl<E, V> fmt::Debug for TableProperty<E, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TableProperty").field(&self.name).finish()
    }
}

impl<E: Entity, V: AsValue> TableProperty<E, V> {
    pub fn property(&self) -> Property {
        Property::new(E::PATH, PropertyName::from_static(self.name))
    }
    pub fn aliased(&self, alias: impl Into<String>) -> Property {
        self.property().aliased(alias)
    }
    pub fn expression(&self) -> Expression {
        Expression::Property(self.property())
    }
    fn value(value: impl Into<V>) -> Expression {
        Expression::Value(value.into().as_value())
    }

    pub fn eq(&self, value: impl Into<V>) -> Condition {
        self.expression().eq(Self::value(value))
    }
    pub fn ne(&self, value: impl Into<V>) -> Condition {
        self.expression().ne(Self::value(value))
    }
    pub fn lt(&self, value: impl Into<V>) -> Condition {
        self.expression().lt(Self::value(value))
    }
    pub fn le(&self, value: impl Into<V>) -> Condition {
        self.expression().le(Self::value(value))
    }
    pub fn gt(&self, value: impl Into<V>) -> Condition {
        self.expression().gt(Self::value(value))
    }
    pub fn ge(&self, value: impl Into<V>) -> Condition {
        self.expression().ge(Self::value(value))
    }
    /// Inclusive, a null bound is dropped.
    pub fn between(&self, min: impl Into<V>, max: impl Into<V>) -> Condition {
        self.expression()
            .between(Self::value(min), Self::value(max))
    }
    pub fn not_between(&self, min: impl Into<V>, max: impl Into<V>) -> Condition {
        self.expression()
            .not_between(Self::value(min), Self::value(max))
    }
    pub fn is_in<I: Into<V>>(&self, values: impl IntoIterator<Item = I>) -> Condition {
        self.expression()
            .is_in(values.into_iter().map(Self::value))
    }
    pub fn not_in<I: Into<V>>(&self, values: impl IntoIterator<Item = I>) -> Condition {
        self.expression()
            .not_in(values.into_iter().map(Self::value))
    }
    pub fn like(&self, pattern: impl Into<String>) -> Condition {
        self.expression().like(pattern.into())
    }
    pub fn like_ignore_case(&self, pattern: impl Into<String>) -> Condition {
        self.expression().like_ignore_case(pattern.into())
    }
    pub fn eq_ignore_case(&self, value: impl Into<String>) -> Condition {
        self.expression().eq_ignore_case(value.into())
    }
    pub fn ne_ignore_case(&self, value: impl Into<String>) -> Condition {
        self.expression().ne_ignore_case(value.into())
    }
    pub fn is_null(&self) -> Condition {
        self.expression().is_null()
    }
    pub fn is_not_null(&self) -> Condition {
        self.expression().is_not_null()
    }
    pub fn is_true(&self) -> Condition {
        self.expression().is_true()
    }
    pub fn is_false(&self) -> Condition {
        self.expression().is_false()
    }
    pub fn is(&self, value: Option<bool>) -> Condition {
        self.expression().is(value)
    }
    pub fn full_text_matches(&self, query: &str) -> Condition {
        self.expression().full_text_matches(query)
    }
    pub fn lower(&self) -> Expression {
        self.expression().lower()
    }
    pub fn coalesce(&self, default: impl Into<V>) -> Expression {
        self.expression().coalesce(Self::value(default))
    }
    pub fn if_null(&self, default: impl Into<V>) -> Expression {
        self.expression().if_null(Self::value(default))
    }
    pub fn null_if(&self, value: impl Into<V>) -> Expression {
        self.expression().null_if(Self::value(value))
    }
    pub fn cast_as_varchar(&self) -> Expression {
        self.expression().cast_as_varchar()
    }
    pub fn asc(&self) -> OrderBy {
        OrderBy::asc(self.property())
    }
    pub fn desc(&self) -> OrderBy {
        OrderBy::desc(self.property())
    }
}

impl<E: Entity, V: AsValue> From<TableProperty<E, V>> for Property {
    fn from(value: TableProperty<E, V>) -> Self {
        value.property()
    }
}

#[cfg(test)]
mod tests {
    use super::{Property, PropertyName};
    use crate::ConfigurationError;

    #[test]
    fn property_names() {
        assert!(PropertyName::new("name").is_ok());
        assert!(PropertyName::new("address.city").unwrap().is_nested());
        assert!(PropertyName::new("first name").is_ok());
        for name in ["", ".", "a.", ".a", "a..b", " "] {
            let error = PropertyName::new(name).unwrap_err();
            assert!(matches!(
                error.downcast_ref::<ConfigurationError>(),
                Some(ConfigurationError::InvalidPropertyName(..))
            ));
        }
    }

    #[test]
    fn external_string_escapes_components() {
        let property = Property::new("Person", PropertyName::new("first.name").unwrap());
        assert_eq!(property.to_external_string(), "Person.first.name");
        let property = Property::new("Person", PropertyName::new("weird name").unwrap())
            .aliased("p@1.x");
        let external = property.to_external_string();
        assert_eq!(external, "Person.weird%20name@p%401%2Ex");
        assert_eq!(Property::from_external_string(&external).unwrap(), property);
    }

    #[test]
    fn external_string_rejects_garbage() {
        for input in ["", "Person", "Person.", ".name", "Person.name@", "A.b@c@d", "A.%FF"] {
            let error = Property::from_external_string(input).unwrap_err();
            assert!(
                matches!(
                    error.downcast_ref::<ConfigurationError>(),
                    Some(ConfigurationError::InvalidExternalString { .. })
                ),
                "{input}"
            );
        }
    }

    #[test]
    fn display() {
        let property = Property::new("Person", PropertyName::new("name").unwrap());
        assert_eq!(property.to_string(), "Person.name");
        assert_eq!(property.aliased("p").to_string(), "p.name");
        assert_eq!(property.aliased("p").unaliased(), property);
        let property = Property::new("app::hr::Person", PropertyName::new("name").unwrap());
        assert_eq!(property.entity_name(), "Person");
        assert_eq!(property.to_string(), "Person.name");
        assert_eq!(property.to_external_string(), "app::hr::Person.name");
    }
}
