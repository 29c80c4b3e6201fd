use crate::{
    Condition, ConfigurationError, Entity, IdValues, Property, PropertyName, Result, Value,
};
use std::{
    collections::{BTreeSet, HashMap},
    sync::{LazyLock, OnceLock},
};

/// A resolved, non transient property.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyMeta {
    pub property: Property,
    /// Unqualified column name.
    pub column: String,
    /// Typed null of the column.
    pub value: Value,
    pub nullable: bool,
    pub id: bool,
}

/// Mapping of an entity: table, properties and id.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityMeta {
    name: &'static str,
    table_name: &'static str,
    properties: Vec<PropertyMeta>,
    transient: Vec<&'static str>,
}

/// Submitted by `#[derive(Entity)]`, makes the entity reachable from its name.
pub struct EntityRegistration {
    pub name: &'static str,
    pub path: &'static str,
    pub meta: fn() -> Result<&'static EntityMeta>,
}

inventory::collect!(EntityRegistration);

#[derive(Default)]
struct Registry {
    by_path: HashMap<&'static str, &'static EntityRegistration>,
    by_name: HashMap<&'static str, Vec<&'static EntityRegistration>>,
}

static REGISTRY: LazyLock<Registry> = LazyLock::new(|| {
    let mut result = Registry::default();
    for registration in inventory::iter::<EntityRegistration> {
        result.by_path.insert(registration.path, registration);
        result
            .by_name
            .entry(registration.name)
            .or_default()
            .push(registration);
    }
    result
});

impl EntityMeta {
    pub fn build<E: Entity>() -> Result<Self> {
        let invalid = |reason: String| ConfigurationError::InvalidMetadata {
            entity: E::NAME.to_string(),
            reason,
        };
        let mut columns = BTreeSet::new();
        let mut paths = BTreeSet::new();
        let mut properties = Vec::new();
        for def in E::column_defs() {
            if !columns.insert(def.column.clone()) {
                return Err(invalid(format!("column `{}` is mapped twice", def.column)).into());
            }
            if !paths.insert(def.property.clone()) {
                return Err(invalid(format!("property `{}` is mapped twice", def.property)).into());
            }
            properties.push(PropertyMeta {
                property: Property::new(E::PATH, def.property),
                column: def.column,
                value: def.value.as_null(),
                nullable: def.nullable,
                id: def.id,
            });
        }
        if properties.is_empty() {
            return Err(invalid("no mapped field".into()).into());
        }
        Ok(Self {
            name: E::NAME,
            table_name: E::table_name(),
            properties,
            transient: E::transient_fields().to_vec(),
        })
    }

    /// Builds on first use, later calls return the cached instance.
    pub fn cached<E: Entity>(cell: &'static OnceLock<EntityMeta>) -> Result<&'static EntityMeta> {
        if let Some(meta) = cell.get() {
            return Ok(meta);
        }
        let meta = Self::build::<E>()?;
        Ok(cell.get_or_init(|| meta))
    }

    pub fn of<E: Entity>() -> Result<&'static EntityMeta> {
        E::meta()
    }

    /// Looks up a registered entity by [`Entity::PATH`], or by [`Entity::NAME`] when
    /// exactly one registered entity has that short name.
    pub fn by_name(name: &str) -> Result<&'static EntityMeta> {
        if let Some(registration) = REGISTRY.by_path.get(name) {
            return (registration.meta)();
        }
        match REGISTRY.by_name.get(name).map(Vec::as_slice) {
            Some([registration]) => (registration.meta)(),
            Some([_, _, ..]) => Err(ConfigurationError::AmbiguousEntity(name.to_string()).into()),
            _ => Err(ConfigurationError::UnknownEntity(name.to_string()).into()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn table_name(&self) -> &'static str {
        self.table_name
    }

    pub fn properties(&self) -> &[PropertyMeta] {
        &self.properties
    }

    /// Id properties in declaration order, more than one for composite ids.
    pub fn id_properties(&self) -> impl Iterator<Item = &PropertyMeta> {
        self.properties.iter().filter(|v| v.id)
    }

    pub fn has_id(&self) -> bool {
        self.properties.iter().any(|v| v.id)
    }

    pub fn transient_fields(&self) -> &[&'static str] {
        &self.transient
    }

    pub fn property(&self, name: &PropertyName) -> Result<&PropertyMeta> {
        if let Some(property) = self
            .properties
            .iter()
            .find(|v| v.property.name() == name)
        {
            return Ok(property);
        }
        let first = name.segments().next().unwrap_or_default();
        if self.transient.contains(&first) {
            return Err(ConfigurationError::TransientProperty {
                entity: self.name.to_string(),
                property: name.to_string(),
            }
            .into());
        }
        Err(ConfigurationError::UnknownProperty {
            entity: self.name.to_string(),
            property: name.to_string(),
            available: self
                .properties
                .iter()
                .map(|v| v.property.name().as_str())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect::<Vec<_>>()
                .join(", "),
        }
        .into())
    }

    /// Unqualified column names, in declaration order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|v| v.column.as_str())
    }

    /// `id1 = v1 AND id2 = v2 ...` over the id properties.
    pub fn id_condition(&self, id: impl IdValues) -> Result<Condition> {
        let values = id.id_values();
        let ids = self.id_properties().collect::<Vec<_>>();
        if ids.is_empty() || ids.len() != values.len() {
            return Err(ConfigurationError::IdArity {
                entity: self.name.to_string(),
                expected: ids.len(),
                actual: values.len(),
            }
            .into());
        }
        Ok(ids
            .into_iter()
            .zip(values)
            .fold(Condition::NoCondition, |condition, (property, value)| {
                condition.and(property.property.expression().eq(value))
            }))
    }
}
