use crate::{
    AsValue, ConfigurationError, EntityMeta, Property, PropertyName, Result, RowLabeled, Value,
};

/// A mapped field as declared by a struct, before it's resolved into [`EntityMeta`].
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub property: PropertyName,
    pub column: String,
    /// Typed null, the prototype of the values this column holds.
    pub value: Value,
    pub nullable: bool,
    pub id: bool,
}

impl ColumnDef {
    /// Moves a column of an embedded struct under the field that embeds it.
    pub fn nested_in(self, field: &str, id: bool) -> Self {
        Self {
            property: self.property.nested_in(field),
            id: self.id || id,
            ..self
        }
    }
}

/// Column mapping of a struct, implemented by `#[derive(Entity)]` and `#[derive(Embeddable)]`.
pub trait Columns: Sized {
    fn column_defs() -> Vec<ColumnDef>;

    /// Fields marked `#[quarry(ignore)]`, they have no column.
    fn transient_fields() -> &'static [&'static str] {
        &[]
    }

    /// Value of the field at `path`, `None` when there is no such mapped field.
    fn column_value(&self, path: &[&str]) -> Option<Value>;

    fn from_row(row: &RowLabeled) -> Result<Self>;
}

/// A struct stored in a table.
pub trait Entity: Columns + Send + Sync + 'static {
    /// Short name used in messages and in the display form of properties, the struct name.
    const NAME: &'static str;

    /// Module qualified name, identifies the entity in [`Property`] and in the registry.
    const PATH: &'static str = Self::NAME;

    fn table_name() -> &'static str;

    /// Metadata built once and cached for the rest of the process.
    fn meta() -> Result<&'static EntityMeta>;
}

/// Anything a condition can be evaluated against.
pub trait Row {
    fn property_value(&self, property: &Property) -> Result<Value>;
}

impl<E: Entity> Row for E {
    fn property_value(&self, property: &Property) -> Result<Value> {
        if property.entity() != E::PATH {
            return Err(ConfigurationError::ForeignProperty {
                property: property.to_string(),
                expected: property.entity().to_string(),
                actual: E::PATH.to_string(),
            }
            .into());
        }
        let meta = E::meta()?;
        meta.property(property.name())?;
        let path = property.name().segments().collect::<Vec<_>>();
        self.column_value(&path).ok_or_else(|| {
            ConfigurationError::InvalidMetadata {
                entity: E::NAME.to_string(),
                reason: format!("no value for mapped property {}", property.name()),
            }
            .into()
        })
    }
}

/// Rows fetched from the database, the property is looked up by column name.
impl Row for RowLabeled {
    fn property_value(&self, property: &Property) -> Result<Value> {
        let column = property.column_name()?;
        self.get_column(&column.column)
            .cloned()
            .ok_or_else(|| {
                ConfigurationError::ForeignProperty {
                    property: property.to_string(),
                    expected: property.entity().to_string(),
                    actual: format!("a row with columns {}", self.labels.join(", ")),
                }
                .into()
            })
    }
}

/// No row at all, only conditions without properties can be evaluated.
impl Row for () {
    fn property_value(&self, property: &Property) -> Result<Value> {
        Err(ConfigurationError::ForeignProperty {
            property: property.to_string(),
            expected: property.entity().to_string(),
            actual: "an empty row".to_string(),
        }
        .into())
    }
}

/// Values of an id, in declaration order of the id properties.
///
/// A single value for a simple id, a tuple for composite ones.
pub trait IdValues {
    fn id_values(self) -> Vec<Value>;
}

impl<T: AsValue> IdValues for T {
    fn id_values(self) -> Vec<Value> {
        vec![self.as_value()]
    }
}

impl IdValues for Vec<Value> {
    fn id_values(self) -> Vec<Value> {
        self
    }
}

macro_rules! impl_id_values_tuple {
    ($($name:ident: $index:tt),+) => {
        impl<$($name: AsValue),+> IdValues for ($($name,)+) {
            fn id_values(self) -> Vec<Value> {
                vec![$(self.$index.as_value()),+]
            }
        }
    };
}
impl_id_values_tuple!(A: 0, B: 1);
impl_id_values_tuple!(A: 0, B: 1, C: 2);
impl_id_values_tuple!(A: 0, B: 1, C: 2, D: 3);
