use crate::{
    ConfigurationError, DatabaseVariant, Expression, FullTextCondition, Result, SqlWriter, Value,
    writer::Context,
};

#[derive(Default, Debug, Clone, Copy)]
pub struct H2SqlWriter {}

impl H2SqlWriter {
    pub const fn new() -> Self {
        Self {}
    }
}

impl SqlWriter for H2SqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn variant(&self) -> DatabaseVariant {
        DatabaseVariant::H2
    }

    /// Lucene index lookup, matched against the id of the entity owning the column.
    fn write_full_text(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &FullTextCondition,
    ) -> Result<()> {
        let Expression::Property(property) = value.arg() else {
            return Err(ConfigurationError::Unsupported(format!(
                "H2 full text search needs a property, found {}",
                value.arg()
            ))
            .into());
        };
        let meta = property.meta()?;
        let Some(id) = meta.id_properties().next() else {
            return Err(ConfigurationError::Unsupported(format!(
                "H2 full text search needs an id on {}",
                meta.name()
            ))
            .into());
        };
        let query = value
            .words()
            .iter()
            .map(|v| format!("{}*", v))
            .collect::<Vec<_>>()
            .join(" AND ");
        let id = match property.alias() {
            Some(alias) => id.property.aliased(alias),
            None => id.property.clone(),
        };
        self.write_property(context, out, &id)?;
        out.push_str(" IN (SELECT CAST(FT.KEYS[1] AS BIGINT) AS ID FROM FTL_SEARCH_DATA(");
        self.write_parameter(context, out, Value::Varchar(Some(query)));
        out.push_str(", 0, 0) FT WHERE FT.\"TABLE\" = '");
        out.push_str(&meta.table_name().to_uppercase().replace('\'', "''"));
        out.push_str("')");
        Ok(())
    }
}
