use crate::{
    CastType, DatabaseVariant, FullTextCondition, Result, SqlWriter, Value, separated_by,
    writer::Context,
};
use std::fmt::Write;

#[derive(Default, Debug, Clone, Copy)]
pub struct SqliteSqlWriter {}

impl SqliteSqlWriter {
    pub const fn new() -> Self {
        Self {}
    }
}

impl SqlWriter for SqliteSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn variant(&self) -> DatabaseVariant {
        DatabaseVariant::Sqlite
    }

    fn write_cast_type(&self, out: &mut String, value: CastType) {
        out.push_str(match value {
            CastType::Varchar => "TEXT",
            CastType::BigInt => "INTEGER",
            CastType::Double => "REAL",
        });
    }

    /// No full text index, every word must be contained in the column.
    fn write_full_text(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &FullTextCondition,
    ) -> Result<()> {
        separated_by(
            out,
            value.words(),
            |out, word| {
                self.write_function(context, out, "LOWER", &[value.arg()])?;
                out.push_str(" LIKE ");
                self.write_parameter(context, out, Value::Varchar(Some(format!("%{}%", word))));
                Ok(())
            },
            " AND ",
        )
    }

    fn write_offset_limit(
        &self,
        out: &mut String,
        offset: Option<u64>,
        limit: Option<u64>,
        _ordered: bool,
    ) -> Result<()> {
        match (offset, limit) {
            (Some(offset), Some(limit)) => {
                let _ = write!(out, " LIMIT {} OFFSET {}", limit, offset);
            }
            (Some(offset), None) => {
                let _ = write!(out, " LIMIT -1 OFFSET {}", offset);
            }
            (None, Some(limit)) => {
                let _ = write!(out, " LIMIT {}", limit);
            }
            (None, None) => {}
        }
        Ok(())
    }
}
