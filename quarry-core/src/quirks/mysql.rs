use crate::{
    CastType, DatabaseVariant, FullTextCondition, ParametrizedSql, Result, SqlWriter, Value,
    writer::Context,
};
use std::fmt::Write;

/// MySQL and MariaDB.
#[derive(Default, Debug, Clone, Copy)]
pub struct MySqlSqlWriter {}

impl MySqlSqlWriter {
    pub const fn new() -> Self {
        Self {}
    }
}

/// Shorter or longer words are not in the InnoDB full text index, searching for
/// them would match nothing.
fn indexed_word(word: &str) -> bool {
    (3..=84).contains(&word.chars().count())
}

impl SqlWriter for MySqlSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn variant(&self) -> DatabaseVariant {
        DatabaseVariant::MySqlMariaDb
    }

    fn write_identifier_quoted(&self, out: &mut String, value: &str) {
        out.push('`');
        self.write_escaped(out, value, '`', "``");
        out.push('`');
    }

    fn write_cast_type(&self, out: &mut String, value: CastType) {
        out.push_str(match value {
            CastType::Varchar => "CHAR",
            CastType::BigInt => "SIGNED",
            CastType::Double => "DOUBLE",
        });
    }

    /// `+word*` for each indexed word, in boolean mode.
    fn write_full_text(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &FullTextCondition,
    ) -> Result<()> {
        let query = value
            .words()
            .iter()
            .filter(|v| indexed_word(v))
            .map(|v| format!("+{}*", v))
            .collect::<Vec<_>>()
            .join(" ");
        if query.is_empty() {
            out.push_str(ParametrizedSql::MATCH_ALL);
            return Ok(());
        }
        out.push_str("MATCH(");
        self.write_expression(context, out, value.arg())?;
        out.push_str(") AGAINST (");
        self.write_parameter(context, out, Value::Varchar(Some(query)));
        out.push_str(" IN BOOLEAN MODE)");
        Ok(())
    }

    /// MySQL has no OFFSET without LIMIT.
    fn write_offset_limit(
        &self,
        out: &mut String,
        offset: Option<u64>,
        limit: Option<u64>,
        _ordered: bool,
    ) -> Result<()> {
        match (offset, limit) {
            (Some(offset), limit) => {
                let _ = write!(out, " LIMIT {} OFFSET {}", limit.unwrap_or(u64::MAX), offset);
            }
            (None, Some(limit)) => {
                let _ = write!(out, " LIMIT {}", limit);
            }
            (None, None) => {}
        }
        Ok(())
    }
}
