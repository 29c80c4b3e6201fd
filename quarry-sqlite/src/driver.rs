use crate::{SqliteConnection, SqlitePrepared};
use quarry_core::{DatabaseVariant, Driver, SqliteSqlWriter};

#[derive(Debug, Default)]
pub struct SqliteDriver {}

impl SqliteDriver {
    pub const fn new() -> Self {
        Self {}
    }
}

impl Driver for SqliteDriver {
    type Connection = SqliteConnection;
    type SqlWriter = SqliteSqlWriter;
    type Prepared = SqlitePrepared;

    const NAME: &'static str = "sqlite";

    fn sql_writer(&self) -> SqliteSqlWriter {
        SqliteSqlWriter {}
    }

    fn variant(&self) -> DatabaseVariant {
        DatabaseVariant::Sqlite
    }
}
