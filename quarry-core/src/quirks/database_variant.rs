use crate::{
    Driver, GenericSqlWriter, H2SqlWriter, MssqlSqlWriter, MySqlSqlWriter, PostgresSqlWriter,
    Result, SqlWriter, SqliteSqlWriter,
};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use url::Url;

/// The database engine a rendering targets.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatabaseVariant {
    H2,
    /// MySQL and MariaDB share the same syntax.
    MySqlMariaDb,
    /// Also CockroachDB.
    PostgreSql,
    Mssql,
    Sqlite,
    #[default]
    Unknown,
}

static DETECTED: OnceLock<DatabaseVariant> = OnceLock::new();

impl DatabaseVariant {
    /// From the product name the database reports about itself.
    pub fn from_product_name(name: &str) -> Self {
        let name = name.trim().to_lowercase();
        match name.as_str() {
            "mysql" | "mariadb" => DatabaseVariant::MySqlMariaDb,
            "postgresql" | "postgres" | "cockroachdb" => DatabaseVariant::PostgreSql,
            "h2" => DatabaseVariant::H2,
            "microsoft sql server" | "mssql" | "sqlserver" => DatabaseVariant::Mssql,
            "sqlite" => DatabaseVariant::Sqlite,
            _ => DatabaseVariant::Unknown,
        }
    }

    /// From the scheme of a connection URL, a leading `jdbc:` is skipped.
    pub fn from_url(url: &str) -> Result<Self> {
        let context = || format!("While reading the database of the connection URL `{}`", url);
        let parsed = Url::parse(url).with_context(context)?;
        let mut scheme = parsed.scheme().to_string();
        if scheme == "jdbc" {
            let rest = urlencoding::decode(parsed.path()).with_context(context)?;
            scheme = rest.split(':').next().unwrap_or_default().to_string();
        }
        Ok(match scheme.as_str() {
            "postgres" | "postgresql" => DatabaseVariant::PostgreSql,
            "mysql" | "mariadb" => DatabaseVariant::MySqlMariaDb,
            "sqlserver" | "mssql" => DatabaseVariant::Mssql,
            "h2" => DatabaseVariant::H2,
            "sqlite" => DatabaseVariant::Sqlite,
            _ => DatabaseVariant::Unknown,
        })
    }

    pub fn sql_writer(&self) -> &'static dyn SqlWriter {
        const GENERIC: GenericSqlWriter = GenericSqlWriter::new();
        const H2: H2SqlWriter = H2SqlWriter::new();
        const MYSQL: MySqlSqlWriter = MySqlSqlWriter::new();
        const POSTGRES: PostgresSqlWriter = PostgresSqlWriter::new();
        const MSSQL: MssqlSqlWriter = MssqlSqlWriter::new();
        const SQLITE: SqliteSqlWriter = SqliteSqlWriter::new();
        match self {
            DatabaseVariant::H2 => &H2,
            DatabaseVariant::MySqlMariaDb => &MYSQL,
            DatabaseVariant::PostgreSql => &POSTGRES,
            DatabaseVariant::Mssql => &MSSQL,
            DatabaseVariant::Sqlite => &SQLITE,
            DatabaseVariant::Unknown => &GENERIC,
        }
    }

    /// Records the variant of `driver` the first time it's called, later calls
    /// return what was recorded first.
    pub fn detect<D: Driver>(driver: &D) -> DatabaseVariant {
        let variant = driver.variant();
        let detected = *DETECTED.get_or_init(|| variant);
        if detected != variant {
            log::warn!(
                "Database already detected as {:?}, ignoring {:?}",
                detected,
                variant
            );
        }
        detected
    }

    /// The detected variant, [`DatabaseVariant::Unknown`] before detection.
    pub fn current() -> DatabaseVariant {
        DETECTED.get().copied().unwrap_or_default()
    }
}
