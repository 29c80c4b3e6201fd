mod database_variant;
mod h2;
mod mssql;
mod mysql;
mod postgres;
mod sqlite;

pub use database_variant::*;
pub use h2::*;
pub use mssql::*;
pub use mysql::*;
pub use postgres::*;
pub use sqlite::*;
