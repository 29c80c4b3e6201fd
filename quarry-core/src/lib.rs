mod as_value;
mod condition;
mod connection;
mod dao;
mod driver;
mod entity;
mod entity_meta;
mod error;
mod executor;
mod expression;
mod full_text;
mod native_sql;
mod order_by;
mod parametrized_sql;
mod prepared;
mod property;
mod query;
mod quirks;
mod util;
mod value;
pub mod writer;

pub use ::anyhow::Context;
pub use ::inventory;
pub use as_value::*;
pub use condition::*;
pub use connection::*;
pub use dao::*;
pub use driver::*;
pub use entity::*;
pub use entity_meta::*;
pub use error::*;
pub use executor::*;
pub use expression::*;
pub use full_text::*;
pub use native_sql::*;
pub use order_by::*;
pub use parametrized_sql::*;
pub use prepared::*;
pub use property::*;
pub use query::*;
pub use quirks::*;
pub use util::*;
pub use value::*;
pub use writer::{GenericSqlWriter, SqlWriter};
pub mod stream {
    pub use ::futures::stream::*;
}
pub use ::futures::future;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
