use crate::{Connection, DatabaseVariant, Prepared, SqlWriter};

pub trait Driver: Send + Sync {
    type Connection: Connection;
    type SqlWriter: SqlWriter;
    type Prepared: Prepared;

    /// Also the scheme of the connection URLs.
    const NAME: &'static str;

    fn sql_writer(&self) -> Self::SqlWriter;

    fn variant(&self) -> DatabaseVariant {
        DatabaseVariant::from_product_name(Self::NAME)
    }
}
