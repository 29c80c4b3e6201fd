use crate::{Executor, Result};
use std::future::Future;

pub trait Connection: Executor {
    /// Open a connection to the given URL, its scheme must be the driver name.
    fn connect(url: &str) -> impl Future<Output = Result<Self>>;
}
