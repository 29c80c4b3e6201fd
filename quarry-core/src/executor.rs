use crate::{
    Driver, ParametrizedSql, Query, QueryResult, Result, RowLabeled, RowsAffected,
    stream::{Stream, StreamExt, TryStreamExt},
};
use std::future::Future;

pub trait Executor: Send + Sized {
    type Driver: Driver;

    fn driver(&self) -> &Self::Driver;

    fn prepare(&mut self, query: String) -> impl Future<Output = Result<Query<Self::Driver>>> + Send;

    /// General method to send any query and return any result type (either row or count)
    fn run(&mut self, query: Query<Self::Driver>) -> impl Stream<Item = Result<QueryResult>> + Send;

    /// Prepare a rendered statement and bind its parameters by name.
    fn prepare_parametrized(
        &mut self,
        sql: &ParametrizedSql,
    ) -> impl Future<Output = Result<Query<Self::Driver>>> + Send {
        let text = sql.sql.clone();
        let parameters = sql.parameters.clone();
        async move {
            let mut query = self.prepare(text).await?;
            query.bind_parameters(&parameters)?;
            Ok(query)
        }
    }

    /// Execute the query and returns the rows.
    fn fetch(&mut self, query: Query<Self::Driver>) -> impl Stream<Item = Result<RowLabeled>> + Send {
        self.run(query).filter_map(|v| async move {
            match v {
                Ok(QueryResult::Row(v)) => Some(Ok(v)),
                Err(e) => Some(Err(e)),
                _ => None,
            }
        })
    }

    /// Execute the query and return the total number of rows affected.
    fn execute(&mut self, query: Query<Self::Driver>) -> impl Future<Output = Result<RowsAffected>> + Send {
        self.run(query)
            .filter_map(|v| async move {
                match v {
                    Ok(QueryResult::Affected(v)) => Some(Ok(v)),
                    Err(e) => Some(Err(e)),
                    _ => None,
                }
            })
            .try_collect()
    }
}
