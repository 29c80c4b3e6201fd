use crate::{
    AsValue, CardinalityError, Condition, Driver, Entity, Error, Executor, IdValues, OrderBy,
    ParametrizedSql, Result, RowLabeled, RowsAffected, SqlWriter, stream::TryStreamExt,
};
use std::future::Future;

async fn fetch_rows<Exec: Executor>(
    executor: &mut Exec,
    sql: ParametrizedSql,
) -> Result<Vec<RowLabeled>> {
    log::debug!("{}", sql);
    let query = executor.prepare_parametrized(&sql).await?;
    executor.fetch(query).try_collect().await
}

/// Finders and deleters, available on every [`Entity`].
///
/// ```rust,ignore
/// let adults = Person::find_all_by(&mut connection, Person::AGE.ge(18), &[Person::NAME.asc()], None, None).await?;
/// let person = Person::get_by_id(&mut connection, 25).await?;
/// ```
pub trait Dao: Entity {
    fn find_all<Exec: Executor>(executor: &mut Exec) -> impl Future<Output = Result<Vec<Self>>> + Send {
        Self::find_all_by(executor, Condition::NoCondition, &[], None, None)
    }

    fn find_all_by<Exec: Executor>(
        executor: &mut Exec,
        condition: Condition,
        order_by: &[OrderBy],
        offset: Option<u64>,
        limit: Option<u64>,
    ) -> impl Future<Output = Result<Vec<Self>>> + Send {
        let sql = Self::meta().and_then(|meta| {
            executor
                .driver()
                .sql_writer()
                .select(meta, &condition, order_by, offset, limit)
        });
        async move {
            fetch_rows(executor, sql?)
                .await?
                .iter()
                .map(Self::from_row)
                .collect()
        }
    }

    /// First row in the given order, `None` when nothing matches.
    fn find_first_by<Exec: Executor>(
        executor: &mut Exec,
        condition: Condition,
        order_by: &[OrderBy],
    ) -> impl Future<Output = Result<Option<Self>>> + Send {
        let rows = Self::find_all_by(executor, condition, order_by, None, Some(1));
        async move { Ok(rows.await?.into_iter().next()) }
    }

    /// The only matching row, `None` when nothing matches and an error when more do.
    fn find_single_by<Exec: Executor>(
        executor: &mut Exec,
        condition: Condition,
    ) -> impl Future<Output = Result<Option<Self>>> + Send {
        let rendered = executor.driver().sql_writer().render(&condition);
        let rows = Self::find_all_by(executor, condition, &[], None, Some(2));
        async move {
            let mut rows = rows.await?;
            if rows.len() > 1 {
                let error = Error::new(CardinalityError::TooManyRows {
                    entity: Self::NAME.to_string(),
                    condition: rendered?.to_string(),
                });
                log::error!("{}", error);
                return Err(error);
            }
            Ok(rows.pop())
        }
    }

    /// The only matching row, an error when nothing or more than one match.
    fn single_by<Exec: Executor>(
        executor: &mut Exec,
        condition: Condition,
    ) -> impl Future<Output = Result<Self>> + Send {
        let rendered = executor.driver().sql_writer().render(&condition);
        let entity = Self::find_single_by(executor, condition);
        async move {
            match entity.await? {
                Some(entity) => Ok(entity),
                None => {
                    let error = Error::new(CardinalityError::NoRow {
                        entity: Self::NAME.to_string(),
                        condition: rendered?.to_string(),
                    });
                    log::info!("{}", error);
                    Err(error)
                }
            }
        }
    }

    fn find_by_id<Exec: Executor>(
        executor: &mut Exec,
        id: impl IdValues,
    ) -> impl Future<Output = Result<Option<Self>>> + Send {
        let condition = Self::meta().and_then(|meta| meta.id_condition(id));
        async move {
            let condition = condition?;
            Self::find_single_by(executor, condition).await
        }
    }

    fn get_by_id<Exec: Executor>(
        executor: &mut Exec,
        id: impl IdValues,
    ) -> impl Future<Output = Result<Self>> + Send {
        let condition = Self::meta().and_then(|meta| meta.id_condition(id));
        async move {
            let condition = condition?;
            Self::single_by(executor, condition).await
        }
    }

    fn count<Exec: Executor>(executor: &mut Exec) -> impl Future<Output = Result<u64>> + Send {
        Self::count_by(executor, Condition::NoCondition)
    }

    fn count_by<Exec: Executor>(
        executor: &mut Exec,
        condition: Condition,
    ) -> impl Future<Output = Result<u64>> + Send {
        let sql = Self::meta()
            .and_then(|meta| executor.driver().sql_writer().count(meta, &condition));
        async move {
            let rows = fetch_rows(executor, sql?).await?;
            let value = rows
                .first()
                .and_then(|v| v.values.first())
                .cloned()
                .ok_or_else(|| Error::msg("The count query returned no value"))?;
            u64::try_from_value(value)
        }
    }

    fn exists_by<Exec: Executor>(
        executor: &mut Exec,
        condition: Condition,
    ) -> impl Future<Output = Result<bool>> + Send {
        let count = Self::count_by(executor, condition);
        async move { Ok(count.await? > 0) }
    }

    fn delete_by<Exec: Executor>(
        executor: &mut Exec,
        condition: Condition,
    ) -> impl Future<Output = Result<RowsAffected>> + Send {
        let sql = Self::meta()
            .and_then(|meta| executor.driver().sql_writer().delete(meta, &condition));
        async move {
            let sql = sql?;
            log::debug!("{}", sql);
            let query = executor.prepare_parametrized(&sql).await?;
            executor.execute(query).await
        }
    }

    fn delete_all<Exec: Executor>(
        executor: &mut Exec,
    ) -> impl Future<Output = Result<RowsAffected>> + Send {
        Self::delete_by(executor, Condition::NoCondition)
    }

    fn delete_by_id<Exec: Executor>(
        executor: &mut Exec,
        id: impl IdValues,
    ) -> impl Future<Output = Result<RowsAffected>> + Send {
        let condition = Self::meta().and_then(|meta| meta.id_condition(id));
        async move {
            let condition = condition?;
            Self::delete_by(executor, condition).await
        }
    }
}

impl<E: Entity> Dao for E {}
