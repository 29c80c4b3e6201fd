use crate::{
    CBox, SqliteDriver, SqlitePrepared, error_message_from_ptr,
    extract::{extract_name, extract_value},
};
use async_stream::try_stream;
use libsqlite3_sys::{
    SQLITE_BUSY, SQLITE_DONE, SQLITE_OK, SQLITE_OPEN_CREATE, SQLITE_OPEN_READWRITE,
    SQLITE_OPEN_URI, SQLITE_ROW, sqlite3, sqlite3_close, sqlite3_column_count,
    sqlite3_db_handle, sqlite3_errmsg, sqlite3_finalize, sqlite3_last_insert_rowid,
    sqlite3_open_v2, sqlite3_prepare_v2, sqlite3_step, sqlite3_stmt, sqlite3_total_changes64,
};
use quarry_core::{
    Connection, Context, DatabaseVariant, Driver, Error, Executor, Query, QueryResult, Result,
    RowLabeled, RowNames, RowsAffected,
    future::Either,
    stream::{Stream, StreamExt},
    truncate_long,
};
use std::{
    ffi::{CStr, CString, c_int},
    pin::pin,
    ptr,
    sync::atomic::{AtomicPtr, Ordering},
};
use tokio::task::spawn_blocking;

/// Prepares the first statement of `sql` starting at byte `offset`.
///
/// Returns the statement, `None` when only whitespace or comments are left, and the
/// offset where the next statement starts.
fn prepare_statement(
    connection: *mut sqlite3,
    sql: &CStr,
    offset: usize,
) -> Result<(Option<CBox<*mut sqlite3_stmt>>, usize)> {
    let bytes = sql.to_bytes();
    if bytes[offset..].iter().all(u8::is_ascii_whitespace) {
        return Ok((None, bytes.len()));
    }
    unsafe {
        let start = sql.as_ptr().add(offset);
        let mut statement = CBox::new(ptr::null_mut(), |p| {
            sqlite3_finalize(p);
        });
        let mut tail = ptr::null();
        let rc = sqlite3_prepare_v2(
            connection,
            start,
            (bytes.len() - offset) as c_int,
            &mut *statement,
            &mut tail,
        );
        if rc != SQLITE_OK {
            return Err(Error::msg(
                error_message_from_ptr(&sqlite3_errmsg(connection)).to_string(),
            ));
        }
        let next = if tail.is_null() {
            bytes.len()
        } else {
            tail.offset_from(sql.as_ptr()) as usize
        };
        if statement.is_null() {
            // Comments only
            return if next > offset {
                prepare_statement(connection, sql, next)
            } else {
                Ok((None, bytes.len()))
            };
        }
        Ok((Some(statement), next))
    }
}

fn statement_error(statement: &CBox<*mut sqlite3_stmt>) -> Error {
    unsafe {
        let error = Error::msg(
            error_message_from_ptr(&sqlite3_errmsg(sqlite3_db_handle(**statement))).to_string(),
        );
        log::error!("{:#}", error);
        error
    }
}

fn total_changes(statement: &CBox<*mut sqlite3_stmt>) -> i64 {
    unsafe { sqlite3_total_changes64(sqlite3_db_handle(**statement)) }
}

fn rows_affected(statement: &CBox<*mut sqlite3_stmt>, changes_before: i64) -> RowsAffected {
    let rows_affected = (total_changes(statement) - changes_before).max(0) as u64;
    let last_affected_id = if rows_affected > 0 {
        Some(unsafe { sqlite3_last_insert_rowid(sqlite3_db_handle(**statement)) })
    } else {
        None
    };
    RowsAffected {
        rows_affected,
        last_affected_id,
    }
}

/// Steps a statement to completion, rows for queries and a count for everything else.
pub(crate) fn run_statement(
    statement: CBox<*mut sqlite3_stmt>,
) -> impl Stream<Item = Result<QueryResult>> + Send {
    try_stream! {
        let count = unsafe { sqlite3_column_count(*statement) };
        let changes_before = total_changes(&statement);
        let labels = (0..count)
            .map(|i| extract_name(*statement, i))
            .collect::<Result<RowNames>>()?;
        loop {
            match unsafe { sqlite3_step(*statement) } {
                SQLITE_BUSY => {
                    continue;
                }
                SQLITE_ROW => {
                    let values = (0..count)
                        .map(|i| extract_value(*statement, i))
                        .collect::<Result<Box<[_]>>>()?;
                    yield QueryResult::Row(RowLabeled::new(labels.clone(), values));
                }
                SQLITE_DONE => {
                    if count == 0 {
                        yield QueryResult::Affected(rows_affected(&statement, changes_before));
                    }
                    break;
                }
                _ => {
                    Err::<(), Error>(statement_error(&statement))?;
                }
            }
        }
    }
}

pub struct SqliteConnection {
    pub(crate) connection: CBox<*mut sqlite3>,
    driver: SqliteDriver,
}

impl SqliteConnection {
    /// Runs every statement of `sql` in order.
    pub(crate) fn run_unprepared(
        &mut self,
        sql: String,
    ) -> impl Stream<Item = Result<QueryResult>> + Send {
        let connection = AtomicPtr::new(*self.connection);
        try_stream! {
            let context = format!("While running the query:\n{}", truncate_long!(sql));
            let sql = CString::new(sql).context("Could not create a CString from the query String")?;
            let mut offset = 0;
            loop {
                let (statement, next) =
                    prepare_statement(connection.load(Ordering::Relaxed), &sql, offset)
                        .with_context(|| context.clone())?;
                offset = next;
                let Some(statement) = statement else {
                    break;
                };
                let mut results = pin!(run_statement(statement));
                while let Some(result) = results.next().await {
                    yield result.with_context(|| context.clone())?;
                }
            }
        }
    }
}

impl Executor for SqliteConnection {
    type Driver = SqliteDriver;

    fn driver(&self) -> &Self::Driver {
        &self.driver
    }

    async fn prepare(&mut self, query: String) -> Result<Query<SqliteDriver>> {
        let connection = AtomicPtr::new(*self.connection);
        let context = format!(
            "While preparing the query:\n{}",
            truncate_long!(query.as_str())
        );
        let prepared = spawn_blocking(move || -> Result<CBox<*mut sqlite3_stmt>> {
            let sql =
                CString::new(query).context("Could not create a CString from the query String")?;
            let (statement, next) =
                prepare_statement(connection.load(Ordering::Relaxed), &sql, 0)?;
            if sql.to_bytes()[next..]
                .iter()
                .any(|v| !v.is_ascii_whitespace())
            {
                return Err(Error::msg(
                    "Cannot prepare more than one statement at a time",
                ));
            }
            statement.ok_or_else(|| Error::msg("The query does not contain any statement"))
        })
        .await?
        .context(context);
        match prepared {
            Ok(statement) => Ok(Query::Prepared(SqlitePrepared::new(statement))),
            Err(error) => {
                log::error!("{:#}", error);
                Err(error)
            }
        }
    }

    fn run(&mut self, query: Query<SqliteDriver>) -> impl Stream<Item = Result<QueryResult>> + Send {
        match query {
            Query::Raw(sql) => Either::Left(self.run_unprepared(sql)),
            Query::Prepared(prepared) => Either::Right(run_statement(prepared.statement)),
        }
    }
}

impl Connection for SqliteConnection {
    /// Accepts `sqlite://path/to/file.db`, `sqlite://:memory:` and `sqlite://file:...` URIs.
    async fn connect(url: &str) -> Result<SqliteConnection> {
        let prefix = format!("{}://", <SqliteDriver as Driver>::NAME);
        let Some(path) = url.strip_prefix(&prefix) else {
            let error = Error::msg(format!(
                "Expected sqlite connection url to start with `{}`",
                &prefix
            ));
            log::error!("{:#}", error);
            return Err(error);
        };
        let context = || format!("Error while decoding connection URL: `{}`", url);
        // Query parameters like `mode=ro` are only honored by `file:` URIs
        let path = if path.starts_with("file:") {
            path.to_string()
        } else {
            format!("file:{}", path)
        };
        let path = CString::new(path).with_context(context)?;
        let mut connection = CBox::new(ptr::null_mut(), |p| {
            unsafe { sqlite3_close(p) };
        });
        let rc = unsafe {
            sqlite3_open_v2(
                path.as_ptr(),
                &mut *connection,
                SQLITE_OPEN_READWRITE | SQLITE_OPEN_CREATE | SQLITE_OPEN_URI,
                ptr::null(),
            )
        };
        if rc != SQLITE_OK {
            let error = Error::msg(
                error_message_from_ptr(&unsafe { sqlite3_errmsg(*connection) }).to_string(),
            )
            .context(context());
            log::error!("{:#}", error);
            return Err(error);
        }
        let driver = SqliteDriver::new();
        DatabaseVariant::detect(&driver);
        Ok(Self { connection, driver })
    }
}
