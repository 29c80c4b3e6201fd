use crate::{CBox, error_message_from_ptr};
use libsqlite3_sys::*;
use quarry_core::{AsValue, Error, Prepared, Result, Value, truncate_long};
use rust_decimal::prelude::ToPrimitive;
use std::{
    ffi::{CStr, CString, c_int},
    fmt::{self, Display},
    os::raw::{c_char, c_void},
};

#[derive(Debug)]
pub struct SqlitePrepared {
    pub(crate) statement: CBox<*mut sqlite3_stmt>,
    /// Next positional index, from 0.
    pub(crate) index: u64,
}

impl SqlitePrepared {
    pub(crate) fn new(statement: CBox<*mut sqlite3_stmt>) -> Self {
        unsafe {
            sqlite3_clear_bindings(*statement);
        }
        Self {
            statement,
            index: 0,
        }
    }

    fn bind_text(&mut self, index: c_int, v: &str) -> c_int {
        unsafe {
            sqlite3_bind_text(
                *self.statement,
                index,
                v.as_ptr() as *const c_char,
                v.len() as c_int,
                SQLITE_TRANSIENT(),
            )
        }
    }

    fn bind_integer<T: TryInto<sqlite3_int64> + Display + Copy>(
        &mut self,
        index: c_int,
        v: T,
    ) -> Result<c_int> {
        let Ok(integer) = v.try_into() else {
            return Err(Error::msg(format!(
                "Cannot bind value `{}` into a sqlite integer because it's out of bounds",
                v
            )));
        };
        Ok(unsafe { sqlite3_bind_int64(*self.statement, index, integer) })
    }

    /// Binds at the 1 based sqlite `index`.
    fn bind_value(&mut self, value: Value, index: c_int) -> Result<&mut Self> {
        let rc = match value {
            ref v if v.is_null() => unsafe { sqlite3_bind_null(*self.statement, index) },
            Value::Boolean(Some(v)) => self.bind_integer(index, v as i64)?,
            Value::Int8(Some(v)) => self.bind_integer(index, v)?,
            Value::Int16(Some(v)) => self.bind_integer(index, v)?,
            Value::Int32(Some(v)) => self.bind_integer(index, v)?,
            Value::Int64(Some(v)) => self.bind_integer(index, v)?,
            Value::UInt8(Some(v)) => self.bind_integer(index, v)?,
            Value::UInt16(Some(v)) => self.bind_integer(index, v)?,
            Value::UInt32(Some(v)) => self.bind_integer(index, v)?,
            Value::UInt64(Some(v)) => self.bind_integer(index, v)?,
            Value::Float32(Some(v)) => unsafe {
                sqlite3_bind_double(*self.statement, index, v as f64)
            },
            Value::Float64(Some(v)) => unsafe { sqlite3_bind_double(*self.statement, index, v) },
            Value::Decimal(Some(v)) => {
                let v = v.to_f64().ok_or_else(|| {
                    Error::msg(format!("Cannot convert the Decimal value `{}` to f64", v))
                })?;
                unsafe { sqlite3_bind_double(*self.statement, index, v) }
            }
            Value::Blob(Some(ref v)) => unsafe {
                sqlite3_bind_blob(
                    *self.statement,
                    index,
                    v.as_ptr() as *const c_void,
                    v.len() as c_int,
                    SQLITE_TRANSIENT(),
                )
            },
            ref v => match v.to_text() {
                Some(text) => self.bind_text(index, &text),
                None => {
                    let error = Error::msg(format!("Cannot use a {:?} as a query parameter", v));
                    log::error!("{:#}", error);
                    return Err(error);
                }
            },
        };
        if rc != SQLITE_OK {
            unsafe {
                let db = sqlite3_db_handle(*self.statement);
                let query = sqlite3_sql(*self.statement);
                let error = Error::msg(error_message_from_ptr(&sqlite3_errmsg(db)).to_string())
                    .context(format!(
                        "Cannot bind parameter {} to query:\n{}",
                        index,
                        truncate_long!(CStr::from_ptr(query).to_string_lossy())
                    ));
                log::error!("{:#}", error);
                return Err(error);
            }
        }
        Ok(self)
    }
}

impl Prepared for SqlitePrepared {
    fn clear_bindings(&mut self) -> Result<&mut Self> {
        unsafe {
            sqlite3_clear_bindings(*self.statement);
        }
        self.index = 0;
        Ok(self)
    }

    fn bind<V: AsValue>(&mut self, value: V) -> Result<&mut Self> {
        self.bind_index(value, self.index)
    }

    fn bind_index<V: AsValue>(&mut self, value: V, index: u64) -> Result<&mut Self> {
        let count = unsafe { sqlite3_bind_parameter_count(*self.statement) } as u64;
        if index >= count {
            return Err(Error::msg(format!(
                "Cannot bind index {}, the query has {} parameters",
                index, count
            )));
        }
        self.bind_value(value.as_value(), index as c_int + 1)?;
        self.index = index + 1;
        Ok(self)
    }

    fn bind_named(&mut self, name: &str, value: Value) -> Result<&mut Self> {
        let placeholder = CString::new(format!(":{}", name))?;
        let index =
            unsafe { sqlite3_bind_parameter_index(*self.statement, placeholder.as_ptr()) };
        if index == 0 {
            let error = Error::msg(format!("The query has no parameter `:{}`", name));
            log::error!("{:#}", error);
            return Err(error);
        }
        self.bind_value(value, index)
    }
}

impl Display for SqlitePrepared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sql = unsafe { sqlite3_sql(*self.statement) };
        if sql.is_null() {
            return write!(f, "{:p}", *self.statement);
        }
        let sql = unsafe { CStr::from_ptr(sql) }.to_string_lossy();
        f.write_str(&truncate_long!(sql))
    }
}
