use crate::Result;
use std::borrow::Cow;

/// Writes every item through `f`, putting `separator` between two non empty writes.
pub fn separated_by<T, F>(
    out: &mut String,
    values: impl IntoIterator<Item = T>,
    mut f: F,
    separator: &str,
) -> Result<()>
where
    F: FnMut(&mut String, T) -> Result<()>,
{
    let mut len = out.len();
    for v in values {
        if out.len() > len {
            out.push_str(separator);
        }
        len = out.len();
        f(out, v)?;
    }
    Ok(())
}

#[macro_export]
macro_rules! possibly_parenthesized {
    ($buff:ident, $cond:expr, $v:expr) => {
        if $cond {
            $buff.push('(');
            $v;
            $buff.push(')');
        } else {
            $v;
        }
    };
}

/// Cuts long statements down to a size fit for log and error messages.
pub fn truncated(query: &str) -> Cow<'_, str> {
    match query.char_indices().nth(497) {
        Some((end, _)) => Cow::Owned(format!("{}...", query[..end].trim_end())),
        None => Cow::Borrowed(query),
    }
}

#[macro_export]
macro_rules! truncate_long {
    ($query:expr) => {
        $crate::truncated(::std::convert::AsRef::<str>::as_ref(&$query))
    };
}

#[cfg(test)]
mod tests {
    use super::{separated_by, truncated};

    #[test]
    fn separated() {
        let mut out = String::from("(");
        separated_by(
            &mut out,
            ["a", "", "b", "c"],
            |out, v| {
                out.push_str(v);
                Ok(())
            },
            ", ",
        )
        .unwrap();
        assert_eq!(out, "(a, b, c");
    }

    #[test]
    fn truncate() {
        assert_eq!(truncated("SELECT 1"), "SELECT 1");
        let long = "x".repeat(600);
        let result = truncated(&long);
        assert_eq!(result.len(), 500);
        assert!(result.ends_with("..."));
        assert_eq!(crate::truncate_long!(long), result);
        assert_eq!(crate::truncate_long!("SELECT 1".to_string()), "SELECT 1");
    }
}
