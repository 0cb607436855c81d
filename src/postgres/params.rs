use std::error::Error;

use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};
use tokio_util::bytes;

/// A positional statement parameter.
///
/// The catalog only binds `SERIAL` ids and text, so the set is small;
/// owned values let a parameter list move into a scoped acquisition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Int(i32),
    Text(String),
    Null,
}

impl From<i32> for SqlParam {
    fn from(value: i32) -> Self {
        SqlParam::Int(value)
    }
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        SqlParam::Text(value.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(value: String) -> Self {
        SqlParam::Text(value)
    }
}

impl<T: Into<SqlParam>> From<Option<T>> for SqlParam {
    fn from(value: Option<T>) -> Self {
        value.map_or(SqlParam::Null, Into::into)
    }
}

/// Borrow a parameter list in the shape `tokio_postgres` expects.
#[must_use]
pub fn as_refs(params: &[SqlParam]) -> Vec<&(dyn ToSql + Sync)> {
    params.iter().map(|p| p as &(dyn ToSql + Sync)).collect()
}

impl ToSql for SqlParam {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut bytes::BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            SqlParam::Int(i) => (*i).to_sql(ty, out),
            SqlParam::Text(s) => s.to_sql(ty, out),
            SqlParam::Null => Ok(IsNull::Yes),
        }
    }

    fn accepts(ty: &Type) -> bool {
        matches!(
            *ty,
            Type::INT4 | Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME
        )
    }

    to_sql_checked!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_pick_the_matching_variant() {
        assert_eq!(SqlParam::from(7), SqlParam::Int(7));
        assert_eq!(SqlParam::from("new"), SqlParam::Text("new".into()));
        assert_eq!(SqlParam::from(None::<&str>), SqlParam::Null);
        assert_eq!(
            SqlParam::from(Some("Draft v1")),
            SqlParam::Text("Draft v1".into())
        );
    }

    #[test]
    fn accepts_only_bound_column_types() {
        assert!(<SqlParam as ToSql>::accepts(&Type::INT4));
        assert!(<SqlParam as ToSql>::accepts(&Type::VARCHAR));
        assert!(<SqlParam as ToSql>::accepts(&Type::TEXT));
        assert!(!<SqlParam as ToSql>::accepts(&Type::INT8));
        assert!(!<SqlParam as ToSql>::accepts(&Type::BOOL));
    }

    #[test]
    fn text_param_encodes_as_utf8() {
        let mut buf = bytes::BytesMut::new();
        let is_null = SqlParam::from("in progress")
            .to_sql(&Type::VARCHAR, &mut buf)
            .unwrap();
        assert!(matches!(is_null, IsNull::No));
        assert_eq!(&buf[..], b"in progress");
    }

    #[test]
    fn null_param_writes_nothing() {
        let mut buf = bytes::BytesMut::new();
        let is_null = SqlParam::Null.to_sql(&Type::TEXT, &mut buf).unwrap();
        assert!(matches!(is_null, IsNull::Yes));
        assert!(buf.is_empty());
    }
}
