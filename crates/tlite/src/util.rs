use tokio_rusqlite::rusqlite::types::{Value, ValueRef};

/// Format a database error, surfacing the underlying SQLite message instead
/// of the wrapper's Debug noise.
pub fn format_db_error(e: &tokio_rusqlite::Error) -> String {
    match e {
        tokio_rusqlite::Error::Error(e) => e.to_string(),
        tokio_rusqlite::Error::Close((_, e)) => e.to_string(),
        tokio_rusqlite::Error::ConnectionClosed => "connection closed".to_string(),
        other => other.to_string(),
    }
}

/// Coerce a single column value to its display string.
///
/// Everything becomes text in the grid; NULL renders as the configured
/// indicator and blobs as a byte-count summary rather than raw bytes.
pub fn value_to_display(value: ValueRef<'_>, null_text: &str) -> String {
    match value {
        ValueRef::Null => null_text.to_string(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(r) => r.to_string(),
        ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
        ValueRef::Blob(b) => format!("<blob {} bytes>", b.len()),
    }
}

/// Synthesize the default value for a freshly inserted row, keyed off the
/// column's declared type: integer-like types get 0, real-like types get
/// 0.0, everything else an empty string.
pub fn default_value_for_decl_type(decl_type: &str) -> Value {
    match decl_type.trim().to_lowercase().as_str() {
        "integer" | "int" => Value::Integer(0),
        "real" | "float" | "double" => Value::Real(0.0),
        _ => Value::Text(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_value_integer_types() {
        assert_eq!(default_value_for_decl_type("INTEGER"), Value::Integer(0));
        assert_eq!(default_value_for_decl_type("int"), Value::Integer(0));
        assert_eq!(default_value_for_decl_type(" Int "), Value::Integer(0));
    }

    #[test]
    fn test_default_value_real_types() {
        assert_eq!(default_value_for_decl_type("REAL"), Value::Real(0.0));
        assert_eq!(default_value_for_decl_type("float"), Value::Real(0.0));
        assert_eq!(default_value_for_decl_type("DOUBLE"), Value::Real(0.0));
    }

    #[test]
    fn test_default_value_everything_else_is_empty_text() {
        assert_eq!(
            default_value_for_decl_type("TEXT"),
            Value::Text(String::new())
        );
        assert_eq!(
            default_value_for_decl_type("VARCHAR(40)"),
            Value::Text(String::new())
        );
        assert_eq!(default_value_for_decl_type(""), Value::Text(String::new()));
        // Affinity-style declarations are NOT recognized, only the literal
        // type names above; BIGINT falls through to text on purpose.
        assert_eq!(
            default_value_for_decl_type("BIGINT"),
            Value::Text(String::new())
        );
    }

    #[test]
    fn test_value_to_display() {
        assert_eq!(value_to_display(ValueRef::Null, "NULL"), "NULL");
        assert_eq!(value_to_display(ValueRef::Null, "-"), "-");
        assert_eq!(value_to_display(ValueRef::Integer(42), "NULL"), "42");
        assert_eq!(value_to_display(ValueRef::Real(1.5), "NULL"), "1.5");
        assert_eq!(
            value_to_display(ValueRef::Text(b"hello"), "NULL"),
            "hello"
        );
        assert_eq!(
            value_to_display(ValueRef::Blob(&[1, 2, 3]), "NULL"),
            "<blob 3 bytes>"
        );
    }
}
