//! Database-specific SQL syntax.

pub trait Dialect: Send + Sync {
    /// Wraps an identifier (like a table or column name) in the correct
    /// quotation marks for the dialect. Dotted names are quoted per part.
    fn quote_identifier(&self, ident: &str) -> String;

    /// Placeholder for the parameter at `index` (zero based).
    fn get_placeholder(&self, index: usize) -> String;

    /// Placeholder for a timestamp parameter that is bound as RFC 3339 text.
    fn timestamp_placeholder(&self, index: usize) -> String;
}

#[derive(Debug, Clone, Default)]
pub struct Postgres;

impl Dialect for Postgres {
    fn quote_identifier(&self, ident: &str) -> String {
        ident
            .split('.')
            .map(|part| format!(r#""{}""#, part.replace('"', "\"\"")))
            .collect::<Vec<_>>()
            .join(".")
    }

    fn get_placeholder(&self, index: usize) -> String {
        format!("${}", index + 1)
    }

    fn timestamp_placeholder(&self, index: usize) -> String {
        format!("{}::text::timestamptz", self.get_placeholder(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_schema_qualified_names() {
        let dialect = Postgres;
        assert_eq!(dialect.quote_identifier("deviceId"), r#""deviceId""#);
        assert_eq!(
            dialect.quote_identifier("iot.telemetry"),
            r#""iot"."telemetry""#
        );
        assert_eq!(dialect.quote_identifier(r#"we"ird"#), r#""we""ird""#);
    }

    #[test]
    fn placeholders_are_one_based() {
        let dialect = Postgres;
        assert_eq!(dialect.get_placeholder(0), "$1");
        assert_eq!(dialect.timestamp_placeholder(1), "$2::text::timestamptz");
    }
}
