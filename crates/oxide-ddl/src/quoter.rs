//! Identifier and literal quoting.

/// Words that cannot appear bare as identifiers in any supported dialect.
const RESERVED: &[&str] = &[
    "ALL", "ALTER", "AND", "AS", "ASC", "BETWEEN", "BY", "CASE", "CHECK", "COLUMN", "CONSTRAINT",
    "CREATE", "CROSS", "DEFAULT", "DELETE", "DESC", "DISTINCT", "DROP", "ELSE", "END", "EXCEPT",
    "EXISTS", "FALSE", "FOREIGN", "FROM", "FULL", "GROUP", "HAVING", "IN", "INDEX", "INNER",
    "INSERT", "INTERSECT", "INTO", "IS", "JOIN", "KEY", "LEFT", "LIKE", "LIMIT", "NOT", "NULL",
    "OFFSET", "ON", "OR", "ORDER", "OUTER", "PRIMARY", "REFERENCES", "RIGHT", "SELECT", "SET",
    "TABLE", "THEN", "TO", "TRUE", "UNION", "UNIQUE", "UPDATE", "USER", "USING", "VALUES", "WHEN",
    "WHERE", "WITH",
];

/// Maps raw identifiers to their dialect-quoted form.
///
/// Identifiers are left bare when the dialect would read them back
/// unchanged, and wrapped in double quotes (with embedded quotes doubled)
/// otherwise. Callers always pass raw names; quoting an already quoted
/// name quotes it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quoter {
    folds_to_lower: bool,
}

impl Quoter {
    /// Quoter for dialects that compare unquoted identifiers
    /// case-insensitively and preserve their spelling (SQLite, ANSI).
    #[must_use]
    pub const fn case_preserving() -> Self {
        Self {
            folds_to_lower: false,
        }
    }

    /// Quoter for dialects that fold unquoted identifiers to lower case
    /// (PostgreSQL); mixed-case names are quoted to keep their spelling.
    #[must_use]
    pub const fn lower_folding() -> Self {
        Self {
            folds_to_lower: true,
        }
    }

    /// Returns true if `name` must be quoted to survive a round trip.
    #[must_use]
    pub fn needs_quoting(&self, name: &str) -> bool {
        let mut chars = name.chars();
        let Some(first) = chars.next() else {
            return true;
        };
        if !(first.is_ascii_alphabetic() || first == '_') {
            return true;
        }
        if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return true;
        }
        if self.folds_to_lower && name.chars().any(|c| c.is_ascii_uppercase()) {
            return true;
        }
        let upper = name.to_ascii_uppercase();
        RESERVED.contains(&upper.as_str())
    }

    /// Quotes an identifier if necessary.
    #[must_use]
    pub fn quote(&self, name: &str) -> String {
        if self.needs_quoting(name) {
            format!("\"{}\"", name.replace('"', "\"\""))
        } else {
            name.to_string()
        }
    }

    /// Quotes and comma-joins a column list.
    #[must_use]
    pub fn quote_list(&self, names: &[String]) -> String {
        names
            .iter()
            .map(|n| self.quote(n))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Renders a string literal.
    #[must_use]
    pub fn quote_string(&self, value: &str) -> String {
        format!("'{}'", value.replace('\'', "''"))
    }
}

impl Default for Quoter {
    fn default() -> Self {
        Self::case_preserving()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_identifiers_stay_bare() {
        let q = Quoter::case_preserving();
        assert_eq!(q.quote("Users"), "Users");
        assert_eq!(q.quote("role_id"), "role_id");
        assert_eq!(q.quote("_tmp1"), "_tmp1");
    }

    #[test]
    fn test_reserved_and_odd_identifiers_are_quoted() {
        let q = Quoter::case_preserving();
        assert_eq!(q.quote("order"), "\"order\"");
        assert_eq!(q.quote("Group"), "\"Group\"");
        assert_eq!(q.quote("my table"), "\"my table\"");
        assert_eq!(q.quote("1st"), "\"1st\"");
        assert_eq!(q.quote(""), "\"\"");
    }

    #[test]
    fn test_embedded_quotes_are_doubled() {
        let q = Quoter::case_preserving();
        assert_eq!(q.quote("say\"hi"), "\"say\"\"hi\"");
    }

    #[test]
    fn test_lower_folding_quotes_mixed_case() {
        let q = Quoter::lower_folding();
        assert_eq!(q.quote("users"), "users");
        assert_eq!(q.quote("Users"), "\"Users\"");
    }

    #[test]
    fn test_quote_list_and_strings() {
        let q = Quoter::default();
        let cols = vec!["a".to_string(), "select".to_string()];
        assert_eq!(q.quote_list(&cols), "a, \"select\"");
        assert_eq!(q.quote_string("it's"), "'it''s'");
    }
}
