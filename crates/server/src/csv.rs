//! Minimal RFC 4180 CSV writing for the export endpoint.

/// Quote a field when it contains a delimiter, quote, or line break.
fn field(raw: &str) -> String {
    if raw.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

fn line(fields: &[String]) -> String {
    fields.iter().map(|f| field(f)).collect::<Vec<_>>().join(",")
}

/// Render a header row plus data rows as a CSV document with CRLF line ends.
pub fn document(header: &[String], rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    out.push_str(&line(header));
    out.push_str("\r\n");
    for row in rows {
        out.push_str(&line(row));
        out.push_str("\r\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn test_plain_fields_unquoted() {
        assert_eq!(line(&owned(&["Acme Tech", "Pune"])), "Acme Tech,Pune");
    }

    #[test]
    fn test_comma_and_quote_escaping() {
        assert_eq!(line(&owned(&["Acme, Inc.", "say \"hi\""])), "\"Acme, Inc.\",\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_newline_quoted() {
        assert_eq!(line(&owned(&["line1\nline2"])), "\"line1\nline2\"");
    }

    #[test]
    fn test_document_layout() {
        let doc = document(&owned(&["account_name", "city"]), &[owned(&["Acme", "Pune"])]);
        assert_eq!(doc, "account_name,city\r\nAcme,Pune\r\n");
    }

    #[test]
    fn test_empty_rows_header_only() {
        let doc = document(&owned(&["account_name"]), &[]);
        assert_eq!(doc, "account_name\r\n");
    }
}
