/// Escapes `value` for use inside a single quoted SQL string literal.
pub fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    for c in value.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '\'' => quoted.push_str("\\'"),
            '"' => quoted.push_str("\\\""),
            '\0' => quoted.push_str("\\0"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\x1a' => quoted.push_str("\\Z"),
            _ => quoted.push(c),
        }
    }
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote() {
        assert_eq!(quote("42"), "42");
        assert_eq!(quote("a'b"), "a\\'b");
        assert_eq!(quote(r#"say "hi""#), r#"say \"hi\""#);
        assert_eq!(quote("back\\slash"), "back\\\\slash");
        assert_eq!(quote("line\nbreak\r"), "line\\nbreak\\r");
        assert_eq!(quote("nul\0ctrl\x1a"), "nul\\0ctrl\\Z");
        assert_eq!(quote(""), "");
    }

    #[test]
    fn test_quote_keeps_unicode() {
        assert_eq!(quote("żółw'"), "żółw\\'");
    }
}
