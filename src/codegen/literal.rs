use crate::{Literal, Value, ValueType};

/// Characters with a meaning inside a script regex literal.
pub(crate) const REGEX_SPECIALS: [char; 15] = [
    '|', '.', '^', '$', '(', ')', '[', ']', '-', '{', '}', '?', '*', '+', '/',
];

/// Single-quoted script string.
pub(crate) fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for c in text.chars() {
        match c {
            '\\' | '\'' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Script form of a literal token. Text is quoted whatever it looks like,
/// so `'3.0'` never compares as the number 3.
pub(crate) fn render_literal(literal: &Literal) -> String {
    match literal {
        Literal::Single(text) => text.clone(),
        Literal::Text(text) => quote(text),
        Literal::Many(items) => {
            let rendered: Vec<String> = items.iter().map(render_literal).collect();
            format!("[{}]", rendered.join(", "))
        }
    }
}

/// Escape text so a regex literal matches it verbatim.
pub(crate) fn escape_regex(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if REGEX_SPECIALS.contains(&c) => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}

/// Keep a pattern as a pattern, only protecting the literal delimiter.
pub(crate) fn escape_delimiter(pattern: &str) -> String {
    pattern
        .replace('/', "\\/")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

/// Script literal for a field binding, following the declared type.
pub(crate) fn binding_literal(value: Option<&Value>, value_type: ValueType) -> String {
    match value {
        None => "null".to_owned(),
        Some(list @ Value::List(_)) => render_literal(&Literal::from(list)),
        Some(v @ (Value::String(_) | Value::Date(_))) => quote(&v.plain_text()),
        Some(v) if value_type.is_quoted() => quote(&v.plain_text()),
        Some(v) => v.plain_text(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_escapes_delimiters() {
        assert_eq!(quote("it's"), r"'it\'s'");
        assert_eq!(quote(r"a\b"), r"'a\\b'");
    }

    #[test]
    fn single_literals() {
        assert_eq!(render_literal(&Literal::from(&Value::Int(3))), "3");
        assert_eq!(render_literal(&Literal::from(&Value::Float(-2.5))), "-2.5");
        assert_eq!(render_literal(&Literal::from(&Value::Bool(true))), "true");
        assert_eq!(render_literal(&Literal::from(&Value::from("abc"))), "'abc'");
        assert_eq!(render_literal(&Literal::from(&Value::Float(f64::NAN))), "NaN");
    }

    #[test]
    fn text_that_reads_as_a_number_stays_quoted() {
        assert_eq!(render_literal(&Literal::from(&Value::from("3.0"))), "'3.0'");
        assert_eq!(render_literal(&Literal::from(&Value::from("true"))), "'true'");
        assert_eq!(render_literal(&Literal::from(&Value::from("-1"))), "'-1'");
    }

    #[test]
    fn many_literals() {
        let numbers = Literal::from(&Value::List(vec![Value::Int(1), Value::Int(2)]));
        assert_eq!(render_literal(&numbers), "[1, 2]");
        let mixed = Literal::from(&Value::List(vec![Value::Int(1), Value::from("b")]));
        assert_eq!(render_literal(&mixed), "[1, 'b']");
        let digits = Literal::from(&Value::from(vec!["1", "2"]));
        assert_eq!(render_literal(&digits), "['1', '2']");
    }

    #[test]
    fn every_special_character_is_escaped() {
        let specials: String = REGEX_SPECIALS.iter().collect();
        let escaped = escape_regex(&specials);
        let expected: String = REGEX_SPECIALS.iter().map(|c| format!("\\{c}")).collect();
        assert_eq!(escaped, expected);
        assert_eq!(escape_regex("abc"), "abc");
    }

    #[test]
    fn backslash_and_line_breaks_are_escaped() {
        assert_eq!(escape_regex(r"C:\d"), r"C:\\d");
        assert_eq!(escape_regex("a\nb\rc"), r"a\nb\rc");
        assert_eq!(escape_regex("a\u{2028}b"), r"a\u2028b");
    }

    #[test]
    fn delimiter_escape_keeps_pattern() {
        assert_eq!(escape_delimiter("^a.*/b$"), r"^a.*\/b$");
    }

    #[test]
    fn binding_literals() {
        assert_eq!(binding_literal(None, ValueType::String), "null");
        assert_eq!(binding_literal(Some(&Value::Int(3)), ValueType::Integer), "3");
        assert_eq!(binding_literal(Some(&Value::from("a")), ValueType::String), "'a'");
        assert_eq!(binding_literal(Some(&Value::Bool(true)), ValueType::Boolean), "true");
        assert_eq!(
            binding_literal(Some(&Value::from(vec!["x", "y"])), ValueType::List),
            "['x', 'y']"
        );
    }
}
