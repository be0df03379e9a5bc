use std::fmt;

/// Writes a string literal delimited by double quotes, escaping characters that would otherwise
/// terminate or change the meaning of the literal. Non-ASCII characters are written as is, except
/// for U+2028 and U+2029.
pub fn emit_string_literal_double_quoted<W: fmt::Write>(out: &mut W, value: &str) -> fmt::Result {
  out.write_char('"')?;
  let mut chars = value.chars().peekable();
  while let Some(ch) = chars.next() {
    match ch {
      '\\' => out.write_str("\\\\")?,
      '"' => out.write_str("\\\"")?,
      '\n' => out.write_str("\\n")?,
      '\r' => out.write_str("\\r")?,
      '\t' => out.write_str("\\t")?,
      '\0' => {
        // `\0` followed by a digit would be read as a legacy octal escape.
        let next_is_digit = chars.peek().is_some_and(|c| c.is_ascii_digit());
        out.write_str(if next_is_digit { "\\x00" } else { "\\0" })?;
      }
      '\u{2028}' => out.write_str("\\u2028")?,
      '\u{2029}' => out.write_str("\\u2029")?,
      ch if ch < '\u{20}' => write!(out, "\\x{:02X}", ch as u32)?,
      ch => out.write_char(ch)?,
    };
  }
  out.write_char('"')
}

#[cfg(test)]
mod tests {
  use super::*;

  fn emit_string(value: &str) -> String {
    let mut out = String::new();
    emit_string_literal_double_quoted(&mut out, value).unwrap();
    out
  }

  #[test]
  fn escapes_quotes_and_backslashes() {
    assert_eq!(emit_string("a\"b\\c"), "\"a\\\"b\\\\c\"");
    assert_eq!(emit_string("it's"), "\"it's\"");
  }

  #[test]
  fn escapes_control_characters() {
    assert_eq!(emit_string("a\nb\tc"), "\"a\\nb\\tc\"");
    assert_eq!(emit_string("a\u{0007}b"), "\"a\\x07b\"");
  }

  #[test]
  fn escapes_zero_followed_by_digit() {
    assert_eq!(emit_string("\u{0000}9"), "\"\\x009\"");
    assert_eq!(emit_string("\u{0000}a"), "\"\\0a\"");
  }

  #[test]
  fn escapes_line_separators() {
    assert_eq!(emit_string("a\u{2028}b"), "\"a\\u2028b\"");
    assert_eq!(emit_string("a\u{2029}b"), "\"a\\u2029b\"");
  }
}
