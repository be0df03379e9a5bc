// Characters beyond ASCII are only checked for being alphabetic; the full Unicode ID_Start and
// ID_Continue tables aren't needed to find identifier boundaries in real code.

pub const ID_START_CHARSTR: &str = "$ABCDEFGHIJKLMNOPQRSTUVWXYZ_abcdefghijklmnopqrstuvwxyz";
pub const ID_CONTINUE_CHARSTR: &str =
  "$0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ_abcdefghijklmnopqrstuvwxyz";

pub fn is_id_start(c: char) -> bool {
  c == '$' || c == '_' || c.is_ascii_alphabetic() || (!c.is_ascii() && c.is_alphabetic())
}

pub fn is_id_continue(c: char) -> bool {
  is_id_start(c)
    || c.is_ascii_digit()
    || c == '\u{200C}'
    || c == '\u{200D}'
    || (!c.is_ascii() && c.is_alphanumeric())
}

// JSX names may contain hyphens.
pub fn is_id_continue_jsx(c: char) -> bool {
  c == '-' || is_id_continue(c)
}

pub fn is_line_terminator(c: char) -> bool {
  matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Whether `name` can be written as a bare identifier, e.g. as a property key.
pub fn is_valid_identifier_name(name: &str) -> bool {
  let mut chars = name.chars();
  match chars.next() {
    Some(c) if is_id_start(c) => chars.all(is_id_continue),
    _ => false,
  }
}
