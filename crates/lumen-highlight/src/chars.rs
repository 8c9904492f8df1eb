//! Character classes used by the lexers.

/// Whether `c` is in HTML's ASCII whitespace set.
#[inline]
pub fn is_html_whitespace(c: u8) -> bool {
    matches!(c, b'\t' | b'\n' | b'\x0c' | b'\r' | b' ')
}

/// Name characters shared by directive and argument names: ASCII
/// alphanumerics, `-`, `_`, and every non-ASCII code point.
#[inline]
fn is_name(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

/// Whether `c` may appear in a directive name.
#[inline]
pub fn is_directive_name(c: char) -> bool {
    is_name(c)
}

/// Whether `c` may start a directive name. Digits may continue a name but
/// not start one.
#[inline]
pub fn is_directive_name_start(c: char) -> bool {
    is_name(c) && !c.is_ascii_digit()
}

/// Whether `c` may appear in an argument name.
#[inline]
pub fn is_argument_name(c: char) -> bool {
    is_name(c)
}

/// Whether a backslash followed by `c` forms an escape sequence. Only the
/// structurally significant characters can be escaped.
#[inline]
pub fn is_escapeable(c: u8) -> bool {
    matches!(c, b'\\' | b'{' | b'}' | b'[' | b']' | b',')
}
