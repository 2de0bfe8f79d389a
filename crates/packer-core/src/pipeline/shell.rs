//! POSIX shell quoting.
//!
//! Every argument that appears in a rendered command line passes through
//! this module, so a token parsed back by `sh` yields the original string
//! no matter which metacharacters it contains.

/// Characters that never need quoting.
fn is_plain(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/' | ',' | ':' | '=' | '+' | '@' | '%')
}

/// Wraps `s` in single quotes, rewriting embedded `'` as `'\''`.
///
/// Inside single quotes the shell interprets nothing: spaces, `$`,
/// backticks, double quotes, backslashes and newlines stay literal.
///
/// # Examples
///
/// ```
/// use packer_core::pipeline::shell::quote;
///
/// assert_eq!(quote("my file"), "'my file'");
/// assert_eq!(quote("it's"), r"'it'\''s'");
/// ```
#[must_use]
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        if c == '\'' {
            out.push_str(r"'\''");
        } else {
            out.push(c);
        }
    }
    out.push('\'');
    out
}

/// Like [`quote`], but leaves tokens made only of plain characters bare.
///
/// Used for program names and flags so the rendered command reads
/// naturally.
#[must_use]
pub fn token(s: &str) -> String {
    if !s.is_empty() && s.chars().all(is_plain) {
        s.to_string()
    } else {
        quote(s)
    }
}
