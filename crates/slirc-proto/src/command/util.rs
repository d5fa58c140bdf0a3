use std::fmt::{self, Write};

/// Check if a string needs colon-prefixing as a trailing IRC argument.
pub fn needs_colon_prefix(s: &str) -> bool {
    s.is_empty() || s.contains(' ') || s.starts_with(':')
}

/// Find the first character that would break line framing.
pub fn find_illegal_char(param: &str) -> Option<char> {
    param.chars().find(|c| matches!(c, '\r' | '\n' | '\0'))
}

/// Write `cmd` followed by its parameters.
///
/// The last parameter is colon-prefixed when `freeform` is set or when it
/// could not be read back as a middle parameter.
pub fn write_cmd<W: Write>(w: &mut W, cmd: &str, params: &[&str], freeform: bool) -> fmt::Result {
    w.write_str(cmd)?;

    let Some((last, middle)) = params.split_last() else {
        return Ok(());
    };

    for param in middle {
        w.write_char(' ')?;
        w.write_str(param)?;
    }

    w.write_char(' ')?;
    if freeform || needs_colon_prefix(last) {
        w.write_char(':')?;
    }
    w.write_str(last)
}
