//! Byte-level scanning helpers for the expression grammar. Every syntactic
//! character is ASCII, so byte offsets returned here are valid `str` slice
//! boundaries.

pub(crate) const DELIMITERS: &[u8] = b"/|:,";
pub(crate) const SEPARATORS: &[u8] = b";\n\r";

pub(crate) fn is_delimiter(byte: u8) -> bool {
    DELIMITERS.contains(&byte)
}

pub(crate) fn is_separator(byte: u8) -> bool {
    SEPARATORS.contains(&byte)
}

pub(crate) fn is_blank(byte: u8) -> bool {
    byte == b' ' || byte == b'\t'
}

/// End of a flag candidate run starting at `start`.
pub(crate) fn flag_run_end(bytes: &[u8], start: usize) -> usize {
    bytes[start..]
        .iter()
        .position(|&byte| {
            is_delimiter(byte) || is_separator(byte) || is_blank(byte) || byte == b'{'
        })
        .map_or(bytes.len(), |offset| start + offset)
}

/// Position of the next occurrence of `bytes[open]` after `open` that is not
/// escaped by an odd number of backslashes.
pub(crate) fn next_unescaped(bytes: &[u8], open: usize) -> Option<usize> {
    let delimiter = bytes[open];
    let mut backslashes = 0usize;
    for (offset, &byte) in bytes[open + 1..].iter().enumerate() {
        if byte == b'\\' {
            backslashes += 1;
            continue;
        }
        if byte == delimiter && backslashes % 2 == 0 {
            return Some(open + 1 + offset);
        }
        backslashes = 0;
    }
    None
}

/// Closing delimiter of a substitution that starts at the regex's closing
/// delimiter `close`, if the current expression carries one. A separator
/// before the next delimiter ends the expression.
pub(crate) fn substitution_end(bytes: &[u8], close: usize) -> Option<usize> {
    let mut seek = close + 1;
    while seek < bytes.len() && is_blank(bytes[seek]) {
        seek += 1;
    }
    match bytes.get(seek) {
        None => return None,
        Some(&byte) if byte == b'{' || is_separator(byte) => return None,
        Some(_) => {}
    }
    let end = next_unescaped(bytes, close)?;
    if bytes[close + 1..end].iter().any(|&byte| is_separator(byte)) {
        return None;
    }
    Some(end)
}

/// Position of the `}` matching the `{` at `open`.
pub(crate) fn matching_brace(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, &byte) in bytes[open..].iter().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Replace `\<delimiter>` with the bare delimiter and `$&` with the
/// whole-match reference understood by `regex`.
pub(crate) fn unescape_substitution(text: &str, delimiter: char) -> String {
    let mut output = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&delimiter) => {
                output.push(delimiter);
                chars.next();
            }
            '$' if chars.peek() == Some(&'&') => {
                output.push_str("${0}");
                chars.next();
            }
            _ => output.push(c),
        }
    }
    output
}
