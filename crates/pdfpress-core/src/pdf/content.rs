//! Lexical checks on decoded content streams.

/// Count the operators in a content stream.
///
/// Returns `None` for streams that cannot be rewritten token by token: inline
/// images, unterminated strings, or stray closing delimiters.
pub fn count_operators(data: &[u8]) -> Option<usize> {
    let mut count = 0;
    let mut pos = 0;

    while pos < data.len() {
        match data[pos] {
            byte if is_whitespace(byte) => pos += 1,
            b'%' => {
                while pos < data.len() && !matches!(data[pos], b'\r' | b'\n') {
                    pos += 1;
                }
            }
            b'(' => pos = skip_literal_string(data, pos)?,
            b'<' if data.get(pos + 1) == Some(&b'<') => pos += 2,
            b'>' if data.get(pos + 1) == Some(&b'>') => pos += 2,
            b'<' => pos = skip_hex_string(data, pos)?,
            b'[' | b']' | b'{' | b'}' => pos += 1,
            b'/' => pos = skip_regular(data, pos + 1),
            _ => {
                let start = pos;
                pos = skip_regular(data, pos);
                if pos == start {
                    return None;
                }
                let token = &data[start..pos];
                if is_operand(token) {
                    continue;
                }
                // Image data after ID is binary and has no token structure.
                if token == b"BI" {
                    return None;
                }
                count += 1;
            }
        }
    }

    Some(count)
}

fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b'\0' | b'\t' | b'\n' | 0x0c | b'\r' | b' ')
}

fn is_delimiter(byte: u8) -> bool {
    matches!(
        byte,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

fn skip_regular(data: &[u8], mut pos: usize) -> usize {
    while pos < data.len() && !is_whitespace(data[pos]) && !is_delimiter(data[pos]) {
        pos += 1;
    }
    pos
}

/// Position after the string opened at `start`, honoring nesting and escapes.
fn skip_literal_string(data: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut pos = start;

    while pos < data.len() {
        match data[pos] {
            b'\\' => pos += 1,
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(pos + 1);
                }
            }
            _ => {}
        }
        pos += 1;
    }
    None
}

fn skip_hex_string(data: &[u8], start: usize) -> Option<usize> {
    data[start..]
        .iter()
        .position(|&byte| byte == b'>')
        .map(|offset| start + offset + 1)
}

fn is_operand(token: &[u8]) -> bool {
    if matches!(token, b"true" | b"false" | b"null") {
        return true;
    }
    token.iter().any(u8::is_ascii_digit)
        && token
            .iter()
            .all(|&byte| byte.is_ascii_digit() || matches!(byte, b'+' | b'-' | b'.'))
}
