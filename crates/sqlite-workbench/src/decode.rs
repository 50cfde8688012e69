//! Best-effort decoding of escape-encoded text pulled out of stored values,
//! e.g. `\u6CC9\u3000\u3042` sequences left behind by other tools. Strictly
//! a display convenience: every strategy that fails falls through, and the
//! worst case returns the input unchanged. Nothing here ever errors outward.

/// Decode `\uXXXX`-style escapes into real characters.
///
/// Strategies, first success wins:
/// 1. input that looks like a JSON object/array is parsed and re-serialized
///    (serde_json writes non-ASCII text literally, so `\u` escapes inside
///    string values come out as characters);
/// 2. the whole input is treated as one JSON string literal and unescaped;
/// 3. a generic backslash-unescape pass.
pub fn decode_escaped(input: &str) -> String {
    // Quick check for the common escape markers.
    if !input.contains("\\u") && !input.contains("\\U") && !input.contains("\\x") {
        return input.to_string();
    }

    let trimmed = input.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(input) {
            if let Ok(serialized) = serde_json::to_string(&value) {
                return serialized;
            }
        }
    }

    // Embedded quotes are escaped so the literal stays well-formed; escape
    // sequences themselves are left intact for the parser to interpret.
    let literal = format!("\"{}\"", input.replace('"', "\\\""));
    if let Ok(decoded) = serde_json::from_str::<String>(&literal) {
        if !decoded.is_empty() {
            return decoded;
        }
    }

    unescape(input).unwrap_or_else(|| input.to_string())
}

/// Generic backslash-unescape: `\uXXXX`, `\xXX`, and the usual
/// single-character escapes. `None` on anything malformed, unrepresentable,
/// or unrecognized (truncated escape, lone surrogate, unknown escape
/// letter), so the caller falls back to the untouched input instead of
/// dropping backslashes from text it did not understand.
fn unescape(input: &str) -> Option<String> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'u' => out.push(hex_char(&mut chars, 4)?),
            'x' => out.push(hex_char(&mut chars, 2)?),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            '0' => out.push('\0'),
            'b' => out.push('\u{0008}'),
            'f' => out.push('\u{000C}'),
            '\\' => out.push('\\'),
            '"' => out.push('"'),
            '\'' => out.push('\''),
            _ => return None,
        }
    }
    Some(out)
}

fn hex_char(chars: &mut std::str::Chars<'_>, digits: u32) -> Option<char> {
    let mut code = 0u32;
    for _ in 0..digits {
        code = code * 16 + chars.next()?.to_digit(16)?;
    }
    char::from_u32(code)
}
