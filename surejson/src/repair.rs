//! Tolerant repair of near-valid JSON text.
//!
//! Each pass is a string-aware byte scanner fixing one class of malformation
//! commonly produced by language models. The passes never fail; whether the
//! result is actually valid JSON is judged by the strict parse in
//! [`crate::extract`].

/// Runs every repair pass over `text` and returns the repaired string.
///
/// Handled malformations: smart quotes, `//` and `/* */` comments,
/// single-quoted strings, unquoted object keys, Python-style literals, raw
/// control characters inside strings, missing commas at line breaks,
/// trailing commas, and unterminated strings/containers.
#[must_use]
pub fn repair_json(text: &str) -> String {
    let mut repaired = fix_smart_quotes(text);
    repaired = strip_comments(&repaired);
    repaired = convert_single_quotes(&repaired);
    repaired = normalize_identifiers(&repaired);
    repaired = escape_control_chars(&repaired);
    repaired = insert_missing_commas(&repaired);
    repaired = remove_trailing_commas(&repaired);
    close_open_structures(&repaired)
}

fn is_ws(b: u8) -> bool {
    matches!(b, b' ' | b'\n' | b'\r' | b'\t')
}

fn fix_smart_quotes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\u{201C}' | '\u{201D}' => out.push('"'),
            '\u{2018}' | '\u{2019}' => out.push('\''),
            _ => out.push(ch),
        }
    }
    out
}

fn strip_comments(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    let mut in_string = false;
    let mut escape = false;
    while i < bytes.len() {
        let ch = bytes[i];
        if in_string {
            out.push(ch);
            if escape {
                escape = false;
            } else if ch == b'\\' {
                escape = true;
            } else if ch == b'"' {
                in_string = false;
            }
            i += 1;
            continue;
        }
        if ch == b'"' {
            in_string = true;
            out.push(ch);
            i += 1;
            continue;
        }
        if ch == b'/' && i + 1 < bytes.len() && bytes[i + 1] == b'/' {
            while i < bytes.len() && bytes[i] != b'\n' {
                i += 1;
            }
            continue;
        }
        if ch == b'/' && i + 1 < bytes.len() && bytes[i + 1] == b'*' {
            i += 2;
            while i + 1 < bytes.len() && !(bytes[i] == b'*' && bytes[i + 1] == b'/') {
                i += 1;
            }
            i = (i + 2).min(bytes.len());
            continue;
        }
        out.push(ch);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

// Rewrites 'single-quoted' strings as "double-quoted", escaping embedded
// double quotes and unescaping \' along the way.
fn convert_single_quotes(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    let mut in_string = false;
    let mut escape = false;
    while i < bytes.len() {
        let ch = bytes[i];
        if in_string {
            out.push(ch);
            if escape {
                escape = false;
            } else if ch == b'\\' {
                escape = true;
            } else if ch == b'"' {
                in_string = false;
            }
            i += 1;
            continue;
        }
        if ch == b'"' {
            in_string = true;
            out.push(ch);
            i += 1;
            continue;
        }
        if ch == b'\'' {
            out.push(b'"');
            i += 1;
            while i < bytes.len() {
                let inner = bytes[i];
                if inner == b'\\' && i + 1 < bytes.len() {
                    if bytes[i + 1] == b'\'' {
                        out.push(b'\'');
                    } else {
                        out.push(b'\\');
                        out.push(bytes[i + 1]);
                    }
                    i += 2;
                    continue;
                }
                if inner == b'\'' {
                    i += 1;
                    break;
                }
                if inner == b'"' {
                    out.push(b'\\');
                }
                out.push(inner);
                i += 1;
            }
            out.push(b'"');
            continue;
        }
        out.push(ch);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

// Quotes bare object keys and maps Python/JS scalar literals to their JSON
// spellings. A word followed by `:` is a key; anything else is a value.
fn normalize_identifiers(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    let mut in_string = false;
    let mut escape = false;
    while i < bytes.len() {
        let ch = bytes[i];
        if in_string {
            out.push(ch);
            if escape {
                escape = false;
            } else if ch == b'\\' {
                escape = true;
            } else if ch == b'"' {
                in_string = false;
            }
            i += 1;
            continue;
        }
        if ch == b'"' {
            in_string = true;
            out.push(ch);
            i += 1;
            continue;
        }
        if ch.is_ascii_alphabetic() || ch == b'_' || ch == b'$' {
            let start = i;
            i += 1;
            while i < bytes.len()
                && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_' || bytes[i] == b'$')
            {
                i += 1;
            }
            let word = &text[start..i];

            let mut j = i;
            while j < bytes.len() && is_ws(bytes[j]) {
                j += 1;
            }
            if j < bytes.len() && bytes[j] == b':' {
                out.push(b'"');
                out.extend_from_slice(word.as_bytes());
                out.push(b'"');
                continue;
            }

            let mapped = match word {
                "True" => "true",
                "False" => "false",
                "None" | "undefined" => "null",
                other => other,
            };
            out.extend_from_slice(mapped.as_bytes());
            continue;
        }
        out.push(ch);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn escape_control_chars(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut in_string = false;
    let mut escape = false;
    for &ch in bytes {
        if in_string {
            if escape {
                escape = false;
                out.push(ch);
                continue;
            }
            match ch {
                b'\\' => {
                    escape = true;
                    out.push(ch);
                }
                b'"' => {
                    in_string = false;
                    out.push(ch);
                }
                b'\n' => out.extend_from_slice(b"\\n"),
                b'\r' => out.extend_from_slice(b"\\r"),
                b'\t' => out.extend_from_slice(b"\\t"),
                _ => out.push(ch),
            }
            continue;
        }
        if ch == b'"' {
            in_string = true;
        }
        out.push(ch);
    }
    String::from_utf8_lossy(&out).into_owned()
}

// A completed value followed by a quoted key on the next line is missing its
// separating comma. Only the across-a-newline case is handled; anything more
// ambitious needs a real parser.
fn insert_missing_commas(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut in_string = false;
    let mut escape = false;
    let mut last_sig: u8 = 0;
    let mut newline_gap = false;
    for &ch in bytes {
        if in_string {
            out.push(ch);
            if escape {
                escape = false;
            } else if ch == b'\\' {
                escape = true;
            } else if ch == b'"' {
                in_string = false;
                last_sig = b'"';
                newline_gap = false;
            }
            continue;
        }
        if ch == b'"' {
            if newline_gap
                && (last_sig.is_ascii_alphanumeric() || matches!(last_sig, b'"' | b'}' | b']'))
            {
                out.push(b',');
            }
            in_string = true;
            newline_gap = false;
            out.push(ch);
            continue;
        }
        if is_ws(ch) {
            if ch == b'\n' {
                newline_gap = true;
            }
            out.push(ch);
            continue;
        }
        out.push(ch);
        last_sig = ch;
        newline_gap = false;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn remove_trailing_commas(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    let mut in_string = false;
    let mut escape = false;
    while i < bytes.len() {
        let ch = bytes[i];
        if in_string {
            out.push(ch);
            if escape {
                escape = false;
            } else if ch == b'\\' {
                escape = true;
            } else if ch == b'"' {
                in_string = false;
            }
            i += 1;
            continue;
        }
        if ch == b'"' {
            in_string = true;
            out.push(ch);
            i += 1;
            continue;
        }
        if ch == b',' {
            let mut j = i + 1;
            while j < bytes.len() && is_ws(bytes[j]) {
                j += 1;
            }
            if j >= bytes.len() || bytes[j] == b'}' || bytes[j] == b']' {
                i += 1;
                continue;
            }
        }
        out.push(ch);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn close_open_structures(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut in_string = false;
    let mut escape = false;
    let mut open_braces: i64 = 0;
    let mut open_brackets: i64 = 0;
    for &ch in bytes {
        if in_string {
            if escape {
                escape = false;
            } else if ch == b'\\' {
                escape = true;
            } else if ch == b'"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            b'"' => in_string = true,
            b'{' => open_braces += 1,
            b'}' => open_braces -= 1,
            b'[' => open_brackets += 1,
            b']' => open_brackets -= 1,
            _ => {}
        }
    }

    let mut out = text.to_string();
    if in_string {
        out.push('"');
    }
    for _ in 0..open_brackets.max(0) {
        out.push(']');
    }
    for _ in 0..open_braces.max(0) {
        out.push('}');
    }
    out
}
