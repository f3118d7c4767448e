use crate::error::SickError;

/// Parses a numeric telegram token.
///
/// Tokens with a leading `+` or `-` are signed decimal, every other token is
/// unsigned hexadecimal.
pub fn parse_number(token: &[u8]) -> Result<i64, SickError> {
    parse_field(token, "number")
}

pub(crate) fn parse_field(token: &[u8], field: &'static str) -> Result<i64, SickError> {
    let text = ascii(token, field)?;
    let parsed = match token.first() {
        Some(b'+') | Some(b'-') => text.parse::<i64>().ok(),
        _ => parse_unsigned_hex(text),
    };
    parsed.ok_or_else(|| invalid_number(field, text))
}

/// Parses a token that must be unsigned hexadecimal, as sample values always are.
pub(crate) fn parse_hex(token: &[u8], field: &'static str) -> Result<i64, SickError> {
    let text = ascii(token, field)?;
    parse_unsigned_hex(text).ok_or_else(|| invalid_number(field, text))
}

fn parse_unsigned_hex(text: &str) -> Option<i64> {
    // from_str_radix would accept a leading sign
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    i64::from_str_radix(text, 16).ok()
}

pub(crate) fn ascii<'a>(token: &'a [u8], field: &'static str) -> Result<&'a str, SickError> {
    if !token.is_ascii() {
        return Err(SickError::InvalidText { field });
    }
    std::str::from_utf8(token).map_err(|_| SickError::InvalidText { field })
}

fn invalid_number(field: &'static str, text: &str) -> SickError {
    SickError::InvalidNumber {
        field,
        token: text.to_string(),
    }
}

pub(crate) fn to_string(data: &[u8]) -> String {
    data.iter()
        .map(|e| format!("{:02X}", e))
        .collect::<Vec<_>>()
        .join(" ")
}
