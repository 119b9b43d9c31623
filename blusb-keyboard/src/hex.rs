//! Hex token parsing shared by the text codecs

/// Parse an unprefixed, unsigned hex token (`"A"`, `"04"`, `"e0ff"`)
///
/// Rejects empty tokens, signs and `0x` prefixes.
pub(crate) fn parse_u16(token: &str) -> Option<u16> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(token, 16).ok()
}

/// Same as `parse_u16` but for single bytes
pub(crate) fn parse_u8(token: &str) -> Option<u8> {
    parse_u16(token).and_then(|v| u8::try_from(v).ok())
}
