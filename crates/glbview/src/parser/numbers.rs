//! Decoding of bare (unquoted) literals.

/// Decodes an unsigned decimal integer. Every byte must be a digit and the
/// value must fit in a `u32`.
pub(crate) fn decode_unsigned(text: &[u8]) -> Option<u32> {
    if text.is_empty() {
        return None;
    }
    text.iter().try_fold(0u32, |value, &byte| {
        if !byte.is_ascii_digit() {
            return None;
        }
        value.checked_mul(10)?.checked_add(u32::from(byte - b'0'))
    })
}

/// Decodes a JSON number into an `f32`. Only the JSON number alphabet is
/// accepted, so `inf`, `NaN` and a leading `+` are rejected.
pub(crate) fn decode_real(text: &[u8]) -> Option<f32> {
    let (&first, _) = text.split_first()?;
    if first != b'-' && !first.is_ascii_digit() {
        return None;
    }
    if !text
        .iter()
        .all(|&byte| byte.is_ascii_digit() || matches!(byte, b'-' | b'+' | b'.' | b'e' | b'E'))
    {
        return None;
    }
    core::str::from_utf8(text).ok()?.parse().ok()
}
