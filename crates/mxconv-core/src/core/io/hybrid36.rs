//! Hybrid-36 numeric fields.
//!
//! PDB serial numbers (width 5) and residue sequence numbers (width 4) are
//! fixed-width decimal fields; structures exceeding 99999 atoms or 9999
//! residues use the hybrid-36 extension, which continues counting in
//! base 36 with an uppercase block followed by a lowercase block, keeping
//! the field width fixed. Reference: <http://cci.lbl.gov/hybrid_36/>.

/// Value of a base-36 digit, with the alphabetic case given by `lower`.
fn digit_value(b: u8, lower: bool) -> Option<i64> {
    match b {
        b'0'..=b'9' => Some(i64::from(b - b'0')),
        b'A'..=b'Z' if !lower => Some(i64::from(b - b'A') + 10),
        b'a'..=b'z' if lower => Some(i64::from(b - b'a') + 10),
        _ => None,
    }
}

/// Decodes a hybrid-36 field of the given width.
///
/// Fields starting with a digit, `-`, or `+` are plain decimal; fields
/// starting with an uppercase letter are in the uppercase base-36 block,
/// lowercase likewise. Returns `None` for empty fields, mixed-case digits,
/// or any character outside the active digit set.
pub fn decode(width: u32, field: &str) -> Option<i32> {
    let s = field.trim();
    let first = *s.as_bytes().first()?;
    if first.is_ascii_digit() || first == b'-' || first == b'+' {
        return s.parse::<i32>().ok();
    }
    let lower = first.is_ascii_lowercase();
    if !lower && !first.is_ascii_uppercase() {
        return None;
    }
    if s.len() != width as usize {
        return None;
    }
    let mut value: i64 = 0;
    for &b in s.as_bytes() {
        value = value * 36 + digit_value(b, lower)?;
    }
    // Shift the base-36 block onto the end of the previous block's range.
    let block = 36i64.pow(width - 1);
    value += 10i64.pow(width) - 10 * block;
    if lower {
        value += 26 * block;
    }
    i32::try_from(value).ok()
}

/// Encodes a value as a hybrid-36 field of exactly `width` characters.
///
/// Values below 10^width (including negatives) are right-justified decimal;
/// larger values fall into the uppercase and then lowercase base-36 blocks.
/// Returns `None` when the value exceeds the representable range.
pub fn encode(width: u32, value: i32) -> Option<String> {
    let decimal_limit = 10i32.pow(width);
    if value < decimal_limit {
        return Some(format!("{:>w$}", value, w = width as usize));
    }
    let block = 26 * 36i32.pow(width - 1);
    let (mut rest, digits) = if value < decimal_limit + block {
        (
            value - decimal_limit + 10 * 36i32.pow(width - 1),
            b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ",
        )
    } else if value < decimal_limit + 2 * block {
        (
            value - decimal_limit - block + 10 * 36i32.pow(width - 1),
            b"0123456789abcdefghijklmnopqrstuvwxyz",
        )
    } else {
        return None;
    };
    let mut out = vec![0u8; width as usize];
    for slot in out.iter_mut().rev() {
        *slot = digits[(rest % 36) as usize];
        rest /= 36;
    }
    debug_assert_eq!(rest, 0);
    String::from_utf8(out).ok()
}
