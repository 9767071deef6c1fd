use std::convert::Infallible;

pub const DEFAULT_BAUD_RATE: i32 = 300;

/// Parses a baud rate the way C's `atoi` does: anything that isn't a number
/// becomes 0 and trailing garbage is ignored. Rejecting bogus rates is left to
/// the terminal driver.
pub fn parse_baud_rate(s: &str) -> Result<i32, Infallible> {
    Ok(atoi(s.as_bytes()))
}

fn atoi(s: &[u8]) -> i32 {
    let mut s = s.trim_ascii_start();

    let negative = s.first() == Some(&b'-');
    if let [b'+' | b'-', rest @ ..] = s {
        s = rest;
    }

    let mut value = 0i32;
    for digit in s.iter().take_while(|b| b.is_ascii_digit()) {
        value = value.wrapping_mul(10).wrapping_add(i32::from(digit - b'0'));
    }
    if negative {
        value.wrapping_neg()
    } else {
        value
    }
}
