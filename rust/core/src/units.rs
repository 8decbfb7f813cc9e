// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Length and angle text handling
//!
//! World units are inches. Users type lengths in architectural notation:
//!
//! - `10' 6"` or `10ft 6in` - feet and inches
//! - `10'` or `10ft` - feet only
//! - `120"` or `120in` - inches only
//! - `10.5` - a bare number is decimal feet
//!
//! The inches part may carry a fraction (`6 1/2"`, `6½"`, `3/16"`), which is
//! what [`format_length`] emits so formatted text parses back. Unicode prime
//! (`′`) and double prime (`″`) are aliases for `'` and `"`.

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{anychar, char, digit1, space0},
    combinator::{all_consuming, map, map_opt, map_res, opt, recognize},
    sequence::{pair, preceded, separated_pair, terminated, tuple},
    IResult,
};

/// Inches per foot
pub const INCHES_PER_FOOT: f64 = 12.0;

/// Finest fraction denominator used when formatting
pub const MAX_FRACTION_DENOMINATOR: u32 = 16;

/// Parse an unsigned decimal number: 12, 12.5
fn number(input: &str) -> IResult<&str, f64> {
    map_res(
        recognize(pair(digit1, opt(pair(char('.'), digit1)))),
        |s: &str| fast_float::parse::<f64, _>(s),
    )(input)
}

/// Parse an ASCII fraction: 1/2, 3/16
fn ascii_fraction(input: &str) -> IResult<&str, f64> {
    map_opt(
        separated_pair(
            map_res(digit1, |s: &str| s.parse::<u32>()),
            char('/'),
            map_res(digit1, |s: &str| s.parse::<u32>()),
        ),
        |(num, den)| {
            if den == 0 {
                None
            } else {
                Some(num as f64 / den as f64)
            }
        },
    )(input)
}

/// Parse a single-character vulgar fraction: ½, ¼, ⅜ ...
fn vulgar_fraction(input: &str) -> IResult<&str, f64> {
    map_opt(anychar, |c| match c {
        '½' => Some(0.5),
        '¼' => Some(0.25),
        '¾' => Some(0.75),
        '⅛' => Some(0.125),
        '⅜' => Some(0.375),
        '⅝' => Some(0.625),
        '⅞' => Some(0.875),
        _ => None,
    })(input)
}

fn fraction(input: &str) -> IResult<&str, f64> {
    alt((ascii_fraction, vulgar_fraction))(input)
}

/// Inches value: a fraction alone, or a whole/decimal number with an
/// optional trailing fraction (`6 1/2`, `6½`)
fn inches_value(input: &str) -> IResult<&str, f64> {
    alt((
        fraction,
        map(
            pair(number, opt(preceded(space0, fraction))),
            |(whole, frac)| whole + frac.unwrap_or(0.0),
        ),
    ))(input)
}

fn feet_mark(input: &str) -> IResult<&str, &str> {
    alt((tag("ft"), tag("'")))(input)
}

fn inch_mark(input: &str) -> IResult<&str, &str> {
    alt((tag("in"), tag("\"")))(input)
}

/// `10' 6"`, `10ft 6in`, `10' 6`
fn feet_and_inches(input: &str) -> IResult<&str, f64> {
    map(
        tuple((
            number,
            space0,
            feet_mark,
            space0,
            inches_value,
            space0,
            opt(inch_mark),
        )),
        |(feet, _, _, _, inches, _, _)| feet * INCHES_PER_FOOT + inches,
    )(input)
}

/// `10'`, `10ft`
fn feet_only(input: &str) -> IResult<&str, f64> {
    map(terminated(number, pair(space0, feet_mark)), |feet| {
        feet * INCHES_PER_FOOT
    })(input)
}

/// `120"`, `120in`, `6 1/2"`
fn inches_only(input: &str) -> IResult<&str, f64> {
    terminated(inches_value, pair(space0, inch_mark))(input)
}

/// Bare number, read as decimal feet
fn bare_feet(input: &str) -> IResult<&str, f64> {
    map(number, |feet| feet * INCHES_PER_FOOT)(input)
}

fn length(input: &str) -> IResult<&str, f64> {
    map(
        tuple((
            space0,
            opt(terminated(char('-'), space0)),
            alt((feet_and_inches, feet_only, inches_only, bare_feet)),
            space0,
        )),
        |(_, sign, inches, _)| if sign.is_some() { -inches } else { inches },
    )(input)
}

/// Parse user length text into inches.
///
/// Returns `None` for anything that does not match one of the accepted
/// notations. Never panics.
pub fn parse_length(text: &str) -> Option<f64> {
    let normalized = text
        .trim()
        .to_lowercase()
        .replace('′', "'")
        .replace('″', "\"");
    if normalized.is_empty() {
        return None;
    }

    // Bound to a local so the parser is dropped before `normalized`
    let parsed = match all_consuming(length)(normalized.as_str()) {
        Ok((_, inches)) if inches.is_finite() => Some(inches),
        _ => None,
    };
    parsed
}

/// Parse a plain inch count the way a numeric settings field is read:
/// the leading decimal number of the text, ignoring any trailing unit.
pub fn parse_plain_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    match fast_float::parse_partial::<f64, _>(trimmed) {
        Ok((value, consumed)) if consumed > 0 && value.is_finite() => Some(value),
        _ => None,
    }
}

/// Parse an angle in degrees, with or without a trailing `°`.
pub fn parse_angle(text: &str) -> Option<f64> {
    let trimmed = text.trim().trim_end_matches('°').trim_end();
    parse_plain_number(trimmed)
}

/// Format inches as feet and inches: `10' 6 ½"`.
///
/// `precision` picks the fraction resolution: 0 rounds to quarters, 1 to
/// eighths, 2 and above to sixteenths. Negative values keep their sign and
/// are rounded on the absolute value. Non-finite input renders as `—`.
pub fn format_length(inches: f64, precision: u32) -> String {
    if !inches.is_finite() {
        return "—".to_string();
    }

    let denominator = fraction_denominator(precision);
    let negative = inches < 0.0;
    let magnitude = inches.abs();

    let mut feet = (magnitude / INCHES_PER_FOOT).floor() as u64;
    let remaining = magnitude - feet as f64 * INCHES_PER_FOOT;

    let units = (remaining * denominator as f64).round() as u64;
    let mut whole_inches = units / denominator as u64;
    let frac_units = (units % denominator as u64) as u32;

    if whole_inches >= 12 {
        feet += 1;
        whole_inches -= 12;
    }

    let inches_text = if frac_units == 0 {
        whole_inches.to_string()
    } else {
        let frac = simplify_fraction(frac_units, denominator);
        if whole_inches == 0 {
            frac
        } else {
            format!("{} {}", whole_inches, frac)
        }
    };

    let text = format!("{}' {}\"", feet, inches_text);
    // Rounding can take a tiny negative value to zero; don't render "-0' 0\""
    if negative && (feet > 0 || units > 0) {
        format!("-{}", text)
    } else {
        text
    }
}

/// Format inches as a plain decimal inch count: `126.50"`
pub fn format_inches(inches: f64, decimals: usize) -> String {
    if !inches.is_finite() {
        return "—".to_string();
    }
    format!("{:.*}\"", decimals, inches)
}

#[inline]
fn fraction_denominator(precision: u32) -> u32 {
    match precision {
        0 => 4,
        1 => 8,
        _ => MAX_FRACTION_DENOMINATOR,
    }
}

fn simplify_fraction(numerator: u32, denominator: u32) -> String {
    fn gcd(a: u32, b: u32) -> u32 {
        if b == 0 {
            a
        } else {
            gcd(b, a % b)
        }
    }

    let divisor = gcd(numerator, denominator);
    let num = numerator / divisor;
    let den = denominator / divisor;

    match (num, den) {
        (1, 2) => "½".to_string(),
        (1, 4) => "¼".to_string(),
        (3, 4) => "¾".to_string(),
        (1, 8) => "⅛".to_string(),
        (3, 8) => "⅜".to_string(),
        (5, 8) => "⅝".to_string(),
        (7, 8) => "⅞".to_string(),
        _ => format!("{}/{}", num, den),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_parse_feet_and_inches() {
        assert_eq!(parse_length("10' 6\""), Some(126.0));
        assert_eq!(parse_length("10ft 6in"), Some(126.0));
        assert_eq!(parse_length("  10 '   6 \" "), Some(126.0));
        assert_eq!(parse_length("10' 6"), Some(126.0));
        assert_eq!(parse_length("10'6\""), Some(126.0));
    }

    #[test]
    fn test_parse_single_unit() {
        assert_eq!(parse_length("10'"), Some(120.0));
        assert_eq!(parse_length("10FT"), Some(120.0));
        assert_eq!(parse_length("120\""), Some(120.0));
        assert_eq!(parse_length("120in"), Some(120.0));
        assert_eq!(parse_length("100.5"), Some(1206.0));
    }

    #[test]
    fn test_parse_unicode_primes() {
        assert_eq!(parse_length("8′ 2″"), Some(98.0));
        assert_eq!(parse_length("8′"), Some(96.0));
    }

    #[test]
    fn test_parse_fractions() {
        assert_eq!(parse_length("0' 6 ½\""), Some(6.5));
        assert_eq!(parse_length("6½\""), Some(6.5));
        assert_eq!(parse_length("3/16\""), Some(0.1875));
        assert_eq!(parse_length("1' 2 3/8\""), Some(14.375));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_length(""), None);
        assert_eq!(parse_length("   "), None);
        assert_eq!(parse_length("abc"), None);
        assert_eq!(parse_length("10' abc"), None);
        assert_eq!(parse_length("1/0\""), None);
        assert_eq!(parse_length("—"), None);
        assert_eq!(parse_length(".5"), None);
    }

    #[test]
    fn test_parse_negative() {
        assert_eq!(parse_length("-1' 2\""), Some(-14.0));
    }

    #[test]
    fn test_format_basic() {
        assert_eq!(format_length(126.0, 2), "10' 6\"");
        assert_eq!(format_length(120.0, 2), "10' 0\"");
        assert_eq!(format_length(6.5, 2), "0' 6 ½\"");
        assert_eq!(format_length(0.1875, 2), "0' 3/16\"");
        assert_eq!(format_length(-14.0, 2), "-1' 2\"");
    }

    #[test]
    fn test_format_carries_into_feet() {
        // 11.99 rounds to 12 whole inches
        assert_eq!(format_length(23.99, 2), "2' 0\"");
    }

    #[test]
    fn test_format_precision_selects_resolution() {
        assert_eq!(format_length(6.1875, 0), "0' 6 ¼\"");
        assert_eq!(format_length(6.1875, 2), "0' 6 3/16\"");
    }

    #[test]
    fn test_format_non_finite() {
        assert_eq!(format_length(f64::NAN, 2), "—");
        assert_eq!(format_length(f64::INFINITY, 2), "—");
    }

    #[test]
    fn test_round_trip_within_sixteenth() {
        let mut x = 0.0;
        while x < 600.0 {
            let text = format_length(x, 2);
            let parsed = parse_length(&text).expect("formatted text parses");
            assert!(
                (parsed - x).abs() <= 1.0 / 16.0,
                "{} -> {} -> {}",
                x,
                text,
                parsed
            );
            x += 0.37;
        }
    }

    #[test]
    fn test_round_trip_keeps_sign() {
        for x in [-0.5, -14.0, -127.3, -1000.0625] {
            let parsed = parse_length(&format_length(x, 2)).unwrap();
            assert!(parsed < 0.0);
            assert_abs_diff_eq!(parsed, x, epsilon = 1.0 / 16.0);
        }
    }

    #[test]
    fn test_parse_plain_number_and_angle() {
        assert_eq!(parse_plain_number("6"), Some(6.0));
        assert_eq!(parse_plain_number("4.5in"), Some(4.5));
        assert_eq!(parse_plain_number("in"), None);
        assert_eq!(parse_angle("90"), Some(90.0));
        assert_eq!(parse_angle("-45.5°"), Some(-45.5));
        assert_eq!(parse_angle("north"), None);
    }
}
