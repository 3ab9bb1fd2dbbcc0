//! Complex literal parser
//!
//! Grammar of a single amplitude or matrix entry:
//!
//! ```text
//! literal   := real | imaginary | real sign imaginary
//! imaginary := [sign] 'i' [real]
//! real      := [sign] digits ['.' digits] [('e' | 'E') [sign] digits]
//! ```
//!
//! A literal without any `'i'` is a plain real number. Otherwise the last
//! `'+'`/`'-'` that does not follow an exponent marker splits the real part
//! from the imaginary part.

use crate::error::ComplexParseError;

/// Complex amplitude with `f64` parts
pub type Complex = num_complex::Complex64;

/// Parses a complex literal such as `3`, `-i`, `i2.5` or `1e-3+i2`.
pub fn parse_complex(text: &str) -> Result<Complex, ComplexParseError> {
    if text.is_empty() {
        return Err(ComplexParseError::Empty);
    }

    if !text.contains('i') {
        return parse_real(text).map(|re| Complex::new(re, 0.0));
    }

    match find_separator(text)? {
        None => parse_imaginary(text).map(|im| Complex::new(0.0, im)),
        Some(split) => {
            let re = parse_real(&text[..split])?;
            let im = parse_imaginary(&text[split..])?;
            Ok(Complex::new(re, im))
        }
    }
}

/// Parses a real number; the whole slice must be consumed.
pub fn parse_real(text: &str) -> Result<f64, ComplexParseError> {
    if text.is_empty() {
        return Err(ComplexParseError::Empty);
    }
    if !is_decimal_literal(text) {
        return Err(ComplexParseError::InvalidReal(text.to_string()));
    }

    let value: f64 = text
        .parse()
        .map_err(|_| ComplexParseError::InvalidReal(text.to_string()))?;

    if !value.is_finite() || (value == 0.0 && mantissa_is_nonzero(text)) {
        return Err(ComplexParseError::OutOfRange(text.to_string()));
    }

    Ok(value)
}

/// Parses a pure imaginary term (`i`, `-i`, `+i0.5`) and returns its
/// signed coefficient.
pub fn parse_imaginary(text: &str) -> Result<f64, ComplexParseError> {
    let (sign, rest) = match text.as_bytes().first() {
        None => return Err(ComplexParseError::Empty),
        Some(b'+') => (1.0, &text[1..]),
        Some(b'-') => (-1.0, &text[1..]),
        Some(_) => (1.0, text),
    };

    let Some(coefficient) = rest.strip_prefix('i') else {
        return Err(ComplexParseError::MissingImaginaryUnit(text.to_string()));
    };

    if coefficient.is_empty() {
        return Ok(sign);
    }

    Ok(sign * parse_real(coefficient)?)
}

/// Index of the real/imaginary separator, skipping exponent signs.
///
/// A sign right after `e`/`E` that is itself followed by `i` cannot be told
/// apart from a separator and is rejected.
fn find_separator(text: &str) -> Result<Option<usize>, ComplexParseError> {
    let bytes = text.as_bytes();
    let mut split = None;

    for k in 1..bytes.len() {
        if !matches!(bytes[k], b'+' | b'-') {
            continue;
        }
        if matches!(bytes[k - 1], b'e' | b'E') {
            if bytes.get(k + 1) == Some(&b'i') {
                return Err(ComplexParseError::Ambiguous(text.to_string()));
            }
            continue;
        }
        split = Some(k);
    }

    Ok(split)
}

fn is_decimal_literal(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut pos = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        pos += 1;
    }

    let int_digits = count_digits(&bytes[pos..]);
    pos += int_digits;

    let mut frac_digits = 0;
    if bytes.get(pos) == Some(&b'.') {
        pos += 1;
        frac_digits = count_digits(&bytes[pos..]);
        pos += frac_digits;
    }

    if int_digits + frac_digits == 0 {
        return false;
    }

    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        pos += 1;
        if matches!(bytes.get(pos), Some(b'+' | b'-')) {
            pos += 1;
        }
        let exp_digits = count_digits(&bytes[pos..]);
        if exp_digits == 0 {
            return false;
        }
        pos += exp_digits;
    }

    pos == bytes.len()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

// Underflow: a non-zero mantissa that still parsed to zero
fn mantissa_is_nonzero(text: &str) -> bool {
    text.bytes()
        .take_while(|b| !matches!(b, b'e' | b'E'))
        .any(|b| matches!(b, b'1'..=b'9'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_parses(text: &str, re: f64, im: f64) {
        let c = parse_complex(text).unwrap_or_else(|e| panic!("{text}: {e}"));
        assert!((c.re - re).abs() < 1e-12, "{text}: re {} != {}", c.re, re);
        assert!((c.im - im).abs() < 1e-12, "{text}: im {} != {}", c.im, im);
    }

    #[test]
    fn test_real_only() {
        assert_parses("3", 3.0, 0.0);
        assert_parses("-0.5", -0.5, 0.0);
        assert_parses("+2", 2.0, 0.0);
        assert_parses("1e-3", 0.001, 0.0);
        assert_parses(".25", 0.25, 0.0);
    }

    #[test]
    fn test_pure_imaginary() {
        assert_parses("i", 0.0, 1.0);
        assert_parses("-i", 0.0, -1.0);
        assert_parses("+i", 0.0, 1.0);
        assert_parses("i2.5", 0.0, 2.5);
        assert_parses("-i0.5", 0.0, -0.5);
        assert_parses("i1e-2", 0.0, 0.01);
    }

    #[test]
    fn test_real_plus_imaginary() {
        assert_parses("3+i2", 3.0, 2.0);
        assert_parses("-1.5-i0.25", -1.5, -0.25);
        assert_parses("0.5+i", 0.5, 1.0);
        assert_parses("0.5-i", 0.5, -1.0);
    }

    #[test]
    fn test_exponent_sign_is_not_separator() {
        assert_parses("1e-3+i2", 0.001, 2.0);
        assert_parses("2E+1-i1e-1", 20.0, -0.1);
        assert_parses("3+i2e-5", 3.0, 2e-5);
    }

    #[test]
    fn test_empty_is_error() {
        assert_eq!(parse_complex(""), Err(ComplexParseError::Empty));
    }

    #[test]
    fn test_double_unit_is_error() {
        assert!(matches!(
            parse_complex("ii"),
            Err(ComplexParseError::InvalidReal(_))
        ));
    }

    #[test]
    fn test_trailing_garbage_is_error() {
        assert!(parse_complex("3x").is_err());
        assert!(parse_complex("3 ").is_err());
        assert!(parse_complex("3+i2x").is_err());
        assert!(parse_complex("1e").is_err());
        assert!(parse_complex(".").is_err());
    }

    #[test]
    fn test_missing_unit_after_separator() {
        // 'i' present, but the tail after the last sign has none
        assert!(matches!(
            parse_complex("i2+3"),
            Err(ComplexParseError::InvalidReal(_))
        ));
        assert!(matches!(
            parse_imaginary("2"),
            Err(ComplexParseError::MissingImaginaryUnit(_))
        ));
    }

    #[test]
    fn test_out_of_range() {
        assert!(matches!(
            parse_complex("1e999"),
            Err(ComplexParseError::OutOfRange(_))
        ));
        assert!(matches!(
            parse_complex("1e-999"),
            Err(ComplexParseError::OutOfRange(_))
        ));
        assert_parses("0e-999", 0.0, 0.0);
    }

    #[test]
    fn test_special_values_rejected() {
        assert!(parse_complex("nan").is_err());
        assert!(parse_complex("inf").is_err());
        assert!(parse_complex("infinity").is_err());
    }

    #[test]
    fn test_ambiguous_exponent_sign() {
        assert_eq!(
            parse_complex("1e+i2"),
            Err(ComplexParseError::Ambiguous("1e+i2".to_string()))
        );
    }
}
