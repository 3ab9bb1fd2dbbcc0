//! Canonical rendering of amplitudes
//!
//! Output always re-parses with [`crate::complex::parse_complex`]:
//!
//! | value        | rendered      |
//! |--------------|---------------|
//! | `0`          | `0`           |
//! | `3`          | `3`           |
//! | `i`, `-i`    | `i`, `-i`     |
//! | `2.5i`       | `i2.5`        |
//! | `3 + 2i`     | `3+i2`        |
//! | `-1.5 - i/4` | `-1.5-i0.25`  |

use crate::complex::Complex;
use std::fmt;

/// Significant digits used when nothing else is configured
pub const DEFAULT_PRECISION: usize = 10;

/// Formats `value` like C's `%.{precision}g`.
pub fn format_real(value: f64, precision: usize) -> String {
    let precision = precision.max(1);

    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    let scientific = format!("{:.*e}", precision - 1, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= precision as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exponent.abs())
    } else {
        let decimals = (precision as i32 - 1 - exponent) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

/// Display adapter for one amplitude.
///
/// Non-finite parts print as `inf`/`NaN`, which do not re-parse; check
/// [`crate::StateVector::is_finite`] before printing a final state.
#[derive(Debug, Clone, Copy)]
pub struct Canonical {
    value: Complex,
    precision: usize,
}

impl Canonical {
    pub fn new(value: Complex, precision: usize) -> Self {
        Self { value, precision }
    }
}

impl fmt::Display for Canonical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Complex { re, im } = self.value;

        if im == 0.0 {
            return f.write_str(&format_real(re, self.precision));
        }

        if re != 0.0 {
            f.write_str(&format_real(re, self.precision))?;
            f.write_str(if im < 0.0 { "-" } else { "+" })?;
        } else if im < 0.0 {
            f.write_str("-")?;
        }

        f.write_str("i")?;
        if im.abs() != 1.0 {
            f.write_str(&format_real(im.abs(), self.precision))?;
        }
        Ok(())
    }
}

/// Renders `[a0, a1, ...]`
pub fn format_state(amplitudes: &[Complex], precision: usize) -> String {
    let parts: Vec<String> = amplitudes
        .iter()
        .map(|a| Canonical::new(*a, precision).to_string())
        .collect();
    format!("[{}]", parts.join(", "))
}
