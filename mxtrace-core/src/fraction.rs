//! Rational approximation of floating-point scalars for display
//!
//! Values are rendered as the shortest faithful text: an integer when the
//! value is within tolerance of one, otherwise the continued-fraction
//! convergent with the largest denominator not exceeding the configured
//! bound, otherwise a six-place decimal. The output is display text only
//! and never feeds back into arithmetic.

/// Default bound on rendered denominators
pub const DEFAULT_MAX_DENOMINATOR: u64 = 100;

/// Default closeness required to accept an integer or convergent
pub const DEFAULT_TOLERANCE: f64 = 1e-8;

const MAX_ITERATIONS: usize = 50;

/// Rendering parameters for [`FractionConfig::format`]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FractionConfig {
    /// Largest denominator a rendered fraction may have
    pub max_denominator: u64,
    /// Accept an approximation once it is closer than this
    pub tolerance: f64,
}

impl FractionConfig {
    pub fn with_max_denominator(mut self, max_denominator: u64) -> Self {
        self.max_denominator = max_denominator;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Render `x` as integer, `n/d`, or decimal text
    pub fn format(&self, x: f64) -> String {
        if x.is_nan() {
            return "NaN".to_string();
        }
        if x.is_infinite() {
            return if x > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
        }

        let negative = x < 0.0;
        let magnitude = x.abs();
        let nearest = magnitude.round();
        if (magnitude - nearest).abs() < self.tolerance {
            return signed_integer(negative, nearest);
        }

        match self.best_convergent(magnitude) {
            Some((num, den)) => render_ratio(negative, num, den),
            None => decimal_fallback(x),
        }
    }

    /// Continued-fraction search for `x >= 0`
    ///
    /// Returns the first convergent within tolerance, or the last one whose
    /// denominator stayed within bounds.
    fn best_convergent(&self, x: f64) -> Option<(u128, u128)> {
        let max_den = u128::from(self.max_denominator);
        let (mut h0, mut h1) = (0u128, 1u128);
        let (mut k0, mut k1) = (1u128, 0u128);
        let mut b = x;

        for _ in 0..MAX_ITERATIONS {
            let a = b.floor();
            let Some((h2, k2)) = next_convergent(a, (h0, h1), (k0, k1)) else {
                break;
            };
            if k2 > max_den {
                break;
            }
            if (h2 as f64 / k2 as f64 - x).abs() < self.tolerance {
                return Some((h2, k2));
            }

            (h0, h1) = (h1, h2);
            (k0, k1) = (k1, k2);

            let frac = b - a;
            if frac == 0.0 {
                break;
            }
            b = 1.0 / frac;
        }

        (k1 != 0).then_some((h1, k1))
    }
}

impl Default for FractionConfig {
    fn default() -> Self {
        Self {
            max_denominator: DEFAULT_MAX_DENOMINATOR,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

/// Render `x` with the default configuration
pub fn to_fraction(x: f64) -> String {
    FractionConfig::default().format(x)
}

/// Greatest common divisor; `gcd(0, 0)` is 1 so it is always a safe divisor
pub fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a.max(1)
}

// Overflow means the denominator has left any representable bound.
fn next_convergent(a: f64, h: (u128, u128), k: (u128, u128)) -> Option<(u128, u128)> {
    if !(0.0..u64::MAX as f64).contains(&a) {
        return None;
    }
    let a = a as u128;
    let h2 = a.checked_mul(h.1)?.checked_add(h.0)?;
    let k2 = a.checked_mul(k.1)?.checked_add(k.0)?;
    Some((h2, k2))
}

fn render_ratio(negative: bool, num: u128, den: u128) -> String {
    let g = gcd(num, den);
    let (num, den) = (num / g, den / g);
    let sign = if negative && num != 0 { "-" } else { "" };
    if den == 1 {
        format!("{sign}{num}")
    } else {
        format!("{sign}{num}/{den}")
    }
}

fn signed_integer(negative: bool, magnitude: f64) -> String {
    let sign = if negative && magnitude != 0.0 { "-" } else { "" };
    format!("{sign}{magnitude:.0}")
}

fn decimal_fallback(x: f64) -> String {
    let fixed = format!("{x:.6}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers() {
        assert_eq!(to_fraction(2.0), "2");
        assert_eq!(to_fraction(-7.0), "-7");
        assert_eq!(to_fraction(0.0), "0");
        assert_eq!(to_fraction(-0.0), "0");
        assert_eq!(to_fraction(3.000000001), "3");
        assert_eq!(to_fraction(-1e-9), "0");
    }

    #[test]
    fn test_exact_fractions() {
        assert_eq!(to_fraction(0.75), "3/4");
        assert_eq!(to_fraction(-0.5), "-1/2");
        assert_eq!(to_fraction(0.1), "1/10");
        assert_eq!(to_fraction(1.0 / 3.0), "1/3");
        assert_eq!(to_fraction(-7.0 / 3.0), "-7/3");
        assert_eq!(to_fraction(49.0 / 100.0), "49/100");
    }

    #[test]
    fn test_bounded_denominator() {
        // 333/106 exceeds the bound, so the previous convergent is used
        assert_eq!(to_fraction(core::f64::consts::PI), "22/7");
        assert_eq!(to_fraction(core::f64::consts::SQRT_2), "99/70");
        assert_eq!(to_fraction(1.0 / 101.0), "0");
        let wide = FractionConfig::default().with_max_denominator(1000);
        assert_eq!(wide.format(core::f64::consts::PI), "355/113");
    }

    #[test]
    fn test_decimal_fallback() {
        let none = FractionConfig::default().with_max_denominator(0);
        assert_eq!(none.format(0.5), "0.5");
        assert_eq!(none.format(-1.25), "-1.25");
        assert_eq!(none.format(2.0), "2");
        assert_eq!(none.format(1.0 / 3.0), "0.333333");
    }

    #[test]
    fn test_non_finite() {
        assert_eq!(to_fraction(f64::INFINITY), "Infinity");
        assert_eq!(to_fraction(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(to_fraction(f64::NAN), "NaN");
    }

    #[test]
    fn test_large_magnitudes() {
        assert_eq!(to_fraction(1e20), "100000000000000000000");
        assert_eq!(to_fraction(1_000_000_000.5), "2000000001/2");
    }

    #[test]
    fn test_gcd() {
        assert_eq!(gcd(12, 18), 6);
        assert_eq!(gcd(7, 0), 7);
        assert_eq!(gcd(0, 0), 1);
    }
}
