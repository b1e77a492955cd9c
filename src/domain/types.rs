use std::fmt;

/// Text scraped from one page and run through the normalizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDocument {
    pub url: String,
    pub text: String,
    pub raw_chars: usize,
}

/// Class index as produced by the trained model: 0 is malicious, 1 is safe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Malicious,
    Safe,
}

impl Verdict {
    pub fn index(self) -> u8 {
        match self {
            Verdict::Malicious => 0,
            Verdict::Safe => 1,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationResult {
    pub verdict: Verdict,
    /// Probability of class index 1.
    pub probability: f64,
}

/// Formats a float the way Python's `str(float)` does: shortest round-trip
/// digits, `.0` on integral values, and exponent notation (`5e-05`, `1e+16`)
/// below `1e-4` and from `1e16` up.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let magnitude = value.abs();
    if value != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let formatted = format!("{value:e}");
        let (mantissa, exponent) = formatted.split_once('e').unwrap_or((&formatted, "0"));
        let (sign, digits) = match exponent.strip_prefix('-') {
            Some(digits) => ('-', digits),
            None => ('+', exponent),
        };
        return format!("{mantissa}e{sign}{digits:0>2}");
    }

    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_maps_class_indices() {
        assert_eq!(Verdict::Malicious.index(), 0);
        assert_eq!(Verdict::Safe.index(), 1);
        assert_eq!(Verdict::Safe.to_string(), "1");
    }

    #[test]
    fn floats_render_like_python_repr() {
        assert_eq!(format_float(0.87), "0.87");
        assert_eq!(format_float(1.0), "1.0");
        assert_eq!(format_float(0.0), "0.0");
        assert_eq!(format_float(87.123), "87.123");
    }

    #[test]
    fn tiny_and_huge_floats_use_python_exponent_form() {
        assert_eq!(format_float(5e-05), "5e-05");
        assert_eq!(format_float(1.5e-05), "1.5e-05");
        assert_eq!(format_float(2.3e-120), "2.3e-120");
        assert_eq!(format_float(1e16), "1e+16");
        assert_eq!(format_float(-5e-05), "-5e-05");
        assert_eq!(format_float(0.0001), "0.0001");
        assert_eq!(format_float(0.00012), "0.00012");
        assert_eq!(format_float(1e15), "1000000000000000.0");
    }
}
