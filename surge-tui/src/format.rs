//! Cell formatting helpers. Unavailable values render as a dash
//! placeholder so missing data never reads as zero.

/// Placeholder for unavailable values.
pub const UNAVAILABLE: &str = "—";

/// Fixed-decimal number, or the placeholder.
pub fn num(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.*}", decimals, v),
        _ => UNAVAILABLE.to_string(),
    }
}

/// Decimal fraction as a percentage, or the placeholder.
pub fn pct(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.2}%", v * 100.0),
        _ => UNAVAILABLE.to_string(),
    }
}

/// Market cap humanized to T/B/M suffixes.
pub fn mcap(value: Option<f64>) -> String {
    let v = match value {
        Some(v) if v.is_finite() => v,
        _ => return UNAVAILABLE.to_string(),
    };
    let magnitude = v.abs();
    if magnitude >= 1e12 {
        format!("{:.2}T", v / 1e12)
    } else if magnitude >= 1e9 {
        format!("{:.2}B", v / 1e9)
    } else if magnitude >= 1e6 {
        format!("{:.2}M", v / 1e6)
    } else {
        format!("{:.0}", v)
    }
}

/// Whole-number count, or the placeholder.
pub fn count(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.0}", v),
        _ => UNAVAILABLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num() {
        assert_eq!(num(Some(3.14159), 2), "3.14");
        assert_eq!(num(Some(3.14159), 1), "3.1");
        assert_eq!(num(None, 2), UNAVAILABLE);
        assert_eq!(num(Some(f64::NAN), 2), UNAVAILABLE);
    }

    #[test]
    fn test_pct() {
        assert_eq!(pct(Some(0.0234)), "2.34%");
        assert_eq!(pct(Some(-0.015)), "-1.50%");
        assert_eq!(pct(None), UNAVAILABLE);
    }

    #[test]
    fn test_mcap_humanized() {
        assert_eq!(mcap(Some(2.45e12)), "2.45T");
        assert_eq!(mcap(Some(8.1e9)), "8.10B");
        assert_eq!(mcap(Some(5.5e6)), "5.50M");
        assert_eq!(mcap(Some(950_000.0)), "950000");
        assert_eq!(mcap(None), UNAVAILABLE);
    }

    #[test]
    fn test_count() {
        assert_eq!(count(Some(12.0)), "12");
        assert_eq!(count(None), UNAVAILABLE);
    }
}
