//! Magnitude abbreviation: `1500000` -> `"1.5M"`.

/// Suffix table, largest threshold first. Order matters: the first matching
/// threshold wins, so a trillion must not render as a thousand billions.
const MAGNITUDES: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "k")];

/// Abbreviate a magnitude into a compact display string.
///
/// Values at or above a threshold are divided by it, rendered with `digits`
/// fractional places, stripped of trailing fractional zeroes, and suffixed
/// (`abbreviate(1_500_000.0, 1)` is `"1.5M"`, `abbreviate(2_000_000.0, 2)`
/// is `"2M"`). Values below 1000 render plainly (`"999"`), as do negative
/// and non-finite values, which never reach a threshold.
pub fn abbreviate(value: f64, digits: usize) -> String {
    if value.is_finite() {
        for (threshold, suffix) in MAGNITUDES {
            if value >= threshold {
                let scaled = format!("{:.*}", digits, value / threshold);
                return format!("{}{}", strip_fractional_zeroes(&scaled), suffix);
            }
        }
    }
    value.to_string()
}

/// Drop a trailing run of zeroes after the decimal point, and the point
/// itself if nothing remains after it. Integral zeroes are never touched
/// ("100" stays "100").
fn strip_fractional_zeroes(rendered: &str) -> &str {
    if rendered.contains('.') {
        rendered.trim_end_matches('0').trim_end_matches('.')
    } else {
        rendered
    }
}
