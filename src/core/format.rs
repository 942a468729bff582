/// Formats `value` with a fixed number of decimals.
#[must_use]
pub fn format_fixed(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}")
}

/// Axis label text: integral values print without decimals, everything else
/// with two.
#[must_use]
pub fn format_tick(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format_fixed(value, 2)
    }
}

#[cfg(test)]
mod tests {
    use super::{format_fixed, format_tick};

    #[test]
    fn tick_labels_drop_zero_fraction() {
        assert_eq!(format_tick(4.0), "4");
        assert_eq!(format_tick(-12.0), "-12");
        assert_eq!(format_tick(2.345), "2.35");
        assert_eq!(format_fixed(1.0 / 3.0, 3), "0.333");
    }
}
