//! Display formatting for refraction values.

use crate::Parameter;

/// Lens power with explicit sign and two decimals (`+0.00`, `-2.50`)
pub fn format_lens(value: f64) -> String {
    let sign = if value >= 0.0 { '+' } else { '-' };
    format!("{}{:.2}", sign, value.abs())
}

/// Axis as a bare rounded integer (`90`)
pub fn format_axis(value: f64) -> String {
    format!("{}", value.round() as i64)
}

/// Pupillary distance to one decimal (`64.0`)
pub fn format_pd(value: f64) -> String {
    format!("{:.1}", value)
}

/// Prism power to one decimal (`1.5`)
pub fn format_prism(value: f64) -> String {
    format!("{:.1}", value)
}

/// Format a value the way the refraction table shows it
pub fn format_value(parameter: Parameter, value: f64) -> String {
    match parameter {
        Parameter::Sphere | Parameter::Cylinder | Parameter::Add => format_lens(value),
        Parameter::Axis => format_axis(value),
        Parameter::HorizontalPrism | Parameter::VerticalPrism => format_prism(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_lens_signs() {
        assert_eq!(format_lens(0.0), "+0.00");
        assert_eq!(format_lens(-0.0), "+0.00");
        assert_eq!(format_lens(-2.5), "-2.50");
        assert_eq!(format_lens(1.25), "+1.25");
        assert_eq!(format_lens(10.0), "+10.00");
    }

    #[test]
    fn test_format_axis() {
        assert_eq!(format_axis(90.0), "90");
        assert_eq!(format_axis(180.0), "180");
        assert_eq!(format_axis(0.0), "0");
    }

    #[test]
    fn test_format_value_dispatch() {
        assert_eq!(format_value(Parameter::Add, 0.75), "+0.75");
        assert_eq!(format_value(Parameter::Axis, 45.0), "45");
        assert_eq!(format_value(Parameter::HorizontalPrism, 2.0), "2.0");
        assert_eq!(format_pd(64.0), "64.0");
        assert_eq!(format_pd(63.5), "63.5");
    }
}
