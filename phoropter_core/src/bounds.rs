//! Per-parameter bounds and the step rules applied by the dials.
//!
//! Every field except axis is clamped into `[min, max]`. Axis wraps
//! modulo 180: overflow past 180 re-enters from 0, underflow past 0
//! re-enters from 180.

use crate::{AxisStep, Direction, Parameter};

/// Whether a field clamps at its bounds or wraps around them
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Overflow {
    Clamp,
    Wrap,
}

/// Range, step size and display precision for one numeric field
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub decimals: i32,
    pub overflow: Overflow,
}

pub const SPHERE: Bounds = Bounds {
    min: -10.0,
    max: 10.0,
    step: 0.25,
    decimals: 2,
    overflow: Overflow::Clamp,
};

pub const CYLINDER: Bounds = SPHERE;

pub const ADD: Bounds = Bounds {
    min: 0.0,
    max: 10.0,
    step: 0.25,
    decimals: 2,
    overflow: Overflow::Clamp,
};

pub const PRISM: Bounds = Bounds {
    min: 0.0,
    max: 20.0,
    step: 0.1,
    decimals: 1,
    overflow: Overflow::Clamp,
};

/// Binocular PD, single layout
pub const PD_SINGLE: Bounds = Bounds {
    min: 50.0,
    max: 80.0,
    step: 0.5,
    decimals: 1,
    overflow: Overflow::Clamp,
};

/// Monocular half-PD, split layout
pub const PD_HALF: Bounds = Bounds {
    min: 20.0,
    max: 35.0,
    step: 0.5,
    decimals: 1,
    overflow: Overflow::Clamp,
};

/// Axis bounds for the configured step
pub fn axis(step: AxisStep) -> Bounds {
    Bounds {
        min: 0.0,
        max: 180.0,
        step: f64::from(step.degrees()),
        decimals: 0,
        overflow: Overflow::Wrap,
    }
}

/// Bounds table lookup
pub fn for_parameter(parameter: Parameter, axis_step: AxisStep) -> Bounds {
    match parameter {
        Parameter::Sphere => SPHERE,
        Parameter::Cylinder => CYLINDER,
        Parameter::Axis => axis(axis_step),
        Parameter::Add => ADD,
        Parameter::HorizontalPrism | Parameter::VerticalPrism => PRISM,
    }
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

impl Bounds {
    /// Apply one step in `direction`, then clamp or wrap into range
    pub fn step_value(&self, current: f64, direction: Direction) -> f64 {
        self.normalize(current + direction.sign() * self.step)
    }

    /// Round to the field's precision, then clamp or wrap into range
    ///
    /// Wrapping is modular, so any finite value lands in `[min, max]`.
    /// Non-finite input is clamped.
    pub fn normalize(&self, value: f64) -> f64 {
        let value = round_to(value, self.decimals);
        match self.overflow {
            Overflow::Wrap if value.is_finite() && !self.contains(value) => {
                let span = self.max - self.min;
                round_to(self.min + (value - self.min).rem_euclid(span), self.decimals)
            }
            _ => self.clamp(value),
        }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// True when a step in `direction` would leave the value unchanged
    pub fn is_at_limit(&self, current: f64, direction: Direction) -> bool {
        match self.overflow {
            Overflow::Wrap => false,
            Overflow::Clamp => self.step_value(current, direction) == current,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_clamps_at_max() {
        assert_eq!(SPHERE.step_value(10.0, Direction::Increase), 10.0);
        assert_eq!(SPHERE.step_value(9.75, Direction::Increase), 10.0);
        assert_eq!(SPHERE.step_value(-10.0, Direction::Decrease), -10.0);
    }

    #[test]
    fn test_add_floor_is_zero() {
        assert_eq!(ADD.step_value(0.0, Direction::Decrease), 0.0);
        assert_eq!(ADD.step_value(0.25, Direction::Decrease), 0.0);
    }

    #[test]
    fn test_axis_wraps_with_overflow() {
        let axis5 = axis(AxisStep::Five);
        assert_eq!(axis5.step_value(180.0, Direction::Increase), 5.0);
        assert_eq!(axis5.step_value(0.0, Direction::Decrease), 175.0);
        assert_eq!(axis5.step_value(175.0, Direction::Increase), 180.0);
        assert_eq!(axis5.step_value(5.0, Direction::Decrease), 0.0);

        let axis1 = axis(AxisStep::One);
        assert_eq!(axis1.step_value(180.0, Direction::Increase), 1.0);
        assert_eq!(axis1.step_value(0.0, Direction::Decrease), 179.0);
    }

    #[test]
    fn test_prism_steps_without_drift() {
        let mut value = 0.0;
        for _ in 0..30 {
            value = PRISM.step_value(value, Direction::Increase);
        }
        assert_eq!(value, 3.0);
    }

    #[test]
    fn test_is_at_limit() {
        assert!(SPHERE.is_at_limit(10.0, Direction::Increase));
        assert!(!SPHERE.is_at_limit(10.0, Direction::Decrease));
        assert!(PD_HALF.is_at_limit(20.0, Direction::Decrease));
        assert!(!axis(AxisStep::Five).is_at_limit(180.0, Direction::Increase));
    }

    #[test]
    fn test_bounds_table() {
        assert_eq!(for_parameter(Parameter::Sphere, AxisStep::Five), SPHERE);
        assert_eq!(for_parameter(Parameter::VerticalPrism, AxisStep::Five), PRISM);
        assert_eq!(for_parameter(Parameter::Axis, AxisStep::One).step, 1.0);
    }

    #[test]
    fn test_wrap_is_modular_for_large_steps() {
        let wide = Bounds {
            step: 400.0,
            ..axis(AxisStep::Five)
        };
        let up = wide.step_value(10.0, Direction::Increase);
        let down = wide.step_value(10.0, Direction::Decrease);
        assert_eq!(up, 50.0);
        assert_eq!(down, 150.0);
        assert!(wide.contains(up) && wide.contains(down));
    }

    #[test]
    fn test_normalize() {
        let axis5 = axis(AxisStep::Five);
        assert_eq!(axis5.normalize(540.0), 0.0);
        assert_eq!(axis5.normalize(-190.0), 170.0);
        assert_eq!(axis5.normalize(90.4), 90.0);
        assert_eq!(axis5.normalize(f64::INFINITY), 180.0);
        assert_eq!(SPHERE.normalize(-12.0), -10.0);
        assert_eq!(SPHERE.normalize(1.13), 1.13);
        assert_eq!(PRISM.normalize(f64::NAN), 0.0);
    }
}
