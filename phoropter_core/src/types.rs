//! Core domain types for the phoropter refraction model.
//!
//! This module defines:
//! - Eyes, eye selectors and test modes
//! - Refraction parameters and per-eye refraction values
//! - Pupillary distance layouts
//! - Occlusion state and the active selection

use serde::{Deserialize, Serialize};

// ============================================================================
// Eyes and Modes
// ============================================================================

/// A single eye
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Eye {
    Right,
    Left,
}

impl Eye {
    pub const ALL: [Eye; 2] = [Eye::Right, Eye::Left];
}

/// Which eye(s) an adjustment targets
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum EyeSelector {
    Right,
    Left,
    #[default]
    Both,
}

impl EyeSelector {
    /// Whether this selector includes the given eye
    pub fn includes(self, eye: Eye) -> bool {
        matches!(
            (self, eye),
            (EyeSelector::Both, _)
                | (EyeSelector::Right, Eye::Right)
                | (EyeSelector::Left, Eye::Left)
        )
    }
}

impl From<Eye> for EyeSelector {
    fn from(eye: Eye) -> Self {
        match eye {
            Eye::Right => EyeSelector::Right,
            Eye::Left => EyeSelector::Left,
        }
    }
}

/// Which eye(s) the current test accepts input for
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TestMode {
    LeftOnly,
    RightOnly,
    #[default]
    Binocular,
}

impl TestMode {
    /// Whether this mode excludes the given eye from input
    pub fn excludes(self, eye: Eye) -> bool {
        matches!(
            (self, eye),
            (TestMode::RightOnly, Eye::Left) | (TestMode::LeftOnly, Eye::Right)
        )
    }
}

/// Direction of a dial step
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Increase,
    Decrease,
}

impl Direction {
    /// +1.0 for increase, -1.0 for decrease
    pub fn sign(self) -> f64 {
        match self {
            Direction::Increase => 1.0,
            Direction::Decrease => -1.0,
        }
    }
}

/// Degrees per axis click; written as `1` or `5` in config files
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(try_from = "u32", into = "u32")]
pub enum AxisStep {
    One,
    #[default]
    Five,
}

impl AxisStep {
    pub fn degrees(self) -> u32 {
        match self {
            AxisStep::One => 1,
            AxisStep::Five => 5,
        }
    }
}

impl TryFrom<u32> for AxisStep {
    type Error = String;

    fn try_from(degrees: u32) -> Result<Self, Self::Error> {
        match degrees {
            1 => Ok(AxisStep::One),
            5 => Ok(AxisStep::Five),
            other => Err(format!("axis step must be 1 or 5, got {}", other)),
        }
    }
}

impl From<AxisStep> for u32 {
    fn from(step: AxisStep) -> Self {
        step.degrees()
    }
}

// ============================================================================
// Refraction Values
// ============================================================================

/// A refraction parameter that can be stepped for one eye
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    Sphere,
    Cylinder,
    Axis,
    Add,
    HorizontalPrism,
    VerticalPrism,
}

impl Parameter {
    pub const ALL: [Parameter; 6] = [
        Parameter::Sphere,
        Parameter::Cylinder,
        Parameter::Axis,
        Parameter::Add,
        Parameter::HorizontalPrism,
        Parameter::VerticalPrism,
    ];
}

/// Refraction values for one eye
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct RefractionValue {
    pub sphere: f64,
    pub cylinder: f64,
    pub axis: f64,
    pub add: f64,
    pub horizontal_prism: f64,
    pub vertical_prism: f64,
}

impl Default for RefractionValue {
    fn default() -> Self {
        Self {
            sphere: 0.0,
            cylinder: 0.0,
            axis: 180.0,
            add: 0.0,
            horizontal_prism: 0.0,
            vertical_prism: 0.0,
        }
    }
}

impl RefractionValue {
    pub fn get(&self, parameter: Parameter) -> f64 {
        match parameter {
            Parameter::Sphere => self.sphere,
            Parameter::Cylinder => self.cylinder,
            Parameter::Axis => self.axis,
            Parameter::Add => self.add,
            Parameter::HorizontalPrism => self.horizontal_prism,
            Parameter::VerticalPrism => self.vertical_prism,
        }
    }

    pub fn set(&mut self, parameter: Parameter, value: f64) {
        let slot = match parameter {
            Parameter::Sphere => &mut self.sphere,
            Parameter::Cylinder => &mut self.cylinder,
            Parameter::Axis => &mut self.axis,
            Parameter::Add => &mut self.add,
            Parameter::HorizontalPrism => &mut self.horizontal_prism,
            Parameter::VerticalPrism => &mut self.vertical_prism,
        };
        *slot = value;
    }
}

/// Refraction values for both eyes
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct EyePair {
    pub right: RefractionValue,
    pub left: RefractionValue,
}

impl EyePair {
    pub fn eye(&self, eye: Eye) -> &RefractionValue {
        match eye {
            Eye::Right => &self.right,
            Eye::Left => &self.left,
        }
    }

    pub fn eye_mut(&mut self, eye: Eye) -> &mut RefractionValue {
        match eye {
            Eye::Right => &mut self.right,
            Eye::Left => &mut self.left,
        }
    }
}

// ============================================================================
// Pupillary Distance
// ============================================================================

/// Which pupillary distance representation the model uses
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PdLayout {
    /// One binocular measurement
    Single,
    /// Monocular half-distances, summed for reporting
    #[default]
    Split,
}

/// Pupillary distance in millimetres
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum PupillaryDistance {
    Single { total: f64 },
    Split { right: f64, left: f64 },
}

impl PupillaryDistance {
    /// Default measurement for a layout (64.0 mm total either way)
    pub fn default_for(layout: PdLayout) -> Self {
        match layout {
            PdLayout::Single => PupillaryDistance::Single { total: 64.0 },
            PdLayout::Split => PupillaryDistance::Split {
                right: 32.0,
                left: 32.0,
            },
        }
    }

    pub fn layout(&self) -> PdLayout {
        match self {
            PupillaryDistance::Single { .. } => PdLayout::Single,
            PupillaryDistance::Split { .. } => PdLayout::Split,
        }
    }

    /// Reported binocular PD
    pub fn total(&self) -> f64 {
        match *self {
            PupillaryDistance::Single { total } => total,
            PupillaryDistance::Split { right, left } => right + left,
        }
    }
}

// ============================================================================
// Occlusion and Selection
// ============================================================================

/// Occluder position per eye (`true` = covered)
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct OcclusionState {
    pub right: bool,
    pub left: bool,
}

impl OcclusionState {
    pub fn is_occluded(&self, eye: Eye) -> bool {
        match eye {
            Eye::Right => self.right,
            Eye::Left => self.left,
        }
    }

    pub fn toggle(&mut self, eye: Eye) {
        self.set(eye, !self.is_occluded(eye));
    }

    pub fn set(&mut self, eye: Eye, occluded: bool) {
        match eye {
            Eye::Right => self.right = occluded,
            Eye::Left => self.left = occluded,
        }
    }

    /// Human-readable occluder description used in the session log
    pub fn describe(&self) -> &'static str {
        match (self.right, self.left) {
            (false, false) => "None",
            (true, false) => "Right",
            (false, true) => "Left",
            (true, true) => "Both",
        }
    }
}

/// Field targeted by bare increase/decrease requests
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "parameter", rename_all = "snake_case")]
pub enum SelectedField {
    Refraction(Parameter),
    PupillaryDistance,
}

impl From<Parameter> for SelectedField {
    fn from(parameter: Parameter) -> Self {
        SelectedField::Refraction(parameter)
    }
}

/// The dial's current target
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Selection {
    pub field: SelectedField,
    pub eye: EyeSelector,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            field: SelectedField::Refraction(Parameter::Sphere),
            eye: EyeSelector::Both,
        }
    }
}

// ============================================================================
// Session State
// ============================================================================

/// Observable measurement state; any change to it produces a log entry
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RefractionState {
    pub eyes: EyePair,
    pub pd: PupillaryDistance,
    pub occlusion: OcclusionState,
    pub test_mode: TestMode,
    pub chart_id: String,
}

impl RefractionState {
    /// Fresh session state for the given PD layout and starting chart
    pub fn initial(pd_layout: PdLayout, chart_id: impl Into<String>) -> Self {
        Self {
            eyes: EyePair::default(),
            pd: PupillaryDistance::default_for(pd_layout),
            occlusion: OcclusionState::default(),
            test_mode: TestMode::default(),
            chart_id: chart_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eye_selector_includes() {
        assert!(EyeSelector::Both.includes(Eye::Right));
        assert!(EyeSelector::Both.includes(Eye::Left));
        assert!(EyeSelector::Right.includes(Eye::Right));
        assert!(!EyeSelector::Right.includes(Eye::Left));
        assert!(!EyeSelector::Left.includes(Eye::Right));
    }

    #[test]
    fn test_mode_exclusions() {
        assert!(TestMode::RightOnly.excludes(Eye::Left));
        assert!(!TestMode::RightOnly.excludes(Eye::Right));
        assert!(TestMode::LeftOnly.excludes(Eye::Right));
        assert!(!TestMode::Binocular.excludes(Eye::Right));
        assert!(!TestMode::Binocular.excludes(Eye::Left));
    }

    #[test]
    fn test_refraction_value_get_set() {
        let mut value = RefractionValue::default();
        for (i, parameter) in Parameter::ALL.iter().enumerate() {
            value.set(*parameter, i as f64);
        }
        for (i, parameter) in Parameter::ALL.iter().enumerate() {
            assert_eq!(value.get(*parameter), i as f64);
        }
    }

    #[test]
    fn test_pd_defaults_total_64() {
        assert_eq!(PupillaryDistance::default_for(PdLayout::Single).total(), 64.0);
        assert_eq!(PupillaryDistance::default_for(PdLayout::Split).total(), 64.0);
    }

    #[test]
    fn test_occlusion_describe() {
        let mut occlusion = OcclusionState::default();
        assert_eq!(occlusion.describe(), "None");
        occlusion.toggle(Eye::Right);
        assert_eq!(occlusion.describe(), "Right");
        occlusion.toggle(Eye::Left);
        assert_eq!(occlusion.describe(), "Both");
        occlusion.toggle(Eye::Right);
        assert_eq!(occlusion.describe(), "Left");
    }

    #[test]
    fn test_axis_step_is_closed() {
        assert_eq!(AxisStep::try_from(1), Ok(AxisStep::One));
        assert_eq!(AxisStep::try_from(5), Ok(AxisStep::Five));
        assert!(AxisStep::try_from(0).is_err());
        assert!(AxisStep::try_from(200).is_err());
        assert_eq!(u32::from(AxisStep::Five), 5);
        assert_eq!(serde_json::to_string(&AxisStep::One).unwrap(), "1");
        assert!(serde_json::from_str::<AxisStep>("400").is_err());
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_string(&TestMode::RightOnly).unwrap();
        assert_eq!(json, "\"right-only\"");

        let json = serde_json::to_string(&PupillaryDistance::Split {
            right: 32.0,
            left: 31.5,
        })
        .unwrap();
        assert!(json.contains("\"layout\":\"split\""));
    }
}
