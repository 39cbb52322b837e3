//! The refraction-state model.
//!
//! Owns the measurement state for one session and applies every permitted
//! transition under the bounds table. Transitions never fail: out-of-range
//! requests, stepped or typed in, are clamped (or wrapped, for axis).
//!
//! ## Logging policy
//!
//! A transition appends exactly one log entry when the observable state
//! (refraction values, PD, occlusion, test mode, chart) differs afterwards,
//! and nothing otherwise. Selection changes are never logged.

use crate::bounds::{self, Bounds};
use crate::config::ModelConfig;
use crate::log::{snapshot_log_entry, LogEntry, SessionLog};
use crate::{
    Direction, Eye, EyePair, EyeSelector, OcclusionState, Parameter, PdLayout,
    PupillaryDistance, RefractionState, RefractionValue, SelectedField, Selection, TestMode,
};
use chrono::Utc;

/// Session state plus its append-only log
#[derive(Clone, Debug)]
pub struct RefractionStateModel {
    config: ModelConfig,
    state: RefractionState,
    selection: Selection,
    log: SessionLog,
}

impl Default for RefractionStateModel {
    fn default() -> Self {
        Self::new(ModelConfig::default())
    }
}

impl RefractionStateModel {
    /// Start a session with the configured defaults
    pub fn new(config: ModelConfig) -> Self {
        let state = RefractionState::initial(config.pd_layout, config.initial_chart.clone());
        tracing::debug!(
            "New refraction session (axis step {}, PD layout {:?})",
            config.axis_step.degrees(),
            config.pd_layout
        );
        Self {
            config,
            state,
            selection: Selection::default(),
            log: SessionLog::new(),
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn state(&self) -> &RefractionState {
        &self.state
    }

    pub fn eyes(&self) -> &EyePair {
        &self.state.eyes
    }

    pub fn refraction(&self, eye: Eye) -> &RefractionValue {
        self.state.eyes.eye(eye)
    }

    pub fn pd(&self) -> &PupillaryDistance {
        &self.state.pd
    }

    /// Reported binocular PD
    pub fn pd_total(&self) -> f64 {
        self.state.pd.total()
    }

    pub fn pd_layout(&self) -> PdLayout {
        self.state.pd.layout()
    }

    pub fn occlusion(&self) -> &OcclusionState {
        &self.state.occlusion
    }

    pub fn test_mode(&self) -> TestMode {
        self.state.test_mode
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn chart_id(&self) -> &str {
        &self.state.chart_id
    }

    pub fn logs(&self) -> &[LogEntry] {
        self.log.entries()
    }

    pub fn bounds(&self, parameter: Parameter) -> Bounds {
        bounds::for_parameter(parameter, self.config.axis_step)
    }

    // ------------------------------------------------------------------------
    // Read-time policy
    // ------------------------------------------------------------------------

    /// Whether the presentation layer should refuse input for `eye`
    ///
    /// True when the eye is occluded or the test mode excludes it.
    pub fn is_interaction_disabled(&self, eye: Eye) -> bool {
        self.state.occlusion.is_occluded(eye) || self.state.test_mode.excludes(eye)
    }

    /// Whether a step would leave the value where it is
    pub fn is_at_limit(&self, eye: Eye, parameter: Parameter, direction: Direction) -> bool {
        self.bounds(parameter)
            .is_at_limit(self.refraction(eye).get(parameter), direction)
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    /// Step `parameter` for every selected eye that is not occluded
    ///
    /// Returns the refraction values of both eyes after the transition.
    pub fn adjust_parameter(
        &mut self,
        eye_selector: EyeSelector,
        parameter: Parameter,
        direction: Direction,
    ) -> EyePair {
        let bounds = self.bounds(parameter);

        self.transition("adjust_parameter", |state| {
            for eye in Eye::ALL {
                if !eye_selector.includes(eye) || state.occlusion.is_occluded(eye) {
                    continue;
                }
                let value = state.eyes.eye_mut(eye);
                let next = bounds.step_value(value.get(parameter), direction);
                value.set(parameter, next);
            }
        });

        self.state.eyes
    }

    /// Step the pupillary distance by 0.5 mm; returns the reported total
    pub fn adjust_pd(&mut self, direction: Direction) -> f64 {
        self.transition("adjust_pd", |state| {
            state.pd = match state.pd {
                PupillaryDistance::Single { total } => PupillaryDistance::Single {
                    total: bounds::PD_SINGLE.step_value(total, direction),
                },
                PupillaryDistance::Split { right, left } => PupillaryDistance::Split {
                    right: bounds::PD_HALF.step_value(right, direction),
                    left: bounds::PD_HALF.step_value(left, direction),
                },
            };
        });

        self.pd_total()
    }

    /// Set `parameter` directly for every selected eye that is not occluded
    ///
    /// The value is rounded, then clamped or wrapped through the bounds
    /// table. Returns the refraction values of both eyes afterwards.
    pub fn set_parameter(
        &mut self,
        eye_selector: EyeSelector,
        parameter: Parameter,
        value: f64,
    ) -> EyePair {
        let next = self.bounds(parameter).normalize(value);

        self.transition("set_parameter", |state| {
            for eye in Eye::ALL {
                if eye_selector.includes(eye) && !state.occlusion.is_occluded(eye) {
                    state.eyes.eye_mut(eye).set(parameter, next);
                }
            }
        });

        self.state.eyes
    }

    /// Set the pupillary distance directly; returns the reported total
    ///
    /// The value is clamped per layout and kept in the session's layout: a
    /// single total is split across both eyes, a split pair is summed.
    pub fn set_pd(&mut self, pd: PupillaryDistance) -> f64 {
        self.transition("set_pd", |state| {
            state.pd = pd_in_layout(pd, state.pd.layout());
        });

        self.pd_total()
    }

    /// Apply a bare increase/decrease to the current selection
    pub fn adjust_selected(&mut self, direction: Direction) {
        let Selection { field, eye } = self.selection;
        match field {
            SelectedField::Refraction(parameter) => {
                self.adjust_parameter(eye, parameter, direction);
            }
            SelectedField::PupillaryDistance => {
                self.adjust_pd(direction);
            }
        }
    }

    /// Flip the occluder for one eye
    pub fn toggle_occlusion(&mut self, eye: Eye) -> OcclusionState {
        self.transition("toggle_occlusion", |state| state.occlusion.toggle(eye));
        self.state.occlusion
    }

    /// Put the occluder in front of `eye`, or take it away
    pub fn set_occlusion(&mut self, eye: Eye, occluded: bool) -> OcclusionState {
        self.transition("set_occlusion", |state| state.occlusion.set(eye, occluded));
        self.state.occlusion
    }

    pub fn set_test_mode(&mut self, mode: TestMode) {
        self.transition("set_test_mode", |state| state.test_mode = mode);
    }

    /// Change the chart on the display
    pub fn select_chart(&mut self, chart_id: impl Into<String>) {
        let chart_id = chart_id.into();
        self.transition("select_chart", |state| state.chart_id = chart_id);
    }

    /// Point the dial at a field and eye; not logged
    pub fn set_selection(&mut self, field: impl Into<SelectedField>, eye: EyeSelector) {
        self.selection = Selection {
            field: field.into(),
            eye,
        };
        tracing::trace!("Selection set to {:?}", self.selection);
    }

    /// Point the dial at a field for both eyes; not logged
    pub fn select_field(&mut self, field: impl Into<SelectedField>) {
        self.set_selection(field, EyeSelector::Both);
    }

    /// Restore the configured starting state; the log is kept
    pub fn reset(&mut self) {
        let initial =
            RefractionState::initial(self.config.pd_layout, self.config.initial_chart.clone());
        self.selection = Selection::default();
        self.transition("reset", |state| *state = initial);
    }

    pub fn clear_logs(&mut self) {
        self.log.clear();
    }

    /// Run a mutation and log the resulting snapshot if anything changed
    fn transition<F>(&mut self, name: &str, mutate: F) -> bool
    where
        F: FnOnce(&mut RefractionState),
    {
        let before = self.state.clone();
        mutate(&mut self.state);

        if self.state == before {
            tracing::trace!("{} left state unchanged, not logged", name);
            return false;
        }

        let entry = snapshot_log_entry(&self.state, &self.state.chart_id, Utc::now());
        self.log.append(entry);
        tracing::debug!("{} applied, log has {} entries", name, self.log.len());
        true
    }
}

/// Clamp `pd` and express it in `layout`
fn pd_in_layout(pd: PupillaryDistance, layout: PdLayout) -> PupillaryDistance {
    match (pd, layout) {
        (PupillaryDistance::Single { total }, PdLayout::Single) => PupillaryDistance::Single {
            total: bounds::PD_SINGLE.normalize(total),
        },
        (PupillaryDistance::Split { right, left }, PdLayout::Single) => {
            PupillaryDistance::Single {
                total: bounds::PD_SINGLE.normalize(right + left),
            }
        }
        (PupillaryDistance::Split { right, left }, PdLayout::Split) => PupillaryDistance::Split {
            right: bounds::PD_HALF.normalize(right),
            left: bounds::PD_HALF.normalize(left),
        },
        (PupillaryDistance::Single { total }, PdLayout::Split) => {
            let total = bounds::PD_SINGLE.normalize(total);
            // right half on the 0.5 mm grid, left takes the remainder
            let right = total.round() / 2.0;
            PupillaryDistance::Split {
                right: bounds::PD_HALF.normalize(right),
                left: bounds::PD_HALF.normalize(total - right),
            }
        }
    }
}
