//! Property-based tests for the step rules.
//!
//! For any sequence of dial steps, clamped fields stay inside their range,
//! axis stays inside [0, 180], and every value stays on its step grid.

use phoropter_core::bounds;
use phoropter_core::{
    AxisStep, Direction, Eye, EyeSelector, ModelConfig, Parameter, PdLayout, PupillaryDistance,
    RefractionStateModel,
};
use proptest::prelude::*;

// ===== Arbitrary Strategies =====

fn arb_direction() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Increase), Just(Direction::Decrease)]
}

fn arb_selector() -> impl Strategy<Value = EyeSelector> {
    prop_oneof![
        Just(EyeSelector::Right),
        Just(EyeSelector::Left),
        Just(EyeSelector::Both)
    ]
}

fn arb_parameter() -> impl Strategy<Value = Parameter> {
    proptest::sample::select(Parameter::ALL.to_vec())
}

fn arb_layout() -> impl Strategy<Value = PdLayout> {
    prop_oneof![Just(PdLayout::Single), Just(PdLayout::Split)]
}

fn on_grid(value: f64, step: f64) -> bool {
    let steps = value / step;
    (steps - steps.round()).abs() < 1e-9
}

proptest! {
    #[test]
    fn refraction_values_stay_in_range(
        axis_step in prop_oneof![Just(AxisStep::One), Just(AxisStep::Five)],
        steps in prop::collection::vec((arb_selector(), arb_parameter(), arb_direction()), 0..300),
    ) {
        let config = ModelConfig { axis_step, ..ModelConfig::default() };
        let mut model = RefractionStateModel::new(config);

        for (selector, parameter, direction) in steps {
            model.adjust_parameter(selector, parameter, direction);

            for eye in Eye::ALL {
                for parameter in Parameter::ALL {
                    let range = model.bounds(parameter);
                    let value = model.refraction(eye).get(parameter);
                    prop_assert!(
                        range.contains(value),
                        "{:?} {:?} = {} outside [{}, {}]",
                        eye, parameter, value, range.min, range.max
                    );
                    prop_assert!(on_grid(value, range.step));
                }
            }
        }
    }

    #[test]
    fn pd_stays_in_range(
        layout in arb_layout(),
        steps in prop::collection::vec(arb_direction(), 0..200),
    ) {
        let config = ModelConfig { pd_layout: layout, ..ModelConfig::default() };
        let mut model = RefractionStateModel::new(config);

        for direction in steps {
            let total = model.adjust_pd(direction);
            match *model.pd() {
                PupillaryDistance::Single { total: single } => {
                    prop_assert!(bounds::PD_SINGLE.contains(single));
                    prop_assert_eq!(single, total);
                }
                PupillaryDistance::Split { right, left } => {
                    prop_assert!(bounds::PD_HALF.contains(right));
                    prop_assert!(bounds::PD_HALF.contains(left));
                    prop_assert_eq!(right + left, total);
                }
            }
        }
    }

    #[test]
    fn typed_values_land_in_range(
        axis_step in prop_oneof![Just(AxisStep::One), Just(AxisStep::Five)],
        sets in prop::collection::vec((arb_selector(), arb_parameter(), -1000.0f64..1000.0), 0..100),
    ) {
        let config = ModelConfig { axis_step, ..ModelConfig::default() };
        let mut model = RefractionStateModel::new(config);

        for (selector, parameter, value) in sets {
            let eyes = model.set_parameter(selector, parameter, value);
            let range = model.bounds(parameter);
            for eye in Eye::ALL {
                let value = eyes.eye(eye).get(parameter);
                prop_assert!(range.contains(value), "{:?} = {} out of range", parameter, value);
            }
        }
    }

    #[test]
    fn unchanged_state_never_logs(
        steps in prop::collection::vec((arb_selector(), arb_parameter(), arb_direction()), 0..100),
    ) {
        let mut model = RefractionStateModel::default();

        for (selector, parameter, direction) in steps {
            let before = model.state().clone();
            let logged = model.logs().len();
            model.adjust_parameter(selector, parameter, direction);

            let expected = if *model.state() == before { logged } else { logged + 1 };
            prop_assert_eq!(model.logs().len(), expected);
        }
    }
}
