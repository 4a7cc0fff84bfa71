use crate::angle::Rotation;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use strum::Display as StrumDisplay;

use super::series::{LayoutDirection, WedgeIndex, WedgeSeries};
use super::state::RotationState;
use super::{DEFAULT_DAMPENING_FACTOR, DURATION_DISTANCE_FACTOR, SECONDS_PER_RADIAN};

/// Logarithmic resistance applied to rotation past a limit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dampening {
    factor: f64,
}

impl Dampening {
    /// Returns `None` unless `factor` is positive and finite.
    pub fn new(factor: f64) -> Option<Self> {
        (factor.is_finite() && factor > 0.0).then_some(Self { factor })
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// `ln(excess * k + 1) / k`; negative excess is treated as none.
    pub fn apply(&self, excess: f64) -> f64 {
        (excess.max(0.0) * self.factor).ln_1p() / self.factor
    }
}

impl Default for Dampening {
    fn default() -> Self {
        Self {
            factor: DEFAULT_DAMPENING_FACTOR,
        }
    }
}

/// Which way the wheel refuses to be turned off its starting wedge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, StrumDisplay)]
#[serde(rename_all = "lowercase")]
pub enum SnapBack {
    #[default]
    Never,
    Always,
    /// Dampen from the start and return whenever rotation increases.
    Increasing,
    /// Dampen from the start and return whenever rotation decreases.
    Decreasing,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RotationLimits {
    pub min: Option<Rotation>,
    pub max: Option<Rotation>,
}

impl RotationLimits {
    pub fn new(min: Option<Rotation>, max: Option<Rotation>) -> Self {
        Self { min, max }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Position of `rotation` between `min` and `max`, when both are set.
    pub fn percentage(&self, rotation: Rotation) -> Option<f64> {
        let (min, max) = (self.min?, self.max?);
        let span = (max - min).radians();
        (span != 0.0).then(|| (rotation - min).radians() / span)
    }
}

/// Which limit, if any, the live rotation is pushing against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay)]
pub enum Resistance {
    None,
    Min,
    Max,
    SnapBack,
}

/// Rotation of one drag sample after dampening, and what caused it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DampenedRotation {
    pub rotation: Rotation,
    pub resistance: Resistance,
}

/// Apply limit and snap-back dampening to an undampened drag rotation.
pub fn dampen(
    undampened: Rotation,
    initial: Rotation,
    limits: &RotationLimits,
    snap_back: SnapBack,
    dampening: &Dampening,
) -> DampenedRotation {
    let mut result = DampenedRotation {
        rotation: undampened,
        resistance: Resistance::None,
    };

    if let Some(min) = limits.min
        && undampened < min
    {
        let excess = (min - undampened).radians();
        result = DampenedRotation {
            rotation: min - Rotation::new(dampening.apply(excess)),
            resistance: Resistance::Min,
        };
    }
    if let Some(max) = limits.max
        && undampened > max
    {
        let excess = (undampened - max).radians();
        result = DampenedRotation {
            rotation: max + Rotation::new(dampening.apply(excess)),
            resistance: Resistance::Max,
        };
    }

    // directional snap-back resists from the very start of the drag
    let delta = (undampened - initial).radians();
    let resisted = match snap_back {
        SnapBack::Increasing => delta > 0.0,
        SnapBack::Decreasing => delta < 0.0,
        SnapBack::Never | SnapBack::Always => false,
    };
    if resisted {
        result = DampenedRotation {
            rotation: initial + Rotation::new(delta.signum() * dampening.apply(delta.abs())),
            resistance: Resistance::SnapBack,
        };
    }

    result
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay)]
pub enum SnapTarget {
    CurrentWedge,
    InitialWedge,
    MinRotation,
    MaxRotation,
}

/// Reported when a drag settles on a different wedge than it started on.
#[derive(Debug, Clone, Copy, PartialEq, Display)]
#[display("moved {steps} wedge(s) ({percentage:.3})")]
pub struct SelectionChange {
    /// Signed index steps; positive when the index advanced.
    pub steps: i64,
    /// `steps` as a fraction of the series, `steps / (count - 1)`.
    pub percentage: f64,
}

impl SelectionChange {
    pub fn is_backward(&self) -> bool {
        self.steps < 0
    }
}

/// Maps an angular distance to an animation duration that grows with
/// diminishing returns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationTiming {
    pub seconds_per_radian: f64,
    pub distance_factor: f64,
}

impl AnimationTiming {
    pub fn duration_for(&self, distance: Rotation) -> Duration {
        let base = distance.radians().abs() * self.seconds_per_radian;
        let seconds = if self.distance_factor > 0.0 {
            (base * self.distance_factor).ln_1p() / self.distance_factor
        } else {
            base
        };
        if seconds.is_finite() && seconds > 0.0 {
            Duration::from_secs_f64(seconds)
        } else {
            Duration::ZERO
        }
    }
}

impl Default for AnimationTiming {
    fn default() -> Self {
        Self {
            seconds_per_radian: SECONDS_PER_RADIAN,
            distance_factor: DURATION_DISTANCE_FACTOR,
        }
    }
}

/// Where the wheel should come to rest once the drag ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapDecision {
    pub target: SnapTarget,
    pub from: Rotation,
    pub rotation: Rotation,
    pub wedge_index: WedgeIndex,
    pub duration: Duration,
    pub selection_change: Option<SelectionChange>,
}

/// Everything the resolver needs to know about a finished drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragOutcome {
    pub initial_rotation: Rotation,
    pub final_rotation: Rotation,
    pub resistance: Resistance,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResolver {
    pub series: WedgeSeries,
    pub limits: RotationLimits,
    pub snap_back: SnapBack,
    pub timing: AnimationTiming,
}

impl SnapResolver {
    pub fn resolve(&self, outcome: &DragOutcome) -> SnapDecision {
        let initial = RotationState::new(outcome.initial_rotation, self.series);

        let (target, rotation) = match (self.snap_back, outcome.resistance) {
            (SnapBack::Always, _) | (_, Resistance::SnapBack) => {
                (SnapTarget::InitialWedge, initial.wedge_center())
            }
            (_, Resistance::Max) => match self.limits.max {
                Some(max) => (SnapTarget::MaxRotation, max),
                None => self.nearest(outcome.final_rotation),
            },
            (_, Resistance::Min) => match self.limits.min {
                Some(min) => (SnapTarget::MinRotation, min),
                None => self.nearest(outcome.final_rotation),
            },
            (_, Resistance::None) => self.nearest(outcome.final_rotation),
        };

        let terminal = RotationState::new(rotation, self.series);
        let selection_change = (target == SnapTarget::CurrentWedge
            && terminal.wedge_index() != initial.wedge_index())
        .then(|| self.selection_change(&initial, &terminal));

        SnapDecision {
            target,
            from: outcome.final_rotation,
            rotation,
            wedge_index: terminal.wedge_index(),
            duration: self.timing.duration_for(rotation - outcome.final_rotation),
            selection_change,
        }
    }

    fn nearest(&self, rotation: Rotation) -> (SnapTarget, Rotation) {
        let state = RotationState::new(rotation, self.series);
        (SnapTarget::CurrentWedge, state.wedge_center())
    }

    /// Index steps within one pass of the series; whole turns are not counted.
    fn selection_change(&self, from: &RotationState, to: &RotationState) -> SelectionChange {
        let rotation_decreased = to.wedge_center() < from.wedge_center();
        let advanced = match self.series.direction() {
            LayoutDirection::Clockwise => rotation_decreased,
            LayoutDirection::CounterClockwise => !rotation_decreased,
        };
        let (start, end) = (from.wedge_index(), to.wedge_index());
        let steps = if advanced {
            self.series.steps_forward(start, end) as i64
        } else {
            -(self.series.steps_backward(start, end) as i64)
        };
        let percentage = match self.series.wedge_max_index() {
            0 => 0.0,
            max => steps as f64 / max as f64,
        };
        SelectionChange { steps, percentage }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angle::Angle;
    use approx::assert_relative_eq;

    fn series() -> WedgeSeries {
        WedgeSeries::new(10, Angle::from_degrees(90.0), LayoutDirection::Clockwise).unwrap()
    }

    fn resolver(limits: RotationLimits, snap_back: SnapBack) -> SnapResolver {
        SnapResolver {
            series: series(),
            limits,
            snap_back,
            timing: AnimationTiming::default(),
        }
    }

    fn outcome(initial: f64, last: f64, resistance: Resistance) -> DragOutcome {
        DragOutcome {
            initial_rotation: Rotation::from_degrees(initial),
            final_rotation: Rotation::from_degrees(last),
            resistance,
        }
    }

    #[test]
    fn test_dampening_curve() {
        let d = Dampening::new(5.0).unwrap();
        assert_eq!(d.apply(0.0), 0.0);
        assert_eq!(d.apply(-1.0), 0.0);
        let mut previous = 0.0;
        for i in 1..100 {
            let e = i as f64 * 0.1;
            let v = d.apply(e);
            assert!(v > previous);
            assert!(v < e);
            previous = v;
        }
        assert!(Dampening::new(0.0).is_none());
        assert!(Dampening::new(-2.0).is_none());
        assert!(Dampening::new(f64::NAN).is_none());
    }

    #[test]
    fn test_dampening_is_unbounded_with_vanishing_slope() {
        let d = Dampening::default();
        let k = d.factor();

        // excess at which ln(e·k + 1)/k reaches `bound` exactly, pushed a little further
        for bound in [1.0, 2.0, 5.0] {
            let excess = (bound * k).exp() / k;
            assert!(d.apply(excess) > bound);
        }
        assert!(d.apply(10.0) < d.apply(1e3));
        assert!(d.apply(1e3) < d.apply(1e6));

        let h = 1e-3;
        let slope = |e: f64| (d.apply(e + h) - d.apply(e)) / h;
        let slopes: Vec<f64> = [0.0, 1.0, 10.0, 100.0, 1000.0].map(slope).to_vec();
        for pair in slopes.windows(2) {
            assert!(pair[1] < pair[0], "{slopes:?}");
        }
        assert!(slopes[slopes.len() - 1] < 1e-3);
    }

    #[test]
    fn test_dampen_only_beyond_limits() {
        let limits = RotationLimits::new(
            Some(Rotation::from_degrees(-90.0)),
            Some(Rotation::from_degrees(90.0)),
        );
        let d = Dampening::default();
        let initial = Rotation::ZERO;

        let inside = dampen(Rotation::from_degrees(60.0), initial, &limits, SnapBack::Never, &d);
        assert_eq!(inside.resistance, Resistance::None);
        assert_relative_eq!(inside.rotation.degrees(), 60.0, epsilon = 1e-9);

        let past_max = dampen(Rotation::from_degrees(150.0), initial, &limits, SnapBack::Never, &d);
        assert_eq!(past_max.resistance, Resistance::Max);
        assert!(past_max.rotation.degrees() > 90.0);
        assert!(past_max.rotation.degrees() < 150.0);

        let past_min = dampen(Rotation::from_degrees(-150.0), initial, &limits, SnapBack::Never, &d);
        assert_eq!(past_min.resistance, Resistance::Min);
        assert!(past_min.rotation.degrees() < -90.0);
        assert!(past_min.rotation.degrees() > -150.0);
    }

    #[test]
    fn test_directional_snap_back_dampens_from_start() {
        let d = Dampening::default();
        let limits = RotationLimits::unbounded();
        let initial = Rotation::from_degrees(30.0);

        let up = dampen(Rotation::from_degrees(80.0), initial, &limits, SnapBack::Increasing, &d);
        assert_eq!(up.resistance, Resistance::SnapBack);
        assert!(up.rotation > initial && up.rotation < Rotation::from_degrees(80.0));

        let down = dampen(Rotation::from_degrees(0.0), initial, &limits, SnapBack::Increasing, &d);
        assert_eq!(down.resistance, Resistance::None);
        assert_relative_eq!(down.rotation.degrees(), 0.0, epsilon = 1e-9);

        let down = dampen(Rotation::from_degrees(0.0), initial, &limits, SnapBack::Decreasing, &d);
        assert_eq!(down.resistance, Resistance::SnapBack);
        assert!(down.rotation < initial && down.rotation > Rotation::ZERO);
    }

    #[test]
    fn test_snaps_to_nearest_wedge() {
        let decision = resolver(RotationLimits::unbounded(), SnapBack::Never)
            .resolve(&outcome(0.0, -100.0, Resistance::None));
        assert_eq!(decision.target, SnapTarget::CurrentWedge);
        assert_relative_eq!(decision.rotation.degrees(), -90.0, epsilon = 1e-9);
        assert_eq!(decision.wedge_index, 1);
        assert!(decision.duration > Duration::ZERO);

        let change = decision.selection_change.unwrap();
        assert_eq!(change.steps, 1);
        assert!(!change.is_backward());
        assert_relative_eq!(change.percentage, 1.0 / 9.0, epsilon = 1e-12);
    }

    #[test]
    fn test_turning_back_reports_negative_steps() {
        let decision = resolver(RotationLimits::unbounded(), SnapBack::Never)
            .resolve(&outcome(-270.0, -10.0, Resistance::None));
        assert_eq!(decision.wedge_index, 0);
        let change = decision.selection_change.unwrap();
        assert_eq!(change.steps, -3);
        assert!(change.is_backward());
    }

    #[test]
    fn test_steps_ignore_whole_turns() {
        let r = resolver(RotationLimits::unbounded(), SnapBack::Never);

        let forward = r.resolve(&outcome(0.0, -990.0, Resistance::None));
        assert_eq!(forward.wedge_index, 1);
        let change = forward.selection_change.unwrap();
        assert_eq!(change.steps, 1);
        assert_relative_eq!(change.percentage, 1.0 / 9.0, epsilon = 1e-12);

        let backward = r.resolve(&outcome(0.0, 1000.0, Resistance::None));
        assert_eq!(backward.wedge_index, 9);
        let change = backward.selection_change.unwrap();
        assert_eq!(change.steps, -1);
        assert!(change.is_backward());

        let ccw = SnapResolver {
            series: WedgeSeries::new(10, Angle::from_degrees(90.0), LayoutDirection::CounterClockwise)
                .unwrap(),
            ..r
        };
        let decision = ccw.resolve(&outcome(0.0, -990.0, Resistance::None));
        assert_eq!(decision.wedge_index, 9);
        assert_eq!(decision.selection_change.map(|c| c.steps), Some(-1));

        for degrees in [-5000.0, -2345.0, -990.0, 1000.0, 3333.0, 7777.0] {
            if let Some(change) = r.resolve(&outcome(0.0, degrees, Resistance::None)).selection_change {
                assert!(change.steps.unsigned_abs() < 10, "{degrees}°");
                assert!(change.percentage.abs() <= 1.0, "{degrees}°");
            }
        }
    }

    #[test]
    fn test_full_turn_without_index_change_is_silent() {
        let decision = resolver(RotationLimits::unbounded(), SnapBack::Never)
            .resolve(&outcome(0.0, 905.0, Resistance::None));
        assert_eq!(decision.wedge_index, 0);
        assert!(decision.selection_change.is_none());
    }

    #[test]
    fn test_snaps_to_limits() {
        let limits = RotationLimits::new(
            Some(Rotation::from_degrees(-180.0)),
            Some(Rotation::from_degrees(180.0)),
        );
        let r = resolver(limits, SnapBack::Never);

        let max = r.resolve(&outcome(0.0, 200.0, Resistance::Max));
        assert_eq!(max.target, SnapTarget::MaxRotation);
        assert_relative_eq!(max.rotation.degrees(), 180.0, epsilon = 1e-9);
        assert!(max.selection_change.is_none());

        let min = r.resolve(&outcome(0.0, -200.0, Resistance::Min));
        assert_eq!(min.target, SnapTarget::MinRotation);
        assert_relative_eq!(min.rotation.degrees(), -180.0, epsilon = 1e-9);
    }

    #[test]
    fn test_snap_back_always_returns_to_initial_wedge() {
        let decision = resolver(RotationLimits::unbounded(), SnapBack::Always)
            .resolve(&outcome(100.0, -300.0, Resistance::None));
        assert_eq!(decision.target, SnapTarget::InitialWedge);
        assert_relative_eq!(decision.rotation.degrees(), 90.0, epsilon = 1e-9);
        assert!(decision.selection_change.is_none());
    }

    #[test]
    fn test_animation_duration_grows_with_diminishing_returns() {
        let timing = AnimationTiming::default();
        assert_eq!(timing.duration_for(Rotation::ZERO), Duration::ZERO);
        let short = timing.duration_for(Rotation::new(1.0));
        let long = timing.duration_for(Rotation::new(10.0));
        let longer = timing.duration_for(Rotation::new(-20.0));
        assert!(short < long && long < longer);
        assert!(longer.as_secs_f64() < 2.0 * long.as_secs_f64());
        assert_relative_eq!(short.as_secs_f64(), 1.25f64.ln(), epsilon = 1e-9);
    }

    #[test]
    fn test_limits_percentage() {
        let limits = RotationLimits::new(Some(Rotation::new(0.0)), Some(Rotation::new(4.0)));
        assert_eq!(limits.percentage(Rotation::new(1.0)), Some(0.25));
        assert_eq!(RotationLimits::unbounded().percentage(Rotation::new(1.0)), None);
    }
}
