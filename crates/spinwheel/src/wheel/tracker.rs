use crate::angle::{Angle, Rotation};
use std::f64::consts::{PI, TAU};

use super::snap::{
    DampenedRotation, Dampening, DragOutcome, Resistance, RotationLimits, SnapBack, dampen,
};

/// Result of feeding one pointer sample to the tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackedSample {
    Moved(DampenedRotation),
    /// The sample could not be unwrapped; the last good rotation is kept.
    Held(Rotation),
}

impl TrackedSample {
    pub fn rotation(&self) -> Rotation {
        match self {
            Self::Moved(dampened) => dampened.rotation,
            Self::Held(rotation) => *rotation,
        }
    }
}

/// Turns bounded pointer angles into a continuous rotation for one drag.
///
/// Pointer angles wrap at ±π, so each sample's delta from the first touch is
/// shifted by a whole turn whenever it lands more than half a turn from the
/// previous delta. The shift is remembered in `accumulated_turns`, so each sample
/// needs at most one correction however many times the pointer has gone
/// around.
#[derive(Debug, Clone, PartialEq)]
pub struct RotationTracker {
    initial_rotation: Rotation,
    initial_touch: Angle,
    previous_touch: Angle,
    accumulated_turns: i64,
    previous_delta: f64,
    rotation: Rotation,
    resistance: Resistance,
    samples: usize,
    dropped: usize,
    limits: RotationLimits,
    snap_back: SnapBack,
    dampening: Dampening,
}

impl RotationTracker {
    pub fn begin(
        initial_rotation: Rotation,
        touch: Angle,
        limits: RotationLimits,
        snap_back: SnapBack,
        dampening: Dampening,
    ) -> Self {
        log::debug!("Drag began at {touch} from rotation {initial_rotation}");
        Self {
            initial_rotation,
            initial_touch: touch,
            previous_touch: touch,
            accumulated_turns: 0,
            previous_delta: 0.0,
            rotation: initial_rotation,
            resistance: Resistance::None,
            samples: 0,
            dropped: 0,
            limits,
            snap_back,
            dampening,
        }
    }

    pub fn track(&mut self, touch: Angle) -> TrackedSample {
        self.samples += 1;

        let Some(delta) = self.unwrap(touch) else {
            self.dropped += 1;
            log::warn!(
                "Dropping pointer sample {touch}, holding rotation {}",
                self.rotation
            );
            return TrackedSample::Held(self.rotation);
        };

        self.previous_touch = touch;
        self.previous_delta = delta;

        let undampened = self.initial_rotation + Rotation::new(delta);
        let dampened = dampen(
            undampened,
            self.initial_rotation,
            &self.limits,
            self.snap_back,
            &self.dampening,
        );
        self.rotation = dampened.rotation;
        self.resistance = dampened.resistance;

        log::trace!(
            "Sample {}: touch {touch} delta {delta:.4} rad -> {} ({})",
            self.samples,
            dampened.rotation,
            dampened.resistance
        );
        TrackedSample::Moved(dampened)
    }

    /// Successive touches both lie in (-π, π], so their difference is under a
    /// full turn and one correction always brings the delta within half a
    /// turn of the previous one. Only non-finite samples are rejected.
    fn unwrap(&mut self, touch: Angle) -> Option<f64> {
        if !touch.is_finite() {
            return None;
        }

        let raw = touch.radians() - self.initial_touch.radians();
        let mut delta = raw + TAU * self.accumulated_turns as f64;

        if delta - self.previous_delta > PI {
            self.accumulated_turns -= 1;
            delta -= TAU;
        } else if delta - self.previous_delta < -PI {
            self.accumulated_turns += 1;
            delta += TAU;
        }

        Some(delta)
    }

    /// The drag as it stands, for deciding where to settle.
    pub fn outcome(&self) -> DragOutcome {
        DragOutcome {
            initial_rotation: self.initial_rotation,
            final_rotation: self.rotation,
            resistance: self.resistance,
        }
    }

    pub fn initial_rotation(&self) -> Rotation {
        self.initial_rotation
    }

    pub fn initial_touch(&self) -> Angle {
        self.initial_touch
    }

    pub fn previous_touch(&self) -> Angle {
        self.previous_touch
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn resistance(&self) -> Resistance {
        self.resistance
    }

    pub fn accumulated_turns(&self) -> i64 {
        self.accumulated_turns
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn dropped_samples(&self) -> usize {
        self.dropped
    }
}
