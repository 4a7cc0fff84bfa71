use crate::angle::{Angle, Rotation};
use crate::events::WheelEvent;

use super::series::{WedgeIndex, WedgeSeries};
use super::snap::{
    AnimationTiming, Dampening, Resistance, RotationLimits, SnapBack, SnapDecision, SnapResolver,
};
use super::state::RotationState;
use super::tracker::{RotationTracker, TrackedSample};
use super::wedge::WedgeState;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    Tracking(RotationTracker),
}

/// Live rotation after a drag sample or an explicit jump.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelUpdate {
    pub rotation: Rotation,
    pub wedge_index: WedgeIndex,
    /// The selected wedge differs from the one before this update.
    pub changed: bool,
    pub resistance: Resistance,
}

/// What the caller has to do after an event was handled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WheelAction {
    None,
    Redraw(WheelUpdate),
    Animate(SnapDecision),
    /// A cancelled drag put the wheel back where it started.
    Restore(Rotation),
}

#[derive(Debug, Clone)]
pub struct Wheel {
    series: WedgeSeries,
    rotation: Rotation,
    limits: RotationLimits,
    snap_back: SnapBack,
    dampening: Dampening,
    timing: AnimationTiming,
    interaction: Interaction,
}

impl Wheel {
    pub fn new(series: WedgeSeries) -> Self {
        Self {
            series,
            rotation: Rotation::ZERO,
            limits: RotationLimits::unbounded(),
            snap_back: SnapBack::default(),
            dampening: Dampening::default(),
            timing: AnimationTiming::default(),
            interaction: Interaction::Idle,
        }
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.set_rotation(rotation);
        self
    }

    pub fn with_limits(mut self, limits: RotationLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_snap_back(mut self, snap_back: SnapBack) -> Self {
        self.snap_back = snap_back;
        self
    }

    pub fn with_dampening(mut self, dampening: Dampening) -> Self {
        self.dampening = dampening;
        self
    }

    pub fn with_timing(mut self, timing: AnimationTiming) -> Self {
        self.timing = timing;
        self
    }

    pub fn handle(&mut self, event: WheelEvent) -> WheelAction {
        match event {
            WheelEvent::DragBegan(touch) => {
                self.begin_drag(touch);
                WheelAction::None
            }
            WheelEvent::DragMoved(touch) => self
                .drag_to(touch)
                .map_or(WheelAction::None, WheelAction::Redraw),
            WheelEvent::DragEnded => self
                .end_drag()
                .map_or(WheelAction::None, WheelAction::Animate),
            WheelEvent::DragCancelled => self
                .cancel_drag()
                .map_or(WheelAction::None, WheelAction::Restore),
            WheelEvent::SetRotation(rotation) => WheelAction::Redraw(self.set_rotation(rotation)),
        }
    }

    /// Starts tracking from the current rotation. A drag already in progress
    /// is abandoned where it stands.
    pub fn begin_drag(&mut self, touch: Angle) {
        if let Interaction::Tracking(tracker) = &self.interaction {
            log::debug!("Restarting drag at rotation {}", tracker.rotation());
            self.rotation = tracker.rotation();
        }
        self.interaction = Interaction::Tracking(RotationTracker::begin(
            self.rotation,
            touch,
            self.limits,
            self.snap_back,
            self.dampening,
        ));
    }

    /// Feeds a pointer sample to the active drag. `None` when idle.
    pub fn drag_to(&mut self, touch: Angle) -> Option<WheelUpdate> {
        let Interaction::Tracking(tracker) = &mut self.interaction else {
            return None;
        };

        let previous = RotationState::new(self.rotation, self.series).wedge_index();
        let sample = tracker.track(touch);
        let resistance = tracker.resistance();
        if let TrackedSample::Moved(dampened) = sample {
            self.rotation = dampened.rotation;
        }

        let wedge_index = self.state().wedge_index();
        Some(WheelUpdate {
            rotation: self.rotation,
            wedge_index,
            changed: wedge_index != previous,
            resistance,
        })
    }

    /// Ends the drag and commits the rotation it should settle on. The caller
    /// animates from `decision.from` to `decision.rotation`.
    pub fn end_drag(&mut self) -> Option<SnapDecision> {
        let Interaction::Tracking(tracker) = std::mem::take(&mut self.interaction) else {
            return None;
        };

        let decision = self.resolver().resolve(&tracker.outcome());
        log::debug!(
            "Drag ended after {} samples: {} -> {} ({}, {:?})",
            tracker.samples(),
            decision.from,
            decision.rotation,
            decision.target,
            decision.duration
        );
        if let Some(change) = decision.selection_change {
            log::debug!("Selection {change}");
        }

        self.rotation = decision.rotation;
        Some(decision)
    }

    /// Abandons the drag without snapping, returning to the initial rotation.
    pub fn cancel_drag(&mut self) -> Option<Rotation> {
        let Interaction::Tracking(tracker) = std::mem::take(&mut self.interaction) else {
            return None;
        };
        log::debug!("Drag cancelled, restoring {}", tracker.initial_rotation());
        self.rotation = tracker.initial_rotation();
        Some(self.rotation)
    }

    /// Jumps straight to `rotation`, dropping any drag in progress. Non-finite
    /// rotations are ignored.
    pub fn set_rotation(&mut self, rotation: Rotation) -> WheelUpdate {
        let previous = self.state().wedge_index();
        self.interaction = Interaction::Idle;
        if rotation.is_finite() {
            self.rotation = rotation;
        } else {
            log::warn!("Ignoring non-finite rotation {rotation}");
        }

        let wedge_index = self.state().wedge_index();
        WheelUpdate {
            rotation: self.rotation,
            wedge_index,
            changed: wedge_index != previous,
            resistance: Resistance::None,
        }
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn series(&self) -> &WedgeSeries {
        &self.series
    }

    pub fn limits(&self) -> &RotationLimits {
        &self.limits
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn is_tracking(&self) -> bool {
        matches!(self.interaction, Interaction::Tracking(_))
    }

    pub fn state(&self) -> RotationState {
        RotationState::new(self.rotation, self.series)
    }

    pub fn selected_index(&self) -> WedgeIndex {
        self.state().wedge_index()
    }

    pub fn wedge_states(&self) -> Vec<WedgeState> {
        self.state().wedges().collect()
    }

    pub fn visible_wedges(&self) -> Vec<WedgeState> {
        self.state().wedges().filter(WedgeState::is_visible).collect()
    }

    /// Nearest rotation that centers `index`, for animating to a wedge.
    pub fn rotation_for_wedge(&self, index: WedgeIndex) -> Rotation {
        self.state().center_of(index)
    }

    /// Live rotation as a fraction of the way from `min` to `max`.
    pub fn percentage_remaining(&self) -> Option<f64> {
        self.limits.percentage(self.rotation)
    }

    pub fn resolver(&self) -> SnapResolver {
        SnapResolver {
            series: self.series,
            limits: self.limits,
            snap_back: self.snap_back,
            timing: self.timing,
        }
    }
}
