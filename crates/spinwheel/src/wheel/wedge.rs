use crate::angle::{Angle, Rotation};

use super::series::{LayoutDirection, WedgeIndex};
use super::state::RotationState;

/// How one wedge relates to the currently selected wedge.
///
/// Used by the rendering layer to place, show and cross-fade wedges that are
/// not (or not only) the selected one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WedgeState {
    rotation_state: RotationState,
    index: WedgeIndex,
}

impl WedgeState {
    pub fn new(rotation_state: RotationState, index: WedgeIndex) -> Self {
        Self {
            rotation_state,
            index: index % rotation_state.wedge_count(),
        }
    }

    pub fn index(&self) -> WedgeIndex {
        self.index
    }

    pub fn rotation_state(&self) -> &RotationState {
        &self.rotation_state
    }

    pub fn is_selected(&self) -> bool {
        self.index == self.rotation_state.wedge_index()
    }

    pub fn next_neighbor(&self) -> WedgeIndex {
        self.rotation_state.series().next_index(self.index)
    }

    pub fn prev_neighbor(&self) -> WedgeIndex {
        self.rotation_state.series().prev_index(self.index)
    }

    /// Hops from this wedge to the selected one following `next_index`.
    pub fn clockwise_steps(&self) -> usize {
        self.rotation_state
            .series()
            .steps_forward(self.index, self.rotation_state.wedge_index())
    }

    /// Hops from this wedge to the selected one following `prev_index`.
    pub fn counter_clockwise_steps(&self) -> usize {
        self.rotation_state
            .series()
            .steps_backward(self.index, self.rotation_state.wedge_index())
    }

    /// Direction of the shorter walk to the selected wedge. Ties go clockwise.
    pub fn direction_to_selected(&self) -> LayoutDirection {
        if self.clockwise_steps() <= self.counter_clockwise_steps() {
            LayoutDirection::Clockwise
        } else {
            LayoutDirection::CounterClockwise
        }
    }

    pub fn steps(&self) -> usize {
        self.clockwise_steps().min(self.counter_clockwise_steps())
    }

    /// Signed index offset of this wedge from the selected wedge.
    pub fn index_offset(&self) -> i64 {
        let steps = self.steps() as i64;
        match self.direction_to_selected() {
            // walking forward reaches the selection, so this wedge sits behind it
            LayoutDirection::Clockwise => -steps,
            LayoutDirection::CounterClockwise => steps,
        }
    }

    /// Rotation, next to the selected wedge center, at which this wedge would
    /// be centered.
    pub fn center(&self) -> Rotation {
        let separation = Rotation::from(self.rotation_state.wedge_separation());
        let offset = separation * self.index_offset() as f64;
        match self.rotation_state.series().direction() {
            LayoutDirection::Clockwise => self.rotation_state.wedge_center() - offset,
            LayoutDirection::CounterClockwise => self.rotation_state.wedge_center() + offset,
        }
    }

    pub fn layout_angle(&self) -> Angle {
        Angle::from(self.center())
    }

    pub fn distance_to_rotation(&self) -> Rotation {
        (self.rotation_state.rotation() - self.center()).abs()
    }

    /// Distance from this wedge's center to the live rotation, in wedge widths,
    /// clamped to `0..=1`.
    pub fn percent_to_next_wedge(&self) -> f64 {
        if self.rotation_state.wedge_count() == 1 {
            return 0.0;
        }
        (self.distance_to_rotation() / self.rotation_state.wedge_separation()).clamp(0.0, 1.0)
    }

    /// Whether any part of the wedge falls inside the series' visible angle
    /// around the live rotation.
    pub fn is_visible(&self) -> bool {
        if self.is_selected() {
            return true;
        }
        let half_wedge = self.rotation_state.wedge_separation().radians() / 2.0;
        let half_window = self.rotation_state.series().visible_angle().radians() / 2.0;
        self.distance_to_rotation().radians() - half_wedge < half_window
    }
}
