use crate::angle::{Angle, Rotation};
use serde::Serialize;
use serde_with::DeserializeFromStr;
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;

use super::DEFAULT_VISIBLE_ANGLE_DEGREES;

pub type WedgeIndex = usize;

/// Order in which catalog items are laid out around the wheel.
///
/// With a `Clockwise` layout the selected index increases as the rotation
/// decreases; `CounterClockwise` is the mirror image.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum LayoutDirection {
    #[default]
    #[strum(serialize = "Clockwise", serialize = "cw")]
    Clockwise,
    #[strum(
        serialize = "CounterClockwise",
        serialize = "counter-clockwise",
        serialize = "anticlockwise",
        serialize = "ccw"
    )]
    CounterClockwise,
}

impl LayoutDirection {
    pub fn reversed(self) -> Self {
        match self {
            Self::Clockwise => Self::CounterClockwise,
            Self::CounterClockwise => Self::Clockwise,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WedgeSeriesError {
    #[error("A wedge series needs at least one wedge")]
    NoWedges,
    #[error("Wedge separation must be a positive, finite angle (got {0} rad)")]
    InvalidSeparation(f64),
    #[error("Visible angle must be a non-negative, finite angle (got {0} rad)")]
    InvalidVisibleAngle(f64),
}

/// Immutable description of the wedges laid out around the wheel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WedgeSeries {
    wedge_count: usize,
    wedge_separation: Angle,
    direction: LayoutDirection,
    visible_angle: Rotation,
}

impl WedgeSeries {
    pub fn new(
        wedge_count: usize,
        wedge_separation: Angle,
        direction: LayoutDirection,
    ) -> Result<Self, WedgeSeriesError> {
        if wedge_count == 0 {
            return Err(WedgeSeriesError::NoWedges);
        }
        let separation = wedge_separation.radians();
        if !separation.is_finite() || separation <= 0.0 {
            return Err(WedgeSeriesError::InvalidSeparation(separation));
        }

        Ok(Self {
            wedge_count,
            wedge_separation,
            direction,
            visible_angle: Rotation::from_degrees(DEFAULT_VISIBLE_ANGLE_DEGREES),
        })
    }

    /// Builds a series with one wedge per catalog item.
    pub fn for_items<T>(
        items: &[T],
        wedge_separation: Angle,
        direction: LayoutDirection,
    ) -> Result<Self, WedgeSeriesError> {
        Self::new(items.len(), wedge_separation, direction)
    }

    /// Window around the live rotation in which wedges count as visible. It is
    /// not wrapped, so a full turn or more is kept as given.
    pub fn with_visible_angle(self, visible_angle: Rotation) -> Result<Self, WedgeSeriesError> {
        let radians = visible_angle.radians();
        if !radians.is_finite() || radians < 0.0 {
            return Err(WedgeSeriesError::InvalidVisibleAngle(radians));
        }
        Ok(Self {
            visible_angle,
            ..self
        })
    }

    pub fn wedge_count(&self) -> usize {
        self.wedge_count
    }

    pub fn wedge_max_index(&self) -> WedgeIndex {
        self.wedge_count - 1
    }

    pub fn wedge_separation(&self) -> Angle {
        self.wedge_separation
    }

    pub fn direction(&self) -> LayoutDirection {
        self.direction
    }

    pub fn visible_angle(&self) -> Rotation {
        self.visible_angle
    }

    /// Rotation covered by one pass through every wedge.
    pub fn series_width(&self) -> Rotation {
        Rotation::from(self.wedge_separation) * self.wedge_count as f64
    }

    pub fn next_index(&self, index: WedgeIndex) -> WedgeIndex {
        if index >= self.wedge_max_index() {
            0
        } else {
            index + 1
        }
    }

    pub fn prev_index(&self, index: WedgeIndex) -> WedgeIndex {
        if index == 0 || index > self.wedge_max_index() {
            self.wedge_max_index()
        } else {
            index - 1
        }
    }

    /// Number of `next_index` hops from `from` to `to`.
    pub fn steps_forward(&self, from: WedgeIndex, to: WedgeIndex) -> usize {
        (to % self.wedge_count + self.wedge_count - from % self.wedge_count) % self.wedge_count
    }

    /// Number of `prev_index` hops from `from` to `to`.
    pub fn steps_backward(&self, from: WedgeIndex, to: WedgeIndex) -> usize {
        self.steps_forward(to, from)
    }
}
