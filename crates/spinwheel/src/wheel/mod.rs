pub mod model;
pub mod series;
pub mod snap;
pub mod state;
pub mod tracker;
pub mod wedge;

pub use model::{Interaction, Wheel, WheelAction, WheelUpdate};
pub use series::{LayoutDirection, WedgeIndex, WedgeSeries, WedgeSeriesError};
pub use snap::{
    AnimationTiming, DampenedRotation, Dampening, DragOutcome, Resistance, RotationLimits,
    SelectionChange, SnapBack, SnapDecision, SnapResolver, SnapTarget,
};
pub use state::{Polarity, RotationState};
pub use tracker::{RotationTracker, TrackedSample};
pub use wedge::WedgeState;

pub const DEFAULT_VISIBLE_ANGLE_DEGREES: f64 = 180.0;
pub const DEFAULT_DAMPENING_FACTOR: f64 = 5.0;
pub const SECONDS_PER_RADIAN: f64 = 0.25; // snap animation speed before easing
pub const DURATION_DISTANCE_FACTOR: f64 = 1.0;
