pub mod angle;
pub mod config;
pub mod events;
pub mod wheel;

pub use angle::{Angle, Point, Rotation};
pub use config::{ConfigError, WheelConfig};
pub use events::WheelEvent;
pub use wheel::{
    LayoutDirection, RotationState, SnapDecision, WedgeIndex, WedgeSeries, WedgeState, Wheel,
    WheelAction, WheelUpdate,
};
