use crate::angle::{Angle, Rotation};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WheelEvent {
    DragBegan(Angle),
    DragMoved(Angle),
    DragEnded,
    DragCancelled,
    SetRotation(Rotation),
}
