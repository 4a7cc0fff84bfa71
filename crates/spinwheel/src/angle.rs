use derive_more::{Add, From, Into, Sub};
use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Rem, Sub};

/// Reduce `value` (radians) into `(-π, π]`.
///
/// Uses a single floor division so the result stays accurate after millions
/// of accumulated turns. Non-finite input is returned as NaN.
pub fn normalize(value: f64) -> f64 {
    let reduced = if value > PI {
        let turns = ((value + PI) / TAU).floor();
        value - TAU * turns
    } else if value < -PI {
        let turns = ((-value + PI) / TAU).floor();
        value + TAU * turns
    } else {
        value
    };

    // -π and its rounding neighbours belong to the top of the range
    if reduced <= -PI {
        reduced + TAU
    } else if reduced > PI {
        reduced - TAU
    } else {
        reduced
    }
}

pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

pub fn radians_to_degrees(radians: f64) -> f64 {
    radians * 180.0 / PI
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A bounded angle, always within `(-π, π]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Into)]
pub struct Angle(f64);

impl Angle {
    pub const ZERO: Self = Self(0.0);
    pub const QUARTER_CIRCLE: Self = Self(FRAC_PI_2);
    pub const HALF_CIRCLE: Self = Self(PI);

    pub fn new(radians: f64) -> Self {
        Self(normalize(radians))
    }

    pub fn from_degrees(degrees: f64) -> Self {
        Self::new(degrees_to_radians(degrees))
    }

    /// Angle of `point` around `center`, as reported by `atan2` in screen space.
    pub fn between(center: Point, point: Point) -> Self {
        let (dx, dy) = (point.x - center.x, point.y - center.y);
        Self::new(dy.atan2(dx))
    }

    pub fn radians(self) -> f64 {
        self.0
    }

    pub fn degrees(self) -> f64 {
        radians_to_degrees(self.0)
    }

    pub fn abs(self) -> Self {
        Self::new(self.0.abs())
    }

    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }
}

impl From<Rotation> for Angle {
    fn from(rotation: Rotation) -> Self {
        Self::new(rotation.0)
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}°", self.degrees())
    }
}

/// An unbounded, accumulated rotation in radians.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, From, Into, Add, Sub)]
pub struct Rotation(f64);

impl Rotation {
    pub const ZERO: Self = Self(0.0);
    pub const FULL_TURN: Self = Self(TAU);

    pub fn new(radians: f64) -> Self {
        Self(radians)
    }

    pub fn from_degrees(degrees: f64) -> Self {
        Self(degrees_to_radians(degrees))
    }

    pub fn radians(self) -> f64 {
        self.0
    }

    pub fn degrees(self) -> f64 {
        radians_to_degrees(self.0)
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    pub fn min(self, other: Self) -> Self {
        Self(self.0.min(other.0))
    }

    pub fn max(self, other: Self) -> Self {
        Self(self.0.max(other.0))
    }
}

impl From<Angle> for Rotation {
    fn from(angle: Angle) -> Self {
        Self(angle.0)
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}°", self.degrees())
    }
}

impl Neg for Rotation {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Add<Angle> for Rotation {
    type Output = Self;

    fn add(self, rhs: Angle) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub<Angle> for Rotation {
    type Output = Self;

    fn sub(self, rhs: Angle) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Mul<f64> for Rotation {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self(self.0 * rhs)
    }
}

impl Div<f64> for Rotation {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        Self(self.0 / rhs)
    }
}

/// How many times `rhs` fits into `self`.
impl Div for Rotation {
    type Output = f64;

    fn div(self, rhs: Self) -> f64 {
        self.0 / rhs.0
    }
}

impl Div<Angle> for Rotation {
    type Output = f64;

    fn div(self, rhs: Angle) -> f64 {
        self.0 / rhs.0
    }
}

// `%` keeps the sign of the dividend, like `fmod`.
impl Rem for Rotation {
    type Output = Self;

    fn rem(self, rhs: Self) -> Self {
        Self(self.0 % rhs.0)
    }
}

impl Rem<Angle> for Rotation {
    type Output = Self;

    fn rem(self, rhs: Angle) -> Self {
        Self(self.0 % rhs.0)
    }
}

macro_rules! impl_normalized_ops {
    ($($trait:ident, $method:ident, $op:tt, $rhs:ty);* $(;)?) => {
        $(
            impl $trait<$rhs> for Angle {
                type Output = Angle;

                fn $method(self, rhs: $rhs) -> Angle {
                    Angle::new(self.0 $op f64::from(rhs))
                }
            }
        )*
    };
}

impl_normalized_ops! {
    Add, add, +, Angle;
    Sub, sub, -, Angle;
    Mul, mul, *, f64;
    Div, div, /, f64;
}

impl Neg for Angle {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.0)
    }
}
