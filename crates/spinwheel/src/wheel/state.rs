use crate::angle::{Angle, Rotation};
use strum::Display as StrumDisplay;

use super::series::{LayoutDirection, WedgeIndex, WedgeSeries};
use super::wedge::WedgeState;

/// Sign of the layout rotation (the negated rotation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay)]
pub enum Polarity {
    Positive,
    Negative,
}

/// The selection derived from a rotation and a wedge series.
///
/// Everything is computed up front in [`RotationState::new`]; the state is
/// cheap enough to rebuild on every drag sample or animation frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    rotation: Rotation,
    series: WedgeSeries,
    polarity: Polarity,
    rotation_count: u64,
    wedges_in_remainder: usize,
    wedge_index: WedgeIndex,
    wedge_center: Rotation,
}

impl RotationState {
    pub fn new(rotation: Rotation, series: WedgeSeries) -> Self {
        let separation = series.wedge_separation().radians();
        let width = series.series_width().radians();
        let count = series.wedge_count();

        let layout = -rotation.radians();
        let polarity = if layout >= 0.0 {
            Polarity::Positive
        } else {
            Polarity::Negative
        };

        // shift by half a wedge so a boundary, not a center, sits at zero
        let offset = match polarity {
            Polarity::Positive => layout + separation / 2.0,
            Polarity::Negative => layout - separation / 2.0,
        };

        // fmod is exact, so derive the turn count from it rather than from a
        // second division that could round the other way
        let remaining = (offset % width).abs();
        let rotation_count = ((offset.abs() - remaining) / width).round() as u64;
        let wedges_in_remainder = ((remaining / separation).floor() as usize).min(count - 1);

        let layout_index = match polarity {
            Polarity::Positive => wedges_in_remainder,
            Polarity::Negative => (count - wedges_in_remainder) % count,
        };
        let wedge_index = match series.direction() {
            LayoutDirection::Clockwise => layout_index,
            LayoutDirection::CounterClockwise => (count - layout_index) % count,
        };

        let distance = rotation_count as f64 * width + wedges_in_remainder as f64 * separation;
        let wedge_center = match polarity {
            Polarity::Positive => Rotation::new(-distance),
            Polarity::Negative => Rotation::new(distance),
        };

        Self {
            rotation,
            series,
            polarity,
            rotation_count,
            wedges_in_remainder,
            wedge_index,
            wedge_center,
        }
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn series(&self) -> &WedgeSeries {
        &self.series
    }

    pub fn wedge_count(&self) -> usize {
        self.series.wedge_count()
    }

    pub fn wedge_separation(&self) -> Angle {
        self.series.wedge_separation()
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Complete passes through the whole series.
    pub fn rotation_count(&self) -> u64 {
        self.rotation_count
    }

    pub fn wedges_in_remainder(&self) -> usize {
        self.wedges_in_remainder
    }

    pub fn wedge_index(&self) -> WedgeIndex {
        self.wedge_index
    }

    /// Rotation at which the selected wedge is exactly centered.
    pub fn wedge_center(&self) -> Rotation {
        self.wedge_center
    }

    /// Signed distance of the live rotation from the selected wedge center,
    /// always within half a wedge.
    pub fn off_center(&self) -> Rotation {
        self.rotation - self.wedge_center
    }

    /// Index of the wedge the rotation is currently leaning toward.
    pub fn leaning_neighbor(&self) -> WedgeIndex {
        let toward_lower_rotation = self.off_center().radians() < 0.0;
        match (self.series.direction(), toward_lower_rotation) {
            (LayoutDirection::Clockwise, true) | (LayoutDirection::CounterClockwise, false) => {
                self.series.next_index(self.wedge_index)
            }
            _ => self.series.prev_index(self.wedge_index),
        }
    }

    /// Rotation nearest to the current wedge center that centers `index`.
    pub fn center_of(&self, index: WedgeIndex) -> Rotation {
        self.wedge(index).center()
    }

    pub fn wedge(&self, index: WedgeIndex) -> WedgeState {
        WedgeState::new(*self, index)
    }

    pub fn wedges(&self) -> impl Iterator<Item = WedgeState> + '_ {
        (0..self.wedge_count()).map(move |index| self.wedge(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ten_by_ninety(direction: LayoutDirection) -> WedgeSeries {
        WedgeSeries::new(10, Angle::from_degrees(90.0), direction).unwrap()
    }

    fn index_at(degrees: f64, series: WedgeSeries) -> WedgeIndex {
        RotationState::new(Rotation::from_degrees(degrees), series).wedge_index()
    }

    #[test]
    fn test_clockwise_scenario() {
        let series = ten_by_ninety(LayoutDirection::Clockwise);
        assert_eq!(index_at(0.0, series), 0);
        assert_eq!(index_at(44.0, series), 0);
        assert_eq!(index_at(-44.0, series), 0);
        assert_eq!(index_at(46.0, series), 9);
        assert_eq!(index_at(89.0, series), 9);
        assert_eq!(index_at(91.0, series), 9);
        assert_eq!(index_at(136.0, series), 8);
        assert_eq!(index_at(-46.0, series), 1);
        assert_eq!(index_at(-91.0, series), 1);
        assert_eq!(index_at(-136.0, series), 2);
    }

    #[test]
    fn test_counter_clockwise_mirrors_index() {
        let series = ten_by_ninety(LayoutDirection::CounterClockwise);
        assert_eq!(index_at(0.0, series), 0);
        assert_eq!(index_at(91.0, series), 1);
        assert_eq!(index_at(136.0, series), 2);
        assert_eq!(index_at(-91.0, series), 9);
    }

    #[test]
    fn test_wedge_center_and_polarity() {
        let series = ten_by_ninety(LayoutDirection::Clockwise);

        let state = RotationState::new(Rotation::from_degrees(100.0), series);
        assert_eq!(state.polarity(), Polarity::Negative);
        assert_relative_eq!(state.wedge_center().degrees(), 90.0, epsilon = 1e-9);
        assert_relative_eq!(state.off_center().degrees(), 10.0, epsilon = 1e-9);

        let state = RotationState::new(Rotation::from_degrees(-2690.0), series);
        assert_eq!(state.polarity(), Polarity::Positive);
        assert_eq!(state.rotation_count(), 3);
        assert_eq!(state.wedge_index(), 0);
        assert_relative_eq!(state.wedge_center().degrees(), -2700.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_is_centered_on_first_wedge() {
        let series = ten_by_ninety(LayoutDirection::Clockwise);
        let state = RotationState::new(Rotation::ZERO, series);
        assert_eq!(state.polarity(), Polarity::Positive);
        assert_eq!(state.wedge_index(), 0);
        assert_eq!(state.rotation_count(), 0);
        assert_eq!(state.wedge_center().radians(), 0.0);
    }

    #[test]
    fn test_boundary_uses_floor_semantics() {
        let series = ten_by_ninety(LayoutDirection::Clockwise);
        let eps = 1e-9;
        let boundary = Rotation::from_degrees(-45.0);

        let on = RotationState::new(boundary, series).wedge_index();
        let inside = RotationState::new(boundary + Rotation::new(eps), series).wedge_index();
        let outside = RotationState::new(boundary - Rotation::new(eps), series).wedge_index();

        assert_eq!(on, 1);
        assert_eq!(inside, 0);
        assert_eq!(outside, 1);
        for _ in 0..10 {
            assert_eq!(RotationState::new(boundary, series).wedge_index(), on);
        }
    }

    #[test]
    fn test_index_progression_from_many_turns_back() {
        for direction in [LayoutDirection::Clockwise, LayoutDirection::CounterClockwise] {
            let series = ten_by_ninety(direction);
            let start = -2700.0;
            let mut previous = index_at(start, series);

            for step in 1..60 {
                let degrees = start + 90.0 * step as f64 + if step % 2 == 0 { 30.0 } else { -30.0 };
                let index = index_at(degrees, series);
                let expected = match direction {
                    LayoutDirection::Clockwise => series.prev_index(previous),
                    LayoutDirection::CounterClockwise => series.next_index(previous),
                };
                assert_eq!(index, expected, "{direction} at {degrees}°");
                previous = index;
            }
        }
    }

    #[test]
    fn test_wedge_center_progression() {
        let series = ten_by_ninety(LayoutDirection::Clockwise);
        for step in 0..60 {
            let centered = -2700.0 + 90.0 * step as f64;
            for jitter in [-44.0, -10.0, 0.0, 10.0, 44.0] {
                let state = RotationState::new(Rotation::from_degrees(centered + jitter), series);
                assert_relative_eq!(state.wedge_center().degrees(), centered, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_leaning_neighbor() {
        let series = ten_by_ninety(LayoutDirection::Clockwise);
        let state = RotationState::new(Rotation::from_degrees(10.0), series);
        assert_eq!(state.wedge_index(), 0);
        assert_eq!(state.leaning_neighbor(), 9);

        let state = RotationState::new(Rotation::from_degrees(-10.0), series);
        assert_eq!(state.leaning_neighbor(), 1);

        let series = ten_by_ninety(LayoutDirection::CounterClockwise);
        let state = RotationState::new(Rotation::from_degrees(10.0), series);
        assert_eq!(state.leaning_neighbor(), 1);
    }

    #[test]
    fn test_single_wedge_series() {
        let series = WedgeSeries::new(1, Angle::from_degrees(120.0), LayoutDirection::Clockwise)
            .unwrap();
        for degrees in [-700.0, -61.0, 0.0, 59.0, 61.0, 1000.0] {
            let state = RotationState::new(Rotation::from_degrees(degrees), series);
            assert_eq!(state.wedge_index(), 0);
            assert!(state.off_center().degrees().abs() <= 60.0 + 1e-9);
        }
    }
}
