//! Redundant timing point elimination.

use crate::beatmap::model::timing::TimingPoint;

/// How close two slider velocities must be to count as unchanged.
const VELOCITY_TOLERANCE: f64 = 0.0005;

/// Drops inherited points that repeat their predecessor: same sample
/// set/index, volume and effects, and a slider velocity within tolerance.
/// Uninherited points and the first point of every run are always kept.
///
/// Pure function; the input order is assumed to be the document order.
/// Applying it twice yields the same result as applying it once.
#[must_use]
pub fn prune_redundant_timing_points(points: &[TimingPoint]) -> Vec<TimingPoint> {
    let mut kept: Vec<TimingPoint> = Vec::with_capacity(points.len());
    for point in points {
        let redundant = match (point, kept.last()) {
            (TimingPoint::Inherited(current), Some(TimingPoint::Inherited(previous))) => {
                current.sample_set == previous.sample_set
                    && current.sample_index == previous.sample_index
                    && current.volume == previous.volume
                    && current.effects == previous.effects
                    && (current.slider_velocity - previous.slider_velocity).abs()
                        < VELOCITY_TOLERANCE
            }
            _ => false,
        };
        if !redundant {
            kept.push(point.clone());
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beatmap::command::{Effects, sample::SampleSet};
    use crate::beatmap::model::timing::{InheritedTimingPoint, UninheritedTimingPoint};

    fn uninherited(time: f64) -> TimingPoint {
        TimingPoint::Uninherited(UninheritedTimingPoint {
            time,
            beat_length: 500.0,
            time_signature: 4,
            sample_set: SampleSet::Normal,
            sample_index: 0,
            volume: 100,
            effects: Effects(0),
        })
    }

    fn inherited(time: f64, velocity: f64, volume: u32) -> TimingPoint {
        TimingPoint::Inherited(InheritedTimingPoint {
            time,
            slider_velocity: velocity,
            sample_set: SampleSet::Normal,
            sample_index: 0,
            volume,
            effects: Effects(0),
        })
    }

    #[test]
    fn drops_repeats_keeps_first_of_run() {
        let points = vec![
            uninherited(0.0),
            inherited(100.0, 1.0, 80),
            inherited(200.0, 1.0001, 80),
            inherited(300.0, 1.0, 80),
            inherited(400.0, 2.0, 80),
        ];
        let pruned = prune_redundant_timing_points(&points);
        assert_eq!(
            pruned,
            vec![
                uninherited(0.0),
                inherited(100.0, 1.0, 80),
                inherited(400.0, 2.0, 80),
            ]
        );
    }

    #[test]
    fn sample_field_change_keeps_the_point() {
        let points = vec![
            inherited(0.0, 1.0, 80),
            inherited(100.0, 1.0, 60),
        ];
        assert_eq!(prune_redundant_timing_points(&points).len(), 2);
    }

    #[test]
    fn uninherited_points_are_never_dropped() {
        let points = vec![uninherited(0.0), uninherited(100.0), uninherited(200.0)];
        assert_eq!(prune_redundant_timing_points(&points), points);
    }

    #[test]
    fn pruning_is_idempotent() {
        let points = vec![
            uninherited(0.0),
            inherited(100.0, 1.0, 80),
            inherited(150.0, 1.0004, 80),
            inherited(200.0, 0.9996, 80),
            inherited(400.0, 2.0, 80),
            inherited(500.0, 2.0, 80),
        ];
        let once = prune_redundant_timing_points(&points);
        let twice = prune_redundant_timing_points(&once);
        assert_eq!(once, twice);
    }
}
