use crate::engine::scheduler::Schedule;

/// Cubic ease-in-out curve on `t` in [0, 1]: slow start, slow stop,
/// the motion profile keyframe players conventionally apply between
/// rest positions.
pub fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u * u / 2.0
    }
}

/// Samples a [`Schedule`] against a caller-supplied clock. The player
/// owns no timer and keeps no mutable state: callers pass elapsed time
/// and get a position back, so the same player can be shared, rewound,
/// or sampled offline frame by frame.
#[derive(Debug, Clone)]
pub struct SchedulePlayer {
    initial_position: f64,
    targets: Vec<f64>,
    /// Cumulative end time of each segment.
    ends: Vec<f64>,
}

impl SchedulePlayer {
    pub fn new(schedule: &Schedule) -> Self {
        let mut ends = Vec::with_capacity(schedule.keyframes.len());
        let mut acc = 0.0;
        for kf in &schedule.keyframes {
            acc += kf.duration;
            ends.push(acc);
        }
        Self {
            initial_position: schedule.initial_position,
            targets: schedule.keyframes.iter().map(|kf| kf.target).collect(),
            ends,
        }
    }

    pub fn total_duration(&self) -> f64 {
        self.ends.last().copied().unwrap_or(0.0)
    }

    /// Position after `elapsed` time units. Clamps to the starting
    /// position at or before zero and holds the final target once the
    /// schedule has run out.
    pub fn position_at(&self, elapsed: f64) -> f64 {
        if self.targets.is_empty() || elapsed <= 0.0 {
            return self.initial_position;
        }

        // first segment whose end lies at or past `elapsed`
        let idx = self.ends.partition_point(|&end| end < elapsed);
        if idx == self.ends.len() {
            return self.targets[idx - 1];
        }

        let seg_start = if idx == 0 { 0.0 } else { self.ends[idx - 1] };
        let from = if idx == 0 {
            self.initial_position
        } else {
            self.targets[idx - 1]
        };
        let to = self.targets[idx];
        let span = self.ends[idx] - seg_start;
        if span <= 0.0 {
            return to;
        }

        let progress = ease_in_out_cubic(((elapsed - seg_start) / span).clamp(0.0, 1.0));
        from + (to - from) * progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::extrema::StartDirection;
    use crate::engine::scheduler::Keyframe;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn schedule() -> Schedule {
        Schedule {
            initial_position: 0.0,
            keyframes: vec![
                Keyframe {
                    target: 10.0,
                    duration: 1.0,
                },
                Keyframe {
                    target: -5.0,
                    duration: 2.0,
                },
            ],
            direction: StartDirection::MaximumFirst,
        }
    }

    #[test]
    fn test_ease_curve_shape() {
        assert_relative_eq!(ease_in_out_cubic(0.0), 0.0);
        assert_relative_eq!(ease_in_out_cubic(0.25), 0.0625);
        assert_relative_eq!(ease_in_out_cubic(0.5), 0.5);
        assert_relative_eq!(ease_in_out_cubic(1.0), 1.0);

        // strictly increasing on a sampled grid
        let mut prev = 0.0;
        for i in 1..=100 {
            let value = ease_in_out_cubic(i as f64 / 100.0);
            assert!(value > prev, "easing must increase, failed at step {}", i);
            prev = value;
        }
    }

    #[test]
    fn test_holds_initial_position_before_start() {
        let player = SchedulePlayer::new(&schedule());
        assert_relative_eq!(player.position_at(0.0), 0.0);
        assert_relative_eq!(player.position_at(-1.0), 0.0);
    }

    #[test]
    fn test_hits_targets_at_segment_boundaries() {
        let player = SchedulePlayer::new(&schedule());
        assert_abs_diff_eq!(player.position_at(1.0), 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(player.position_at(3.0), -5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_holds_final_target_after_end() {
        let player = SchedulePlayer::new(&schedule());
        assert_relative_eq!(player.position_at(3.0), player.position_at(100.0));
        assert_relative_eq!(player.total_duration(), 3.0);
    }

    #[test]
    fn test_segment_midpoint_is_halfway() {
        // ease_in_out_cubic(0.5) = 0.5, so the midpoint of the first
        // segment sits exactly halfway between 0 and 10
        let player = SchedulePlayer::new(&schedule());
        assert_abs_diff_eq!(player.position_at(0.5), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_schedule_always_returns_initial() {
        let empty = Schedule {
            initial_position: 7.5,
            keyframes: vec![],
            direction: StartDirection::MinimumFirst,
        };
        let player = SchedulePlayer::new(&empty);
        assert_relative_eq!(player.position_at(0.0), 7.5);
        assert_relative_eq!(player.position_at(42.0), 7.5);
        assert_relative_eq!(player.total_duration(), 0.0);
    }

    #[test]
    fn test_zero_duration_segment_snaps() {
        let schedule = Schedule {
            initial_position: 0.0,
            keyframes: vec![
                Keyframe {
                    target: 7.0,
                    duration: 0.0,
                },
                Keyframe {
                    target: 3.0,
                    duration: 1.0,
                },
            ],
            direction: StartDirection::MaximumFirst,
        };
        let player = SchedulePlayer::new(&schedule);
        // the zero-length segment completes instantly; interpolation
        // for the second segment starts from its target
        assert_abs_diff_eq!(player.position_at(0.5), 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(player.position_at(1.0), 3.0, epsilon = 1e-12);
    }
}
