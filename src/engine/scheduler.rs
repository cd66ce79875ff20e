use serde::{Deserialize, Serialize};

use crate::config::ScheduleOptions;
use crate::engine::extrema::{ExtremaSet, StartDirection};
use crate::engine::trajectory::{TimeGrid, Trajectory};
use crate::error::{Result, SimError};

/// One motion segment: ease toward `target`, taking `duration` time
/// units (the caller's unit, after `time_scale` is applied).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub target: f64,
    pub duration: f64,
}

/// Alternating sequence of timed motions derived from trajectory
/// extrema. Ordered and immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Offset-adjusted starting sample; a player should occupy this
    /// position at elapsed time zero.
    pub initial_position: f64,
    pub keyframes: Vec<Keyframe>,
    pub direction: StartDirection,
}

impl Schedule {
    pub fn total_duration(&self) -> f64 {
        self.keyframes.iter().map(|kf| kf.duration).sum()
    }
}

/// Build the keyframe schedule by walking minima and maxima in
/// alternation, starting with the type named by `direction`.
///
/// The walk keeps a cursor at the last consumed sample index. Each
/// round takes the earliest remaining extremum of the leading type
/// strictly past the cursor and pairs it with the earliest extremum
/// of the opposite type after that; a leading extremum with no
/// partner left is dropped and the walk stops. Durations are the time
/// gaps between consecutive visited samples, measured from `t[0]` for
/// the first keyframe, so they are never negative.
pub fn build(
    grid: &TimeGrid,
    trajectory: &Trajectory,
    extrema: &ExtremaSet,
    direction: StartDirection,
    options: &ScheduleOptions,
) -> Result<Schedule> {
    options.validate()?;

    let n = trajectory.len();
    if n < 3 {
        return Err(SimError::EmptyTrajectory { len: n });
    }
    if grid.len() != n {
        return Err(SimError::InvalidParameter(format!(
            "time grid has {} samples but the trajectory has {}",
            grid.len(),
            n
        )));
    }
    if extrema.minima.iter().chain(&extrema.maxima).any(|&i| i >= n) {
        return Err(SimError::InvalidParameter(
            "extremum index out of range of the trajectory".to_string(),
        ));
    }

    let (lead, trail): (&[usize], &[usize]) = match direction {
        StartDirection::MaximumFirst => (&extrema.maxima, &extrema.minima),
        StartDirection::MinimumFirst => (&extrema.minima, &extrema.maxima),
    };

    let mut keyframes = Vec::new();
    let mut prev_time = grid.times[0];
    let mut cursor = 0usize;
    let mut li = 0usize;
    let mut ti = 0usize;

    loop {
        while li < lead.len() && lead[li] <= cursor {
            li += 1;
        }
        if li == lead.len() {
            break;
        }
        let l = lead[li];

        while ti < trail.len() && trail[ti] <= l {
            ti += 1;
        }
        if ti == trail.len() {
            break;
        }
        let t = trail[ti];

        keyframes.push(Keyframe {
            target: trajectory.positions[l] + options.position_offset,
            duration: (grid.times[l] - prev_time) * options.time_scale,
        });
        prev_time = grid.times[l];
        keyframes.push(Keyframe {
            target: trajectory.positions[t] + options.position_offset,
            duration: (grid.times[t] - prev_time) * options.time_scale,
        });
        prev_time = grid.times[t];

        cursor = t;
        li += 1;
        ti += 1;
    }

    log::debug!(
        "scheduled {} keyframes ({:?} leading)",
        keyframes.len(),
        direction
    );

    Ok(Schedule {
        initial_position: trajectory.positions[0] + options.position_offset,
        keyframes,
        direction,
    })
}
