use serde::{Deserialize, Serialize};

use crate::engine::trajectory::Trajectory;
use crate::error::{Result, SimError};

/// Indices of strict local extrema of a position series, each list in
/// increasing order. Endpoints are never classified; plateau samples
/// (ties with a neighbor) are skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtremaSet {
    pub minima: Vec<usize>,
    pub maxima: Vec<usize>,
}

impl ExtremaSet {
    pub fn is_empty(&self) -> bool {
        self.minima.is_empty() && self.maxima.is_empty()
    }

    pub fn total(&self) -> usize {
        self.minima.len() + self.maxima.len()
    }
}

/// Which extremum type the trajectory reaches first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StartDirection {
    MaximumFirst,
    MinimumFirst,
}

/// Scan the positions for strict interior extrema in a single pass.
/// A sample qualifies only when strictly below (minimum) or strictly
/// above (maximum) both neighbors. An empty result is not an error;
/// heavily damped trajectories legitimately never turn.
pub fn scan(trajectory: &Trajectory) -> Result<ExtremaSet> {
    let x = &trajectory.positions;
    if x.len() < 3 {
        return Err(SimError::EmptyTrajectory { len: x.len() });
    }

    let mut set = ExtremaSet::default();
    for i in 1..x.len() - 1 {
        if x[i] < x[i - 1] && x[i] < x[i + 1] {
            set.minima.push(i);
        } else if x[i] > x[i - 1] && x[i] > x[i + 1] {
            set.maxima.push(i);
        }
    }
    Ok(set)
}

/// Classify which turning point comes first. Needs at least one
/// extremum of each type; a trajectory that never turns both ways has
/// no alternating schedule to build.
pub fn starting_direction(extrema: &ExtremaSet) -> Result<StartDirection> {
    match (extrema.maxima.first(), extrema.minima.first()) {
        (Some(&max_i), Some(&min_i)) if max_i < min_i => Ok(StartDirection::MaximumFirst),
        (Some(_), Some(_)) => Ok(StartDirection::MinimumFirst),
        _ => Err(SimError::InsufficientOscillation {
            minima: extrema.minima.len(),
            maxima: extrema.maxima.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn traj(positions: &[f64]) -> Trajectory {
        Trajectory {
            positions: positions.to_vec(),
            velocities: vec![0.0; positions.len()],
        }
    }

    #[test]
    fn test_simple_peak_and_valley() {
        let set = scan(&traj(&[0.0, 1.0, 0.0, -1.0, 0.0])).unwrap();
        assert_eq!(set.maxima, vec![1]);
        assert_eq!(set.minima, vec![3]);
    }

    #[test]
    fn test_plateau_is_not_an_extremum() {
        let set = scan(&traj(&[0.0, 1.0, 1.0, 0.0])).unwrap();
        assert!(set.is_empty(), "flat tops must not be classified: {:?}", set);

        // A strict peak after the plateau still counts
        let set = scan(&traj(&[0.0, 1.0, 1.0, 2.0, 0.0])).unwrap();
        assert_eq!(set.maxima, vec![3]);
        assert!(set.minima.is_empty());
    }

    #[test]
    fn test_endpoints_never_classified() {
        let set = scan(&traj(&[3.0, 2.0, 1.0, 0.0])).unwrap();
        assert!(set.is_empty(), "monotonic decay has no interior extrema");
    }

    #[test]
    fn test_short_series_rejected() {
        assert!(matches!(
            scan(&traj(&[0.0, 1.0])),
            Err(SimError::EmptyTrajectory { len: 2 })
        ));
        assert!(matches!(
            scan(&traj(&[])),
            Err(SimError::EmptyTrajectory { len: 0 })
        ));
    }

    #[test]
    fn test_damped_cosine_counts_and_direction() {
        // x = exp(-0.1 t) cos(t) over three periods: the turning
        // points sit just left of k*pi, giving 3 minima and 3 maxima
        let span = 3.0 * std::f64::consts::TAU;
        let n = 601;
        let positions: Vec<f64> = (0..n)
            .map(|i| {
                let t = span * i as f64 / (n - 1) as f64;
                (-0.1 * t).exp() * t.cos()
            })
            .collect();
        let set = scan(&traj(&positions)).unwrap();
        assert_eq!(set.minima.len(), 3, "minima: {:?}", set.minima);
        assert_eq!(set.maxima.len(), 3, "maxima: {:?}", set.maxima);
        assert_eq!(starting_direction(&set).unwrap(), StartDirection::MinimumFirst);
    }

    #[test]
    fn test_direction_maximum_first() {
        let set = ExtremaSet {
            minima: vec![5, 9],
            maxima: vec![2, 7],
        };
        assert_eq!(starting_direction(&set).unwrap(), StartDirection::MaximumFirst);
    }

    #[test]
    fn test_direction_requires_both_kinds() {
        let only_maxima = ExtremaSet {
            minima: vec![],
            maxima: vec![4],
        };
        assert!(matches!(
            starting_direction(&only_maxima),
            Err(SimError::InsufficientOscillation { minima: 0, maxima: 1 })
        ));

        assert!(starting_direction(&ExtremaSet::default()).is_err());
    }
}
