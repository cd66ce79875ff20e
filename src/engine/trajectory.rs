use serde::{Deserialize, Serialize};

use crate::config::OscillatorParams;
use crate::error::{Result, SimError};

/// Sample times shared read-only by every pipeline stage. Must be
/// strictly increasing; the integrator rejects grids that are not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeGrid {
    pub times: Vec<f64>,
}

impl TimeGrid {
    /// Evenly spaced grid from 0 to `duration` inclusive.
    pub fn uniform(duration: f64, samples: usize) -> Result<Self> {
        if !duration.is_finite() || duration <= 0.0 {
            return Err(SimError::InvalidParameter(format!(
                "grid duration must be positive, got {duration}"
            )));
        }
        if samples < 2 {
            return Err(SimError::InvalidParameter(format!(
                "grid needs at least 2 samples, got {samples}"
            )));
        }
        let step = duration / (samples - 1) as f64;
        let times = (0..samples)
            .map(|i| if i == samples - 1 { duration } else { i as f64 * step })
            .collect();
        Ok(Self { times })
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Span covered by the grid, 0 for degenerate grids.
    pub fn duration(&self) -> f64 {
        match (self.times.first(), self.times.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }
}

/// Integrated state samples aligned index-for-index with a [`TimeGrid`].
/// Produced once by the integrator and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub positions: Vec<f64>,
    pub velocities: Vec<f64>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Acceleration series recovered from the equation of motion,
    /// `a = -(b*v + k*x) / m`.
    pub fn accelerations(&self, params: &OscillatorParams) -> Vec<f64> {
        self.positions
            .iter()
            .zip(&self.velocities)
            .map(|(&x, &v)| {
                (-params.damping * v - params.spring_constant * x) / params.mass
            })
            .collect()
    }
}

/// Kinetic, potential, and total energy per sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyProfile {
    pub kinetic: Vec<f64>,
    pub potential: Vec<f64>,
    pub total: Vec<f64>,
}

impl EnergyProfile {
    pub fn from_trajectory(params: &OscillatorParams, trajectory: &Trajectory) -> Self {
        let kinetic: Vec<f64> = trajectory
            .velocities
            .iter()
            .map(|&v| 0.5 * params.mass * v * v)
            .collect();
        let potential: Vec<f64> = trajectory
            .positions
            .iter()
            .map(|&x| 0.5 * params.spring_constant * x * x)
            .collect();
        let total = kinetic
            .iter()
            .zip(&potential)
            .map(|(ke, pe)| ke + pe)
            .collect();
        Self {
            kinetic,
            potential,
            total,
        }
    }
}
