pub mod extrema;
pub mod integrator;
pub mod player;
pub mod scheduler;
pub mod spring;
pub mod trajectory;

use serde::{Deserialize, Serialize};

use crate::config::{OscillatorParams, ScheduleOptions, SolverOptions};
use crate::engine::extrema::{ExtremaSet, StartDirection};
use crate::engine::scheduler::Schedule;
use crate::engine::spring::SystemAttributes;
use crate::engine::trajectory::{TimeGrid, Trajectory};
use crate::error::Result;

/// Everything one simulation produces. A failed run returns an error
/// instead, never a partially filled bundle, so callers can keep
/// showing their previous results on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRun {
    pub grid: TimeGrid,
    pub trajectory: Trajectory,
    pub extrema: ExtremaSet,
    pub direction: StartDirection,
    pub schedule: Schedule,
    pub attributes: SystemAttributes,
}

/// Run the full pipeline on a uniform grid built from the solver
/// options: integrate, scan for extrema, classify the starting
/// direction, and build the keyframe schedule.
pub fn simulate(
    params: &OscillatorParams,
    solver: &SolverOptions,
    schedule_options: &ScheduleOptions,
) -> Result<SimulationRun> {
    let grid = TimeGrid::uniform(solver.resolved_eval_time(), solver.resolved_samples())?;
    simulate_on_grid(params, solver, schedule_options, grid)
}

/// Same pipeline on a caller-supplied grid.
pub fn simulate_on_grid(
    params: &OscillatorParams,
    solver: &SolverOptions,
    schedule_options: &ScheduleOptions,
    grid: TimeGrid,
) -> Result<SimulationRun> {
    let trajectory = integrator::integrate(params, &grid, solver)?;

    let extrema = extrema::scan(&trajectory)?;
    log::debug!(
        "found {} minima and {} maxima in {} samples",
        extrema.minima.len(),
        extrema.maxima.len(),
        trajectory.len()
    );

    let direction = extrema::starting_direction(&extrema)?;
    let schedule = scheduler::build(&grid, &trajectory, &extrema, direction, schedule_options)?;
    let attributes = SystemAttributes::from_params(params);

    log::info!(
        "simulated {:.3} s and scheduled {} keyframes ({:?} leading)",
        grid.duration(),
        schedule.keyframes.len(),
        direction
    );

    Ok(SimulationRun {
        grid,
        trajectory,
        extrema,
        direction,
        schedule,
        attributes,
    })
}
