//! Damped mass-spring oscillator simulation and keyframe scheduling.
//!
//! The pipeline integrates `m*x'' + b*x' + k*x = 0` over a time grid,
//! locates the strict local extrema of the position trajectory, and
//! converts their time gaps into an alternating schedule of timed
//! motions that a player can execute against its own clock.
//!
//! ```
//! use springsim::{simulate, OscillatorParams, ScheduleOptions, SolverOptions};
//!
//! let params = OscillatorParams {
//!     mass: 0.1,
//!     spring_constant: 25.0,
//!     damping: 0.1,
//!     initial_position: 1.0,
//!     initial_velocity: 0.0,
//! };
//! let run = simulate(&params, &SolverOptions::default(), &ScheduleOptions::default())?;
//! assert!(!run.schedule.keyframes.is_empty());
//! # Ok::<(), springsim::SimError>(())
//! ```

pub mod config;
pub mod engine;
pub mod error;

pub use config::{OscillatorParams, ScheduleOptions, SolverMethod, SolverOptions};
pub use engine::{simulate, simulate_on_grid, SimulationRun};
pub use error::{Result, SimError};
