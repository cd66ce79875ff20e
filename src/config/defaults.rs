use super::*;

/// Evaluation span in seconds, substituted when `eval_time` is 0.
pub const EVAL_TIME: f64 = 10.0;
/// Grid sample count, substituted when `samples` is 0.
pub const SAMPLES: usize = 1000;
/// Relative error tolerance per integration step.
pub const RTOL: f64 = 1e-6;
/// Absolute error tolerance per integration step.
pub const ATOL: f64 = 1e-9;

impl Default for OscillatorParams {
    fn default() -> Self {
        Self {
            mass: 1.25,
            spring_constant: 25.0,
            damping: 0.1,
            initial_position: 1.0,
            initial_velocity: 0.0,
        }
    }
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            method: SolverMethod::Rk45,
            first_step: 0.0, // auto
            min_step: 0.0,   // no floor
            max_step: 0.0,   // no ceiling
            eval_time: EVAL_TIME,
            samples: SAMPLES,
            rtol: RTOL,
            atol: ATOL,
        }
    }
}

impl Default for ScheduleOptions {
    fn default() -> Self {
        Self {
            position_offset: 0.0,
            time_scale: 1.0,
        }
    }
}
