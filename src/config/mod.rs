pub mod defaults;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Physical parameters of the damped mass-spring oscillator.
///
/// The free response solves `m*x'' + b*x' + k*x = 0`. Positive `x` is
/// the direction of the initial stretch; no sign flip is applied
/// anywhere downstream, so with `x0 > 0` and `v0 = 0` the first
/// turning point of the trajectory is a minimum near `-x0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OscillatorParams {
    /// Mass in kg. Must be positive.
    pub mass: f64,
    /// Spring constant in N/m. Must be positive.
    pub spring_constant: f64,
    /// Damping coefficient in N*s/m. Must be non-negative.
    pub damping: f64,
    /// Initial displacement in m.
    pub initial_position: f64,
    /// Initial velocity in m/s.
    pub initial_velocity: f64,
}

impl OscillatorParams {
    /// Check the parameter domain before a run. Rejects non-finite
    /// values, non-positive mass or stiffness, and negative damping.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("mass", self.mass),
            ("spring_constant", self.spring_constant),
            ("damping", self.damping),
            ("initial_position", self.initial_position),
            ("initial_velocity", self.initial_velocity),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(SimError::InvalidParameter(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }
        if self.mass <= 0.0 {
            return Err(SimError::InvalidParameter(format!(
                "mass must be positive, got {}",
                self.mass
            )));
        }
        if self.spring_constant <= 0.0 {
            return Err(SimError::InvalidParameter(format!(
                "spring_constant must be positive, got {}",
                self.spring_constant
            )));
        }
        if self.damping < 0.0 {
            return Err(SimError::InvalidParameter(format!(
                "damping must be non-negative, got {}",
                self.damping
            )));
        }
        Ok(())
    }
}

/// Embedded Runge-Kutta pair used by the integrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolverMethod {
    /// Dormand-Prince 5(4), the general-purpose default.
    Rk45,
    /// Bogacki-Shampine 3(2), cheaper per step at lower order.
    Rk23,
}

impl Default for SolverMethod {
    fn default() -> Self {
        SolverMethod::Rk45
    }
}

impl std::str::FromStr for SolverMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rk45" | "dopri5" | "dormand-prince" => Ok(SolverMethod::Rk45),
            "rk23" | "bs23" | "bogacki-shampine" => Ok(SolverMethod::Rk23),
            other => Err(format!(
                "unknown solver method '{other}' (expected rk45 or rk23)"
            )),
        }
    }
}

/// Integrator tuning. A value of `0` for any step option means "let
/// the solver choose"; an `eval_time` or `samples` of `0` falls back
/// to the defaults in [`defaults`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverOptions {
    #[serde(default)]
    pub method: SolverMethod,
    /// Initial step size in seconds. 0 = auto.
    #[serde(default)]
    pub first_step: f64,
    /// Lower bound on the step size. 0 = none. When positive, steps at
    /// the floor are accepted regardless of the error estimate.
    #[serde(default)]
    pub min_step: f64,
    /// Upper bound on the step size. 0 = none.
    #[serde(default)]
    pub max_step: f64,
    /// Length of the simulated span in seconds. 0 = default span.
    #[serde(default)]
    pub eval_time: f64,
    /// Number of grid samples over the span. 0 = default count.
    #[serde(default = "default_samples")]
    pub samples: usize,
    /// Relative error tolerance per step.
    #[serde(default = "default_rtol")]
    pub rtol: f64,
    /// Absolute error tolerance per step.
    #[serde(default = "default_atol")]
    pub atol: f64,
}

fn default_samples() -> usize { defaults::SAMPLES }
fn default_rtol() -> f64 { defaults::RTOL }
fn default_atol() -> f64 { defaults::ATOL }

impl SolverOptions {
    /// Step-size and tolerance sanity. Zero means "auto" for the step
    /// options and the span, so only negative, non-finite, or
    /// contradictory values are rejected.
    pub fn validate(&self) -> Result<()> {
        let steps = [
            ("first_step", self.first_step),
            ("min_step", self.min_step),
            ("max_step", self.max_step),
            ("eval_time", self.eval_time),
        ];
        for (name, value) in steps {
            if !value.is_finite() || value < 0.0 {
                return Err(SimError::InvalidParameter(format!(
                    "{name} must be a non-negative finite number, got {value}"
                )));
            }
        }
        if !self.rtol.is_finite() || self.rtol <= 0.0 {
            return Err(SimError::InvalidParameter(format!(
                "rtol must be positive, got {}",
                self.rtol
            )));
        }
        if !self.atol.is_finite() || self.atol < 0.0 {
            return Err(SimError::InvalidParameter(format!(
                "atol must be non-negative, got {}",
                self.atol
            )));
        }
        if self.min_step > 0.0 && self.max_step > 0.0 && self.min_step > self.max_step {
            return Err(SimError::InvalidParameter(format!(
                "min_step {} exceeds max_step {}",
                self.min_step, self.max_step
            )));
        }
        if self.first_step > 0.0 && self.max_step > 0.0 && self.first_step > self.max_step {
            return Err(SimError::InvalidParameter(format!(
                "first_step {} exceeds max_step {}",
                self.first_step, self.max_step
            )));
        }
        Ok(())
    }

    /// Evaluation span with the 0-means-default rule applied.
    pub fn resolved_eval_time(&self) -> f64 {
        if self.eval_time > 0.0 {
            self.eval_time
        } else {
            defaults::EVAL_TIME
        }
    }

    /// Sample count with the 0-means-default rule applied.
    pub fn resolved_samples(&self) -> usize {
        if self.samples > 0 {
            self.samples
        } else {
            defaults::SAMPLES
        }
    }
}

/// Options for converting extrema into keyframes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleOptions {
    /// Constant added to every keyframe target (display-space shift).
    /// Does not affect extrema classification.
    #[serde(default)]
    pub position_offset: f64,
    /// Multiplier applied to every duration, e.g. 1000.0 for players
    /// that count in milliseconds. Must be positive.
    #[serde(default = "default_time_scale")]
    pub time_scale: f64,
}

fn default_time_scale() -> f64 { 1.0 }

impl ScheduleOptions {
    pub fn validate(&self) -> Result<()> {
        if !self.position_offset.is_finite() {
            return Err(SimError::InvalidParameter(format!(
                "position_offset must be finite, got {}",
                self.position_offset
            )));
        }
        if !self.time_scale.is_finite() || self.time_scale <= 0.0 {
            return Err(SimError::InvalidParameter(format!(
                "time_scale must be positive, got {}",
                self.time_scale
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_are_valid() {
        assert!(OscillatorParams::default().validate().is_ok());
        assert!(SolverOptions::default().validate().is_ok());
        assert!(ScheduleOptions::default().validate().is_ok());
    }

    #[test]
    fn test_nonpositive_mass_rejected() {
        let mut params = OscillatorParams::default();
        params.mass = 0.0;
        assert!(matches!(
            params.validate(),
            Err(SimError::InvalidParameter(_))
        ));
        params.mass = -1.0;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_nonpositive_spring_constant_rejected() {
        let mut params = OscillatorParams::default();
        params.spring_constant = 0.0;
        assert!(matches!(
            params.validate(),
            Err(SimError::InvalidParameter(_))
        ));
        params.spring_constant = -25.0;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_negative_damping_rejected() {
        let mut params = OscillatorParams::default();
        params.damping = -0.1;
        assert!(matches!(
            params.validate(),
            Err(SimError::InvalidParameter(_))
        ));

        // zero damping is a valid undamped system
        params.damping = 0.0;
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_nan_param_rejected() {
        let mut params = OscillatorParams::default();
        params.initial_velocity = f64::NAN;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_contradictory_steps_rejected() {
        let options = SolverOptions {
            min_step: 0.5,
            max_step: 0.1,
            ..SolverOptions::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_zero_options_resolve_to_defaults() {
        let options = SolverOptions {
            eval_time: 0.0,
            samples: 0,
            ..SolverOptions::default()
        };
        assert_eq!(options.resolved_eval_time(), defaults::EVAL_TIME);
        assert_eq!(options.resolved_samples(), defaults::SAMPLES);

        let options = SolverOptions {
            eval_time: 3.5,
            samples: 42,
            ..SolverOptions::default()
        };
        assert_eq!(options.resolved_eval_time(), 3.5);
        assert_eq!(options.resolved_samples(), 42);
    }

    #[test]
    fn test_method_parses_from_str() {
        assert_eq!("rk45".parse::<SolverMethod>(), Ok(SolverMethod::Rk45));
        assert_eq!("RK23".parse::<SolverMethod>(), Ok(SolverMethod::Rk23));
        assert!("euler".parse::<SolverMethod>().is_err());
    }
}
