use serde::{Deserialize, Serialize};

use crate::config::OscillatorParams;

/// Exact free response of the damped oscillator (analytical solution).
/// Serves as an independent oracle for the numeric integrator and as
/// the source of the derived system attributes.

const TAU: f64 = std::f64::consts::TAU;

/// Textbook 2% settling constant: envelope time constants until the
/// residual amplitude is considered negligible.
const SETTLING_CONSTANT: f64 = 4.0;

/// Damping regime, split on the damping ratio `zeta = b / (2*sqrt(m*k))`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DampingRegime {
    Underdamped,
    CriticallyDamped,
    Overdamped,
}

/// Dimensionless damping ratio of the configured system.
pub fn damping_ratio(params: &OscillatorParams) -> f64 {
    params.damping / (2.0 * (params.mass * params.spring_constant).sqrt())
}

pub fn regime(params: &OscillatorParams) -> DampingRegime {
    let zeta = damping_ratio(params);
    if zeta < 1.0 {
        DampingRegime::Underdamped
    } else if zeta > 1.0 {
        DampingRegime::Overdamped
    } else {
        DampingRegime::CriticallyDamped
    }
}

/// Closed-form displacement at time `t` for `m*x'' + b*x' + k*x = 0`
/// released from `(x0, v0)`.
pub fn position_at(params: &OscillatorParams, t: f64) -> f64 {
    let beta = params.damping / (2.0 * params.mass);
    let omega0_sq = params.spring_constant / params.mass;
    let x0 = params.initial_position;
    let v0 = params.initial_velocity;
    let envelope = (-beta * t).exp();

    let discriminant = beta * beta - omega0_sq;
    if discriminant < 0.0 {
        // Underdamped: decaying oscillation at the damped frequency
        let omega = (-discriminant).sqrt();
        envelope * (x0 * (omega * t).cos() + ((v0 + beta * x0) / omega) * (omega * t).sin())
    } else if discriminant > 0.0 {
        // Overdamped: sum of two decaying exponentials
        let omega = discriminant.sqrt();
        envelope * (x0 * (omega * t).cosh() + ((v0 + beta * x0) / omega) * (omega * t).sinh())
    } else {
        // Critically damped
        envelope * (x0 + (v0 + beta * x0) * t)
    }
}

/// Closed-form velocity at time `t`, the derivative of [`position_at`].
pub fn velocity_at(params: &OscillatorParams, t: f64) -> f64 {
    let beta = params.damping / (2.0 * params.mass);
    let omega0_sq = params.spring_constant / params.mass;
    let x0 = params.initial_position;
    let v0 = params.initial_velocity;
    let envelope = (-beta * t).exp();

    let discriminant = beta * beta - omega0_sq;
    if discriminant < 0.0 {
        let omega = (-discriminant).sqrt();
        let b_coef = (v0 + beta * x0) / omega;
        envelope
            * ((b_coef * omega - beta * x0) * (omega * t).cos()
                - (x0 * omega + beta * b_coef) * (omega * t).sin())
    } else if discriminant > 0.0 {
        let omega = discriminant.sqrt();
        let b_coef = (v0 + beta * x0) / omega;
        envelope
            * ((b_coef * omega - beta * x0) * (omega * t).cosh()
                + (x0 * omega - beta * b_coef) * (omega * t).sinh())
    } else {
        envelope * (v0 - beta * (v0 + beta * x0) * t)
    }
}

/// Derived characteristics of the configured oscillator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemAttributes {
    /// Undamped natural frequency in Hz.
    pub natural_frequency_hz: f64,
    /// Damping ratio zeta (dimensionless).
    pub damping_ratio: f64,
    /// Damped oscillation frequency in Hz; None outside the
    /// underdamped regime.
    pub damped_frequency_hz: Option<f64>,
    pub regime: DampingRegime,
    /// Time for the decay envelope to drop below 2% of the initial
    /// amplitude; None for an undamped system.
    pub settling_time: Option<f64>,
}

impl SystemAttributes {
    pub fn from_params(params: &OscillatorParams) -> Self {
        let beta = params.damping / (2.0 * params.mass);
        let omega0 = (params.spring_constant / params.mass).sqrt();
        let zeta = damping_ratio(params);
        let regime = regime(params);

        let damped_frequency_hz = if zeta < 1.0 {
            Some(omega0 * (1.0 - zeta * zeta).sqrt() / TAU)
        } else {
            None
        };

        let settling_time = if params.damping == 0.0 {
            None
        } else if zeta <= 1.0 {
            Some(SETTLING_CONSTANT / beta)
        } else {
            // Overdamped decay is governed by the slow pole
            let slow_pole = beta - (beta * beta - omega0 * omega0).sqrt();
            Some(SETTLING_CONSTANT / slow_pole)
        };

        Self {
            natural_frequency_hz: omega0 / TAU,
            damping_ratio: zeta,
            damped_frequency_hz,
            regime,
            settling_time,
        }
    }
}
