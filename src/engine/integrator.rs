use crate::config::{OscillatorParams, SolverMethod, SolverOptions};
use crate::engine::trajectory::{TimeGrid, Trajectory};
use crate::error::{Result, SimError};

/// State vector of the first-order system: `[position, velocity]`.
type State = [f64; 2];

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 5.0;

/// Butcher tableau of an embedded Runge-Kutta pair. `a` holds the
/// strictly lower-triangular stage rows, `b` the high-order weights,
/// `e` the error weights (difference between the pair's orders).
/// Both pairs used here are FSAL: the last stage of an accepted step
/// doubles as the first stage of the next.
struct ButcherTableau {
    c: &'static [f64],
    a: &'static [&'static [f64]],
    b: &'static [f64],
    e: &'static [f64],
    /// Order of the embedded error estimator, used for the step
    /// growth exponent `1 / (error_order + 1)`.
    error_order: f64,
}

/// Dormand-Prince 5(4), the pair behind classic RK45 solvers.
static DORMAND_PRINCE: ButcherTableau = ButcherTableau {
    c: &[0.0, 1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0, 1.0],
    a: &[
        &[1.0 / 5.0],
        &[3.0 / 40.0, 9.0 / 40.0],
        &[44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0],
        &[
            19372.0 / 6561.0,
            -25360.0 / 2187.0,
            64448.0 / 6561.0,
            -212.0 / 729.0,
        ],
        &[
            9017.0 / 3168.0,
            -355.0 / 33.0,
            46732.0 / 5247.0,
            49.0 / 176.0,
            -5103.0 / 18656.0,
        ],
        &[
            35.0 / 384.0,
            0.0,
            500.0 / 1113.0,
            125.0 / 192.0,
            -2187.0 / 6784.0,
            11.0 / 84.0,
        ],
    ],
    b: &[
        35.0 / 384.0,
        0.0,
        500.0 / 1113.0,
        125.0 / 192.0,
        -2187.0 / 6784.0,
        11.0 / 84.0,
        0.0,
    ],
    e: &[
        -71.0 / 57600.0,
        0.0,
        71.0 / 16695.0,
        -71.0 / 1920.0,
        17253.0 / 339200.0,
        -22.0 / 525.0,
        1.0 / 40.0,
    ],
    error_order: 4.0,
};

/// Bogacki-Shampine 3(2).
static BOGACKI_SHAMPINE: ButcherTableau = ButcherTableau {
    c: &[0.0, 1.0 / 2.0, 3.0 / 4.0, 1.0],
    a: &[
        &[1.0 / 2.0],
        &[0.0, 3.0 / 4.0],
        &[2.0 / 9.0, 1.0 / 3.0, 4.0 / 9.0],
    ],
    b: &[2.0 / 9.0, 1.0 / 3.0, 4.0 / 9.0, 0.0],
    e: &[5.0 / 72.0, -1.0 / 12.0, -1.0 / 9.0, 1.0 / 8.0],
    error_order: 2.0,
};

fn tableau(method: SolverMethod) -> &'static ButcherTableau {
    match method {
        SolverMethod::Rk45 => &DORMAND_PRINCE,
        SolverMethod::Rk23 => &BOGACKI_SHAMPINE,
    }
}

/// Integrate the free response of `m*x'' + b*x' + k*x = 0` over the
/// given grid, returning one `[x, v]` sample per grid time.
///
/// Steps adaptively between samples and clamps each step so the
/// solution lands exactly on every requested time. A positive
/// `min_step` force-accepts steps at the floor (with a warning when
/// the local error is above tolerance) instead of aborting the run.
pub fn integrate(
    params: &OscillatorParams,
    grid: &TimeGrid,
    options: &SolverOptions,
) -> Result<Trajectory> {
    params.validate()?;
    options.validate()?;

    let times = &grid.times;
    if times.len() < 2 {
        return Err(SimError::InvalidParameter(format!(
            "time grid needs at least 2 samples, got {}",
            times.len()
        )));
    }
    if let Some(bad) = times.iter().find(|t| !t.is_finite()) {
        return Err(SimError::InvalidParameter(format!(
            "time grid contains a non-finite sample: {bad}"
        )));
    }
    if let Some(pair) = times.windows(2).find(|pair| pair[1] <= pair[0]) {
        return Err(SimError::InvalidParameter(format!(
            "time grid must be strictly increasing, got {} after {}",
            pair[1], pair[0]
        )));
    }

    let f = |_t: f64, y: &State| -> State {
        [
            y[1],
            (-params.damping * y[1] - params.spring_constant * y[0]) / params.mass,
        ]
    };

    let tab = tableau(options.method);
    let exponent = 1.0 / (tab.error_order + 1.0);
    let span = times[times.len() - 1] - times[0];

    let mut t = times[0];
    let mut y: State = [params.initial_position, params.initial_velocity];
    let mut k1 = f(t, &y);

    let mut h = if options.first_step > 0.0 {
        options.first_step.min(span)
    } else {
        initial_step(&f, t, &y, &k1, exponent, options.rtol, options.atol, span)
    };
    if options.max_step > 0.0 {
        h = h.min(options.max_step);
    }
    if options.min_step > 0.0 {
        h = h.max(options.min_step);
    }

    let mut positions = Vec::with_capacity(times.len());
    let mut velocities = Vec::with_capacity(times.len());
    positions.push(y[0]);
    velocities.push(y[1]);

    let mut n_steps = 0usize;
    let mut n_rejected = 0usize;
    let mut floor_warned = false;

    for &target in &times[1..] {
        while t < target {
            let boundary = target - t;
            let truncated = boundary <= h;
            let mut h_try = h.min(boundary);
            if options.max_step > 0.0 {
                h_try = h_try.min(options.max_step);
            }
            let floored = options.min_step > 0.0 && h_try <= options.min_step;
            if floored {
                h_try = options.min_step.min(boundary);
            }
            if !(h_try > 0.0) || t + h_try == t {
                return Err(SimError::InvalidParameter(format!(
                    "step size underflow at t = {t}; tolerances too tight for this grid"
                )));
            }

            let (y_new, err_norm, k_last) =
                rk_step(&f, t, &y, &k1, h_try, tab, options.rtol, options.atol);

            if err_norm <= 1.0 || floored {
                if floored && err_norm > 1.0 && !floor_warned {
                    log::warn!(
                        "step clamped to min_step {} at t = {:.6}; local error above tolerance",
                        options.min_step,
                        t
                    );
                    floor_warned = true;
                }
                if h_try >= boundary {
                    t = target;
                } else {
                    t += h_try;
                }
                y = y_new;
                k1 = k_last;
                n_steps += 1;
                if !truncated {
                    let factor = if err_norm == 0.0 {
                        MAX_FACTOR
                    } else {
                        (SAFETY * err_norm.powf(-exponent)).clamp(MIN_FACTOR, MAX_FACTOR)
                    };
                    h = h_try * factor;
                }
            } else {
                n_rejected += 1;
                h = h_try * (SAFETY * err_norm.powf(-exponent)).max(MIN_FACTOR);
            }
        }
        positions.push(y[0]);
        velocities.push(y[1]);
    }

    log::debug!(
        "integrated {} samples in {} steps ({} rejected) with {:?}",
        times.len(),
        n_steps,
        n_rejected,
        options.method
    );

    Ok(Trajectory {
        positions,
        velocities,
    })
}

/// One embedded RK attempt. Returns the candidate state, the error
/// norm scaled so that values <= 1 are acceptable, and the last stage
/// derivative (valid as the next step's first stage once accepted).
fn rk_step<F>(
    f: &F,
    t: f64,
    y: &State,
    k1: &State,
    h: f64,
    tab: &ButcherTableau,
    rtol: f64,
    atol: f64,
) -> (State, f64, State)
where
    F: Fn(f64, &State) -> State,
{
    let stages = tab.c.len();
    let mut k: Vec<State> = Vec::with_capacity(stages);
    k.push(*k1);
    for s in 1..stages {
        let mut ys = *y;
        for (i, &a) in tab.a[s - 1].iter().enumerate() {
            if a != 0.0 {
                ys[0] += h * a * k[i][0];
                ys[1] += h * a * k[i][1];
            }
        }
        k.push(f(t + tab.c[s] * h, &ys));
    }

    let mut y_new = *y;
    for (i, &b) in tab.b.iter().enumerate() {
        if b != 0.0 {
            y_new[0] += h * b * k[i][0];
            y_new[1] += h * b * k[i][1];
        }
    }

    let mut err: State = [0.0, 0.0];
    for (i, &e) in tab.e.iter().enumerate() {
        if e != 0.0 {
            err[0] += h * e * k[i][0];
            err[1] += h * e * k[i][1];
        }
    }
    let mut norm_sq = 0.0;
    for j in 0..2 {
        let scale = atol + rtol * y[j].abs().max(y_new[j].abs());
        let ratio = err[j] / scale;
        norm_sq += ratio * ratio;
    }
    let err_norm = (norm_sq / 2.0).sqrt();

    (y_new, err_norm, k[stages - 1])
}

/// Starting step estimate from the scaled size of the state and its
/// first two derivatives (the usual Hairer-style heuristic).
fn initial_step<F>(
    f: &F,
    t0: f64,
    y0: &State,
    f0: &State,
    exponent: f64,
    rtol: f64,
    atol: f64,
    span: f64,
) -> f64
where
    F: Fn(f64, &State) -> State,
{
    let scale = [atol + rtol * y0[0].abs(), atol + rtol * y0[1].abs()];
    let d0 = rms(y0[0] / scale[0], y0[1] / scale[1]);
    let d1 = rms(f0[0] / scale[0], f0[1] / scale[1]);
    let h0 = if d0 < 1e-5 || d1 < 1e-5 {
        1e-6
    } else {
        0.01 * d0 / d1
    };

    let y1 = [y0[0] + h0 * f0[0], y0[1] + h0 * f0[1]];
    let f1 = f(t0 + h0, &y1);
    let d2 = rms((f1[0] - f0[0]) / scale[0], (f1[1] - f0[1]) / scale[1]) / h0;

    let h1 = if d1 <= 1e-15 && d2 <= 1e-15 {
        (h0 * 1e-3).max(1e-6)
    } else {
        (0.01 / d1.max(d2)).powf(exponent)
    };

    (100.0 * h0).min(h1).min(span)
}

fn rms(a: f64, b: f64) -> f64 {
    ((a * a + b * b) / 2.0).sqrt()
}
