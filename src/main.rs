use anyhow::Result;
use clap::Parser;

use springsim::engine::player::SchedulePlayer;
use springsim::engine::trajectory::EnergyProfile;
use springsim::{simulate, OscillatorParams, ScheduleOptions, SolverMethod, SolverOptions};

/// Simulate a damped mass-spring oscillator and print the keyframe
/// schedule derived from its trajectory extrema.
#[derive(Debug, Parser)]
#[command(name = "springsim", version, about)]
struct Cli {
    /// Mass in kg
    #[arg(long, default_value_t = 1.25)]
    mass: f64,

    /// Spring constant in N/m
    #[arg(long, default_value_t = 25.0)]
    spring_constant: f64,

    /// Damping coefficient in N*s/m
    #[arg(long, default_value_t = 0.1)]
    damping: f64,

    /// Initial displacement in m
    #[arg(long, default_value_t = 1.0)]
    initial_position: f64,

    /// Initial velocity in m/s
    #[arg(long, default_value_t = 0.0)]
    initial_velocity: f64,

    /// Integration method: rk45 or rk23
    #[arg(long, default_value = "rk45")]
    method: SolverMethod,

    /// Simulated span in seconds (0 = default span)
    #[arg(long, default_value_t = 0.0)]
    eval_time: f64,

    /// Grid samples over the span (0 = default count)
    #[arg(long, default_value_t = 0)]
    samples: usize,

    /// Initial step size in seconds (0 = auto)
    #[arg(long, default_value_t = 0.0)]
    first_step: f64,

    /// Minimum step size in seconds (0 = none)
    #[arg(long, default_value_t = 0.0)]
    min_step: f64,

    /// Maximum step size in seconds (0 = none)
    #[arg(long, default_value_t = 0.0)]
    max_step: f64,

    /// Constant added to every keyframe target
    #[arg(long, default_value_t = 0.0)]
    position_offset: f64,

    /// Multiplier applied to keyframe durations (1000 = milliseconds)
    #[arg(long, default_value_t = 1.0)]
    time_scale: f64,

    /// Print the full run as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let params = OscillatorParams {
        mass: cli.mass,
        spring_constant: cli.spring_constant,
        damping: cli.damping,
        initial_position: cli.initial_position,
        initial_velocity: cli.initial_velocity,
    };
    let solver = SolverOptions {
        method: cli.method,
        first_step: cli.first_step,
        min_step: cli.min_step,
        max_step: cli.max_step,
        eval_time: cli.eval_time,
        samples: cli.samples,
        ..SolverOptions::default()
    };
    let schedule_options = ScheduleOptions {
        position_offset: cli.position_offset,
        time_scale: cli.time_scale,
    };

    let run = simulate(&params, &solver, &schedule_options)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&run)?);
        return Ok(());
    }

    let attrs = &run.attributes;
    println!(
        "system: {:?}, natural {:.4} Hz, damping ratio {:.4}",
        attrs.regime, attrs.natural_frequency_hz, attrs.damping_ratio
    );
    if let Some(damped) = attrs.damped_frequency_hz {
        println!("damped frequency: {:.4} Hz", damped);
    }
    if let Some(settling) = attrs.settling_time {
        println!("settling time: {:.3} s", settling);
    }

    let energy = EnergyProfile::from_trajectory(&params, &run.trajectory);
    println!(
        "energy: {:.4} J initial, {:.4} J final over {:.3} s",
        energy.total[0],
        energy.total[energy.total.len() - 1],
        run.grid.duration()
    );
    let peak_acceleration = run
        .trajectory
        .accelerations(&params)
        .iter()
        .fold(0.0f64, |peak, a| peak.max(a.abs()));
    println!("peak acceleration: {:.4} m/s^2", peak_acceleration);
    println!(
        "extrema: {} total ({} minima, {} maxima), {:?} leading",
        run.extrema.total(),
        run.extrema.minima.len(),
        run.extrema.maxima.len(),
        run.direction
    );

    println!(
        "schedule: {} keyframes over {:.3} time units from x = {:+.4}",
        run.schedule.keyframes.len(),
        run.schedule.total_duration(),
        run.schedule.initial_position
    );
    for (i, kf) in run.schedule.keyframes.iter().take(8).enumerate() {
        println!("  #{i}: target {:+.4} over {:.4}", kf.target, kf.duration);
    }
    if run.schedule.keyframes.len() > 8 {
        println!("  ... {} more", run.schedule.keyframes.len() - 8);
    }

    let player = SchedulePlayer::new(&run.schedule);
    println!("playback preview:");
    for step in 0..=4 {
        let t = player.total_duration() * step as f64 / 4.0;
        println!("  t = {:8.3} -> x = {:+.4}", t, player.position_at(t));
    }

    Ok(())
}
