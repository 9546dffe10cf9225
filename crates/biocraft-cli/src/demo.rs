//! `biocraft demo` – walks a sample point and command through the stack.

use std::time::Duration;

use biocraft_safety::{MonotonicClock, SafetyConfig, SafetyLayer};
use biocraft_spatial::{Rotation, Transform, transform_point};
use biocraft_types::{Admission, AngleUnit, CraftError, RiskLevel, Vec3};
use colored::Colorize;

/// Craft-local sample point: 200 mm caudal, 50 mm ventral of the origin.
const SAMPLE_POINT: Vec3 = Vec3::new(0.0, -200.0, -50.0);
const SAMPLE_TRANSLATION: Vec3 = Vec3::new(10.0, -200.0, -50.0);
const SAMPLE_ROTATION_DEG: Vec3 = Vec3::new(0.0, 0.0, 45.0);

pub fn run(safety: SafetyConfig) -> Result<(), CraftError> {
    println!(
        "{}",
        "Biomechanical craft transform & safety demo (units: mm, RAS coords)".bold()
    );
    println!();
    transforms()?;
    println!();
    admission(safety)
}

fn transforms() -> Result<(), CraftError> {
    println!("{}", "── Transforms ──".bold().cyan());

    // Reference origin at the glabella.
    let origin = Transform::new(Rotation::identity(), Vec3::zero());
    println!("  Local point (glabella reference): {}", fmt_vec(SAMPLE_POINT));
    println!(
        "  World point:                      {}",
        fmt_vec(transform_point(SAMPLE_POINT, &origin))
    );

    let yaw = Rotation::from_euler(0.0, 0.0, 45.0, AngleUnit::Degrees)?;
    let tf = Transform::new(yaw, Vec3::new(10.0, -5.0, 2.0));
    let moved = tf.transform_point(SAMPLE_POINT);
    println!("  Yaw 45° + translation [10, -5, 2]: {}", fmt_vec(moved));

    let back = tf.inverse().transform_point(moved);
    println!("  Round trip through inverse:       {}", fmt_vec(back));
    Ok(())
}

fn admission(safety: SafetyConfig) -> Result<(), CraftError> {
    println!("{}", "── Safety ──".bold().cyan());

    let interval = safety.rate_interval;
    let layer = SafetyLayer::new(safety)?;
    let clock = MonotonicClock::new();
    let t0 = clock.now();

    report(
        "sample command",
        layer.allow_command(SAMPLE_TRANSLATION, SAMPLE_ROTATION_DEG, t0, RiskLevel::Low),
    );
    report(
        "same command 1 ms later",
        layer.allow_command(
            SAMPLE_TRANSLATION,
            SAMPLE_ROTATION_DEG,
            t0 + Duration::from_millis(1),
            RiskLevel::Low,
        ),
    );

    let t1 = t0 + interval;
    let pending = layer.allow_command(SAMPLE_TRANSLATION, SAMPLE_ROTATION_DEG, t1, RiskLevel::High);
    report("high-risk command", pending.clone());
    if let Ok(Admission::PendingConfirmation { handle }) = pending {
        report(
            "operator confirmation",
            layer.confirm(&handle, t1 + Duration::from_millis(500)),
        );
    }
    Ok(())
}

fn report(label: &str, outcome: Result<Admission, CraftError>) {
    match outcome {
        Ok(Admission::Accepted { command_id }) => {
            println!("  {} {label}: accepted ({command_id})", "✓".green().bold());
        }
        Ok(Admission::PendingConfirmation { handle }) => println!(
            "  {} {label}: awaiting operator until t+{:.1}s",
            "…".yellow().bold(),
            handle.deadline.as_secs_f64()
        ),
        Err(e) => println!("  {} {label}: {e}", "✗".red().bold()),
    }
}

fn fmt_vec(v: Vec3) -> String {
    format!("[{:.3}, {:.3}, {:.3}]", v.x, v.y, v.z)
}
