//! Yaw Bias Drive Simulation Example
//!
//! Drives a synthetic vehicle through straights, turns and stops with a
//! biased heading sensor and reports how well the estimator recovers it.

use std::error::Error;
use std::fs;
use std::path::PathBuf;

use log::info;
use yaw_bias::sim::{admission_rate, rms_error, run_simulation, settling_step, SimConfig};
use yaw_bias::YawBiasParams;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let outdir = PathBuf::from(
        std::env::var("YAW_BIAS_OUTPUT_DIR").unwrap_or_else(|_| "output-yaw-bias".to_string()),
    );
    fs::create_dir_all(&outdir)?;

    let params = match std::env::args().nth(1) {
        Some(path) => YawBiasParams::from_toml_file(&path)?,
        None => YawBiasParams::default(),
    };

    let config = SimConfig {
        steps: 6000,
        true_bias: 0.035,
        ..Default::default()
    };

    info!(
        "running {} steps at dt={} with true bias {:.4} rad",
        config.steps, config.dt, config.true_bias
    );
    info!("gate: {:?}", params.gate);

    let results = run_simulation(&config, params)?;

    let errors: Vec<f64> = results.iter().map(|r| r.error).collect();
    let settle_threshold = 0.005;

    println!("METRICS SUMMARY");
    println!("===============");
    println!("  RMS error:        {:.6}", rms_error(&errors));
    if let Some(last) = results.last() {
        println!("  Final estimate:   {:.6} (+/- {:.6})", last.estimate, last.std_dev);
    }
    println!("  Admission rate:   {:.3}", admission_rate(&results));
    match settling_step(&results, settle_threshold) {
        Some(step) => println!(
            "  Settled within {} rad at step {} (t={:.1})",
            settle_threshold, step, results[step].t
        ),
        None => println!("  Did not settle within {} rad", settle_threshold),
    }

    let csv_path = outdir.join("yaw_bias.csv");
    let mut writer = csv::Writer::from_path(&csv_path)?;
    for step in &results {
        writer.serialize(step)?;
    }
    writer.flush()?;

    info!("CSV output written to: {}", csv_path.display());
    Ok(())
}
