//! A fluid bar struck at one end, run through the default models.
//!
//! ```text
//! RUST_LOG=info cargo run -p tremor-engine --example bar_impact
//! ```

use tracing_subscriber::EnvFilter;
use tremor_core::{Communicator, ParameterMap};
use tremor_model::Factories;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let params = ParameterMap::new()
        .with("element type", "Bar2")
        .with("end time", 2.0)
        .with("CFL", 0.5)
        .with(
            "mesh",
            ParameterMap::new().with("x elements", 50i64).with("x size", 1.0),
        )
        .with(
            "models",
            ParameterMap::new()
                .with(
                    "water",
                    ParameterMap::new()
                        .with("type", "hydrostatic")
                        .with("bulk modulus", 2.2)
                        .with("stabilization factor", 0.25),
                )
                .with("pressure", ParameterMap::new().with("type", "nodal pressure")),
        )
        .with(
            "initial conditions",
            ParameterMap::new()
                .with(
                    "density",
                    ParameterMap::new().with("field", "rho").with("value", 1.0),
                )
                .with(
                    "impact",
                    ParameterMap::new()
                        .with("field", "v")
                        .with("value", -0.01)
                        .with("set", "x+"),
                ),
        )
        .with(
            "boundary conditions",
            ParameterMap::new().with(
                "wall",
                ParameterMap::new()
                    .with("field", "a")
                    .with("value", 0.0)
                    .with("set", "x-"),
            ),
        )
        .with(
            "responses",
            ParameterMap::new()
                .with(
                    "peak compression",
                    ParameterMap::new()
                        .with("type", "history")
                        .with("field", "nodal pressure")
                        .with("reduction", "min"),
                )
                .with(
                    "progress",
                    ParameterMap::new().with("type", "log").with("every", 25i64),
                ),
        );

    let report = tremor_engine::run(&Communicator::serial(), &params, &Factories::new())?;
    let peak = report.histories["peak compression"]
        .iter()
        .map(|s| s.value)
        .fold(0.0_f64, f64::min);
    println!(
        "{} steps to t = {:.3}, peak compression {:.3e}",
        report.metrics.steps, report.clock.time, peak
    );
    for (name, us) in &report.metrics.model_us {
        println!("  {name:<16} {us:>8} us");
    }
    Ok(())
}
