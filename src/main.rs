use ambient_particles::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<(), SimulationError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,ambient_particles=debug"));
    fmt().with_env_filter(filter).with_target(true).init();

    let mut config = FieldConfig::default();
    if let Some(seed) = std::env::var("AMBIENT_SEED").ok().and_then(|s| s.parse().ok()) {
        config = config.with_seed(seed);
    }

    Simulation::new().with_config(config).run()
}
