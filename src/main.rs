use acme_users::{AppConfig, run_gui, telemetry};

fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    telemetry::init(&config.log_filter)?;
    run_gui(config).map_err(|e| anyhow::anyhow!("running window: {e}"))
}
