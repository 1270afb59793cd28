use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Install the process-wide fmt subscriber. Invalid directives in `filter` are skipped
/// and the level falls back to `info`.
pub fn init(filter: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(filter);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing log subscriber: {e}"))
}
