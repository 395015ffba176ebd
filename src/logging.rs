//! Tracing subscriber setup for the CLI

use crate::error::{CatalogError, Result};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. `RUST_LOG` takes precedence over the
/// default level picked from `verbose`.
pub fn init(verbose: bool) -> Result<()> {
    let default_level = if verbose { LevelFilter::DEBUG } else { LevelFilter::WARN };
    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().compact().with_target(true).with_writer(std::io::stderr))
        .try_init()
        .map_err(|err| CatalogError::Config(format!("failed to install tracing subscriber: {err}")))
}
