use anyhow::{anyhow, Context};
use std::env;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Filter from `RUST_LOG` when it parses, else from `default_level`.
///
/// The second value carries the parse error of a rejected `RUST_LOG`.
fn build_filter(
    directives: Option<&str>,
    default_level: &str,
) -> anyhow::Result<(EnvFilter, Option<String>)> {
    let rejected = match directives.map(EnvFilter::try_new) {
        Some(Ok(filter)) => return Ok((filter, None)),
        Some(Err(err)) => Some(err.to_string()),
        None => None,
    };
    let filter = EnvFilter::try_new(default_level)
        .with_context(|| format!("Invalid log level {default_level}"))?;
    Ok((filter, rejected))
}

/// Installs the global subscriber. `RUST_LOG` wins over `default_level`.
///
/// Logs go to stderr so stdout only carries command output.
pub fn init(default_level: &str) -> anyhow::Result<()> {
    let directives = env::var(EnvFilter::DEFAULT_ENV).ok();
    let (env_filter, rejected) = build_filter(directives.as_deref(), default_level)?;
    Registry::default()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
        .map_err(|err| anyhow!("Failed to set global subscriber: {err}"))?;
    if let Some(error) = rejected {
        tracing::warn!(
            directives = directives.as_deref().unwrap_or_default(),
            %error,
            fallback = default_level,
            "Ignoring unparsable RUST_LOG"
        );
    }
    Ok(())
}
