use std::sync::atomic::{AtomicBool, Ordering};

use tracing::Level;

static IS_INIT: AtomicBool = AtomicBool::new(false);

/// Name of the environment variable that switches tracing on, e.g. `AFPACK_LOG=debug`.
pub const LOG_ENV: &str = "AFPACK_LOG";

/// Install the global subscriber if `AFPACK_LOG` is set. Later calls are no-ops.
pub fn enable_tracing_on_demand() {
  if std::env::var_os(LOG_ENV).is_some() {
    init();
  }
}

/// Install the global subscriber unconditionally. Later calls are no-ops.
pub fn init() {
  use tracing_subscriber::{fmt, prelude::*, EnvFilter};
  if !IS_INIT.swap(true, Ordering::SeqCst) {
    let env_filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
      .with(fmt::layer().with_writer(std::io::stderr))
      .with(env_filter)
      .with(
        tracing_subscriber::filter::Targets::new().with_targets(vec![("afpack", Level::TRACE)]),
      )
      .try_init();
  }
}
