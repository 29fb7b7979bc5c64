use std::{borrow::Cow, fmt::Debug, time::Duration};

use afpack_error::ErrorKind;
use tracing::instrument;

use crate::{BuildResult, BundlerConfig};

pub type BundlerName<'a> = Cow<'a, str>;

/// What a successful bundler run reports back.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BundlerOutput {
  pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildStats {
  pub elapsed: Duration,
  pub warnings: Vec<String>,
}

/// The external module bundler.
///
/// `run` resolves once the build has finished and its files are written under
/// `config.output.path`.
#[async_trait::async_trait]
pub trait Bundler: Debug + Send + Sync {
  fn name(&self) -> BundlerName;

  async fn run(&self, config: &BundlerConfig) -> BuildResult<BundlerOutput>;
}

/// Run `bundler` to completion. Any failure is reported as a compilation error.
#[instrument(skip_all, fields(bundler = %bundler.name()))]
pub async fn execute(bundler: &dyn Bundler, config: &BundlerConfig) -> BuildResult<BuildStats> {
  tracing::debug!("{:#?}", config);
  let start = std::time::Instant::now();
  let output = bundler.run(config).await.map_err(|err| match err.kind {
    ErrorKind::Compilation { .. } => err,
    _ => afpack_error::Error::compilation(err.to_string()),
  })?;
  let stats = BuildStats {
    elapsed: start.elapsed(),
    warnings: output.warnings,
  };
  for warning in &stats.warnings {
    tracing::warn!("{}", warning);
  }
  tracing::debug!("Finished in {:?}", stats.elapsed);
  Ok(stats)
}
