use std::{
  borrow::Cow,
  sync::atomic::{AtomicUsize, Ordering},
};

use afpack_core::{BuildResult, Bundler, BundlerConfig, BundlerName, BundlerOutput};
use afpack_error::Error;

/// A stand-in for a real bundler.
///
/// Each entry is copied to `<output.path>/<name>.js`, preceded by the
/// `banner` option when one is configured. A `fail` option makes the build
/// fail with that message, and a `warn` option is reported as a warning.
#[derive(Debug, Default)]
pub struct StubBundler {
  runs: AtomicUsize,
}

impl StubBundler {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn runs(&self) -> usize {
    self.runs.load(Ordering::SeqCst)
  }
}

#[async_trait::async_trait]
impl Bundler for StubBundler {
  fn name(&self) -> BundlerName {
    Cow::Borrowed("stub")
  }

  async fn run(&self, config: &BundlerConfig) -> BuildResult<BundlerOutput> {
    self.runs.fetch_add(1, Ordering::SeqCst);
    if let Some(reason) = config.extra.get("fail").and_then(|v| v.as_str()) {
      return Err(Error::compilation(reason));
    }

    let banner = config
      .extra
      .get("banner")
      .and_then(|v| v.as_str())
      .map(|banner| format!("{banner}\n"))
      .unwrap_or_default();

    tokio::fs::create_dir_all(&config.output.path).await?;
    for (name, entry) in &config.entry {
      let source = tokio::fs::read_to_string(entry).await?;
      let dest = config.output.path.join(format!("{name}.js"));
      tokio::fs::write(dest, format!("{banner}{source}")).await?;
    }

    Ok(BundlerOutput {
      warnings: config
        .extra
        .get("warn")
        .and_then(|v| v.as_str())
        .map(|w| vec![w.to_string()])
        .unwrap_or_default(),
    })
  }
}
