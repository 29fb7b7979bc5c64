use std::{path::Path, sync::Arc};

use afpack_core::{
  execute, list_files, load_build_options, verify_build_result, BuildEnv, BuildOptions,
  BuildResult, BuildStats, Bundler, ConfigSynthesizer, DefaultConfigSynthesizer, EntryResolver,
  DIST_DIR, EXPECTED_DIR,
};
use afpack_error::Error;
use derivative::Derivative;
use futures::StreamExt;
use tracing::instrument;

use crate::{accept_output, Fixture, Outcome, Report};

pub type OutcomeHandler = Arc<dyn Fn(&Fixture, &Outcome) + Send + Sync>;

/// Builds fixtures with a [Bundler] and checks their output against `expected/`.
///
/// Each fixture's root directory is passed explicitly down to every
/// collaborator, so fixtures are free to run concurrently.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct FixtureRunner {
  bundler: Arc<dyn Bundler>,
  synthesizer: Arc<dyn ConfigSynthesizer>,
  entry_resolver: EntryResolver,
  env: BuildEnv,
  concurrency: usize,
  update: bool,
  #[derivative(Debug = "ignore")]
  on_outcome: Option<OutcomeHandler>,
}

impl FixtureRunner {
  pub fn new(bundler: Arc<dyn Bundler>) -> Self {
    afpack_tracing::enable_tracing_on_demand();
    Self {
      bundler,
      synthesizer: Arc::new(DefaultConfigSynthesizer),
      entry_resolver: EntryResolver::default(),
      env: BuildEnv::default(),
      concurrency: std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1),
      update: false,
      on_outcome: None,
    }
  }

  pub fn with_synthesizer(mut self, synthesizer: Arc<dyn ConfigSynthesizer>) -> Self {
    self.synthesizer = synthesizer;
    self
  }

  pub fn with_entry_resolver(mut self, entry_resolver: EntryResolver) -> Self {
    self.entry_resolver = entry_resolver;
    self
  }

  pub fn with_env(mut self, env: BuildEnv) -> Self {
    self.env = env;
    self
  }

  pub fn with_concurrency(mut self, concurrency: usize) -> Self {
    self.concurrency = concurrency.max(1);
    self
  }

  /// Accept the produced output as the new `expected/` instead of verifying it.
  pub fn with_update(mut self, update: bool) -> Self {
    self.update = update;
    self
  }

  pub fn on_outcome(mut self, handler: impl Fn(&Fixture, &Outcome) + Send + Sync + 'static) -> Self {
    self.on_outcome = Some(Arc::new(handler));
    self
  }

  /// Synthesize the fixture's config and run the bundler into `cwd/dist`.
  #[instrument(skip_all, fields(fixture = %cwd.display()))]
  pub async fn build(&self, cwd: &Path) -> BuildResult<BuildStats> {
    let opts = load_build_options(cwd, BuildOptions::for_fixture(cwd))?;
    let mut config = self.synthesizer.synthesize(opts, &self.env)?;
    config.set_entry(self.entry_resolver.resolve(cwd)?);
    config.set_output_path(cwd.join(DIST_DIR));

    let dist = cwd.join(DIST_DIR);
    if tokio::fs::metadata(&dist).await.map_or(false, |m| m.is_dir()) {
      tokio::fs::remove_dir_all(&dist)
        .await
        .map_err(|e| Error::io_error(e).context(format!("cleaning {}", dist.display())))?;
    }

    execute(self.bundler.as_ref(), &config).await
  }

  /// Build the fixture at `cwd`, then verify (or accept) its output.
  ///
  /// Returns the files that were compared.
  pub async fn run_fixture(&self, cwd: &Path) -> BuildResult<Vec<String>> {
    self.build(cwd).await?;
    let cwd = cwd.to_path_buf();
    let update = self.update;
    // Walking and reading whole output trees blocks, keep it off the async workers.
    tokio::task::spawn_blocking(move || -> BuildResult<Vec<String>> {
      if update {
        accept_output(&cwd)?;
        return list_files(&cwd.join(EXPECTED_DIR));
      }
      verify_build_result(&cwd)?.into_result()
    })
    .await
    .map_err(|e| Error::panic(format!("Verification task failed: {e}")))?
  }

  pub async fn run(&self, fixture: &Fixture) -> Outcome {
    let outcome = if fixture.skipped {
      Outcome::Skipped
    } else {
      match self.run_fixture(&fixture.root).await {
        Ok(files) => Outcome::Passed { files },
        Err(err) => Outcome::Failed(err),
      }
    };
    match &outcome {
      Outcome::Passed { files } => tracing::info!("{} passed ({} file(s))", fixture.name, files.len()),
      Outcome::Failed(err) => tracing::error!("{} failed: {}", fixture.name, err.kind.code()),
      Outcome::Skipped => tracing::debug!("{} skipped", fixture.name),
    }
    if let Some(handler) = &self.on_outcome {
      handler(fixture, &outcome);
    }
    outcome
  }

  /// Run every fixture, at most `concurrency` at a time. The report keeps the input order.
  pub async fn run_all(&self, fixtures: Vec<Fixture>) -> Report {
    let entries = futures::stream::iter(fixtures)
      .map(|fixture| async move {
        let outcome = self.run(&fixture).await;
        (fixture, outcome)
      })
      .buffered(self.concurrency)
      .collect::<Vec<_>>()
      .await;
    Report::new(entries)
  }
}
