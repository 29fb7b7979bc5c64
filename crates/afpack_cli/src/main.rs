use std::{path::PathBuf, process::ExitCode, sync::Arc, time::Duration};

use afpack::{
  discover_fixtures, BuildEnv, CommandBundler, FixtureFilter, FixtureRunner, Mode, Outcome,
  DEFAULT_FOCUS_MARKER,
};
use ansi_term::Color;
use clap::Parser;

/// Build every fixture with an external bundler and compare `dist/` with `expected/`.
#[derive(Parser, Debug)]
#[command(name = "afpack-fixtures", version)]
struct Cli {
  /// Directory holding one sub-directory per fixture
  root: PathBuf,

  /// Bundler program. It receives the config file through `{config}` in its
  /// arguments and through `AFPACK_CONFIG`
  #[arg(long, env = "AFPACK_BUNDLER")]
  bundler: String,

  /// Arguments for the bundler program
  #[arg(last = true)]
  bundler_args: Vec<String>,

  /// Only run fixtures whose name contains this
  #[arg(long)]
  focus: Option<String>,

  /// Ignore the `-only` suffix convention
  #[arg(long)]
  no_focus_marker: bool,

  /// Overwrite `expected/` with the produced output
  #[arg(long, short)]
  update: bool,

  /// Number of fixtures built at the same time
  #[arg(long, short)]
  jobs: Option<usize>,

  /// Give up on a bundler run after this many seconds
  #[arg(long)]
  timeout: Option<u64>,

  /// Build in development mode instead of production
  #[arg(long)]
  development: bool,

  /// Let the bundler compress its output
  #[arg(long)]
  compress: bool,

  /// Print the fixtures that would run and exit
  #[arg(long)]
  list: bool,
}

impl Cli {
  fn filter(&self) -> FixtureFilter {
    FixtureFilter {
      marker: (!self.no_focus_marker).then(|| DEFAULT_FOCUS_MARKER.to_string()),
      substring: self.focus.clone(),
    }
  }

  fn env(&self) -> BuildEnv {
    BuildEnv {
      mode: if self.development {
        Mode::Development
      } else {
        Mode::Production
      },
      compress: self.compress,
    }
  }

  fn runner(&self) -> FixtureRunner {
    let bundler = CommandBundler::new(&self.bundler)
      .args(self.bundler_args.iter().cloned())
      .timeout(self.timeout.map(Duration::from_secs));
    let mut runner = FixtureRunner::new(Arc::new(bundler))
      .with_env(self.env())
      .with_update(self.update)
      .on_outcome(|fixture, outcome| {
        let label = match outcome {
          Outcome::Passed { .. } => Color::Green.paint(outcome.label()),
          Outcome::Failed(_) => Color::Red.paint(outcome.label()),
          Outcome::Skipped => Color::Yellow.paint(outcome.label()),
        };
        println!("fixture {} ... {}", fixture.name, label);
      });
    if let Some(jobs) = self.jobs {
      runner = runner.with_concurrency(jobs);
    }
    runner
  }
}

#[tokio::main]
async fn main() -> ExitCode {
  afpack_tracing::enable_tracing_on_demand();
  let cli = Cli::parse();

  let fixtures = match discover_fixtures(&cli.root, &cli.filter()) {
    Ok(fixtures) => fixtures,
    Err(err) => {
      eprintln!("{}: {}", Color::Red.paint("error"), err);
      return ExitCode::from(2);
    }
  };

  if cli.list {
    for fixture in fixtures.iter().filter(|f| !f.skipped) {
      println!("{}", fixture.name);
    }
    return ExitCode::SUCCESS;
  }

  println!("running {} fixture(s)", fixtures.len());
  let report = cli.runner().run_all(fixtures).await;
  println!("\n{report}");
  if report.is_success() {
    ExitCode::SUCCESS
  } else {
    ExitCode::FAILURE
  }
}

#[cfg(test)]
mod tests {
  use clap::CommandFactory;

  use super::*;

  #[test]
  fn verify_cli() {
    Cli::command().debug_assert();
  }

  #[test]
  fn bundler_args_follow_double_dash() {
    let cli = Cli::parse_from([
      "afpack-fixtures",
      "test/fixtures",
      "--bundler",
      "webpack",
      "--focus",
      "css",
      "--",
      "--config",
      "{config}",
    ]);
    assert_eq!(cli.bundler_args, ["--config", "{config}"]);
    assert_eq!(cli.env(), BuildEnv::default());
    let filter = cli.filter();
    assert!(filter.is_focused("less-only"));
    assert!(filter.is_focused("css-modules"));
    assert!(!filter.is_focused("basic"));
  }

  #[test]
  fn focus_marker_can_be_disabled() {
    let cli = Cli::parse_from([
      "afpack-fixtures",
      "fixtures",
      "--bundler",
      "webpack",
      "--no-focus-marker",
      "--development",
    ]);
    assert!(!cli.filter().is_focused("basic-only"));
    assert_eq!(cli.env().mode, Mode::Development);
  }
}
