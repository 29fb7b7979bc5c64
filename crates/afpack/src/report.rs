use std::fmt::Display;

use afpack_error::{Error, Errors};

use crate::Fixture;

#[derive(Debug)]
pub enum Outcome {
  Passed { files: Vec<String> },
  Failed(Error),
  Skipped,
}

impl Outcome {
  pub fn is_passed(&self) -> bool {
    matches!(self, Outcome::Passed { .. })
  }

  pub fn is_failed(&self) -> bool {
    matches!(self, Outcome::Failed(_))
  }

  pub fn is_skipped(&self) -> bool {
    matches!(self, Outcome::Skipped)
  }

  pub fn label(&self) -> &'static str {
    match self {
      Outcome::Passed { .. } => "ok",
      Outcome::Failed(_) => "FAILED",
      Outcome::Skipped => "skipped",
    }
  }
}

/// Outcomes of one run, in fixture order.
#[derive(Debug, Default)]
pub struct Report {
  entries: Vec<(Fixture, Outcome)>,
}

impl Report {
  pub fn new(entries: Vec<(Fixture, Outcome)>) -> Self {
    Self { entries }
  }

  pub fn entries(&self) -> &[(Fixture, Outcome)] {
    &self.entries
  }

  pub fn outcome(&self, name: &str) -> Option<&Outcome> {
    self
      .entries
      .iter()
      .find(|(fixture, _)| fixture.name == name)
      .map(|(_, outcome)| outcome)
  }

  pub fn passed(&self) -> usize {
    self.count(Outcome::is_passed)
  }

  pub fn failed(&self) -> usize {
    self.count(Outcome::is_failed)
  }

  pub fn skipped(&self) -> usize {
    self.count(Outcome::is_skipped)
  }

  fn count(&self, predicate: impl Fn(&Outcome) -> bool) -> usize {
    self
      .entries
      .iter()
      .filter(|(_, outcome)| predicate(outcome))
      .count()
  }

  pub fn is_success(&self) -> bool {
    self.failed() == 0
  }

  /// Errors of every failed fixture, each with the fixture name as context.
  pub fn into_result(self) -> Result<(), Errors> {
    let errors = self
      .entries
      .into_iter()
      .filter_map(|(fixture, outcome)| match outcome {
        Outcome::Failed(err) => Some(err.context(format!("fixture {}", fixture.name))),
        _ => None,
      })
      .collect::<Vec<_>>();
    if errors.is_empty() {
      Ok(())
    } else {
      Err(Errors::from_vec(errors))
    }
  }
}

impl Display for Report {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    for (fixture, outcome) in &self.entries {
      writeln!(f, "fixture {} ... {}", fixture.name, outcome.label())?;
    }
    for (fixture, outcome) in &self.entries {
      if let Outcome::Failed(err) = outcome {
        writeln!(f, "\n---- {} ----\n{}", fixture.name, err.to_readable_string(&fixture.root))?;
      }
    }
    write!(
      f,
      "\nresult: {}. {} passed; {} failed; {} skipped",
      if self.is_success() { "ok" } else { "FAILED" },
      self.passed(),
      self.failed(),
      self.skipped()
    )
  }
}
