use std::path::{Path, PathBuf};

use afpack_core::BuildResult;
use afpack_error::Error;

/// Fixture directories whose name contains this are the only ones run.
pub const DEFAULT_FOCUS_MARKER: &str = "-only";

/// Decides which fixtures are focused.
///
/// A fixture is focused when its name contains `marker`, or contains
/// `substring` when one is given. When nothing is focused every fixture runs.
#[derive(Debug, Clone)]
pub struct FixtureFilter {
  pub marker: Option<String>,
  pub substring: Option<String>,
}

impl Default for FixtureFilter {
  fn default() -> Self {
    Self {
      marker: Some(DEFAULT_FOCUS_MARKER.to_string()),
      substring: None,
    }
  }
}

impl FixtureFilter {
  pub fn with_substring(substring: impl Into<String>) -> Self {
    Self {
      substring: Some(substring.into()),
      ..Default::default()
    }
  }

  pub fn is_focused(&self, name: &str) -> bool {
    [&self.marker, &self.substring]
      .into_iter()
      .flatten()
      .any(|needle| name.contains(needle.as_str()))
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
  pub name: String,
  pub root: PathBuf,
  pub skipped: bool,
}

/// Fixtures below `root`, sorted by name. Hidden directories are never listed.
pub fn discover_fixtures(root: &Path, filter: &FixtureFilter) -> BuildResult<Vec<Fixture>> {
  let entries = std::fs::read_dir(root)
    .map_err(|e| Error::io_error(e).context(format!("listing fixtures in {}", root.display())))?;

  let mut fixtures = vec![];
  for entry in entries {
    let entry = entry?;
    // Follows symlinks, so a linked fixture directory counts.
    if !entry.path().is_dir() {
      continue;
    }
    let name = entry.file_name().to_string_lossy().to_string();
    if name.starts_with('.') {
      continue;
    }
    fixtures.push((filter.is_focused(&name), name, entry.path()));
  }
  fixtures.sort_by(|a, b| a.1.cmp(&b.1));

  let any_focused = fixtures.iter().any(|(focused, ..)| *focused);
  Ok(
    fixtures
      .into_iter()
      .map(|(focused, name, root)| Fixture {
        name,
        root,
        skipped: any_focused && !focused,
      })
      .collect(),
  )
}
