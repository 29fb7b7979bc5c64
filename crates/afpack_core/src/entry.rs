use std::path::{Path, PathBuf};

use afpack_error::Error;

use crate::BuildResult;

pub const DEFAULT_ENTRY_CANDIDATES: [&str; 2] = ["index.ts", "index.js"];

/// Picks the entry file of a fixture by probing candidate names in order.
#[derive(Debug, Clone)]
pub struct EntryResolver {
  candidates: Vec<String>,
}

impl Default for EntryResolver {
  fn default() -> Self {
    Self::with_candidates(DEFAULT_ENTRY_CANDIDATES)
  }
}

impl EntryResolver {
  pub fn with_candidates(candidates: impl IntoIterator<Item = impl Into<String>>) -> Self {
    Self {
      candidates: candidates.into_iter().map(Into::into).collect(),
    }
  }

  pub fn resolve(&self, cwd: &Path) -> BuildResult<PathBuf> {
    self
      .candidates
      .iter()
      .map(|name| cwd.join(name))
      .find(|path| path.is_file())
      .ok_or_else(|| Error::missing_entry(cwd, &self.candidates))
  }
}

/// `index.ts` if present, otherwise `index.js`.
pub fn resolve_entry(cwd: &Path) -> BuildResult<PathBuf> {
  EntryResolver::default().resolve(cwd)
}
