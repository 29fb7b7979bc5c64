use std::{
  fs,
  path::{Path, PathBuf},
};

use tempfile::TempDir;

/// A throwaway fixtures root for tests.
pub struct FixtureTree {
  dir: TempDir,
}

impl FixtureTree {
  pub fn new() -> Self {
    Self {
      dir: tempfile::tempdir().expect("failed to create a temp dir"),
    }
  }

  pub fn root(&self) -> &Path {
    self.dir.path()
  }

  pub fn fixture(&self, name: &str) -> PathBuf {
    self.root().join(name)
  }

  /// Write `content` to `<fixture>/<file>`, creating directories on the way.
  pub fn write(&self, fixture: &str, file: &str, content: &str) -> &Self {
    let path = self.fixture(fixture).join(file);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
    self
  }

  pub fn mkdir(&self, fixture: &str, dir: &str) -> &Self {
    fs::create_dir_all(self.fixture(fixture).join(dir)).unwrap();
    self
  }

  pub fn read(&self, fixture: &str, file: &str) -> String {
    fs::read_to_string(self.fixture(fixture).join(file)).unwrap()
  }

  /// A fixture whose entry is copied verbatim into `expected/index.js`.
  pub fn passing(&self, fixture: &str, source: &str) -> &Self {
    self
      .write(fixture, "index.js", source)
      .write(fixture, "expected/index.js", source)
  }
}

impl Default for FixtureTree {
  fn default() -> Self {
    Self::new()
  }
}
