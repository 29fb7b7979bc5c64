use std::{
  collections::BTreeSet,
  path::{Path, PathBuf},
};

use afpack_error::{Error, Mismatch};
use sugar_path::SugarPath;

use crate::BuildResult;

pub const DIST_DIR: &str = "dist";
pub const EXPECTED_DIR: &str = "expected";

/// Result of comparing a build's output directory with its golden directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
  pub actual_dir: PathBuf,
  pub expected_dir: PathBuf,
  /// Files found in the output directory, relative and `/`-separated.
  pub files: Vec<String>,
  pub mismatches: Vec<Mismatch>,
}

impl Verification {
  pub fn is_match(&self) -> bool {
    self.mismatches.is_empty()
  }

  /// Turns any mismatch into an `OUTPUT_MISMATCH` error.
  pub fn into_result(self) -> BuildResult<Vec<String>> {
    if self.is_match() {
      Ok(self.files)
    } else {
      Err(Error::output_mismatch(
        self.actual_dir,
        self.expected_dir,
        self.mismatches,
      ))
    }
  }
}

/// All non-directory files below `dir`, sorted. Dot-files are skipped and a
/// missing `dir` has no files.
pub fn list_files(dir: &Path) -> BuildResult<Vec<String>> {
  if !dir.is_dir() {
    return Ok(vec![]);
  }
  let pattern = format!(
    "{}/**/*",
    glob::Pattern::escape(&dir.to_string_lossy())
  );
  let options = glob::MatchOptions {
    require_literal_leading_dot: true,
    ..glob::MatchOptions::new()
  };
  let mut files = vec![];
  for entry in glob::glob_with(&pattern, options).map_err(|e| Error::panic(e.to_string()))? {
    let path = entry.map_err(|e| Error::io_error(e.into()))?;
    if path.is_file() {
      let relative = path
        .strip_prefix(dir)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.relative(dir));
      files.push(relative.to_slash_lossy().into_owned());
    }
  }
  files.sort();
  Ok(files)
}

/// Compare `cwd/dist` against `cwd/expected`.
pub fn verify_build_result(cwd: &Path) -> BuildResult<Verification> {
  verify_dirs(&cwd.join(DIST_DIR), &cwd.join(EXPECTED_DIR))
}

pub fn verify_dirs(actual_dir: &Path, expected_dir: &Path) -> BuildResult<Verification> {
  let actual_files = list_files(actual_dir)?;
  let expected_files = list_files(expected_dir)?;

  let mut mismatches = vec![];
  if actual_files.len() != expected_files.len() {
    mismatches.push(Mismatch::FileCount {
      actual: actual_files.len(),
      expected: expected_files.len(),
    });
  }

  let expected_set = expected_files.iter().collect::<BTreeSet<_>>();
  for file in &actual_files {
    if !expected_set.contains(file) {
      mismatches.push(Mismatch::MissingExpected { file: file.clone() });
      continue;
    }
    let actual = read_text(&actual_dir.join(file))?;
    let expected = read_text(&expected_dir.join(file))?;
    if let Some((line, actual, expected)) = first_difference(&actual, &expected) {
      mismatches.push(Mismatch::ContentDiffers {
        file: file.clone(),
        line,
        actual,
        expected,
      });
    }
  }

  let actual_set = actual_files.iter().collect::<BTreeSet<_>>();
  mismatches.extend(
    expected_files
      .iter()
      .filter(|file| !actual_set.contains(file))
      .map(|file| Mismatch::MissingActual { file: file.clone() }),
  );

  Ok(Verification {
    actual_dir: actual_dir.to_path_buf(),
    expected_dir: expected_dir.to_path_buf(),
    files: actual_files,
    mismatches,
  })
}

fn read_text(path: &Path) -> BuildResult<String> {
  let bytes = std::fs::read(path)
    .map_err(|e| Error::io_error(e).context(format!("reading {}", path.display())))?;
  Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// 1-based line number and the differing lines, `None` if the texts are equal.
fn first_difference(actual: &str, expected: &str) -> Option<(usize, String, String)> {
  if actual == expected {
    return None;
  }
  let mut actual_lines = actual.split_inclusive('\n');
  let mut expected_lines = expected.split_inclusive('\n');
  let mut line = 1;
  loop {
    match (actual_lines.next(), expected_lines.next()) {
      (Some(a), Some(e)) if a == e => line += 1,
      (a, e) => {
        return Some((
          line,
          a.unwrap_or_default().to_string(),
          e.unwrap_or_default().to_string(),
        ))
      }
    }
  }
}
