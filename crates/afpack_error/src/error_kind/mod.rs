use std::{
  fmt::Display,
  path::{Path, PathBuf},
};

use crate::utils::{format_quoted_strings, PathExt};
use crate::CWD;

pub mod error_code;

#[derive(Debug)]
pub enum ErrorKind {
  // --- Fixture input
  ConfigParse {
    path: PathBuf,
    reason: String,
  },
  MissingEntry {
    cwd: PathBuf,
    candidates: Vec<String>,
  },
  InvalidOption {
    key: String,
    expected: &'static str,
  },

  // --- Bundler
  Compilation {
    reason: String,
  },

  // --- Verification
  OutputMismatch {
    actual_dir: PathBuf,
    expected_dir: PathBuf,
    mismatches: Vec<Mismatch>,
  },

  /// Unrecoverable error that does not fit any other kind.
  ///
  /// Also used in place of `panic!()` so a broken fixture fails on its own
  /// instead of taking the whole run down.
  Panic {
    source: anyhow::Error,
  },

  IoError(std::io::Error),
}

/// A single difference between a build's `dist/` and its `expected/` directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
  FileCount {
    actual: usize,
    expected: usize,
  },
  /// Emitted by the bundler but absent from `expected/`.
  MissingExpected {
    file: String,
  },
  /// Present in `expected/` but never emitted.
  MissingActual {
    file: String,
  },
  ContentDiffers {
    file: String,
    /// 1-based line of the first difference.
    line: usize,
    actual: String,
    expected: String,
  },
}

impl Display for Mismatch {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Mismatch::FileCount { actual, expected } => {
        write!(f, "expected {expected} file(s), found {actual}")
      }
      Mismatch::MissingExpected { file } => write!(f, "\"{file}\" was emitted but is not expected"),
      Mismatch::MissingActual { file } => write!(f, "\"{file}\" is expected but was not emitted"),
      Mismatch::ContentDiffers {
        file,
        line,
        actual,
        expected,
      } => write!(
        f,
        "\"{file}\" differs at line {line}\n      expected: {expected:?}\n        actual: {actual:?}"
      ),
    }
  }
}

impl Display for ErrorKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ErrorKind::ConfigParse { path, reason } => write!(f, "Failed to parse \"{}\": {reason}", path.may_display_relative()),
      ErrorKind::MissingEntry { cwd, candidates } => write!(
        f,
        "Could not find an entry in \"{}\", tried {}.",
        cwd.may_display_relative(),
        format_quoted_strings(candidates)
      ),
      ErrorKind::InvalidOption { key, expected } => write!(f, "Option \"{key}\" must be {expected}."),
      ErrorKind::Compilation { reason } => write!(f, "Build failed: {reason}"),
      ErrorKind::OutputMismatch { actual_dir, expected_dir, mismatches } => {
        write!(f, "Output in \"{}\" does not match \"{}\":", actual_dir.may_display_relative(), expected_dir.may_display_relative())?;
        for mismatch in mismatches {
          write!(f, "\n  - {mismatch}")?;
        }
        Ok(())
      }
      ErrorKind::Panic { source } => source.fmt(f),
      ErrorKind::IoError(e) => e.fmt(f),
    }
  }
}

impl ErrorKind {
  /// Shorten the file paths in messages by make them relative to CWD.
  pub fn to_readable_string(&self, cwd: impl AsRef<Path>) -> String {
    let cwd = cwd.as_ref().to_path_buf();
    CWD.set(&cwd, || self.to_string())
  }

  pub fn code(&self) -> &'static str {
    match self {
      ErrorKind::ConfigParse { .. } => error_code::CONFIG_PARSE,
      ErrorKind::MissingEntry { .. } => error_code::MISSING_ENTRY,
      ErrorKind::InvalidOption { .. } => error_code::INVALID_OPTION,
      ErrorKind::Compilation { .. } => error_code::COMPILATION,
      ErrorKind::OutputMismatch { .. } => error_code::OUTPUT_MISMATCH,
      ErrorKind::Panic { .. } => error_code::PANIC,
      ErrorKind::IoError(_) => error_code::IO_ERROR,
    }
  }
}
