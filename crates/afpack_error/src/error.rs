use std::{fmt::Display, path::Path};

use crate::{ErrorKind, Mismatch};

#[derive(Debug)]
pub struct Error {
  contexts: Vec<String>,
  pub kind: ErrorKind,
}

impl Error {
  fn with_kind(kind: ErrorKind) -> Self {
    Self {
      contexts: vec![],
      kind,
    }
  }

  pub fn context(mut self, context: impl Into<String>) -> Self {
    self.contexts.push(context.into());
    self
  }

  pub fn contexts(&self) -> &[String] {
    &self.contexts
  }

  /// Like `Display`, without colours and with paths shortened relative to `cwd`.
  pub fn to_readable_string(&self, cwd: impl AsRef<Path>) -> String {
    let mut output = String::new();
    for ctx in self.contexts.iter().rev() {
      output.push_str(&format!("context: {ctx}\n"));
    }
    output + &self.kind.to_readable_string(cwd)
  }

  // --- Fixture input

  pub fn config_parse(path: impl AsRef<Path>, source: serde_json::Error) -> Self {
    Self::with_kind(ErrorKind::ConfigParse {
      path: path.as_ref().to_path_buf(),
      reason: source.to_string(),
    })
  }

  pub fn config_not_an_object(path: impl AsRef<Path>) -> Self {
    Self::with_kind(ErrorKind::ConfigParse {
      path: path.as_ref().to_path_buf(),
      reason: "expected a JSON object at the top level".to_string(),
    })
  }

  pub fn missing_entry(cwd: impl AsRef<Path>, candidates: &[impl AsRef<str>]) -> Self {
    Self::with_kind(ErrorKind::MissingEntry {
      cwd: cwd.as_ref().to_path_buf(),
      candidates: candidates
        .iter()
        .map(|c| c.as_ref().to_string())
        .collect(),
    })
  }

  pub fn invalid_option(key: impl Into<String>, expected: &'static str) -> Self {
    Self::with_kind(ErrorKind::InvalidOption {
      key: key.into(),
      expected,
    })
  }

  // --- Bundler

  pub fn compilation(reason: impl Into<String>) -> Self {
    Self::with_kind(ErrorKind::Compilation {
      reason: reason.into(),
    })
  }

  // --- Verification

  pub fn output_mismatch(
    actual_dir: impl AsRef<Path>,
    expected_dir: impl AsRef<Path>,
    mismatches: Vec<Mismatch>,
  ) -> Self {
    debug_assert!(!mismatches.is_empty());
    Self::with_kind(ErrorKind::OutputMismatch {
      actual_dir: actual_dir.as_ref().to_path_buf(),
      expected_dir: expected_dir.as_ref().to_path_buf(),
      mismatches,
    })
  }

  pub fn io_error(e: std::io::Error) -> Self {
    Self::with_kind(ErrorKind::IoError(e))
  }

  pub fn panic(msg: String) -> Self {
    anyhow::format_err!(msg).into()
  }
}

impl std::convert::From<anyhow::Error> for Error {
  fn from(value: anyhow::Error) -> Self {
    Self::with_kind(ErrorKind::Panic { source: value })
  }
}

impl std::convert::From<std::io::Error> for Error {
  fn from(value: std::io::Error) -> Self {
    Self::io_error(value)
  }
}

impl std::error::Error for Error {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match &self.kind {
      ErrorKind::Panic { source, .. } => Some(source.as_ref()),
      ErrorKind::IoError(source) => Some(source),
      _ => None,
    }
  }
}

impl Display for Error {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    for ctx in self.contexts.iter().rev() {
      writeln!(f, "{}: {}", ansi_term::Color::Yellow.paint("context"), ctx)?;
    }

    self.kind.fmt(f)
  }
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;

  use super::*;

  #[test]
  fn codes_follow_kind() {
    assert_eq!(Error::compilation("boom").kind.code(), "COMPILATION");
    assert_eq!(
      Error::missing_entry("/tmp/fx", &["index.ts", "index.js"])
        .kind
        .code(),
      "MISSING_ENTRY"
    );
    assert_eq!(Error::panic("oops".to_string()).kind.code(), "PANIC");
  }

  #[test]
  fn paths_are_shortened_relative_to_cwd() {
    let cwd = PathBuf::from("/work/fixtures/basic");
    let err = Error::missing_entry(&cwd, &["index.ts", "index.js"]);
    insta::assert_snapshot!(
      err.kind.to_readable_string("/work/fixtures"),
      @r###"Could not find an entry in "basic", tried "index.ts" and "index.js"."###
    );
  }

  #[test]
  fn mismatch_lists_every_difference() {
    let err = Error::output_mismatch(
      "/fx/dist",
      "/fx/expected",
      vec![
        Mismatch::FileCount {
          actual: 1,
          expected: 2,
        },
        Mismatch::MissingActual {
          file: "index.css".to_string(),
        },
      ],
    );
    assert_eq!(
      err.kind.to_readable_string("/fx"),
      "Output in \"dist\" does not match \"expected\":\n  - expected 2 file(s), found 1\n  - \"index.css\" is expected but was not emitted"
    );
  }

  #[test]
  fn contexts_are_kept_in_order() {
    let err = Error::compilation("exit status 1")
      .context("running bundler")
      .context("fixture basic");
    assert_eq!(err.contexts(), ["running bundler", "fixture basic"]);
  }

  #[test]
  fn readable_string_keeps_contexts() {
    let err = Error::missing_entry("/work/fixtures/basic", &["index.js"])
      .context("resolving entry");
    assert_eq!(
      err.to_readable_string("/work/fixtures"),
      "context: resolving entry\nCould not find an entry in \"basic\", tried \"index.js\"."
    );
  }
}
