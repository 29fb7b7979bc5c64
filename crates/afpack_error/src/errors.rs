use crate::Error;

/// Errors of the fixtures that failed in one run.
///
/// [Errors] is never empty.
#[derive(Debug)]
pub struct Errors(Vec<Error>);

impl Errors {
  /// This method will panic if passing Vec<Error> is empty.
  pub fn from_vec(vec: Vec<Error>) -> Self {
    assert!(
      !vec.is_empty(),
      "You must pass a non-empty Vec<Error> to Errors::from_vec"
    );
    Self(vec)
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn iter(&self) -> impl Iterator<Item = &Error> {
    self.0.iter()
  }
}

impl std::fmt::Display for Errors {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    for (idx, err) in self.0.iter().enumerate() {
      if idx > 0 {
        writeln!(f)?;
      }
      write!(f, "[{}] {}", err.kind.code(), err)?;
    }
    Ok(())
  }
}

impl std::error::Error for Errors {}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn one_line_per_error_with_code() {
    let errors = Errors::from_vec(vec![
      Error::compilation("boom"),
      Error::panic("unreachable".to_string()),
    ]);
    assert_eq!(errors.len(), 2);
    assert_eq!(
      errors.to_string(),
      "[COMPILATION] Build failed: boom\n[PANIC] unreachable"
    );
  }

  #[test]
  #[should_panic]
  fn empty_is_rejected() {
    Errors::from_vec(vec![]);
  }
}
