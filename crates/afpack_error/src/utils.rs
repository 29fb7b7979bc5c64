use std::{borrow::Cow, path::Path};

use sugar_path::SugarPath;

use crate::CWD;

/// `"a"`, `"a" and "b"`, `"a", "b" and "c"`.
pub fn format_quoted_strings(list: &[impl AsRef<str>]) -> String {
  let mut quoted_list = list
    .iter()
    .map(|item| format!("\"{}\"", item.as_ref()))
    .collect::<Vec<_>>();
  match quoted_list.pop() {
    Some(last_item) if !quoted_list.is_empty() => {
      format!("{} and {}", quoted_list.join(", "), last_item)
    }
    Some(last_item) => last_item,
    None => String::new(),
  }
}

pub trait PathExt {
  fn may_display_relative(&self) -> Cow<str>;
}

impl PathExt for Path {
  fn may_display_relative(&self) -> Cow<str> {
    let path = if CWD.is_set() && self.is_absolute() {
      CWD.with(|cwd| self.relative(cwd))
    } else {
      return self.to_string_lossy();
    };
    Cow::Owned(path.display().to_string())
  }
}
