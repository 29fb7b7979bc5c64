use std::{path::Path, sync::Arc};

use afpack::FixtureRunner;
use afpack_test_utils::StubBundler;

pub fn stub_runner() -> FixtureRunner {
  FixtureRunner::new(Arc::new(StubBundler::new()))
}

/// Build the fixture that owns `expected_entry` and verify its output.
pub fn run_test(expected_entry: &Path) {
  let fixture_root = expected_entry
    .parent()
    .and_then(Path::parent)
    .expect("expected/index.js lives two levels below the fixture root");

  let files = tokio::runtime::Runtime::new()
    .unwrap()
    .block_on(stub_runner().run_fixture(fixture_root))
    .unwrap_or_else(|err| panic!("{}", err.kind.to_readable_string(fixture_root)));
  assert!(files.iter().any(|f| f == "index.js"));
}
