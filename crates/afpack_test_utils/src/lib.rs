pub mod fixture_tree;
pub mod stub_bundler;

pub use fixture_tree::FixtureTree;
pub use stub_bundler::StubBundler;
