//! FileSleuth: filesystem auditor.
//!
//! Thin binary entry point. All logic lives in the `filesleuth-core`
//! and `filesleuth-cli` crates.

fn main() -> anyhow::Result<()> {
    filesleuth_cli::run()
}
