use anyhow::Context;

use ageit_accounting::{gui, logging};

fn main() -> anyhow::Result<()> {
    logging::init();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting");

    gui::run().context("GUI toolkit failure")?;
    Ok(())
}
