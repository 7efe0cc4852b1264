//! fontcat - Main Entry Point

use clap::Parser;
use fontcat::{init_logging, install_interrupt_cleanup, run, Cli};

fn main() -> anyhow::Result<()> {
    init_logging();
    install_interrupt_cleanup();

    let cli = Cli::parse();
    tracing::debug!("fontcat v{} {:?}", env!("CARGO_PKG_VERSION"), cli);

    let stdout = std::io::stdout();
    run(&cli, &mut stdout.lock())
}
