//! `topo`: inspect mainline topology from a store snapshot.

use clap::Parser;

mod cli;

fn main() -> anyhow::Result<()> {
    cli::Cli::parse().run()
}
