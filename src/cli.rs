use std::path::{Path, PathBuf};

mod instances;
mod model;
mod path;
mod terminal;

use clap::ArgAction;
use instances::Instances;
use mainline::{Config, MemoryStore, RequestContext, StoreModelCatalog, TopoService};
use model::Model;
use path::Path as PathCommand;
use tracing::instrument;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// A YAML or JSON file mapping collection names to documents
    #[arg(short, long, default_value = "snapshot.yaml", global = true)]
    snapshot: PathBuf,

    /// A TOML file overriding collection and field names
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let ctx = RequestContext::new();
        tracing::debug!(request = %ctx.request_id(), "starting request");
        let workspace = || Workspace::load(&self.snapshot, self.config.as_deref());

        match &self.command {
            Command::Model(command) => command.run(&workspace()?, &ctx),
            Command::Instances(command) => command.run(&workspace()?, &ctx),
            Command::Path(command) => command.run(&workspace()?, &ctx),
            Command::Config(command) => command.run(self.config.as_deref()),
        }
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Show the declared mainline model
    Model(Model),

    /// Show the instance tree of a business
    Instances(Instances),

    /// Show the path from a business down to one instance
    Path(PathCommand),

    /// Show or write the collection and field name configuration
    Config(ConfigCommand),
}

/// How a tree is printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Output {
    /// An indented outline
    #[default]
    Pretty,
    /// The serialized tree
    Json,
}

/// The loaded snapshot and configuration shared by every query command.
#[derive(Debug)]
pub struct Workspace {
    store: MemoryStore,
    config: Config,
}

impl Workspace {
    #[instrument]
    fn load(snapshot: &Path, config: Option<&Path>) -> anyhow::Result<Self> {
        let config = match config {
            Some(path) => Config::load(path).map_err(|e| anyhow::anyhow!(e))?,
            None => Config::default(),
        };
        let store = MemoryStore::load(snapshot)?;
        Ok(Self { store, config })
    }

    fn service(&self) -> TopoService<&MemoryStore, StoreModelCatalog<&MemoryStore>> {
        TopoService::new(
            &self.store,
            StoreModelCatalog::new(&self.store, self.config.clone()),
            self.config.clone(),
        )
    }

    const fn config(&self) -> &Config {
        &self.config
    }
}

#[derive(Debug, clap::Parser)]
pub struct ConfigCommand {
    /// Write the configuration to this path instead of printing it
    #[arg(long)]
    write: Option<PathBuf>,
}

impl ConfigCommand {
    #[instrument]
    fn run(&self, source: Option<&Path>) -> anyhow::Result<()> {
        use terminal::Colorize;

        let config = match source {
            Some(path) => Config::load(path).map_err(|e| anyhow::anyhow!(e))?,
            None => Config::default(),
        };

        if let Some(path) = &self.write {
            config.save(path).map_err(|e| anyhow::anyhow!(e))?;
            println!(
                "{}",
                format!("Wrote configuration to {}", path.display()).success()
            );
        } else {
            print!("{}", toml::to_string_pretty(&config)?);
        }
        Ok(())
    }
}
