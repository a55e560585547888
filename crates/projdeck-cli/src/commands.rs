use crate::args::{Cli, Commands};
use crate::config::{self, Config};
use crate::handlers;
use anyhow::Result;

pub fn run(cli: Cli) -> Result<()> {
    let data_dir = config::resolve_data_dir(cli.data_dir.as_deref())?;
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| Config::default_path(&data_dir));

    // `init` is the one command that must work before a config exists.
    if let Some(Commands::Init { force }) = &cli.command {
        return handlers::init::run(&data_dir, &config_path, *force);
    }

    let config = Config::load_from(&config_path)?;
    match cli.command {
        None | Some(Commands::Generate) => handlers::generate::run(&config, &data_dir, cli.verbose),
        Some(Commands::List) => handlers::list::run(&config, &data_dir, cli.format),
        Some(Commands::Sync) => handlers::sync::run(&config, &data_dir),
        Some(Commands::Serve { port }) => handlers::serve::run(&config, &data_dir, port),
        Some(Commands::Init { .. }) => Ok(()),
    }
}
