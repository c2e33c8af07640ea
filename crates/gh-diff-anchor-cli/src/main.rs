mod cli;
mod commands;
mod input;
mod logger;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use commands::Settings;
use gh_diff_anchor_config::AppConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match cli.config.as_deref() {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load(),
    };
    logger::init(&config.log_filter, cli.verbose);
    log::debug!("Using config {:?}", config);

    let settings = Settings {
        format: cli.format.map_or(config.output_format, Into::into),
        pretty_json: config.pretty_json,
        default_side: config.default_side,
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    commands::run(cli.command, &settings, &mut out)
}
