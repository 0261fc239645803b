use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::Parser;
use jscal_app::cli::{CheckArgs, Cli, Command, ConvertArgs};
use jscal_app::convert::{self, Format, Options, Summary};
use jscal_core::config::{Settings, load_config};
use jscal_ical::{IcalConfig, ParseOptions};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

fn main() -> Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping warn");
    }
    tracing::debug!(config = ?config, "Configuration loaded");

    match cli.command {
        Command::Convert(args) => run_convert(&args, &config),
        Command::Check(args) => run_check(&args, &config),
    }
}

fn read_input(path: &Path) -> Result<String> {
    let mut text = String::new();
    if path == Path::new("-") {
        std::io::stdin().read_to_string(&mut text)?;
    } else {
        text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
    }
    Ok(text)
}

fn input_format(explicit: Option<Format>, path: &Path) -> Result<Format> {
    match explicit.or_else(|| Format::of_path(path)) {
        Some(format) => Ok(format),
        None => bail!("Cannot tell the format of {}; pass --from", path.display()),
    }
}

fn options(config: &Settings, force_group: bool, pretty: bool) -> Options {
    let mut parse = ParseOptions::from(&config.ical);
    parse.force_group |= force_group;
    Options {
        ical: IcalConfig::from(&config.ical),
        parse,
        pretty,
    }
}

fn run_convert(args: &ConvertArgs, config: &Settings) -> Result<()> {
    let from = input_format(args.from, &args.input)?;
    let to = args
        .to
        .or_else(|| args.output.as_deref().and_then(Format::of_path))
        .unwrap_or_else(|| from.other());
    tracing::info!(input = %args.input.display(), %from, %to, "Converting");

    let text = read_input(&args.input)?;
    let output = convert::convert(&text, from, to, &options(config, args.group, args.pretty))?;
    match &args.output {
        Some(path) => std::fs::write(path, output)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(output.as_bytes())?;
            if !output.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
        }
    }
    Ok(())
}

fn run_check(args: &CheckArgs, config: &Settings) -> Result<()> {
    let from = input_format(args.from, &args.input)?;
    let text = read_input(&args.input)?;
    let entity = convert::read(&text, from, &options(config, false, false))?;
    println!("{}", Summary::of(&entity));
    Ok(())
}
