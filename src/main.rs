use std::path::{Path, PathBuf};

use anyhow::{self, Context};
use clap::Parser;
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::file::FileAppender;
use log4rs::append::Append;
use log4rs::config::{Appender, Config, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;

use ccpop::interfaces::cli::{log_heading, Cli};
use ccpop::interfaces::input::Input;
use ccpop::interfaces::InputHandle;
use ccpop::io::read_ccpop_yaml;

/// Configures the `ccpop-output` logger to write to `output` (or the standard output if `None`),
/// and all other records to a debug log file next to it.
fn configure_logging(output: Option<&Path>) -> Result<(), anyhow::Error> {
    let output_encoder = || Box::new(PatternEncoder::new("{m}{n}"));
    let output_appender: Box<dyn Append> = match output {
        Some(path) => Box::new(
            FileAppender::builder()
                .encoder(output_encoder())
                .append(false)
                .build(path)
                .with_context(|| format!("Unable to create output file `{}`", path.display()))?,
        ),
        None => Box::new(ConsoleAppender::builder().encoder(output_encoder()).build()),
    };

    let log_path = output
        .map(|path| path.with_extension("log"))
        .unwrap_or_else(|| PathBuf::from("ccpop.log"));
    let log_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} {l:<5} {t} - {m}{n}",
        )))
        .append(false)
        .build(&log_path)
        .with_context(|| format!("Unable to create log file `{}`", log_path.display()))?;

    let config = Config::builder()
        .appender(Appender::builder().build("output", output_appender))
        .appender(Appender::builder().build("log", Box::new(log_appender)))
        .logger(
            Logger::builder()
                .appender("output")
                .additive(false)
                .build("ccpop-output", LevelFilter::Info),
        )
        .build(Root::builder().appender("log").build(LevelFilter::Debug))?;
    log4rs::init_config(config)?;
    Ok(())
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    configure_logging(cli.output.as_deref())?;
    log_heading();

    let inp = read_ccpop_yaml::<Input, _>(&cli.config)
        .with_context(|| format!("Unable to read `{}`", cli.config.display()))?;
    inp.handle()
}
