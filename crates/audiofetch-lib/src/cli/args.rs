use clap::{ArgAction, Parser};
use std::ffi::OsString;
use tracing::Level;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Fetch { config_path: Option<String> },
}

pub struct Args {
    pub command: Command,
    pub log_level: Level,
}

#[derive(Debug, Parser)]
#[command(
    name = "audiofetch",
    version,
    about = "Download the bundled audio catalog into assets/audio"
)]
struct Cli {
    #[arg(
        short = 'v',
        long = "verbose",
        help = "Sets the level of verbosity",
        action = ArgAction::Count
    )]
    verbose: u8,

    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Optional config file with HTTP transport settings"
    )]
    config: Option<String>,
}

fn log_level_for(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn args_from_cli(cli: Cli) -> Args {
    Args {
        command: Command::Fetch {
            config_path: cli.config,
        },
        log_level: log_level_for(cli.verbose),
    }
}

/// Parses arguments without touching global logging state.
pub fn try_parse_args_from<I, T>(args: I) -> Result<Args, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::try_parse_from(args).map(args_from_cli)
}

pub fn parse_args() -> Args {
    let args = args_from_cli(Cli::parse());
    init_tracing(args.log_level);
    args
}

/// Diagnostics go to stderr; stdout carries only the status lines.
fn init_tracing(log_level: Level) {
    let mut filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();
    if let Ok(directive) = "hyper_util=warn".parse() {
        filter = filter.add_directive(directive);
    }

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}
