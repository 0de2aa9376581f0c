use std::path::PathBuf;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use jash::commands::{contact::ContactCommand, serve::serve};
use jash_utils::jash_version;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Command::Completion { shell } = cli.command {
        clap_complete::generate(
            shell,
            &mut Cli::command(),
            env!("CARGO_BIN_NAME"),
            &mut std::io::stdout(),
        );
        return Ok(());
    }

    init_tracing();

    let config = jash_config::load(&cli.config).context("Failed to load config")?;

    match cli.command {
        Command::Serve => serve(config).await?,
        Command::Contact { command } => command.invoke(config).await?,
        Command::CheckConfig { verbose } => {
            verbose.then(|| println!("{config:#?}"));
        }
        Command::Completion { .. } => unreachable!(),
    }

    Ok(())
}

#[derive(Debug, Parser)]
#[command(version = jash_version())]
struct Cli {
    /// Additional config files, applied on top of the built-in defaults
    #[arg(short, long, env = "JASH_CONFIG", value_delimiter = ':')]
    config: Vec<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start the contact proxy
    #[command(aliases(["run", "start", "r", "s"]))]
    Serve,
    /// Use the contact form from the command line
    #[command(aliases(["c"]))]
    Contact {
        #[command(subcommand)]
        command: ContactCommand,
    },
    /// Validate configuration
    CheckConfig {
        /// Print a debug representation of the config
        #[arg(short, long)]
        verbose: bool,
    },
    /// Generate shell completions
    Completion {
        /// The shell to generate completions for
        #[clap(value_enum)]
        shell: Shell,
    },
}

fn init_tracing() {
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    #[cfg(tracing_pretty)]
    let fmt_layer = fmt_layer.pretty();

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn config_paths_from_args() {
        let cli = Cli::try_parse_from(["jash", "-c", "a.toml", "-c", "b.toml", "check-config"])
            .unwrap();
        assert_eq!(cli.config, [PathBuf::from("a.toml"), PathBuf::from("b.toml")]);

        let cli = Cli::try_parse_from(["jash", "--config", "a.toml:b.toml", "serve"]).unwrap();
        assert_eq!(cli.config, [PathBuf::from("a.toml"), PathBuf::from("b.toml")]);
    }

    #[test]
    fn config_after_subcommand_rejected() {
        let result = Cli::try_parse_from(["jash", "-c", "a.toml", "check-config", "-c", "b.toml"]);
        assert!(result.is_err());
    }

    #[test]
    fn contact_send_args() {
        let cli = Cli::try_parse_from([
            "jash",
            "contact",
            "send",
            "--name",
            "Max",
            "--email",
            "max@example.de",
            "--category",
            "General",
            "--message",
            "Hello World!",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Contact { .. }));
    }
}
