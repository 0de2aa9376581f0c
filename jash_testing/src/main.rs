use std::{net::IpAddr, time::Duration};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use jash_testing::upstream::{self, Behavior};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Command::Upstream {
            host,
            port,
            behavior,
            delay,
        } => upstream::start_server(host, port, behavior, Duration::from_secs(delay)).await?,
        Command::Completion { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                env!("CARGO_BIN_NAME"),
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}

#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start a fake contact backend
    Upstream {
        #[arg(long, default_value = "127.0.0.1")]
        host: IpAddr,
        #[arg(long, default_value = "8001")]
        port: u16,
        /// How the backend answers contact submissions
        #[arg(long, value_enum, default_value = "accept")]
        behavior: Behavior,
        /// Seconds to wait before answering when the behavior is `hang`
        #[arg(long, default_value = "60")]
        delay: u64,
    },
    /// Generate shell completions
    Completion {
        /// The shell to generate completions for
        #[clap(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli() {
        Cli::command().debug_assert();
    }
}
