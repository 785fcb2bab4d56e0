//! cityinfo CLI - ask a local model what a city is known for.

#![allow(clippy::print_stdout)] // CLI program intentionally uses stdout

use std::process::ExitCode;

use cityinfo::prelude::*;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Ask a locally hosted language model about a city's industry and a fun thing to do there
#[derive(Debug, Parser)]
#[command(name = "cityinfo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// City to look up
    #[arg(default_value = "London")]
    city: String,

    /// Model to use [default: $OLLAMA_MODEL or llama3.2]
    #[arg(short, long)]
    model: Option<String>,

    /// Base URL of the Ollama server [default: $OLLAMA_BASE_URL or the local server]
    #[arg(short, long)]
    base_url: Option<String>,

    /// Request timeout in seconds [default: $OLLAMA_TIMEOUT_SECS or none]
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Sampling temperature [default: the server's]
    #[arg(long)]
    temperature: Option<f32>,

    /// Require every field to be present in the model's answer
    #[arg(short, long)]
    strict: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("failed to create tokio runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    if rt.block_on(run(cli)) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Initialize logging with the given verbosity level.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "cityinfo={level},cityinfo_cli={level},{}",
            if verbosity >= 2 { "debug" } else { "warn" }
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 2)
        .init();
}

fn config_from(cli: &Cli) -> OllamaConfig {
    let mut config = OllamaConfig::from_env();
    if let Some(model) = &cli.model {
        config = config.model(model);
    }
    if let Some(url) = &cli.base_url {
        config = config.base_url(url);
    }
    if let Some(secs) = cli.timeout {
        config = config.timeout(secs);
    }
    config
}

/// Look the city up and print the outcome. Returns whether it succeeded.
async fn run(cli: Cli) -> bool {
    let config = config_from(&cli);
    tracing::debug!(?config, "using ollama config");

    let client = match Ollama::new(config) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("{e}");
            return false;
        }
    };

    let mode = if cli.strict {
        ParseMode::Strict
    } else {
        ParseMode::Lenient
    };
    let mut guide = CityGuide::new(client).parse_mode(mode);
    if let Some(t) = cli.temperature {
        guide = guide.temperature(t);
    }

    match guide.lookup(&cli.city).await {
        Ok(info) => {
            print_info(&info, cli.json);
            true
        }
        Err(e) => {
            tracing::error!(kind = e.name(), "{e}");
            if let Some(raw) = &e.raw {
                tracing::info!("model output: {raw}");
            }
            false
        }
    }
}

fn print_info(info: &CityInfo, as_json: bool) {
    if as_json {
        match serde_json::to_string_pretty(info) {
            Ok(json) => println!("{json}"),
            Err(e) => tracing::error!("failed to render result: {e}"),
        }
        return;
    }

    println!("City:     {}", info.city);
    println!("Industry: {}", info.industry);
    println!("Fun:      {}", info.fun);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_london() {
        let cli = Cli::try_parse_from(["cityinfo"]).expect("parse should succeed");
        assert_eq!(cli.city, "London");
        assert!(!cli.strict);
        assert!(!cli.json);
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from([
            "cityinfo",
            "Lagos",
            "--model",
            "qwen3",
            "--base-url",
            "http://10.1.1.1:11434",
            "--timeout",
            "9",
            "--temperature",
            "0.3",
            "--strict",
            "-vv",
        ])
        .expect("parse should succeed");

        let config = config_from(&cli);

        assert_eq!(cli.city, "Lagos");
        assert!(cli.strict);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.temperature, Some(0.3));
        assert_eq!(config.model, "qwen3");
        assert_eq!(config.base_url, "http://10.1.1.1:11434");
        assert_eq!(config.timeout_secs, Some(9));
    }

    #[test]
    fn environment_is_read_only_through_config() {
        use clap::CommandFactory;
        let cmd = Cli::command();
        for arg in cmd.get_arguments() {
            assert!(arg.get_env().is_none(), "{} reads the environment", arg.get_id());
        }
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
