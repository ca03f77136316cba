//! Covenant daemon: inspect configuration and replay governance scenarios.

mod scenario;

use std::path::PathBuf;

use clap::Parser;
use covenant_engine::{init_logging, EngineConfig, LogFormat};
use covenant_utils::format_duration;

#[derive(Parser)]
#[command(name = "covenant-daemon", about = "Covenant governance engine")]
struct Cli {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(long, env = "COVENANT_CONFIG")]
    config: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    /// Overrides the file's `log_level`.
    #[arg(long, env = "COVENANT_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json". Overrides the file's `log_format`.
    #[arg(long, env = "COVENANT_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Replay a JSON scenario on a simulated clock and executor.
    Simulate {
        /// Scenario file.
        #[arg(long)]
        script: PathBuf,

        /// Exit with an error if any step fails.
        #[arg(long)]
        strict: bool,
    },
    /// Print the effective configuration as TOML.
    Config,
}

fn load_config(cli: &Cli) -> anyhow::Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let config = EngineConfig::from_toml_file(path)?;
            tracing::info!("Loaded config from {}", path.display());
            config
        }
        None => EngineConfig::default(),
    };
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    Ok(config)
}

fn print_config(config: &EngineConfig) -> anyhow::Result<()> {
    let mode = config.clock_mode;
    println!("# clock: {}", mode.description());
    println!(
        "# voting delay {} / voting period {}",
        format_duration(config.governor.voting_delay),
        format_duration(config.governor.voting_period)
    );
    if config.use_timelock {
        println!("# timelock minimum delay {}", format_duration(config.timelock.min_delay));
    }
    print!("{}", config.to_toml_string()?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Command::Simulate { script, strict } => {
            let config = load_config(&cli)?;
            init_logging(config.log_format, &config.log_level)?;

            let script = scenario::load_script(script)?;
            let stdout = std::io::stdout();
            let summary = scenario::run(&config, &script, &mut stdout.lock())?;
            if *strict && summary.failed > 0 {
                anyhow::bail!("{} of {} steps failed", summary.failed, summary.steps);
            }
        }
        Command::Config => {
            covenant_utils::init_tracing();
            let config = load_config(&cli)?;
            print_config(&config)?;
        }
    }

    Ok(())
}
