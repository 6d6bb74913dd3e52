use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use hotkey_mouse::{app, Binding, EmulationParameters, FailurePolicy};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hkmouse")]
#[command(version)]
#[command(about = "Move and click the mouse with global keyboard shortcuts", long_about = None)]
struct Cli {
    /// Path to the key binding configuration (JSON), required
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// What to do when a shortcut cannot be registered
    #[arg(long, value_enum, default_value_t = FailurePolicy::Quit, global = true)]
    on_registration_failure: FailurePolicy,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Register the shortcuts and run until Ctrl-C (default)
    Run,
    /// Validate the configuration and print the shortcuts it defines
    Check,
    /// Write a sample configuration
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "hotkey_mouse=debug,hkmouse=debug"
    } else {
        "hotkey_mouse=info,hkmouse=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn check(path: &Path) -> Result<()> {
    let params = EmulationParameters::load(path)?;
    params.validate()?;

    println!("✅ {} is valid", path.display().to_string().bold());
    println!(
        "   movement speed: {} px",
        params.movement_speed().to_string().cyan()
    );
    for binding in Binding::ALL {
        println!(
            "   {:<10} {}",
            binding.to_string(),
            params.descriptor_for(binding).green()
        );
    }
    Ok(())
}

fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    EmulationParameters::default()
        .save(path)
        .with_context(|| format!("failed to write sample config to {}", path.display()))?;
    println!("📝 Sample configuration written to {}", path.display());
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let Some(config) = cli.config else {
        bail!("--config <PATH> is required");
    };
    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            println!("🖱️  Hotkey mouse starting with {}", config.display());
            app::run(config, cli.on_registration_failure).await?;
            println!("👋 Configuration saved, bye");
        }
        Command::Check => check(&config)?,
        Command::Init { force } => init(&config, force)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_config_accepted_before_or_after_subcommand() {
        let cli = Cli::try_parse_from(["hkmouse", "check", "--config", "f.json"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("f.json")));
        assert!(matches!(cli.command, Some(Command::Check)));

        let cli = Cli::try_parse_from(["hkmouse", "-c", "f.json", "init", "--force"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("f.json")));
        assert!(matches!(cli.command, Some(Command::Init { force: true })));

        let cli = Cli::try_parse_from([
            "hkmouse",
            "run",
            "--config",
            "f.json",
            "--on-registration-failure",
            "continue",
        ])
        .unwrap();
        assert_eq!(cli.on_registration_failure, FailurePolicy::Continue);
    }

    #[test]
    fn test_missing_config_is_reported() {
        let cli = Cli::try_parse_from(["hkmouse", "check"]).unwrap();
        assert!(cli.config.is_none());
    }
}
