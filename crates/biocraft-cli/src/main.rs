//! `biocraft-cli` – BioCraft command line interface
//!
//! ```text
//! biocraft [demo]       run the transform & safety demo (default)
//! biocraft config       print the effective safety configuration
//! biocraft init-config  write the default config to ~/.biocraft/config.toml
//! ```

mod config;
mod demo;
mod telemetry;

use colored::Colorize;
use std::process::ExitCode;
use tracing::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Demo,
    ShowConfig,
    InitConfig,
    Help,
}

fn parse_action(arg: Option<&str>) -> Result<Action, String> {
    match arg {
        None | Some("demo") => Ok(Action::Demo),
        Some("config") => Ok(Action::ShowConfig),
        Some("init-config") => Ok(Action::InitConfig),
        Some("-h" | "--help" | "help") => Ok(Action::Help),
        Some(other) => Err(format!("unknown command `{other}`")),
    }
}

fn main() -> ExitCode {
    let _guard = telemetry::init_tracing("biocraft");

    let arg = std::env::args().nth(1);
    let action = match parse_action(arg.as_deref()) {
        Ok(a) => a,
        Err(e) => {
            println!("{}: {}", "Error".red().bold(), e);
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    let result = match action {
        Action::Demo => config::load_effective()
            .and_then(|cfg| demo::run(cfg.safety).map_err(|e| e.to_string())),
        Action::ShowConfig => show_config(),
        Action::InitConfig => init_config(),
        Action::Help => {
            print_usage();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, ?action, "command failed");
            println!("{}: {}", "Error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Subcommands
// ─────────────────────────────────────────────────────────────────────────────

fn show_config() -> Result<(), String> {
    let path = config::config_path();
    let source = if path.exists() { "file" } else { "defaults" };
    let cfg = config::load_effective()?;
    let raw = toml::to_string_pretty(&cfg)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;

    println!(
        "  Config path: {} ({})",
        path.display().to_string().bold(),
        source.dimmed()
    );
    println!();
    print!("{raw}");
    Ok(())
}

fn init_config() -> Result<(), String> {
    let path = config::config_path();
    if path.exists() {
        return Err(format!("{} already exists", path.display()));
    }
    config::save(&config::Config::default())?;
    println!(
        "  {} Config saved to {}",
        "✓".green().bold(),
        path.display().to_string().bold()
    );
    Ok(())
}

fn print_usage() {
    println!();
    println!("  {} {}", "biocraft".bold(), format!("v{}", env!("CARGO_PKG_VERSION")).dimmed());
    println!();
    println!("  Usage: biocraft [COMMAND]");
    println!();
    println!("    {}         run the transform & safety demo (default)", "demo".cyan());
    println!("    {}       print the effective safety configuration", "config".cyan());
    println!("    {}  write the default config file", "init-config".cyan());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_argument_runs_demo() {
        assert_eq!(parse_action(None), Ok(Action::Demo));
        assert_eq!(parse_action(Some("demo")), Ok(Action::Demo));
    }

    #[test]
    fn subcommands_are_recognised() {
        assert_eq!(parse_action(Some("config")), Ok(Action::ShowConfig));
        assert_eq!(parse_action(Some("init-config")), Ok(Action::InitConfig));
        assert_eq!(parse_action(Some("--help")), Ok(Action::Help));
    }

    #[test]
    fn unknown_subcommand_is_an_error() {
        assert!(parse_action(Some("launch")).unwrap_err().contains("launch"));
    }
}
