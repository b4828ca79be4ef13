pub mod config;
pub mod doctor;
pub mod tools;

use std::path::Path;

use anyhow::Context;
use clap::{Parser, Subcommand};

use mb_domain::config::Config;

/// makebridge: exposes Make scenario management as MCP tools over WebSocket.
#[derive(Debug, Parser)]
#[command(name = "makebridge", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the MCP server (default when no subcommand is given).
    Serve,
    /// Print the tool catalog with each tool's parameters.
    Tools {
        /// Print the catalog as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Run diagnostic checks against the current configuration.
    Doctor,
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Print version information.
    Version,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Parse the config file and report any errors.
    Validate,
    /// Dump the resolved configuration (with defaults) as TOML.
    Show,
}

// ── Config loading helper ─────────────────────────────────────────────

/// Load the configuration from the path specified by `MB_CONFIG` (or
/// `config.toml` by default), then apply the `PORT` / `BASE_URL`
/// environment overrides. Returns the config and the path that was used.
pub fn load_config() -> anyhow::Result<(Config, String)> {
    let config_path = std::env::var("MB_CONFIG").unwrap_or_else(|_| "config.toml".into());
    let config = load_config_from(Path::new(&config_path), |k| std::env::var(k).ok())?;
    Ok((config, config_path))
}

/// Read `path` (missing file → defaults) and apply overrides from `lookup`.
pub fn load_config_from(
    path: &Path,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Config> {
    let mut config: Config = if path.exists() {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?
    } else {
        Config::default()
    };
    config
        .apply_env_overrides(lookup)
        .context("applying environment overrides")?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml"), env(&[])).unwrap();
        assert_eq!(cfg.server.port, 3001);
        assert_eq!(cfg.platform.base_url, "https://eu1.make.com/api/v2");
    }

    #[test]
    fn file_values_then_env_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[server]\nport = 4000\n\n[platform]\nbase_url = \"https://us1.make.com/api/v2\"\nmax_retries = 0"
        )
        .unwrap();

        let cfg = load_config_from(file.path(), env(&[])).unwrap();
        assert_eq!(cfg.server.port, 4000);
        assert_eq!(cfg.platform.base_url, "https://us1.make.com/api/v2");
        assert_eq!(cfg.platform.max_retries, 0);

        let cfg = load_config_from(
            file.path(),
            env(&[("PORT", "5050"), ("BASE_URL", "http://localhost:9000")]),
        )
        .unwrap();
        assert_eq!(cfg.server.port, 5050);
        assert_eq!(cfg.platform.base_url, "http://localhost:9000");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nport = ").unwrap();
        let err = load_config_from(file.path(), env(&[])).unwrap_err();
        assert!(err.to_string().starts_with("parsing "));
    }

    #[test]
    fn bad_port_override_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config_from(&dir.path().join("absent.toml"), env(&[("PORT", "http")]))
            .unwrap_err();
        assert!(format!("{err:#}").contains("PORT"));
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::parse_from(["makebridge"]);
        assert!(cli.command.is_none());

        let cli = Cli::parse_from(["makebridge", "tools", "--json"]);
        assert!(matches!(cli.command, Some(Command::Tools { json: true })));

        let cli = Cli::parse_from(["makebridge", "config", "validate"]);
        assert!(matches!(
            cli.command,
            Some(Command::Config(ConfigCommand::Validate))
        ));
    }
}
