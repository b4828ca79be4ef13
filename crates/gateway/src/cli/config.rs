use mb_domain::config::{Config, ConfigError, ConfigSeverity};

/// Parse and validate the config, printing any issues.
///
/// Returns `false` when at least one error is found; warnings alone pass.
pub fn validate(config: &Config, config_path: &str) -> bool {
    let issues = config.validate();

    if issues.is_empty() {
        println!("Config OK ({config_path})");
        return true;
    }

    let error_count = error_count(&issues);
    let warning_count = issues.len() - error_count;

    for issue in &issues {
        println!("{issue}");
    }

    println!("\n{error_count} error(s), {warning_count} warning(s) in {config_path}");

    error_count == 0
}

pub(crate) fn error_count(issues: &[ConfigError]) -> usize {
    issues
        .iter()
        .filter(|e| e.severity == ConfigSeverity::Error)
        .count()
}

/// Dump the resolved config (with all defaults filled in) as TOML.
pub fn show(config: &Config) -> anyhow::Result<()> {
    print!("{}", render(config)?);
    Ok(())
}

fn render(config: &Config) -> anyhow::Result<String> {
    toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("serializing config: {e}"))
}
