use mb_domain::config::Config;
use mb_platform::{RestPlatformClient, ScenarioPlatform};

/// Run all diagnostic checks and print a summary.
///
/// Returns `Ok(true)` when every check passes, `Ok(false)` when at least
/// one check failed.
pub async fn run(config: &Config, config_path: &str) -> anyhow::Result<bool> {
    println!("makebridge doctor");
    println!("=================\n");

    let mut all_passed = true;

    // 1. Config file
    check_config_file(config_path);

    // 2. Config validation
    check_config_validation(config, &mut all_passed);

    // 3. API token
    let token = check_api_token(config, &mut all_passed);

    // 4. Platform reachable with that token
    check_platform(config, token, &mut all_passed).await;

    println!();
    if all_passed {
        println!("All checks passed.");
    } else {
        println!("Some checks failed. Review the output above.");
    }

    Ok(all_passed)
}

// ── Individual checks ─────────────────────────────────────────────────

/// Informational only: running on defaults is allowed.
fn check_config_file(config_path: &str) {
    let exists = std::path::Path::new(config_path).exists();
    print_check(
        "Config file",
        true,
        if exists {
            config_path.to_owned()
        } else {
            format!("{config_path} not found (using defaults)")
        },
    );
}

fn check_config_validation(config: &Config, all_passed: &mut bool) {
    let issues = config.validate();
    let error_count = super::config::error_count(&issues);

    if issues.is_empty() {
        print_check("Config validation", true, "no issues".into());
        return;
    }

    print_check(
        "Config validation",
        error_count == 0,
        format!("{} issue(s) ({} error(s))", issues.len(), error_count),
    );
    for issue in &issues {
        println!("      {issue}");
    }
    if error_count > 0 {
        *all_passed = false;
    }
}

fn check_api_token(config: &Config, all_passed: &mut bool) -> Option<String> {
    let env = &config.platform.api_token_env;
    let token = config.platform.resolve_api_token();
    print_check(
        "API token",
        token.is_some(),
        if token.is_some() {
            format!("{env} is set")
        } else {
            format!("{env} is not set")
        },
    );
    if token.is_none() {
        *all_passed = false;
    }
    token
}

async fn check_platform(config: &Config, token: Option<String>, all_passed: &mut bool) {
    let url = &config.platform.base_url;
    if token.is_none() {
        print_check("Platform reachable", false, format!("{url} (skipped, no token)"));
        *all_passed = false;
        return;
    }

    let outcome = match RestPlatformClient::new(&config.platform, token) {
        Ok(client) => client.list_scenarios().await.map(|_| ()),
        Err(e) => Err(e),
    };

    match outcome {
        Ok(()) => print_check("Platform reachable", true, format!("{url} (GET /scenarios ok)")),
        Err(e) => {
            print_check("Platform reachable", false, format!("{url} ({e})"));
            *all_passed = false;
        }
    }
}

// ── Formatting helper ─────────────────────────────────────────────────

fn print_check(name: &str, passed: bool, detail: String) {
    let status = if passed { "PASS" } else { "FAIL" };
    println!("  [{status}] {name}: {detail}");
}
