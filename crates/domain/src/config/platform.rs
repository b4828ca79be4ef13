use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Automation platform connection
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// API root, region specific (e.g. `https://us1.make.com/api/v2`).
    /// Overridden by the `BASE_URL` environment variable.
    #[serde(default = "d_base_url")]
    pub base_url: String,
    /// Environment variable holding the API token. The token itself is
    /// never written to the config file.
    #[serde(default = "d_api_token_env")]
    pub api_token_env: String,
    #[serde(default = "d_30000")]
    pub timeout_ms: u64,
    /// Retries for idempotent reads only. Writes are sent once.
    #[serde(default = "d_2")]
    pub max_retries: u32,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            base_url: d_base_url(),
            api_token_env: d_api_token_env(),
            timeout_ms: d_30000(),
            max_retries: d_2(),
        }
    }
}

impl PlatformConfig {
    /// Upper bound accepted for `max_retries`.
    pub const MAX_RETRIES_LIMIT: u32 = 10;

    /// Read the API token from the configured environment variable.
    /// Empty values count as unset.
    pub fn resolve_api_token(&self) -> Option<String> {
        std::env::var(&self.api_token_env)
            .ok()
            .filter(|t| !t.trim().is_empty())
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_base_url() -> String {
    "https://eu1.make.com/api/v2".into()
}
fn d_api_token_env() -> String {
    "API_TOKEN".into()
}
fn d_30000() -> u64 {
    30_000
}
fn d_2() -> u32 {
    2
}
