//! REST implementation of [`ScenarioPlatform`].
//!
//! `RestPlatformClient` wraps a `reqwest::Client` and translates every
//! trait method into one HTTP call against the platform API. All calls go
//! through [`RestPlatformClient::execute`], the single place where
//! transport failures and non-2xx statuses become domain errors.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use mb_domain::config::PlatformConfig;
use mb_domain::error::{Error, Result};
use mb_domain::trace::TraceEvent;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde_json::Value;

use crate::provider::ScenarioPlatform;
use crate::types::{CreateScenario, ScenarioId};

/// Longest slice of an error body quoted back to the caller.
const MAX_DETAIL_CHARS: usize = 200;

/// First retry delay; each later retry doubles it up to [`MAX_BACKOFF`].
const BASE_BACKOFF: Duration = Duration::from_millis(100);
const MAX_BACKOFF: Duration = Duration::from_secs(5);

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Client
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A REST-based client for the automation platform.
///
/// Created once and shared by every session. The underlying
/// `reqwest::Client` maintains a connection pool.
#[derive(Debug, Clone)]
pub struct RestPlatformClient {
    http: Client,
    base_url: Url,
    api_token: Option<String>,
    token_env: String,
    max_retries: u32,
}

impl RestPlatformClient {
    /// Build a new client. `api_token` is usually
    /// [`PlatformConfig::resolve_api_token`].
    pub fn new(cfg: &PlatformConfig, api_token: Option<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        let base_url = Url::parse(cfg.base_url.trim_end_matches('/'))
            .map_err(|e| Error::Config(format!("platform.base_url {:?}: {e}", cfg.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "platform.base_url {:?} cannot carry a path",
                cfg.base_url
            )));
        }

        Ok(Self {
            http,
            base_url,
            api_token,
            token_env: cfg.api_token_env.clone(),
            max_retries: cfg.max_retries,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── request helpers ──────────────────────────────────────────────

    /// Join path segments onto the base URL. Each segment is
    /// percent-encoded, so an id like `"12/run"` stays one segment.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejected cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Decorate a `RequestBuilder` with the auth and content-type headers.
    fn decorate(&self, rb: RequestBuilder, token: &str) -> RequestBuilder {
        rb.header(AUTHORIZATION, format!("Token {token}"))
            .header(CONTENT_TYPE, "application/json")
    }

    // ── error normalization boundary ─────────────────────────────────

    /// Send one logical request and decode its JSON body.
    ///
    /// * `action` names the operation in error messages ("run scenario 42").
    /// * `idempotent` requests are retried with exponential back-off on
    ///   5xx and transport errors; others are sent exactly once.
    /// * 4xx is never retried. 401/403 become [`Error::Auth`].
    /// * An empty 2xx body decodes as `{}`.
    ///
    /// Every failure is logged here with its endpoint before being returned.
    async fn execute(
        &self,
        action: &str,
        endpoint: &str,
        idempotent: bool,
        build_request: impl Fn() -> RequestBuilder,
    ) -> Result<Value> {
        let Some(token) = self.api_token.as_deref() else {
            let err = Error::Auth(format!(
                "cannot {action}: API token is not configured (set {})",
                self.token_env
            ));
            tracing::warn!(endpoint, error = %err, "platform call skipped");
            return Err(err);
        };

        let attempts = if idempotent {
            self.max_retries.saturating_add(1)
        } else {
            1
        };
        let mut last_err: Option<Error> = None;

        for attempt in 0..attempts {
            if attempt > 0 {
                tokio::time::sleep(backoff(attempt)).await;
            }

            let start = Instant::now();
            let result = self.decorate(build_request(), token).send().await;
            let duration_ms = start.elapsed().as_millis() as u64;

            let resp = match result {
                Ok(resp) => resp,
                Err(e) => {
                    TraceEvent::PlatformCall {
                        endpoint: endpoint.to_owned(),
                        status: 0,
                        duration_ms,
                    }
                    .emit();
                    tracing::warn!(endpoint, attempt, error = %e, "platform request failed");
                    last_err = Some(describe_transport(action, e));
                    continue;
                }
            };

            let status = resp.status();
            TraceEvent::PlatformCall {
                endpoint: endpoint.to_owned(),
                status: status.as_u16(),
                duration_ms,
            }
            .emit();

            let body = match resp.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!(endpoint, error = %e, "reading platform response failed");
                    return Err(describe_transport(action, e));
                }
            };

            if status.is_success() {
                return decode_body(action, endpoint, &body);
            }

            let err = describe_status(action, endpoint, status, &body);
            tracing::warn!(
                endpoint,
                attempt,
                status = status.as_u16(),
                body = %truncate(&body),
                "platform returned an error status"
            );
            if status.is_server_error() {
                // 5xx: transient, retry if allowed
                last_err = Some(err);
                continue;
            }
            return Err(err);
        }

        Err(last_err.unwrap_or_else(|| Error::Platform(format!("{action} failed: no attempt made"))))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Trait implementation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[async_trait]
impl ScenarioPlatform for RestPlatformClient {
    async fn list_scenarios(&self) -> Result<Value> {
        let url = self.url(&["scenarios"]);
        self.execute("fetch scenarios", "GET /scenarios", true, || {
            self.http.get(url.clone())
        })
        .await
    }

    async fn get_scenario(&self, id: &ScenarioId) -> Result<Value> {
        let url = self.url(&["scenarios", id.as_str()]);
        self.execute(
            &format!("fetch scenario {id}"),
            &format!("GET /scenarios/{id}"),
            true,
            || self.http.get(url.clone()),
        )
        .await
    }

    async fn run_scenario(&self, id: &ScenarioId) -> Result<Value> {
        let url = self.url(&["scenarios", id.as_str(), "run"]);
        self.execute(
            &format!("run scenario {id}"),
            &format!("POST /scenarios/{id}/run"),
            false,
            || self.http.post(url.clone()).json(&serde_json::json!({})),
        )
        .await
    }

    async fn set_scenario_active(&self, id: &ScenarioId, active: bool) -> Result<Value> {
        let url = self.url(&["scenarios", id.as_str()]);
        let body = serde_json::json!({ "active": active });
        self.execute(
            &format!("toggle scenario {id}"),
            &format!("PATCH /scenarios/{id}"),
            false,
            || self.http.patch(url.clone()).json(&body),
        )
        .await
    }

    async fn create_scenario(&self, req: CreateScenario) -> Result<Value> {
        let url = self.url(&["scenarios"]);
        self.execute("create scenario", "POST /scenarios", false, || {
            self.http.post(url.clone()).json(&req)
        })
        .await
    }

    async fn list_apps(&self) -> Result<Value> {
        let url = self.url(&["apps"]);
        self.execute("fetch apps", "GET /apps", true, || self.http.get(url.clone()))
            .await
    }

    async fn scenario_history(&self, id: &ScenarioId, limit: u32) -> Result<Value> {
        let url = self.url(&["scenarios", id.as_str(), "history"]);
        self.execute(
            &format!("fetch history of scenario {id}"),
            &format!("GET /scenarios/{id}/history"),
            true,
            || self.http.get(url.clone()).query(&[("limit", limit)]),
        )
        .await
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Error conversion helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Convert a `reqwest::Error` into a domain `Error`.
///
/// Timeout errors become `Error::Timeout`; everything else becomes
/// `Error::Http`.
pub fn from_reqwest(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout(e.to_string())
    } else {
        Error::Http(e.to_string())
    }
}

fn describe_transport(action: &str, e: reqwest::Error) -> Error {
    match from_reqwest(e) {
        Error::Timeout(_) => Error::Timeout(format!("{action} failed: request timed out")),
        Error::Http(detail) => Error::Http(format!("{action} failed: {detail}")),
        other => other,
    }
}

fn describe_status(action: &str, endpoint: &str, status: StatusCode, body: &str) -> Error {
    let message = format!("{action} failed: {endpoint} returned {status}{}", detail_suffix(body));
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        Error::Auth(message)
    } else {
        Error::Platform(message)
    }
}

fn decode_body(action: &str, endpoint: &str, body: &str) -> Result<Value> {
    if body.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_str(body).map_err(|e| {
        tracing::warn!(endpoint, error = %e, body = %truncate(body), "unparseable platform response");
        Error::Platform(format!("{action} failed: {endpoint} returned a non-JSON body"))
    })
}

/// `": <message>"` from the platform's JSON error body, or the raw body,
/// or nothing when the body is empty.
fn detail_suffix(body: &str) -> String {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            ["message", "detail", "error"]
                .iter()
                .find_map(|k| v.get(k).and_then(Value::as_str).map(str::to_owned))
        })
        .unwrap_or_else(|| body.trim().to_owned());
    if detail.is_empty() {
        String::new()
    } else {
        format!(": {}", truncate(&detail))
    }
}

/// Delay before retry number `attempt` (1-based).
fn backoff(attempt: u32) -> Duration {
    let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
    BASE_BACKOFF.saturating_mul(factor).min(MAX_BACKOFF)
}

fn truncate(s: &str) -> String {
    match s.char_indices().nth(MAX_DETAIL_CHARS) {
        Some((idx, _)) => format!("{}…", &s[..idx]),
        None => s.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> RestPlatformClient {
        let cfg = PlatformConfig {
            base_url: base_url.into(),
            ..PlatformConfig::default()
        };
        RestPlatformClient::new(&cfg, Some("secret".into())).unwrap()
    }

    #[test]
    fn backoff_doubles_then_caps() {
        assert_eq!(backoff(1), Duration::from_millis(100));
        assert_eq!(backoff(2), Duration::from_millis(200));
        assert_eq!(backoff(4), Duration::from_millis(800));
        assert_eq!(backoff(7), MAX_BACKOFF);
        assert_eq!(backoff(64), MAX_BACKOFF);
        assert_eq!(backoff(u32::MAX), MAX_BACKOFF);
    }

    #[test]
    fn url_joins_segments_under_base_path() {
        let c = client("https://eu1.make.com/api/v2/");
        assert_eq!(
            c.url(&["scenarios", "42", "run"]).as_str(),
            "https://eu1.make.com/api/v2/scenarios/42/run"
        );
    }

    #[test]
    fn url_encodes_hostile_ids() {
        let c = client("https://eu1.make.com/api/v2");
        let url = c.url(&["scenarios", "12/run"]);
        assert_eq!(url.as_str(), "https://eu1.make.com/api/v2/scenarios/12%2Frun");
    }

    #[test]
    fn invalid_base_url_is_a_config_error() {
        let cfg = PlatformConfig {
            base_url: "not a url".into(),
            ..PlatformConfig::default()
        };
        let err = RestPlatformClient::new(&cfg, None).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn detail_prefers_json_message() {
        assert_eq!(
            detail_suffix(r#"{"message":"Scenario not found","code":"IM005"}"#),
            ": Scenario not found"
        );
        assert_eq!(detail_suffix("Bad Gateway"), ": Bad Gateway");
        assert_eq!(detail_suffix("  "), "");
    }

    #[test]
    fn truncate_caps_long_bodies() {
        let long = "x".repeat(500);
        let t = truncate(&long);
        assert_eq!(t.chars().count(), MAX_DETAIL_CHARS + 1);
        assert!(t.ends_with('…'));
    }

    #[test]
    fn unauthorized_maps_to_auth_error() {
        let err = describe_status("fetch apps", "GET /apps", StatusCode::UNAUTHORIZED, "");
        assert!(matches!(err, Error::Auth(_)));
        assert_eq!(err.to_string(), "auth: fetch apps failed: GET /apps returned 401 Unauthorized");
    }
}
