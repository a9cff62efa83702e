use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://attendipen-backend-staging.onrender.com/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub api_base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

static API_BASE_URL: OnceLock<String> = OnceLock::new();
static REQUEST_TIMEOUT: OnceLock<Duration> = OnceLock::new();

#[cfg(target_arch = "wasm32")]
fn read_global(global: &str, keys: &[&str]) -> Option<wasm_bindgen::JsValue> {
    let window = web_sys::window()?;
    let any = js_sys::Reflect::get(&window, &global.into()).ok()?;
    if any.is_undefined() || any.is_null() {
        return None;
    }
    let obj = js_sys::Object::from(any);
    keys.iter()
        .filter_map(|key| js_sys::Reflect::get(&obj, &(*key).into()).ok())
        .find(|value| !value.is_undefined() && !value.is_null())
}

// window.__ATTENDIPEN_ENV (env.js) wins over window.__ATTENDIPEN_CONFIG.
#[cfg(target_arch = "wasm32")]
fn snapshot_from_globals() -> RuntimeConfig {
    let lookup = |keys: &[&str]| {
        read_global("__ATTENDIPEN_ENV", keys).or_else(|| read_global("__ATTENDIPEN_CONFIG", keys))
    };
    RuntimeConfig {
        api_base_url: lookup(&["API_BASE_URL", "api_base_url"]).and_then(|v| v.as_string()),
        request_timeout_secs: lookup(&["REQUEST_TIMEOUT_SECS", "request_timeout_secs"])
            .and_then(|v| v.as_f64())
            .filter(|secs| *secs >= 1.0)
            .map(|secs| secs as u64),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn snapshot_from_globals() -> RuntimeConfig {
    RuntimeConfig::default()
}

#[cfg(target_arch = "wasm32")]
async fn fetch_runtime_config() -> Option<RuntimeConfig> {
    let origin = web_sys::window()?.location().origin().ok()?;
    let resp = reqwest::get(format!("{}/config.json", origin)).await.ok()?;
    if !resp.status().is_success() {
        return None;
    }
    resp.json::<RuntimeConfig>().await.ok()
}

#[cfg(not(target_arch = "wasm32"))]
async fn fetch_runtime_config() -> Option<RuntimeConfig> {
    None
}

fn merge(primary: RuntimeConfig, fallback: Option<RuntimeConfig>) -> RuntimeConfig {
    let fallback = fallback.unwrap_or_default();
    RuntimeConfig {
        api_base_url: primary.api_base_url.or(fallback.api_base_url),
        request_timeout_secs: primary.request_timeout_secs.or(fallback.request_timeout_secs),
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn cache(cfg: &RuntimeConfig) -> String {
    let timeout = cfg
        .request_timeout_secs
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
    let _ = REQUEST_TIMEOUT.set(Duration::from_secs(timeout));
    let base = cfg
        .api_base_url
        .as_deref()
        .map(normalize_base_url)
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
    API_BASE_URL.get_or_init(|| base).clone()
}

pub async fn await_api_base_url() -> String {
    if let Some(cached) = API_BASE_URL.get() {
        return cached.clone();
    }
    let globals = snapshot_from_globals();
    if globals.api_base_url.is_some() {
        return cache(&globals);
    }
    let fetched = fetch_runtime_config().await;
    cache(&merge(globals, fetched))
}

pub fn request_timeout() -> Duration {
    REQUEST_TIMEOUT
        .get()
        .copied()
        .unwrap_or(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
}

pub async fn init() {
    let base = await_api_base_url().await;
    log::info!(
        "runtime config initialized: api={} timeout={}s",
        base,
        request_timeout().as_secs()
    );
}
