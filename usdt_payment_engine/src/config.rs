use std::{env, time::Duration};

use log::*;
use upg_common::Secret;

const DEFAULT_TRONSCAN_API_URL: &str = "https://apilist.tronscanapi.com/api/transfer/trc20";
const DEFAULT_POLYGONSCAN_API_URL: &str = "https://api.polygonscan.com/api";
const DEFAULT_TRON_POLL_INTERVAL: Duration = Duration::from_secs(15);
const DEFAULT_POLYGON_POLL_INTERVAL: Duration = Duration::from_secs(30);
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Engine configuration. Constructed once at startup and handed to the pollers and explorer clients; nothing in the
/// engine reads the environment after this point.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    pub tronscan_api_url: String,
    pub polygonscan_api_url: String,
    /// Polygonscan requires an API key on every request. Tronscan does not.
    pub polygonscan_api_key: Secret<String>,
    /// The two cadences differ on purpose; they track each chain's confirmation latency.
    pub tron_poll_interval: Duration,
    pub polygon_poll_interval: Duration,
    /// Applied to every explorer request so a hung wallet pass delays a tick rather than wedging it.
    pub http_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tronscan_api_url: DEFAULT_TRONSCAN_API_URL.to_string(),
            polygonscan_api_url: DEFAULT_POLYGONSCAN_API_URL.to_string(),
            polygonscan_api_key: Secret::default(),
            tron_poll_interval: DEFAULT_TRON_POLL_INTERVAL,
            polygon_poll_interval: DEFAULT_POLYGON_POLL_INTERVAL,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }
}

impl EngineConfig {
    pub fn from_env_or_default() -> Self {
        let tronscan_api_url = env::var("UPG_TRONSCAN_API_URL").ok().unwrap_or_else(|| DEFAULT_TRONSCAN_API_URL.into());
        let polygonscan_api_url =
            env::var("UPG_POLYGONSCAN_API_URL").ok().unwrap_or_else(|| DEFAULT_POLYGONSCAN_API_URL.into());
        let polygonscan_api_key = env::var("UPG_POLYGONSCAN_API_KEY").map(Secret::new).ok().unwrap_or_else(|| {
            error!("🪛️ UPG_POLYGONSCAN_API_KEY is not set. Polygonscan will reject the gateway's queries without it.");
            Secret::default()
        });
        let tron_poll_interval = interval_from_env("UPG_TRON_POLL_INTERVAL_SECS", DEFAULT_TRON_POLL_INTERVAL);
        let polygon_poll_interval = interval_from_env("UPG_POLYGON_POLL_INTERVAL_SECS", DEFAULT_POLYGON_POLL_INTERVAL);
        let http_timeout = interval_from_env("UPG_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT);
        Self {
            tronscan_api_url,
            polygonscan_api_url,
            polygonscan_api_key,
            tron_poll_interval,
            polygon_poll_interval,
            http_timeout,
        }
    }
}

fn interval_from_env(var: &str, default: Duration) -> Duration {
    env::var(var)
        .map(|s| {
            s.parse::<u64>().map(Duration::from_secs).unwrap_or_else(|e| {
                error!("🪛️ {s} is not a valid number of seconds for {var}. {e} Using the default, {default:?}, instead.");
                default
            })
        })
        .ok()
        .unwrap_or(default)
}
