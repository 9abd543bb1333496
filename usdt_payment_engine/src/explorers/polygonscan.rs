use std::{sync::Arc, time::Duration};

use log::*;
use reqwest::Client;
use serde::Deserialize;
use upg_common::{MicroUsdt, Secret};

use crate::{
    db_types::{Chain, NormalizedTransfer},
    explorers::{ExplorerError, PollWindow, TransferSource},
};

/// The token symbol the Polygon filter accepts.
pub const USDT_TOKEN_SYMBOL: &str = "USDT";

/// Polygonscan reports "no rows" as a non-"1" status rather than an empty list.
const STATUS_OK: &str = "1";

/// One page of the polygonscan `account/tokentx` response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenTxPage {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub result: Vec<PolygonTokenTransfer>,
}

/// A raw ERC-20 transfer record as reported by polygonscan. Every field is a string in the upstream schema.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolygonTokenTransfer {
    #[serde(default)]
    pub block_number: String,
    /// On-chain timestamp in *seconds*; normalization converts to milliseconds.
    #[serde(default)]
    pub time_stamp: String,
    #[serde(default)]
    pub hash: String,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub contract_address: String,
    #[serde(default)]
    pub to: String,
    /// Raw integer amount string, scaled by the token's 6 decimals.
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub token_symbol: String,
    #[serde(default)]
    pub token_decimal: String,
    #[serde(default)]
    pub confirmations: String,
}

/// Client for the polygonscan token-transfer endpoint.
#[derive(Clone)]
pub struct PolygonScanClient {
    api_url: String,
    api_key: Secret<String>,
    client: Arc<Client>,
}

impl PolygonScanClient {
    pub fn new(
        api_url: impl Into<String>,
        api_key: Secret<String>,
        timeout: Duration,
    ) -> Result<Self, ExplorerError> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| ExplorerError::Transport(e.to_string()))?;
        Ok(Self { api_url: api_url.into(), api_key, client: Arc::new(client) })
    }

    /// Fetches the raw ERC-20 transfers for `wallet` from `start_block` onwards, newest first.
    pub async fn fetch_token_transfers(
        &self,
        wallet: &str,
        start_block: u64,
    ) -> Result<Vec<PolygonTokenTransfer>, ExplorerError> {
        let block = start_block.to_string();
        let params = [
            ("module", "account"),
            ("action", "tokentx"),
            ("address", wallet),
            ("page", "1"),
            ("offset", "5"),
            ("startblock", block.as_str()),
            ("sort", "desc"),
            ("apiKey", self.api_key.reveal().as_str()),
        ];
        trace!("🔗️ Querying polygonscan for transfers to {wallet} from block {start_block}");
        let response = self
            .client
            .get(&self.api_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| ExplorerError::Transport(e.to_string()))?;
        if !response.status().is_success() {
            return Err(ExplorerError::Transport(format!("polygonscan returned {}", response.status())));
        }
        let page = response.json::<TokenTxPage>().await.map_err(|e| ExplorerError::Decode(e.to_string()))?;
        if page.status != STATUS_OK {
            debug!("🔗️ Polygonscan returned no transfers for {wallet}: {}", page.message);
            return Ok(Vec::new());
        }
        Ok(page.result)
    }
}

/// The Polygon filter policy. Keeps transfers that
/// * arrived at the watched wallet (EVM addresses are hex, so comparison ignores case),
/// * carry at least one confirmation,
/// * are USDT by token symbol,
/// and scales the raw amount into micro-units. The seconds-resolution timestamp is converted to milliseconds.
/// Records with a malformed amount, confirmation count or timestamp are skipped.
pub fn filter_polygon_transfers(transfers: Vec<PolygonTokenTransfer>, wallet: &str) -> Vec<NormalizedTransfer> {
    transfers
        .into_iter()
        .filter_map(|t| {
            if !t.to.eq_ignore_ascii_case(wallet) || t.token_symbol != USDT_TOKEN_SYMBOL {
                return None;
            }
            let confirmations = t
                .confirmations
                .parse::<i64>()
                .inspect_err(|e| debug!("🔗️ Skipping transfer {} with malformed confirmation count: {e}", t.hash))
                .ok()?;
            if confirmations < 1 {
                return None;
            }
            let amount = MicroUsdt::from_raw_units(&t.value)
                .inspect_err(|e| debug!("🔗️ Skipping transfer {} with malformed amount: {e}", t.hash))
                .ok()?;
            let timestamp_s = t
                .time_stamp
                .parse::<i64>()
                .inspect_err(|e| debug!("🔗️ Skipping transfer {} with malformed timestamp: {e}", t.hash))
                .ok()?;
            Some(NormalizedTransfer {
                wallet_address: wallet.to_string(),
                amount,
                timestamp_ms: timestamp_s * 1000,
                tx_hash: t.hash,
            })
        })
        .collect()
}

impl TransferSource for PolygonScanClient {
    fn chain(&self) -> Chain {
        Chain::Polygon
    }

    async fn fetch_transfers(&self, wallet: &str, window: PollWindow) -> Result<Vec<NormalizedTransfer>, ExplorerError> {
        let PollWindow::FromBlock(start_block) = window else {
            return Err(ExplorerError::UnsupportedWindow(Chain::Polygon));
        };
        let raw = self.fetch_token_transfers(wallet, start_block).await?;
        Ok(filter_polygon_transfers(raw, wallet))
    }
}
