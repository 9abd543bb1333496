use std::{sync::Arc, time::Duration};

use log::*;
use reqwest::Client;
use serde::Deserialize;
use upg_common::MicroUsdt;

use crate::{
    db_types::{Chain, NormalizedTransfer},
    explorers::{ExplorerError, PollWindow, TransferSource},
};

/// The USDT TRC-20 contract on Tron mainnet. The transfer-history query is pinned to this contract, and the filter
/// re-checks it per record.
pub const USDT_TRC20_CONTRACT: &str = "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t";

/// Tronscan marks a transfer successful with this contract return value.
const CONTRACT_RET_SUCCESS: &str = "SUCCESS";

/// One page of the tronscan `transfer/trc20` response.
#[derive(Debug, Clone, Deserialize)]
pub struct Trc20TransferPage {
    #[serde(default)]
    pub page_size: i64,
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub data: Vec<Trc20Transfer>,
}

/// A raw TRC-20 transfer record as reported by tronscan. Only the fields the filter policy reads are kept.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Trc20Transfer {
    /// Raw integer amount string, scaled by the token's 6 decimals.
    #[serde(default)]
    pub amount: String,
    /// On-chain timestamp in milliseconds.
    #[serde(default)]
    pub block_timestamp: i64,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub hash: String,
    #[serde(default)]
    pub confirmed: i64,
    #[serde(default)]
    pub contract_ret: String,
    #[serde(default)]
    pub contract_address: String,
}

/// Client for the tronscan TRC-20 transfer-history endpoint.
#[derive(Clone)]
pub struct TronScanClient {
    api_url: String,
    client: Arc<Client>,
}

impl TronScanClient {
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self, ExplorerError> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| ExplorerError::Transport(e.to_string()))?;
        Ok(Self { api_url: api_url.into(), client: Arc::new(client) })
    }

    /// Fetches the raw incoming TRC-20 USDT transfers for `wallet` over the given millisecond range.
    pub async fn fetch_trc20_transfers(
        &self,
        wallet: &str,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<Trc20Transfer>, ExplorerError> {
        let start = start_ms.to_string();
        let end = end_ms.to_string();
        let params = [
            ("sort", "-timestamp"),
            ("limit", "50"),
            ("start", "0"),
            ("direction", "2"),
            ("db_version", "1"),
            ("trc20Id", USDT_TRC20_CONTRACT),
            ("address", wallet),
            ("start_timestamp", start.as_str()),
            ("end_timestamp", end.as_str()),
        ];
        trace!("🔗️ Querying tronscan for transfers to {wallet}");
        let response = self
            .client
            .get(&self.api_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| ExplorerError::Transport(e.to_string()))?;
        if !response.status().is_success() {
            return Err(ExplorerError::Transport(format!("tronscan returned {}", response.status())));
        }
        let page = response.json::<Trc20TransferPage>().await.map_err(|e| ExplorerError::Decode(e.to_string()))?;
        if page.page_size <= 0 {
            return Ok(Vec::new());
        }
        Ok(page.data)
    }
}

/// The TRC-20 filter policy. Keeps transfers that
/// * arrived at the watched wallet (Tron base58 addresses are case-sensitive, so comparison is exact),
/// * executed successfully (`contract_ret == "SUCCESS"`),
/// * moved the expected USDT contract's token,
/// and scales the raw amount into micro-units. Records with a malformed amount are skipped.
///
/// Not every tronscan deployment echoes the contract address per record. When the field is present it must name the
/// USDT contract; when it is absent the `trc20Id` pin on the query itself is the token guarantee.
pub fn filter_trc20_transfers(transfers: Vec<Trc20Transfer>, wallet: &str) -> Vec<NormalizedTransfer> {
    transfers
        .into_iter()
        .filter_map(|t| {
            if t.to != wallet || t.contract_ret != CONTRACT_RET_SUCCESS {
                return None;
            }
            if !t.contract_address.is_empty() && t.contract_address != USDT_TRC20_CONTRACT {
                return None;
            }
            let amount = MicroUsdt::from_raw_units(&t.amount)
                .inspect_err(|e| debug!("🔗️ Skipping transfer {} with malformed amount: {e}", t.hash))
                .ok()?;
            Some(NormalizedTransfer {
                wallet_address: wallet.to_string(),
                amount,
                timestamp_ms: t.block_timestamp,
                tx_hash: t.hash,
            })
        })
        .collect()
}

impl TransferSource for TronScanClient {
    fn chain(&self) -> Chain {
        Chain::Trc20
    }

    async fn fetch_transfers(&self, wallet: &str, window: PollWindow) -> Result<Vec<NormalizedTransfer>, ExplorerError> {
        let PollWindow::Lookback { start_ms, end_ms } = window else {
            return Err(ExplorerError::UnsupportedWindow(Chain::Trc20));
        };
        let raw = self.fetch_trc20_transfers(wallet, start_ms, end_ms).await?;
        Ok(filter_trc20_transfers(raw, wallet))
    }
}
