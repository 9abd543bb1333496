//! # Chain explorer clients.
//!
//! One client per chain issues the transfer-history query against the chain's public explorer and reduces the raw
//! records to [`NormalizedTransfer`]s. Each client pairs a thin HTTP layer (fetch the raw page, surface transport
//! and schema errors) with a pure filter function (keep only successful, incoming USDT transfers and scale the raw
//! amount). The filters never fail; malformed individual records are skipped.
//!
//! Pollers consume clients through the [`TransferSource`] trait so that the fan-out logic can be exercised with
//! fake sources in tests.
mod polygonscan;
mod tronscan;

pub use polygonscan::{filter_polygon_transfers, PolygonScanClient, PolygonTokenTransfer, USDT_TOKEN_SYMBOL};
pub use tronscan::{filter_trc20_transfers, TronScanClient, Trc20Transfer, USDT_TRC20_CONTRACT};

use thiserror::Error;

use crate::db_types::{Chain, NormalizedTransfer};

/// The slice of history a single poll covers. Tron polls a trailing time range; Polygon polls incrementally from a
/// per-wallet start block held by the persistence layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollWindow {
    /// A closed millisecond range, newest transfers first.
    Lookback { start_ms: i64, end_ms: i64 },
    /// Everything from the given block onwards.
    FromBlock(u64),
}

#[derive(Debug, Clone, Error)]
pub enum ExplorerError {
    /// The request could not be sent, timed out, or came back with a non-2xx status.
    #[error("Explorer request failed: {0}")]
    Transport(String),
    /// The response body did not match the expected schema.
    #[error("Explorer response did not match the expected schema: {0}")]
    Decode(String),
    /// The poll window kind does not fit the chain this source serves.
    #[error("Unsupported poll window for {0}")]
    UnsupportedWindow(Chain),
}

/// A source of normalized transfers for one chain: fetch plus filter behind a single seam.
#[allow(async_fn_in_trait)]
pub trait TransferSource: Clone {
    /// The chain this source serves. Decides how the poller builds the [`PollWindow`].
    fn chain(&self) -> Chain;

    /// Fetches the transfer history for `wallet` over `window` and returns the transfers that survive the chain's
    /// filter policy. A failure here is fatal to the wallet's pass, never to the tick.
    async fn fetch_transfers(&self, wallet: &str, window: PollWindow) -> Result<Vec<NormalizedTransfer>, ExplorerError>;
}
