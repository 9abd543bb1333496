use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use upg_common::MicroUsdt;

//--------------------------------------       Chain         ---------------------------------------------------------
/// The chains the gateway accepts USDT deposits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Chain {
    /// TRC-20 USDT on Tron
    Trc20,
    /// ERC-20 USDT on Polygon
    Polygon,
}

impl Display for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Chain::Trc20 => write!(f, "trc20"),
            Chain::Polygon => write!(f, "polygon"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid chain: {0}")]
pub struct ChainConversionError(String);

impl FromStr for Chain {
    type Err = ChainConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trc20" => Ok(Self::Trc20),
            "polygon" => Ok(Self::Polygon),
            s => Err(ChainConversionError(s.to_string())),
        }
    }
}

//--------------------------------------    WalletStatus     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalletStatus {
    Enabled,
    Disabled,
}

impl Display for WalletStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WalletStatus::Enabled => write!(f, "Enabled"),
            WalletStatus::Disabled => write!(f, "Disabled"),
        }
    }
}

//--------------------------------------    WatchedWallet    ---------------------------------------------------------
/// A receive-address in the gateway's wallet pool. Created and mutated by operator actions (out of the engine's
/// hands); the pollers read the enabled subset on every tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchedWallet {
    pub id: i64,
    pub chain: Chain,
    pub address: String,
    pub status: WalletStatus,
}

impl WatchedWallet {
    pub fn is_enabled(&self) -> bool {
        self.status == WalletStatus::Enabled
    }
}

//--------------------------------------       TradeId       ---------------------------------------------------------
/// A lightweight wrapper around the gateway-assigned trade identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TradeId(pub String);

impl FromStr for TradeId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for TradeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for TradeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TradeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------   OrderStatusType   ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatusType {
    /// The order has been created and is waiting for an on-chain deposit.
    Pending,
    /// A matching transfer was observed and the order is settled. Terminal.
    Paid,
    /// The order timed out before a matching transfer arrived. Terminal.
    Expired,
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::Pending => write!(f, "Pending"),
            OrderStatusType::Paid => write!(f, "Paid"),
            OrderStatusType::Expired => write!(f, "Expired"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid order status: {0}")]
pub struct OrderStatusConversionError(String);

impl FromStr for OrderStatusType {
    type Err = OrderStatusConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Paid" => Ok(Self::Paid),
            "Expired" => Ok(Self::Expired),
            s => Err(OrderStatusConversionError(s.to_string())),
        }
    }
}

//--------------------------------------        Order        ---------------------------------------------------------
/// A payment order, owned by the external persistence layer. The engine reads orders by trade id and issues exactly
/// one `Pending` → `Paid` transition per order; everything else about an order's lifecycle happens upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub trade_id: TradeId,
    /// The merchant's own order identifier, echoed back in callbacks.
    pub order_id: String,
    /// The receive-address the customer was asked to pay into.
    pub wallet_address: String,
    /// The price the merchant quoted, in fiat.
    pub fiat_amount: f64,
    pub fiat_currency: String,
    /// The exact token amount the customer must transfer. This is the correlation key for matching, so the upstream
    /// order-creation process must keep it unique per wallet among pending orders.
    pub actual_amount: MicroUsdt,
    pub status: OrderStatusType,
    pub created_at: DateTime<Utc>,
    /// The hash of the on-chain transfer that settled the order. Set by the completion transition.
    pub block_transaction_id: Option<String>,
}

//--------------------------------------  NormalizedTransfer ---------------------------------------------------------
/// An incoming transfer after chain-specific filtering, reduced to the fields the matching rule needs.
/// Ephemeral; produced per poll and never persisted by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTransfer {
    /// The watched address the funds arrived at.
    pub wallet_address: String,
    /// The transfer amount in micro-units, scaled from the raw integer amount.
    pub amount: MicroUsdt,
    /// The on-chain timestamp, in milliseconds. Always milliseconds, even where the explorer reports seconds.
    pub timestamp_ms: i64,
    pub tx_hash: String,
}

//--------------------------------------     CallbackJob     ---------------------------------------------------------
/// The payload handed to the durable queue when an order is paid. A snapshot of the completed order; the queue owns
/// it from the moment `enqueue` returns, and the engine never tracks its outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallbackJob {
    pub order: Order,
}

impl CallbackJob {
    pub fn new(order: &Order) -> Self {
        Self { order: order.clone() }
    }
}
