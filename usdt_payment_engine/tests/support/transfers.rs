//! Builders for orders and normalized transfers.
use chrono::{DateTime, Utc};
use rand::Rng;
use upg_common::MicroUsdt;
use usdt_payment_engine::db_types::{NormalizedTransfer, Order, OrderStatusType, TradeId};

pub const TRON_WALLET: &str = "TXmVpin5vq5gdZsciyyjdZgKRUju4st1wM";
pub const TRON_WALLET_2: &str = "TJRabPrwbZy45sbavfcjinPJC18kjpRTv8";
pub const POLYGON_WALLET: &str = "0x29c88d61914d4d801b18e3F3b5C78AfBD39B3a48";

pub fn random_hash() -> String {
    let mut rng = rand::thread_rng();
    (0..16).map(|_| format!("{:x}", rng.gen_range(0..16))).collect()
}

pub fn pending_order(trade_id: &str, wallet: &str, micro: i64, created_at: DateTime<Utc>) -> Order {
    Order {
        trade_id: TradeId(trade_id.to_string()),
        order_id: format!("order-{trade_id}"),
        wallet_address: wallet.to_string(),
        fiat_amount: 100.0,
        fiat_currency: "CNY".to_string(),
        actual_amount: MicroUsdt::from(micro),
        status: OrderStatusType::Pending,
        created_at,
        block_transaction_id: None,
    }
}

pub fn transfer(wallet: &str, micro: i64, timestamp_ms: i64) -> NormalizedTransfer {
    transfer_with_hash(wallet, micro, timestamp_ms, &random_hash())
}

pub fn transfer_with_hash(wallet: &str, micro: i64, timestamp_ms: i64, tx_hash: &str) -> NormalizedTransfer {
    NormalizedTransfer {
        wallet_address: wallet.to_string(),
        amount: MicroUsdt::from(micro),
        timestamp_ms,
        tx_hash: tx_hash.to_string(),
    }
}
