mod microusdt;

pub mod op;
mod secret;

pub use microusdt::{MicroUsdt, MicroUsdtConversionError, USDT_CURRENCY_CODE, USDT_CURRENCY_CODE_LOWER};
pub use secret::Secret;
