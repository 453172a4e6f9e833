//! Tick and quote data model, validity rules, and the per-day tick store.

pub mod store;
pub mod types;
pub mod validator;

pub use store::{ProductId, StoredTick, TickStore};
pub use types::{ProductKey, Quote, QuoteAt, Side, Tick, PRICE_EPS};
pub use validator::{is_valid, validate, QuoteDefect};
