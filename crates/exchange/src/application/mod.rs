mod exchange;

pub use exchange::{Exchange, ExchangeHandle};
