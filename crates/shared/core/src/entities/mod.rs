mod currency_pair;
mod order;
mod order_id;
mod order_status;
mod trade;

pub use currency_pair::CurrencyPair;
pub use order::{AmountUpdate, Order, OrderRequest, ValidOrderRequest};
pub use order_id::{OrderId, OrderIdSequence};
pub use order_status::OrderStatus;
pub use trade::Trade;
