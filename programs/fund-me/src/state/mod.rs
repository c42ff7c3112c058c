pub mod fund_me;
pub mod price_feed;

pub use fund_me::*;
pub use price_feed::*;
