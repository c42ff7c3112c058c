pub mod oracle;
pub mod transfer;

pub use oracle::*;
pub use transfer::*;
