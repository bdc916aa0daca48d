// libmfrc522/src/utils/mod.rs

//! Small helpers shared by the driver, the session layer and the demos.

pub mod hex;
pub mod timeout;

pub use hex::*;
pub use timeout::*;
