//! Models Module
//!
//! Response DTOs for the admin API.

mod responses;

pub use responses::*;
