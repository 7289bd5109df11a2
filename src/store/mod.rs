//! Remote point store (PocketBase).

pub mod client;
pub mod models;
