// Gen2 dialect: JSON-RPC over HTTP.

mod client;
pub mod components;
pub mod models;

pub use client::Gen2Client;
