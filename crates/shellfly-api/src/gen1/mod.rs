// Gen1 dialect: RESTful paths + query strings.

mod client;
pub mod components;
pub mod models;

pub use client::Gen1Client;
