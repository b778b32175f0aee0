pub mod client;
pub mod config;
pub mod error;
pub mod server;
pub mod tools;

pub use client::{
    AdapterConfig, ApiAdapter, ApiKey, Auth, Payload, RequestOptions, ResponseEnvelope, Verb,
};
pub use config::Config;
pub use error::{Error, Result};
pub use server::Server;
pub use tools::{CongressTools, FredTools, TreasuryTools};
