pub mod adapter;
pub mod services;

pub use adapter::{
    AdapterConfig, ApiAdapter, ApiKey, Auth, Payload, RequestBody, RequestOptions,
    ResponseEnvelope, Verb, TRANSPORT_FAILURE,
};
pub use services::{congress_adapter, fred_adapter, treasury_adapter};
