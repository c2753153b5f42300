pub mod client;
pub mod compose;
pub mod config;
pub mod direct;
pub mod error;
pub mod normalize;
pub mod proxy;
pub mod resolve;
pub mod web_history;

pub use client::CamaraClient;
pub use config::ApiConfig;
pub use direct::DirectResolver;
pub use error::{ConsultaError, Result};
pub use proxy::ProxyResolver;
pub use resolve::{AnyResolver, Resolution, Resolver};
