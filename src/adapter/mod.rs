//! Implementations of ports (hexagonal adapters).

pub mod csv;
pub mod http;

#[cfg(feature = "telegram")]
pub mod telegram;

pub use http::HttpFetcher;

#[cfg(feature = "telegram")]
pub use telegram::TelegramPublisher;
