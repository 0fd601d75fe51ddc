//! Trait definitions (hexagonal ports). Depend only on domain and errors.
//!
//! Ports are the extension points adapters implement to integrate with
//! external systems: the HTTP collaborator fetching pages and the
//! messaging collaborator publishing ranked deals.

pub mod fetcher;
pub mod publisher;

pub use fetcher::Fetcher;
pub use publisher::Publisher;
