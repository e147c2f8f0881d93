//! Bearer token storage.
//!
//! The token is kept in the OS keychain via `keyring`, never in the durable
//! key/value store the cache writes to (the storage guard would drop it
//! anyway).

pub mod credentials;

pub use credentials::CredentialStore;
