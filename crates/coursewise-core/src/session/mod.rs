//! Session storage contract.

pub mod store;

pub use store::SessionStore;
