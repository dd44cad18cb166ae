//! Tenant-facing website management for the wayedge console.

pub mod account;
mod collections;
pub mod config;
pub mod error;
pub mod gate;
pub mod password;
pub mod quota;
pub mod service;

pub use account::AccountService;
pub use config::ConsoleConfig;
pub use error::ConsoleError;
pub use gate::{Caller, OwnedWebsite};
pub use service::WebsiteService;
