//! Domain models for the wayedge console.
//!
//! A tenant owns websites; each website owns four child collections
//! (domains, origins, firewall rules, whitelist paths). Ownership is
//! enforced at the store boundary, never through an in-memory graph.

pub mod domain;
pub mod firewall_rule;
pub mod origin;
pub mod tenant;
pub mod website;
pub mod whitelist_path;
