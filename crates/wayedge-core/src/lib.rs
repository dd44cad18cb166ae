//! wayedge core: domain models, error taxonomy, input validation,
//! repository traits and the reconciliation planner shared by every
//! crate in the workspace.

pub mod error;
pub mod models;
pub mod reconcile;
pub mod repository;
pub mod validation;
