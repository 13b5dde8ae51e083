//! Membership Service
//!
//! Manages recurring memberships and the billing periods generated for them,
//! exposed over a REST API and persisted in PostgreSQL.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
