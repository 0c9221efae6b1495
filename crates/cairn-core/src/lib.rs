//! # cairn-core
//!
//! Core types, store traits, and error types for Cairn.
//!
//! This crate provides the foundational types shared across all Cairn crates:
//! - Graph entities and relationships, plus the hook audit and impact records
//! - Relationship tag enums (structural types and the graph relation taxonomy)
//! - ID prefix constants
//! - The `GraphStore` and `AuditStore` capability traits
//! - Outcome types for batch operations that report partial failure

pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod outcome;
pub mod store;
