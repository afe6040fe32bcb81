//! Top-level module for stream network topology.
//!
//! This module provides the data model the algorithms operate on:
//! - Arc and node identifiers
//! - Arc input records and derived arc records
//! - The indexed `StreamNetwork` and its construction-time validation
//!
//! Nodes are never materialized; they exist only as join keys between arcs.

pub mod arc;
pub mod ids;
pub mod network;
pub mod validation;

pub use arc::{ArcRecord, DerivedArc};
pub use ids::{ArcId, NodeId};
pub use network::StreamNetwork;
