//! Re-export public algorithms.

pub mod area;
pub mod classify;
pub mod order;
pub mod pipeline;
pub mod resolve;
pub mod traversal;

pub use classify::classify;
pub use pipeline::derive_network;
