#![cfg_attr(docsrs, feature(doc_cfg))]
//! # stream-sieve
//!
//! stream-sieve derives a routable stream network and its hydraulic channel
//! properties from vectorized stream arcs. Given an unordered arc table (node
//! ids, length, elevation drop, local and upstream accumulated area) it
//! reconstructs the directed drainage graph, assigns stream order, estimates
//! mean contributing area and classifies each arc into one of 18 hydraulic
//! channel classes.
//!
//! ## Pipeline
//! 1. [`StreamNetwork`](topology::network::StreamNetwork): validated, indexed arcs.
//! 2. [`resolve_topology`](algs::resolve::resolve_topology): downstream and dominant upstream links.
//! 3. [`mean_contributing_areas`](algs::area::mean_contributing_areas).
//! 4. [`propagate_order`](algs::order::propagate_order): level-synchronized, bounded.
//! 5. [`classify`](algs::classify::classify): fixed slope x area calibration table.
//!
//! [`derive_network`](algs::pipeline::derive_network) runs all of them.
//!
//! ## Errors and diagnostics
//! Malformed input and cyclic networks are fatal [`NetworkError`](network_error::NetworkError)s.
//! Ambiguous downstream links, unreached arcs and classification gaps are
//! non-fatal and returned as [`Diagnostics`](diagnostics::Diagnostics); each
//! one is also logged through the `log` facade.
//!
//! ## Usage
//!
//! ```rust
//! use stream_sieve::prelude::*;
//!
//! let network = StreamNetwork::from_records([
//!     ArcRecord::new(1, 10, 20, 400.0).with_local_area(100.0),
//!     ArcRecord::new(2, 11, 20, 300.0).with_local_area(50.0),
//!     ArcRecord::new(3, 20, 30, 900.0).with_local_area(10.0),
//! ])?;
//! let derived = derive_network(&network, &EngineConfig::default())?;
//! assert_eq!(derived.get(ArcId::new(3)).unwrap().order, 2);
//! # Ok::<(), NetworkError>(())
//! ```
//!
//! ## Features
//! - `rayon`: parallel per-arc stages (area, classification).
//! - `strict-invariants` / `check-invariants`: invariant checks in release builds.

pub mod algs;
pub mod config;
pub mod debug_invariants;
pub mod diagnostics;
pub mod io;
pub mod network_error;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::classify::{CHANNEL_CLASSES, ChannelClass, classify};
    pub use crate::algs::pipeline::{DerivedNetwork, NetworkSummary, derive_network};
    pub use crate::algs::resolve::DownstreamLink;
    pub use crate::config::{DownstreamPolicy, EngineConfig};
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::diagnostics::{Diagnostic, Diagnostics};
    pub use crate::io::{ArcTableRead, NetworkWrite};
    pub use crate::network_error::NetworkError;
    pub use crate::topology::arc::{ArcRecord, DerivedArc};
    pub use crate::topology::ids::{ArcId, NodeId};
    pub use crate::topology::network::StreamNetwork;
}
