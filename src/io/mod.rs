//! Arc table readers and derived-network writers.
//!
//! The engine itself performs no I/O. This module provides trait-based
//! adapters so the arc table can be loaded from the text export of the
//! vector-extraction step, and the derived network can be emitted as the
//! fixed-width files consumed by the hydrology model.

pub mod arc_table;
pub mod dhsvm;

use crate::algs::pipeline::DerivedNetwork;
use crate::network_error::NetworkError;
use crate::topology::arc::ArcRecord;
use crate::topology::network::StreamNetwork;
use std::io::{Read, Write};

/// Trait for readers that produce raw arc records.
pub trait ArcTableRead {
    /// Parse arc records from a reader, in file order.
    fn read_records<R: Read>(&self, reader: R) -> Result<Vec<ArcRecord>, NetworkError>;

    /// Parse and validate into a [`StreamNetwork`].
    fn read_network<R: Read>(&self, reader: R) -> Result<StreamNetwork, NetworkError> {
        StreamNetwork::from_records(self.read_records(reader)?)
    }
}

/// Trait for writers that serialize a derived network.
pub trait NetworkWrite {
    fn write<W: Write>(&self, writer: W, network: &DerivedNetwork) -> Result<(), NetworkError>;

    /// Render to an in-memory string.
    fn write_to_string(&self, network: &DerivedNetwork) -> Result<String, NetworkError> {
        let mut buf = Vec::new();
        self.write(&mut buf, network)?;
        String::from_utf8(buf).map_err(|e| NetworkError::Io(e.to_string()))
    }
}
