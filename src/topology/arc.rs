//! Arc: one stream segment between two network nodes.
//!
//! [`ArcRecord`] carries the immutable fields delivered by the upstream
//! extraction step. [`DerivedArc`] pairs a record with every field this engine
//! computes (links, order, contributing area, channel class). Derived fields
//! are write-once: they are produced by [`derive_network`](crate::algs::pipeline::derive_network)
//! and never mutated afterwards.

use crate::algs::classify::ChannelClass;
use crate::topology::ids::{ArcId, NodeId};

/// Default slope floor: slope is never exactly zero.
pub const SLOPE_FLOOR: f64 = 0.00001;

/// Immutable input row for one arc.
///
/// Flow along the arc runs from `from_node` to `to_node`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ArcRecord {
    pub id: ArcId,
    pub from_node: NodeId,
    pub to_node: NodeId,
    /// Geometric length, strictly positive.
    pub length: f64,
    /// Absolute elevation difference between the arc endpoints.
    pub elev_drop: f64,
    /// Drainage area (in raster cells) entering the network directly along this arc.
    pub local_area: f64,
    /// Maximum flow accumulation (in raster cells) at `from_node`.
    pub max_upstream_accumulation: f64,
}

impl ArcRecord {
    /// Arc with geometry only; elevation drop and areas start at zero.
    ///
    /// ```rust
    /// # use stream_sieve::topology::arc::ArcRecord;
    /// let a = ArcRecord::new(1, 10, 20, 250.0).with_elev_drop(5.0);
    /// assert_eq!(a.slope(0.00001), 0.02);
    /// ```
    pub fn new(id: i64, from_node: i64, to_node: i64, length: f64) -> Self {
        Self {
            id: ArcId::new(id),
            from_node: NodeId::new(from_node),
            to_node: NodeId::new(to_node),
            length,
            elev_drop: 0.0,
            local_area: 0.0,
            max_upstream_accumulation: 0.0,
        }
    }

    /// Derive the elevation drop from the elevations sampled at both endpoints.
    pub fn from_endpoint_elevations(
        id: i64,
        from_node: i64,
        to_node: i64,
        length: f64,
        start_elev: f64,
        end_elev: f64,
    ) -> Self {
        Self::new(id, from_node, to_node, length).with_elev_drop((start_elev - end_elev).abs())
    }

    pub fn with_elev_drop(mut self, elev_drop: f64) -> Self {
        self.elev_drop = elev_drop;
        self
    }

    pub fn with_local_area(mut self, local_area: f64) -> Self {
        self.local_area = local_area;
        self
    }

    pub fn with_max_upstream_accumulation(mut self, acc: f64) -> Self {
        self.max_upstream_accumulation = acc;
        self
    }

    /// `max(elev_drop / length, floor)`.
    #[inline]
    pub fn slope(&self, floor: f64) -> f64 {
        let raw = self.elev_drop / self.length;
        if raw > floor { raw } else { floor }
    }

    /// Water carried out of the arc, used to rank converging tributaries.
    #[inline]
    pub fn outflow_weight(&self) -> f64 {
        self.max_upstream_accumulation + self.local_area
    }
}

/// An arc together with all fields computed by the engine.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DerivedArc {
    pub record: ArcRecord,
    pub slope: f64,
    /// Arc this one drains into; `None` for outlets.
    pub downstream: Option<ArcId>,
    /// Dominant tributary; `None` for headwaters.
    pub upstream: Option<ArcId>,
    /// Stream order; `0` when propagation never reached the arc.
    pub order: u32,
    pub mean_contributing_area: f64,
    /// Hydraulic class; `None` on a classification gap.
    pub channel: Option<ChannelClass>,
}

impl DerivedArc {
    #[inline]
    pub fn id(&self) -> ArcId {
        self.record.id
    }

    #[inline]
    pub fn is_headwater(&self) -> bool {
        self.upstream.is_none()
    }

    #[inline]
    pub fn is_outlet(&self) -> bool {
        self.downstream.is_none()
    }

    /// Class number in `1..=18`, if assigned.
    #[inline]
    pub fn class_id(&self) -> Option<u8> {
        self.channel.map(|c| c.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slope_is_floored() {
        let flat = ArcRecord::new(1, 1, 2, 100.0);
        assert_eq!(flat.slope(SLOPE_FLOOR), SLOPE_FLOOR);
        let barely = ArcRecord::new(2, 1, 2, 100.0).with_elev_drop(0.0005);
        assert_eq!(barely.slope(SLOPE_FLOOR), SLOPE_FLOOR);
        let steep = ArcRecord::new(3, 1, 2, 100.0).with_elev_drop(3.0);
        assert!((steep.slope(SLOPE_FLOOR) - 0.03).abs() < 1e-12);
    }

    #[test]
    fn endpoint_elevations_give_absolute_drop() {
        let a = ArcRecord::from_endpoint_elevations(1, 1, 2, 50.0, 100.0, 104.5);
        assert_eq!(a.elev_drop, 4.5);
    }

    #[test]
    fn outflow_weight_sums_accumulation_and_local() {
        let a = ArcRecord::new(1, 1, 2, 10.0)
            .with_local_area(40.0)
            .with_max_upstream_accumulation(60.0);
        assert_eq!(a.outflow_weight(), 100.0);
    }
}
