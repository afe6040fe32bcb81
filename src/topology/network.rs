//! `StreamNetwork`: the in-memory arc collection.
//!
//! Arcs are stored in input order. Three indexes are built once at
//! construction:
//! - `id -> position` for O(1) lookup by [`ArcId`],
//! - `from_node -> positions` (arcs leaving a node),
//! - `to_node -> positions` (arcs entering a node).
//!
//! Position lists preserve input order, which is what "first encountered"
//! means for every tie-break in the resolver.

use crate::debug_invariants::DebugInvariants;
use crate::network_error::NetworkError;
use crate::topology::arc::ArcRecord;
use crate::topology::ids::{ArcId, NodeId};
use crate::topology::validation::validate_arc_table;
use hashbrown::HashMap;

/// Validated, indexed collection of stream arcs.
#[derive(Clone, Debug, Default)]
pub struct StreamNetwork {
    arcs: Vec<ArcRecord>,
    index: HashMap<ArcId, usize>,
    by_from: HashMap<NodeId, Vec<usize>>,
    by_to: HashMap<NodeId, Vec<usize>>,
}

impl StreamNetwork {
    /// Build a network from an externally supplied arc table.
    ///
    /// # Errors
    /// Any malformed-input error from [`validate_arc_table`]; nothing is
    /// indexed when validation fails.
    pub fn from_records<I>(records: I) -> Result<Self, NetworkError>
    where
        I: IntoIterator<Item = ArcRecord>,
    {
        let arcs: Vec<ArcRecord> = records.into_iter().collect();
        validate_arc_table(&arcs)?;

        let mut index = HashMap::with_capacity(arcs.len());
        let mut by_from: HashMap<NodeId, Vec<usize>> = HashMap::new();
        let mut by_to: HashMap<NodeId, Vec<usize>> = HashMap::new();
        for (i, arc) in arcs.iter().enumerate() {
            index.insert(arc.id, i);
            by_from.entry(arc.from_node).or_default().push(i);
            by_to.entry(arc.to_node).or_default().push(i);
        }
        log::debug!(
            "stream network: {} arcs over {} distinct nodes",
            arcs.len(),
            by_from.keys().chain(by_to.keys()).collect::<hashbrown::HashSet<_>>().len()
        );

        Ok(Self {
            arcs,
            index,
            by_from,
            by_to,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    /// All arcs in input order.
    #[inline]
    pub fn arcs(&self) -> &[ArcRecord] {
        &self.arcs
    }

    /// Arc at input position `i`.
    #[inline]
    pub fn arc_at(&self, i: usize) -> &ArcRecord {
        &self.arcs[i]
    }

    /// Input position of `id`.
    #[inline]
    pub fn index_of(&self, id: ArcId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn get(&self, id: ArcId) -> Option<&ArcRecord> {
        self.index_of(id).map(|i| &self.arcs[i])
    }

    pub fn contains(&self, id: ArcId) -> bool {
        self.index.contains_key(&id)
    }

    /// Positions of arcs whose `from_node == node`, in input order.
    pub fn positions_from(&self, node: NodeId) -> &[usize] {
        self.by_from.get(&node).map_or(&[], Vec::as_slice)
    }

    /// Positions of arcs whose `to_node == node`, in input order.
    pub fn positions_into(&self, node: NodeId) -> &[usize] {
        self.by_to.get(&node).map_or(&[], Vec::as_slice)
    }

    /// Arcs leaving `node`.
    pub fn arcs_from(&self, node: NodeId) -> impl Iterator<Item = &ArcRecord> + '_ {
        self.positions_from(node).iter().map(|&i| &self.arcs[i])
    }

    /// Arcs entering `node`.
    pub fn arcs_into(&self, node: NodeId) -> impl Iterator<Item = &ArcRecord> + '_ {
        self.positions_into(node).iter().map(|&i| &self.arcs[i])
    }

    /// Every arc flowing into the head of `id` (all tributaries, not only the
    /// dominant one). Empty for headwaters and unknown ids.
    pub fn tributaries(&self, id: ArcId) -> Vec<ArcId> {
        match self.get(id) {
            Some(arc) => self.arcs_into(arc.from_node).map(|a| a.id).collect(),
            None => Vec::new(),
        }
    }
}

impl DebugInvariants for StreamNetwork {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "StreamNetwork");
    }

    fn validate_invariants(&self) -> Result<(), NetworkError> {
        if self.index.len() != self.arcs.len() {
            return Err(NetworkError::InvariantViolation(format!(
                "id index holds {} entries for {} arcs",
                self.index.len(),
                self.arcs.len()
            )));
        }
        for (i, arc) in self.arcs.iter().enumerate() {
            if self.index.get(&arc.id) != Some(&i) {
                return Err(NetworkError::InvariantViolation(format!(
                    "arc {} not indexed at position {i}",
                    arc.id
                )));
            }
            if !self.positions_from(arc.from_node).contains(&i)
                || !self.positions_into(arc.to_node).contains(&i)
            {
                return Err(NetworkError::InvariantViolation(format!(
                    "arc {} missing from node index",
                    arc.id
                )));
            }
        }
        Ok(())
    }
}
