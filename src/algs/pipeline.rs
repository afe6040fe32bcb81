//! End-to-end derivation: resolve -> area -> order -> classify.
//!
//! [`derive_network`] is the single entry point that runs every stage in
//! dependency order over an immutable [`StreamNetwork`] and assembles the
//! write-once [`DerivedArc`] records. Running it twice on the same network
//! yields identical output: no state survives between runs.

use std::collections::BTreeMap;

use crate::algs::area::mean_contributing_areas;
use crate::algs::classify::classify_arcs;
use crate::algs::order::propagate_order;
use crate::algs::resolve::{Links, resolve_topology};
use crate::algs::traversal::{path_to_outlet, upstream_closure};
use crate::config::EngineConfig;
use crate::debug_invariants::DebugInvariants;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::network_error::NetworkError;
use crate::topology::arc::DerivedArc;
use crate::topology::ids::ArcId;
use crate::topology::network::StreamNetwork;
use hashbrown::HashMap;

/// Output of one derivation run.
#[derive(Clone, Debug)]
pub struct DerivedNetwork {
    arcs: Vec<DerivedArc>,
    links: Links,
    index: HashMap<ArcId, usize>,
    diagnostics: Diagnostics,
    rounds: usize,
}

/// Aggregate counts for reporting.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NetworkSummary {
    pub arcs: usize,
    pub headwaters: usize,
    pub outlets: usize,
    pub max_order: u32,
    pub order_rounds: usize,
    /// Arc count per assigned class number.
    pub class_histogram: BTreeMap<u8, usize>,
    pub diagnostics: usize,
}

/// Run every stage over `network`.
///
/// # Errors
/// * [`NetworkError::InvalidConfig`] before anything runs.
/// * [`NetworkError::AmbiguousDownstream`] under the `Reject` policy.
/// * [`NetworkError::CyclicNetwork`] or [`NetworkError::RoundLimitExceeded`]
///   from order propagation.
pub fn derive_network(
    network: &StreamNetwork,
    config: &EngineConfig,
) -> Result<DerivedNetwork, NetworkError> {
    config.validate()?;
    let mut diagnostics = Diagnostics::new();

    let links = resolve_topology(network, config.downstream_policy, &mut diagnostics)?;
    let areas = mean_contributing_areas(network, &links, config.cell_area());
    let order = propagate_order(&links, config.round_bound(network.len()))?;
    diagnostics.extend(
        order
            .unresolved
            .iter()
            .map(|&i| Diagnostic::UnresolvedOrder { arc: links.ids[i] }),
    );

    let slopes: Vec<f64> = network
        .arcs()
        .iter()
        .map(|a| a.slope(config.slope_floor))
        .collect();
    let classes = classify_arcs(&links, &slopes, &areas, &mut diagnostics);

    let arcs: Vec<DerivedArc> = network
        .arcs()
        .iter()
        .enumerate()
        .map(|(i, record)| DerivedArc {
            record: record.clone(),
            slope: slopes[i],
            downstream: links.downstream_id(i),
            upstream: links.upstream_id(i),
            order: order.orders[i],
            mean_contributing_area: areas[i],
            channel: classes[i],
        })
        .collect();
    let index = arcs.iter().enumerate().map(|(i, a)| (a.id(), i)).collect();

    let derived = DerivedNetwork {
        arcs,
        links,
        index,
        diagnostics,
        rounds: order.rounds,
    };
    derived.debug_assert_invariants();

    let summary = derived.summary();
    log::info!(
        "derived {} arcs: {} headwaters, {} outlets, max order {}, {} diagnostics",
        summary.arcs,
        summary.headwaters,
        summary.outlets,
        summary.max_order,
        summary.diagnostics
    );
    Ok(derived)
}

impl StreamNetwork {
    /// Shorthand for [`derive_network`].
    pub fn derive(&self, config: &EngineConfig) -> Result<DerivedNetwork, NetworkError> {
        derive_network(self, config)
    }
}

impl DerivedNetwork {
    /// Derived arcs in input order.
    pub fn arcs(&self) -> &[DerivedArc] {
        &self.arcs
    }

    pub fn get(&self, id: ArcId) -> Option<&DerivedArc> {
        self.index.get(&id).map(|&i| &self.arcs[i])
    }

    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    pub fn links(&self) -> &Links {
        &self.links
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Rounds the order propagation needed.
    pub fn order_rounds(&self) -> usize {
        self.rounds
    }

    /// Every arc whose chosen downstream is `id`, in input order.
    pub fn inflows(&self, id: ArcId) -> Vec<ArcId> {
        match self.index.get(&id) {
            Some(&i) => self.links.inflows[i].iter().map(|&j| self.links.ids[j]).collect(),
            None => Vec::new(),
        }
    }

    /// Arcs from `id` down to its outlet, in flow order.
    pub fn path_to_outlet(&self, id: ArcId) -> Option<Vec<ArcId>> {
        let start = *self.index.get(&id)?;
        let path = path_to_outlet(&self.links, start)?;
        Some(path.into_iter().map(|i| self.links.ids[i]).collect())
    }

    /// `id` and every arc draining into it, sorted by input position.
    pub fn upstream_closure(&self, id: ArcId) -> Vec<ArcId> {
        match self.index.get(&id) {
            Some(&i) => upstream_closure(&self.links, [i])
                .into_iter()
                .map(|j| self.links.ids[j])
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn summary(&self) -> NetworkSummary {
        let mut class_histogram = BTreeMap::new();
        for c in self.arcs.iter().filter_map(DerivedArc::class_id) {
            *class_histogram.entry(c).or_insert(0) += 1;
        }
        NetworkSummary {
            arcs: self.arcs.len(),
            headwaters: self.arcs.iter().filter(|a| a.is_headwater()).count(),
            outlets: self.arcs.iter().filter(|a| a.is_outlet()).count(),
            max_order: self.arcs.iter().map(|a| a.order).max().unwrap_or(0),
            order_rounds: self.rounds,
            class_histogram,
            diagnostics: self.diagnostics.len(),
        }
    }
}

impl DebugInvariants for DerivedNetwork {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "DerivedNetwork");
    }

    fn validate_invariants(&self) -> Result<(), NetworkError> {
        let unresolved = self.diagnostics.unresolved_order();
        let gaps = self.diagnostics.classification_gaps();
        for arc in &self.arcs {
            let id = arc.id();
            if !(arc.slope > 0.0) {
                return Err(NetworkError::InvariantViolation(format!(
                    "arc {id}: slope {} not positive",
                    arc.slope
                )));
            }
            if arc.is_headwater() && arc.order != 1 {
                return Err(NetworkError::InvariantViolation(format!(
                    "headwater arc {id} has order {}",
                    arc.order
                )));
            }
            if arc.order == 0 && !unresolved.contains(&id) {
                return Err(NetworkError::InvariantViolation(format!(
                    "arc {id} has no order and no diagnostic"
                )));
            }
            if arc.channel.is_none() && !gaps.contains(&id) {
                return Err(NetworkError::InvariantViolation(format!(
                    "arc {id} has no class and no diagnostic"
                )));
            }
            if let (Some(down), true) = (arc.downstream, arc.order > 0) {
                let below = self.get(down).map_or(0, |d| d.order);
                if below <= arc.order {
                    return Err(NetworkError::InvariantViolation(format!(
                        "arc {id} (order {}) drains into {down} (order {below})",
                        arc.order
                    )));
                }
            }
        }
        Ok(())
    }
}
