//! Topology resolver: downstream and dominant-upstream links per arc.
//!
//! Both links are found through the node indexes of [`StreamNetwork`], so
//! resolution is O(n) plus an argmax over the tributaries converging at each
//! arc head.
//!
//! - **Downstream**: any arc `B` with `B.from_node == A.to_node`. More than one
//!   candidate is a data-quality issue; the outcome is tagged as
//!   [`DownstreamLink::Ambiguous`] and the first candidate in input order wins
//!   (or the run aborts under [`DownstreamPolicy::Reject`]).
//! - **Upstream**: among arcs `C` with `C.to_node == A.from_node`, the one
//!   maximizing `max_upstream_accumulation + local_area`. Ties keep the first
//!   in input order. Other tributaries stay in the network; only a single
//!   parent is recorded for the area chain.

use crate::config::DownstreamPolicy;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::network_error::NetworkError;
use crate::topology::ids::ArcId;
use crate::topology::network::StreamNetwork;

/// Tagged outcome of the downstream search for one arc.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DownstreamLink {
    /// No arc starts where this one ends.
    Outlet,
    Unique(ArcId),
    /// Several candidates; `chosen` is the first of `candidates`.
    Ambiguous {
        chosen: ArcId,
        candidates: Vec<ArcId>,
    },
}

impl DownstreamLink {
    /// The arc flow continues into, if any.
    pub fn arc(&self) -> Option<ArcId> {
        match self {
            DownstreamLink::Outlet => None,
            DownstreamLink::Unique(id) => Some(*id),
            DownstreamLink::Ambiguous { chosen, .. } => Some(*chosen),
        }
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, DownstreamLink::Ambiguous { .. })
    }
}

/// Resolved links, indexed by input position of the owning network.
#[derive(Clone, Debug, Default)]
pub struct Links {
    /// Tagged downstream outcome per arc.
    pub downstream: Vec<DownstreamLink>,
    /// Position of the chosen downstream arc.
    pub down: Vec<Option<usize>>,
    /// Position of the dominant upstream arc.
    pub up: Vec<Option<usize>>,
    /// Positions of arcs whose chosen downstream is this arc.
    pub inflows: Vec<Vec<usize>>,
    /// Arc ids by position, so links can be reported without the network.
    pub ids: Vec<ArcId>,
}

impl Links {
    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[inline]
    pub fn is_headwater(&self, i: usize) -> bool {
        self.up[i].is_none()
    }

    pub fn downstream_id(&self, i: usize) -> Option<ArcId> {
        self.down[i].map(|j| self.ids[j])
    }

    pub fn upstream_id(&self, i: usize) -> Option<ArcId> {
        self.up[i].map(|j| self.ids[j])
    }
}

/// Resolve downstream and dominant-upstream links for every arc.
///
/// Ambiguous downstream links are recorded in `diagnostics` under
/// [`DownstreamPolicy::FirstWins`].
///
/// # Errors
/// [`NetworkError::AmbiguousDownstream`] under [`DownstreamPolicy::Reject`].
pub fn resolve_topology(
    network: &StreamNetwork,
    policy: DownstreamPolicy,
    diagnostics: &mut Diagnostics,
) -> Result<Links, NetworkError> {
    let n = network.len();
    let arcs = network.arcs();
    let mut links = Links {
        downstream: Vec::with_capacity(n),
        down: Vec::with_capacity(n),
        up: Vec::with_capacity(n),
        inflows: vec![Vec::new(); n],
        ids: arcs.iter().map(|a| a.id).collect(),
    };

    for (i, arc) in arcs.iter().enumerate() {
        let candidates = network.positions_from(arc.to_node);
        let (link, down) = match candidates {
            [] => (DownstreamLink::Outlet, None),
            [only] => (DownstreamLink::Unique(arcs[*only].id), Some(*only)),
            [first, ..] => {
                let ids: Vec<ArcId> = candidates.iter().map(|&j| arcs[j].id).collect();
                if policy == DownstreamPolicy::Reject {
                    return Err(NetworkError::AmbiguousDownstream {
                        arc: arc.id,
                        candidates: ids,
                    });
                }
                diagnostics.push(Diagnostic::AmbiguousDownstream {
                    arc: arc.id,
                    chosen: arcs[*first].id,
                    candidates: ids.clone(),
                });
                (
                    DownstreamLink::Ambiguous {
                        chosen: arcs[*first].id,
                        candidates: ids,
                    },
                    Some(*first),
                )
            }
        };
        links.downstream.push(link);
        links.down.push(down);
        if let Some(j) = down {
            links.inflows[j].push(i);
        }

        links.up.push(dominant_tributary(network, network.positions_into(arc.from_node)));
    }

    log::debug!(
        "resolved topology: {} outlets, {} headwaters, {} ambiguous",
        links.down.iter().filter(|d| d.is_none()).count(),
        links.up.iter().filter(|u| u.is_none()).count(),
        links.downstream.iter().filter(|d| d.is_ambiguous()).count()
    );
    Ok(links)
}

/// Position of the tributary carrying the most water; first wins on ties.
fn dominant_tributary(network: &StreamNetwork, tributaries: &[usize]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for &j in tributaries {
        let weight = network.arc_at(j).outflow_weight();
        match best {
            Some((_, w)) if weight <= w => {}
            _ => best = Some((j, weight)),
        }
    }
    best.map(|(j, _)| j)
}
