//! Stream order by level-synchronized propagation.
//!
//! Headwaters start at order 1. In round `level`, every arc whose order is
//! exactly `level` proposes `level + 1` to its downstream arc. Proposals are
//! computed against the orders as they stood at the start of the round and
//! merged with `max` once the round is complete, so a round never observes
//! its own writes. The loop stops at the first level nobody holds.
//!
//! The resulting label is the longest path (in arcs) from any headwater, not
//! a tributary-count (Strahler) order.
//!
//! An acyclic network settles in at most `longest_path + 1` rounds. A cycle
//! fed by a headwater would raise orders forever, so rounds are bounded and
//! exceeding the bound is a [`NetworkError::CyclicNetwork`]. A cycle with no
//! headwater feeding it never gets an order at all; it is caught after the
//! loop, before its arcs could be misreported as merely unreached.
//!
//! A caller-supplied bound below the network depth stops an acyclic network
//! early; that is reported as [`NetworkError::RoundLimitExceeded`], never as a
//! cycle.

use crate::algs::resolve::Links;
use crate::algs::traversal::find_cycle;
use crate::network_error::NetworkError;
use crate::topology::ids::ArcId;

/// Result of order propagation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderOutcome {
    /// Order by input position; `0` means never reached.
    pub orders: Vec<u32>,
    /// Number of rounds that carried at least one arc.
    pub rounds: usize,
    /// Positions left at order `0` on an acyclic network.
    pub unresolved: Vec<usize>,
}

impl OrderOutcome {
    pub fn max_order(&self) -> u32 {
        self.orders.iter().copied().max().unwrap_or(0)
    }
}

/// Propagate stream order along resolved downstream links.
///
/// Each round only visits the arcs whose order was raised in the previous
/// round, so a pass costs one step per order change rather than one scan of
/// the whole network per level.
///
/// # Errors
/// * [`NetworkError::CyclicNetwork`] when more than `max_rounds` rounds are
///   needed because of a loop, or when unreached arcs sit on a downstream cycle.
/// * [`NetworkError::RoundLimitExceeded`] when `max_rounds` is smaller than the
///   depth of an acyclic network.
pub fn propagate_order(links: &Links, max_rounds: usize) -> Result<OrderOutcome, NetworkError> {
    let n = links.len();
    let mut orders: Vec<u32> = (0..n)
        .map(|i| if links.is_headwater(i) { 1 } else { 0 })
        .collect();
    // level at which an arc was last queued, to dedup proposal targets
    let mut queued: Vec<u32> = orders.clone();

    let mut frontier: Vec<usize> = (0..n).filter(|&i| orders[i] == 1).collect();
    let mut level: u32 = 1;
    let mut rounds = 0usize;
    while !frontier.is_empty() {
        rounds += 1;
        if rounds > max_rounds {
            return Err(bound_error(links, frontier, rounds - 1));
        }

        // proposals read the round-start snapshot only
        let proposals: Vec<usize> = frontier.iter().filter_map(|&i| links.down[i]).collect();
        let next_level = level + 1;
        let mut next = Vec::with_capacity(proposals.len());
        for d in proposals {
            orders[d] = orders[d].max(next_level);
            if orders[d] == next_level && queued[d] != next_level {
                queued[d] = next_level;
                next.push(d);
            }
        }
        log::trace!("order round {level}: {} arcs at this level", frontier.len());
        frontier = next;
        level = next_level;
    }

    let unresolved: Vec<usize> = (0..n).filter(|&i| orders[i] == 0).collect();
    if !unresolved.is_empty() {
        if let Some(cycle) = find_cycle(links) {
            return Err(NetworkError::CyclicNetwork {
                cycle: ids_of(links, &cycle),
                rounds,
            });
        }
    }

    log::debug!(
        "order propagation settled after {rounds} rounds, max order {}",
        orders.iter().copied().max().unwrap_or(0)
    );
    Ok(OrderOutcome {
        orders,
        rounds,
        unresolved,
    })
}

fn bound_error(links: &Links, mut frontier: Vec<usize>, rounds: usize) -> NetworkError {
    match find_cycle(links) {
        Some(cycle) => NetworkError::CyclicNetwork {
            cycle: ids_of(links, &cycle),
            rounds,
        },
        None => {
            frontier.sort_unstable();
            NetworkError::RoundLimitExceeded {
                rounds,
                active: ids_of(links, &frontier),
            }
        }
    }
}

fn ids_of(links: &Links, positions: &[usize]) -> Vec<ArcId> {
    positions.iter().map(|&i| links.ids[i]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algs::resolve::{DownstreamLink, resolve_topology};
    use crate::config::DownstreamPolicy;
    use crate::diagnostics::Diagnostics;
    use crate::topology::arc::ArcRecord;
    use crate::topology::network::StreamNetwork;

    fn links_for(records: Vec<ArcRecord>) -> Links {
        let net = StreamNetwork::from_records(records).unwrap();
        resolve_topology(&net, DownstreamPolicy::FirstWins, &mut Diagnostics::new()).unwrap()
    }

    /// Hand-built links: positions map to ids `1..=n`.
    fn raw_links(down: Vec<Option<usize>>, up: Vec<Option<usize>>) -> Links {
        let n = down.len();
        let mut inflows = vec![Vec::new(); n];
        for (i, d) in down.iter().enumerate() {
            if let Some(d) = d {
                inflows[*d].push(i);
            }
        }
        Links {
            downstream: down
                .iter()
                .map(|d| match d {
                    Some(j) => DownstreamLink::Unique(ArcId::new(*j as i64 + 1)),
                    None => DownstreamLink::Outlet,
                })
                .collect(),
            down,
            up,
            inflows,
            ids: (1..=n as i64).map(ArcId::new).collect(),
        }
    }

    #[test]
    fn confluence_takes_longest_chain() {
        // 1 -> 2 -> 4 and 3 -> 4, 4 -> 5
        let links = links_for(vec![
            ArcRecord::new(1, 1, 2, 1.0),
            ArcRecord::new(2, 2, 3, 1.0),
            ArcRecord::new(3, 9, 3, 1.0),
            ArcRecord::new(4, 3, 4, 1.0),
            ArcRecord::new(5, 4, 5, 1.0),
        ]);
        let out = propagate_order(&links, links.len() + 1).unwrap();
        assert_eq!(out.orders, vec![1, 2, 1, 3, 4]);
        assert_eq!(out.rounds, 4);
        assert_eq!(out.max_order(), 4);
        assert!(out.unresolved.is_empty());
    }

    #[test]
    fn headless_cycle_is_reported() {
        let links = links_for(vec![
            ArcRecord::new(1, 1, 2, 1.0),
            ArcRecord::new(2, 2, 3, 1.0),
            ArcRecord::new(3, 3, 1, 1.0),
        ]);
        let err = propagate_order(&links, links.len() + 1).unwrap_err();
        match err {
            NetworkError::CyclicNetwork { cycle, .. } => {
                assert_eq!(cycle, vec![ArcId::new(1), ArcId::new(2), ArcId::new(3)]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn fed_cycle_hits_round_bound() {
        // headwater 0 feeds the loop 1 -> 2 -> 1; position 1 also lists 0 as
        // its dominant upstream so the loop keeps climbing.
        let links = raw_links(vec![Some(1), Some(2), Some(1)], vec![None, Some(0), Some(1)]);
        let err = propagate_order(&links, 4).unwrap_err();
        match err {
            NetworkError::CyclicNetwork { cycle, rounds } => {
                assert_eq!(rounds, 4);
                assert_eq!(cycle, vec![ArcId::new(2), ArcId::new(3)]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn tight_bound_on_acyclic_chain_is_not_a_cycle() {
        let links = links_for(
            (1..=5)
                .map(|k| ArcRecord::new(k, k, k + 1, 1.0))
                .collect(),
        );
        let err = propagate_order(&links, 2).unwrap_err();
        assert_eq!(
            err,
            NetworkError::RoundLimitExceeded {
                rounds: 2,
                active: vec![ArcId::new(3)],
            }
        );
        assert_eq!(propagate_order(&links, 5).unwrap().orders, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn long_chain_visits_each_arc_once_per_level() {
        let n = 20_000i64;
        let links = links_for((1..=n).map(|k| ArcRecord::new(k, k, k + 1, 1.0)).collect());
        let out = propagate_order(&links, links.len() + 1).unwrap();
        assert_eq!(out.rounds, n as usize);
        assert_eq!(out.max_order(), n as u32);
    }

    #[test]
    fn raised_twice_arc_rejoins_later_frontier() {
        // 1 -> 3 directly, and 2 -> 4 -> 3; arc 3 gets 2 then 3, and 5 below it ends at 4
        let links = links_for(vec![
            ArcRecord::new(1, 1, 3, 1.0),
            ArcRecord::new(2, 2, 4, 1.0),
            ArcRecord::new(4, 4, 3, 1.0),
            ArcRecord::new(3, 3, 5, 1.0),
            ArcRecord::new(5, 5, 6, 1.0),
        ]);
        let out = propagate_order(&links, links.len() + 1).unwrap();
        assert_eq!(out.orders, vec![1, 1, 2, 3, 4]);
    }

    #[test]
    fn unreached_arcs_are_listed_not_defaulted() {
        // divergence: 1 splits into 2 and 3, only 2 is linked downstream
        let links = links_for(vec![
            ArcRecord::new(1, 1, 2, 1.0),
            ArcRecord::new(2, 2, 3, 1.0),
            ArcRecord::new(3, 2, 4, 1.0),
        ]);
        let out = propagate_order(&links, links.len() + 1).unwrap();
        assert_eq!(out.orders, vec![1, 2, 0]);
        assert_eq!(out.unresolved, vec![2]);
    }

    #[test]
    fn empty_network_settles_immediately() {
        let links = raw_links(Vec::new(), Vec::new());
        let out = propagate_order(&links, 1).unwrap();
        assert!(out.orders.is_empty());
        assert_eq!(out.rounds, 0);
    }
}
