//! Mean contributing area per arc.
//!
//! The mean drainage area along an arc is taken halfway between what enters
//! its head and what leaves its tail:
//!
//! - headwater: `local_area / 2 * cell_area`
//! - otherwise: `(max_upstream_accumulation + local_area / 2) * cell_area`
//!
//! Only the presence of an upstream link matters here, so this stage runs
//! after resolution and is independent of stream order.

use crate::algs::resolve::Links;
use crate::topology::arc::ArcRecord;
use crate::topology::network::StreamNetwork;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Mean contributing area of a single arc.
#[inline]
pub fn arc_mean_area(arc: &ArcRecord, is_headwater: bool, cell_area: f64) -> f64 {
    let half_local = arc.local_area / 2.0;
    if is_headwater {
        half_local * cell_area
    } else {
        (arc.max_upstream_accumulation + half_local) * cell_area
    }
}

/// Mean contributing area for every arc, by input position.
pub fn mean_contributing_areas(network: &StreamNetwork, links: &Links, cell_area: f64) -> Vec<f64> {
    let arcs = network.arcs();

    #[cfg(feature = "rayon")]
    let areas = arcs
        .par_iter()
        .enumerate()
        .map(|(i, arc)| arc_mean_area(arc, links.is_headwater(i), cell_area))
        .collect();

    #[cfg(not(feature = "rayon"))]
    let areas = arcs
        .iter()
        .enumerate()
        .map(|(i, arc)| arc_mean_area(arc, links.is_headwater(i), cell_area))
        .collect();

    areas
}
