//! Arc table validation helpers.
//!
//! Everything here runs before any computation: a malformed table aborts the
//! run instead of producing a partially derived network.

use crate::network_error::NetworkError;
use crate::topology::arc::ArcRecord;
use crate::topology::ids::ArcId;
use std::collections::HashSet;

/// Validate one arc in isolation.
///
/// # Errors
/// * [`NetworkError::InvalidId`] for a negative arc id.
/// * [`NetworkError::NonPositiveLength`] for `length <= 0` or non-finite length.
/// * [`NetworkError::DegenerateArc`] when `from_node == to_node`.
/// * [`NetworkError::InvalidField`] for negative or non-finite
///   `elev_drop`, `local_area` or `max_upstream_accumulation`.
pub fn validate_arc(arc: &ArcRecord) -> Result<(), NetworkError> {
    if arc.id.get() < 0 {
        return Err(NetworkError::InvalidId { arc: arc.id });
    }
    if !(arc.length.is_finite() && arc.length > 0.0) {
        return Err(NetworkError::NonPositiveLength {
            arc: arc.id,
            length: arc.length,
        });
    }
    if arc.from_node == arc.to_node {
        return Err(NetworkError::DegenerateArc {
            arc: arc.id,
            node: arc.from_node,
        });
    }
    for (field, value) in [
        ("elev_drop", arc.elev_drop),
        ("local_area", arc.local_area),
        ("max_upstream_accumulation", arc.max_upstream_accumulation),
    ] {
        if !(value.is_finite() && value >= 0.0) {
            return Err(NetworkError::InvalidField {
                arc: arc.id,
                field,
                value,
            });
        }
    }
    Ok(())
}

/// Validate a whole arc table: every row plus id uniqueness.
///
/// Rows are checked in input order; the first failure is returned.
pub fn validate_arc_table(arcs: &[ArcRecord]) -> Result<(), NetworkError> {
    let mut seen: HashSet<ArcId> = HashSet::with_capacity(arcs.len());
    for arc in arcs {
        validate_arc(arc)?;
        if !seen.insert(arc.id) {
            return Err(NetworkError::DuplicateArcId(arc.id));
        }
    }
    Ok(())
}
