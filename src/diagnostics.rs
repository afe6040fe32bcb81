//! Non-fatal data-quality findings.
//!
//! The engine never silently drops an arc: whenever it applies a tie-break
//! or leaves a derived field unassigned it records a [`Diagnostic`] naming
//! the arc, logs it at `warn` level, and carries on.

use crate::topology::ids::ArcId;
use std::fmt;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Diagnostic {
    /// Several arcs start where `arc` ends; `chosen` is the first in input order.
    AmbiguousDownstream {
        arc: ArcId,
        chosen: ArcId,
        candidates: Vec<ArcId>,
    },
    /// Order propagation never reached `arc`; its order stays `0`.
    UnresolvedOrder { arc: ArcId },
    /// `(slope, mean_area)` fell outside every class bracket.
    ClassificationGap {
        arc: ArcId,
        slope: f64,
        mean_area: f64,
    },
}

impl Diagnostic {
    pub fn arc(&self) -> ArcId {
        match self {
            Diagnostic::AmbiguousDownstream { arc, .. }
            | Diagnostic::UnresolvedOrder { arc }
            | Diagnostic::ClassificationGap { arc, .. } => *arc,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::AmbiguousDownstream {
                arc,
                chosen,
                candidates,
            } => write!(
                f,
                "arc {arc}: ambiguous downstream {candidates:?}, using {chosen}"
            ),
            Diagnostic::UnresolvedOrder { arc } => {
                write!(f, "arc {arc}: not reachable from any headwater, order unassigned")
            }
            Diagnostic::ClassificationGap {
                arc,
                slope,
                mean_area,
            } => write!(
                f,
                "arc {arc}: no channel class for slope={slope} mean_area={mean_area}"
            ),
        }
    }
}

/// Ordered list of diagnostics produced by one run.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record and log one finding.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        log::warn!("{diagnostic}");
        self.entries.push(diagnostic);
    }

    pub fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, it: I) {
        for d in it {
            self.push(d);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    /// `(arc, candidates)` for every ambiguous downstream link.
    pub fn ambiguous_downstream(&self) -> Vec<(ArcId, &[ArcId])> {
        self.entries
            .iter()
            .filter_map(|d| match d {
                Diagnostic::AmbiguousDownstream {
                    arc, candidates, ..
                } => Some((*arc, candidates.as_slice())),
                _ => None,
            })
            .collect()
    }

    pub fn unresolved_order(&self) -> Vec<ArcId> {
        self.entries
            .iter()
            .filter_map(|d| match d {
                Diagnostic::UnresolvedOrder { arc } => Some(*arc),
                _ => None,
            })
            .collect()
    }

    pub fn classification_gaps(&self) -> Vec<ArcId> {
        self.entries
            .iter()
            .filter_map(|d| match d {
                Diagnostic::ClassificationGap { arc, .. } => Some(*arc),
                _ => None,
            })
            .collect()
    }

    /// Every arc named by at least one diagnostic, sorted and deduplicated.
    pub fn affected_arcs(&self) -> Vec<ArcId> {
        use itertools::Itertools;
        self.entries.iter().map(Diagnostic::arc).sorted().dedup().collect()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
