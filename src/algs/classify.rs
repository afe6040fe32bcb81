//! Hydraulic channel classes from slope and mean contributing area.
//!
//! Classification is a fixed calibration table, not a formula: 3 slope tiers
//! crossed with 6 area tiers give 18 classes numbered row-major (slope tier
//! first). Each class carries constant hydraulic depth, hydraulic width and
//! effective width.
//!
//! Tiers are tested in order and the first match wins. The third slope tier
//! starts at `0.01`, below the second tier's upper bound of `0.1`, so for
//! `0.01 < slope <= 0.1` the second tier is selected and the third only ever
//! applies to `slope > 0.1`.

use crate::algs::resolve::Links;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::topology::ids::ArcId;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Half-open bracket `(lower, upper]`; a missing bound is unbounded.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bracket {
    pub above: Option<f64>,
    pub at_most: Option<f64>,
}

impl Bracket {
    const fn new(above: Option<f64>, at_most: Option<f64>) -> Self {
        Self { above, at_most }
    }

    /// NaN never matches.
    #[inline]
    pub fn contains(&self, x: f64) -> bool {
        self.above.is_none_or(|lo| x > lo) && self.at_most.is_none_or(|hi| x <= hi) && !x.is_nan()
    }
}

/// Slope tiers in evaluation order.
pub const SLOPE_TIERS: [Bracket; 3] = [
    Bracket::new(None, Some(0.002)),
    Bracket::new(Some(0.002), Some(0.1)),
    Bracket::new(Some(0.01), None),
];

/// Area tiers, in the units of the mean contributing area.
pub const AREA_TIERS: [Bracket; 6] = [
    Bracket::new(None, Some(1.0e6)),
    Bracket::new(Some(1.0e6), Some(1.0e7)),
    Bracket::new(Some(1.0e7), Some(2.0e7)),
    Bracket::new(Some(2.0e7), Some(3.0e7)),
    Bracket::new(Some(3.0e7), Some(4.0e7)),
    Bracket::new(Some(4.0e7), None),
];

/// One row of the calibration table.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ChannelClass {
    /// Class number, `1..=18`.
    pub id: u8,
    pub hyd_depth: f64,
    pub hyd_width: f64,
    pub eff_width: f64,
}

const fn class(id: u8, hyd_depth: f64, hyd_width: f64, eff_width: f64) -> ChannelClass {
    ChannelClass {
        id,
        hyd_depth,
        hyd_width,
        eff_width,
    }
}

/// Calibration table, row-major over `SLOPE_TIERS x AREA_TIERS`.
#[rustfmt::skip]
pub static CHANNEL_CLASSES: [ChannelClass; 18] = [
    class(1,  0.5, 0.03, 0.06),
    class(2,  1.0, 0.03, 0.09),
    class(3,  2.0, 0.03, 0.12),
    class(4,  3.0, 0.03, 0.15),
    class(5,  4.0, 0.03, 0.18),
    class(6,  4.5, 0.03, 0.21),
    class(7,  0.5, 0.05, 0.10),
    class(8,  1.0, 0.05, 0.15),
    class(9,  2.0, 0.05, 0.20),
    class(10, 3.0, 0.05, 0.25),
    class(11, 4.0, 0.05, 0.30),
    class(12, 4.5, 0.05, 0.35),
    class(13, 0.5, 0.10, 0.20),
    class(14, 1.0, 0.10, 0.30),
    class(15, 2.0, 0.10, 0.40),
    class(16, 3.0, 0.10, 0.50),
    class(17, 4.0, 0.10, 0.60),
    class(18, 4.5, 0.10, 0.70),
];

/// Class for `(slope, mean_area)`; `None` outside every bracket.
pub fn classify(slope: f64, mean_area: f64) -> Option<&'static ChannelClass> {
    let s = SLOPE_TIERS.iter().position(|t| t.contains(slope))?;
    let a = AREA_TIERS.iter().position(|t| t.contains(mean_area))?;
    Some(&CHANNEL_CLASSES[s * AREA_TIERS.len() + a])
}

/// Look up a class row by its number.
pub fn class_by_id(id: u8) -> Option<&'static ChannelClass> {
    CHANNEL_CLASSES.iter().find(|c| c.id == id)
}

/// Classify every arc; gaps are recorded in `diagnostics`.
pub fn classify_arcs(
    links: &Links,
    slopes: &[f64],
    mean_areas: &[f64],
    diagnostics: &mut Diagnostics,
) -> Vec<Option<ChannelClass>> {
    #[cfg(feature = "rayon")]
    let classes: Vec<Option<ChannelClass>> = slopes
        .par_iter()
        .zip(mean_areas.par_iter())
        .map(|(&s, &a)| classify(s, a).copied())
        .collect();

    #[cfg(not(feature = "rayon"))]
    let classes: Vec<Option<ChannelClass>> = slopes
        .iter()
        .zip(mean_areas)
        .map(|(&s, &a)| classify(s, a).copied())
        .collect();

    for (i, c) in classes.iter().enumerate() {
        if c.is_none() {
            diagnostics.push(gap(links.ids[i], slopes[i], mean_areas[i]));
        }
    }
    classes
}

fn gap(arc: ArcId, slope: f64, mean_area: f64) -> Diagnostic {
    Diagnostic::ClassificationGap {
        arc,
        slope,
        mean_area,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_slope_mid_area_is_class_two() {
        let c = classify(0.0015, 5_000_000.0).unwrap();
        assert_eq!(c.id, 2);
        assert_eq!((c.hyd_depth, c.hyd_width, c.eff_width), (1.0, 0.03, 0.09));
    }

    #[test]
    fn bracket_edges_are_upper_inclusive() {
        assert_eq!(classify(0.002, 1.0e6).unwrap().id, 1);
        assert_eq!(classify(0.0021, 1.0e6 + 1.0).unwrap().id, 8);
        assert_eq!(classify(0.1, 4.0e7).unwrap().id, 11);
        assert_eq!(classify(0.1, 4.0e7 + 1.0).unwrap().id, 12);
    }

    #[test]
    fn overlapping_slope_tier_prefers_middle_row() {
        // 0.05 matches both the second and the third slope tier
        assert_eq!(classify(0.05, 5.0e5).unwrap().id, 7);
        assert_eq!(classify(0.1000001, 5.0e5).unwrap().id, 13);
        assert_eq!(classify(0.5, 5.0e7).unwrap().id, 18);
    }

    #[test]
    fn nan_inputs_are_gaps() {
        assert!(classify(f64::NAN, 1.0).is_none());
        assert!(classify(0.01, f64::NAN).is_none());
    }

    #[test]
    fn table_is_row_major_and_complete() {
        for (k, c) in CHANNEL_CLASSES.iter().enumerate() {
            assert_eq!(c.id as usize, k + 1);
        }
        for (s, slope) in [0.001, 0.05, 0.2].into_iter().enumerate() {
            for (a, area) in [5e5, 5e6, 1.5e7, 2.5e7, 3.5e7, 5e7].into_iter().enumerate() {
                assert_eq!(classify(slope, area).unwrap().id as usize, s * 6 + a + 1);
            }
        }
        assert_eq!(class_by_id(14).unwrap().eff_width, 0.30);
        assert!(class_by_id(19).is_none());
    }

    #[test]
    fn gaps_are_reported_per_arc() {
        let links = Links {
            ids: vec![ArcId::new(4), ArcId::new(5)],
            ..Links::default()
        };
        let mut diags = Diagnostics::new();
        let out = classify_arcs(&links, &[0.001, f64::NAN], &[10.0, 10.0], &mut diags);
        assert_eq!(out[0].map(|c| c.id), Some(1));
        assert!(out[1].is_none());
        assert_eq!(diags.classification_gaps(), vec![ArcId::new(5)]);
    }
}
