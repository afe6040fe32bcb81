//! Engine configuration.
//!
//! The engine needs very little: the raster cell size that converts cell
//! counts into areas, the slope floor, and two policy knobs. All of it is a
//! plain serde-friendly struct so callers can load it alongside their own
//! workspace settings.

use crate::network_error::NetworkError;
use crate::topology::arc::SLOPE_FLOOR;

/// What to do when an arc has more than one downstream candidate.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DownstreamPolicy {
    /// Keep the first candidate in input order and record a diagnostic.
    #[default]
    FirstWins,
    /// Abort with [`NetworkError::AmbiguousDownstream`].
    Reject,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Raster cell edge length; areas are `cell_count * cell_size^2`.
    pub cell_size: f64,
    /// Lower bound applied to every arc slope.
    pub slope_floor: f64,
    /// Upper bound on order-propagation rounds. `None` uses `arc_count + 1`,
    /// which no acyclic network can exceed. A smaller value aborts networks
    /// deeper than the bound with `RoundLimitExceeded`.
    pub max_rounds: Option<usize>,
    pub downstream_policy: DownstreamPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cell_size: 30.0,
            slope_floor: SLOPE_FLOOR,
            max_rounds: None,
            downstream_policy: DownstreamPolicy::FirstWins,
        }
    }
}

impl EngineConfig {
    pub fn with_cell_size(mut self, cell_size: f64) -> Self {
        self.cell_size = cell_size;
        self
    }

    pub fn with_slope_floor(mut self, slope_floor: f64) -> Self {
        self.slope_floor = slope_floor;
        self
    }

    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = Some(max_rounds);
        self
    }

    pub fn with_downstream_policy(mut self, policy: DownstreamPolicy) -> Self {
        self.downstream_policy = policy;
        self
    }

    /// Squared raster cell size.
    #[inline]
    pub fn cell_area(&self) -> f64 {
        self.cell_size * self.cell_size
    }

    /// Round bound for a network of `arc_count` arcs.
    ///
    /// An acyclic network settles within `longest_path + 1` rounds, and the
    /// longest path never exceeds the arc count.
    #[inline]
    pub fn round_bound(&self, arc_count: usize) -> usize {
        self.max_rounds.unwrap_or(arc_count + 1)
    }

    pub fn validate(&self) -> Result<(), NetworkError> {
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(NetworkError::InvalidConfig(format!(
                "cell_size must be positive and finite, got {}",
                self.cell_size
            )));
        }
        if !(self.slope_floor.is_finite() && self.slope_floor > 0.0) {
            return Err(NetworkError::InvalidConfig(format!(
                "slope_floor must be positive and finite, got {}",
                self.slope_floor
            )));
        }
        if self.max_rounds == Some(0) {
            return Err(NetworkError::InvalidConfig(
                "max_rounds must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = EngineConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.slope_floor, 0.00001);
        assert_eq!(cfg.cell_area(), 900.0);
        assert_eq!(cfg.round_bound(10), 11);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(EngineConfig::default().with_cell_size(0.0).validate().is_err());
        assert!(
            EngineConfig::default()
                .with_slope_floor(f64::NAN)
                .validate()
                .is_err()
        );
        assert!(EngineConfig::default().with_max_rounds(0).validate().is_err());
    }

    #[test]
    fn explicit_round_bound_wins() {
        let cfg = EngineConfig::default().with_max_rounds(3);
        assert_eq!(cfg.round_bound(1000), 3);
    }

    #[test]
    fn json_roundtrip_and_partial_input() {
        let cfg = EngineConfig::default()
            .with_cell_size(10.0)
            .with_downstream_policy(DownstreamPolicy::Reject);
        let s = serde_json::to_string(&cfg).unwrap();
        let back: EngineConfig = serde_json::from_str(&s).unwrap();
        assert_eq!(back, cfg);

        let partial: EngineConfig = serde_json::from_str(r#"{"cell_size": 90.0}"#).unwrap();
        assert_eq!(partial.cell_size, 90.0);
        assert_eq!(partial.slope_floor, SLOPE_FLOOR);
        assert_eq!(partial.downstream_policy, DownstreamPolicy::FirstWins);
    }
}
