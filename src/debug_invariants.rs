use crate::network_error::NetworkError;

/// Trait for validating data structure invariants.
///
/// Implemented by [`StreamNetwork`](crate::topology::network::StreamNetwork)
/// (index consistency) and by
/// [`DerivedNetwork`](crate::algs::pipeline::DerivedNetwork) (slope floor,
/// headwater order, strictly rising order downstream, and a diagnostic for
/// every unassigned order or class).
pub trait DebugInvariants {
    /// Assert invariants in debug builds or when invariant checking is enabled.
    fn debug_assert_invariants(&self);
    /// Validate invariants and return the first error encountered.
    fn validate_invariants(&self) -> Result<(), NetworkError>;
}

/// Run a fallible invariant check and panic with `ctx` on error.
///
/// Compiled in for debug builds and for the `strict-invariants` or
/// `check-invariants` features; a no-op in plain release builds.
#[macro_export]
macro_rules! debug_invariants {
    ($expr:expr, $($ctx:tt)*) => {
        #[cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]
        if let Err(e) = $expr {
            panic!(concat!("[invariants] ", $($ctx)*, ": {}"), e);
        }
    };
}
