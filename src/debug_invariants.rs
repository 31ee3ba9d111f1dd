use crate::topology::tree::Tree;
use crate::topology::validation::validate_topology;
use crate::tree_error::TreeError;

/// Trait for validating data structure invariants.
pub trait DebugInvariants {
    /// Assert invariants in debug builds; a no-op in release builds.
    fn debug_assert_invariants(&self);
    /// Validate invariants and return the first error encountered.
    fn validate_invariants(&self) -> Result<(), TreeError>;
}

impl DebugInvariants for Tree {
    fn debug_assert_invariants(&self) {
        #[cfg(debug_assertions)]
        if let Err(e) = self.validate_invariants() {
            panic!("[invariants] tree topology: {e}");
        }
    }

    fn validate_invariants(&self) -> Result<(), TreeError> {
        validate_topology(self)
    }
}
