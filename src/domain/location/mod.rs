// ============================================================================
// Location Domain - read-only views of the location directory
// ============================================================================

pub mod value_objects;

pub use value_objects::*;
