// ============================================================================
// Redirect Domain - resolve a target, then decide on it
// ============================================================================
//
// - Resolver: asks the directory for a group and a location of that name
// - Decision: pure acceptance policy over the resolved target
//
// Resolution does I/O; the decision never does.
//
// ============================================================================

pub mod decision;
pub mod resolver;

pub use decision::{decide, RedirectOutcome};
pub use resolver::{ResolvedTarget, TargetResolver};
