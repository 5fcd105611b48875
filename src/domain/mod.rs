// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// - location: read-only views of the location directory
// - redirect: target resolution and the acceptance policy
// - transport_order: the aggregate and the redirect command handler
//
// Infrastructure (directory gateway, storage, HTTP) lives outside this module
// and is reached only through traits.
//
// ============================================================================

pub mod location;
pub mod redirect;
pub mod transport_order;
