// ============================================================================
// Transport Order Domain
// ============================================================================
//
// - Value objects (TransportOrderState)
// - Events (TargetRedirected)
// - Commands (RedirectTarget)
// - Errors (TransportOrderError, RedirectError)
// - Aggregate (TransportOrder)
// - Command Handler (TransportOrderCommandHandler, the only writer of `target`)
//
// ============================================================================

pub mod aggregate;
pub mod command_handler;
pub mod commands;
pub mod errors;
pub mod events;
pub mod value_objects;

pub use aggregate::*;
pub use command_handler::*;
pub use commands::*;
pub use errors::*;
pub use events::*;
pub use value_objects::*;
