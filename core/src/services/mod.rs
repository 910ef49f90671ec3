//! Per-resource request builders and response parsers.
//!
//! Every operation is a `build_*`/`parse_*` pair over a shared `Service`.
//! The caller (or `TicketlineClient`) executes the request in between.

pub mod location;
pub mod order;
pub mod ticket;

pub use location::LocationService;
pub use order::OrderService;
pub use ticket::TicketService;
