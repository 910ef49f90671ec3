//! API client core for the ticketline backend.
//!
//! # Overview
//! Covers location search, order placement, and ticket reservation and
//! cancellation. Services build `HttpRequest` values and parse
//! `HttpResponse` values without touching the network (host-does-IO
//! pattern). `TicketlineClient` wires them to a `Transport` for callers who
//! just want `async` functions.
//!
//! # Design
//! - Each backend operation is a const `Endpoint` descriptor interpreted by
//!   the shared `Service` helper, which alone owns base URL joining, default
//!   headers and query attachment.
//! - Query parameters go through presence filtering: absent values and empty
//!   strings are dropped, numeric zero is kept.
//! - Failures are returned, never retried or swallowed.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod query;
pub mod services;
pub mod transport;
pub mod types;

pub use client::TicketlineClient;
pub use config::ClientConfig;
pub use endpoint::{Endpoint, ResponseKind, Service};
pub use error::{ApiError, ConfigError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use query::{filter_search_params, QueryValue, SearchParams};
pub use services::{LocationService, OrderService, TicketService};
pub use transport::{ReqwestTransport, Transport};
pub use types::{
    InvoiceDetail, InvoiceType, LocationDetail, LocationSearch, OrderPaymentInfo, Page, Pagination,
    PaymentMethod, TicketMinimal, TicketReservation, TicketReservationsSearch, TicketSeating,
    TicketState,
};
