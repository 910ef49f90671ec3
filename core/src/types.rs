//! Domain DTOs for the ticketline API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! Integration tests catch any schema drift between the two crates. Field
//! names go over the wire in camelCase, enum values in SCREAMING_SNAKE_CASE.

use serde::{Deserialize, Serialize};

/// Search criteria for locations. Every field is optional; unset or empty
/// fields are left out of the query string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSearch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
}

/// Requested page of a paginated listing.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub page_index: Option<u32>,
    pub page_size: Option<u32>,
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination<T> {
    pub page_index: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub total_elements: u64,
    pub data: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationDetail {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub postal_code: String,
    pub city: String,
    pub country: String,
}

/// Payment details for checking out reserved tickets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPaymentInfo {
    pub ticket_ids: Vec<i64>,
    pub billing_name: String,
    pub billing_address: String,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    CreditCard,
    BankTransfer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceType {
    Purchase,
    Cancellation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDetail {
    pub id: i64,
    pub invoice_type: InvoiceType,
    pub ticket_ids: Vec<i64>,
    pub total_price: f64,
}

/// Filter for the reservations of a seating plan. Unset ids are not sent.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketReservationsSearch {
    pub seating_plan_id: Option<i64>,
    pub event_show_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketState {
    Reserved,
    Purchased,
}

/// Occupancy of a single seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketSeating {
    pub ticket_id: i64,
    pub seat_id: i64,
    pub state: TicketState,
}

/// Seats to reserve for an event show.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketReservation {
    pub event_show_id: i64,
    pub seat_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketMinimal {
    pub id: i64,
    pub seat_id: i64,
    pub event_show_id: i64,
    pub state: TicketState,
}
