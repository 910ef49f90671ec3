//! In-memory stand-in for the ticketline backend.
//!
//! Serves the location, order and ticket endpoints the client talks to. State
//! lives behind one `RwLock`; every handler takes the lock once, so each
//! request is atomic with respect to the others.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;

const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LocationDetail {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub postal_code: String,
    pub city: String,
    pub country: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationQuery {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub page_index: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination<T> {
    pub page_index: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub total_elements: u64,
    pub data: Vec<T>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketState {
    Reserved,
    Purchased,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceType {
    Purchase,
    Cancellation,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDetail {
    pub id: i64,
    pub invoice_type: InvoiceType,
    pub ticket_ids: Vec<i64>,
    pub total_price: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPaymentInfo {
    pub ticket_ids: Vec<i64>,
    pub billing_name: String,
    pub billing_address: String,
    pub payment_method: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketReservation {
    pub event_show_id: i64,
    pub seat_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationsQuery {
    pub seating_plan_id: Option<i64>,
    pub event_show_id: Option<i64>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TicketMinimal {
    pub id: i64,
    pub seat_id: i64,
    pub event_show_id: i64,
    pub state: TicketState,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TicketSeating {
    pub ticket_id: i64,
    pub seat_id: i64,
    pub state: TicketState,
}

#[derive(Clone, Debug)]
pub struct EventShow {
    pub seating_plan_id: i64,
    pub price: f64,
}

#[derive(Debug, Default)]
pub struct Backend {
    pub locations: BTreeMap<i64, LocationDetail>,
    pub shows: BTreeMap<i64, EventShow>,
    pub tickets: BTreeMap<i64, TicketMinimal>,
    next_ticket_id: i64,
    next_invoice_id: i64,
}

impl Backend {
    /// A backend with a few Viennese venues and three shows: shows 1 and 2
    /// use seating plan 3, show 3 uses seating plan 5.
    pub fn seeded() -> Self {
        let locations = [
            (1, "Stadthalle", "Roland-Rainer-Platz 1", "1150", "Wien", "Austria"),
            (2, "Gasometer", "Guglgasse 8", "1110", "Wien", "Austria"),
            (3, "Arena", "Baumgasse 80", "1030", "Wien", "Austria"),
            (4, "Olympia", "Boulevard des Capucines 28", "75009", "Paris", "France"),
        ]
        .into_iter()
        .map(|(id, name, address, postal_code, city, country)| {
            (
                id,
                LocationDetail {
                    id,
                    name: name.to_string(),
                    address: address.to_string(),
                    postal_code: postal_code.to_string(),
                    city: city.to_string(),
                    country: country.to_string(),
                },
            )
        })
        .collect();

        let shows = BTreeMap::from([
            (1, EventShow { seating_plan_id: 3, price: 49.9 }),
            (2, EventShow { seating_plan_id: 3, price: 39.9 }),
            (3, EventShow { seating_plan_id: 5, price: 25.0 }),
        ]);

        Self {
            locations,
            shows,
            tickets: BTreeMap::new(),
            next_ticket_id: 1,
            next_invoice_id: 1,
        }
    }

    fn price_of(&self, ticket: &TicketMinimal) -> f64 {
        self.shows.get(&ticket.event_show_id).map_or(0.0, |show| show.price)
    }

    fn next_invoice(&mut self, invoice_type: InvoiceType, ticket_ids: Vec<i64>, total_price: f64) -> InvoiceDetail {
        let id = self.next_invoice_id;
        self.next_invoice_id += 1;
        InvoiceDetail {
            id,
            invoice_type,
            ticket_ids,
            total_price,
        }
    }
}

pub type Db = Arc<RwLock<Backend>>;

pub fn app() -> Router {
    app_with(Backend::seeded())
}

pub fn app_with(backend: Backend) -> Router {
    let db: Db = Arc::new(RwLock::new(backend));
    Router::new()
        .route("/api/v1/location", get(find_locations))
        .route("/api/v1/location/{id}", get(get_location))
        .route("/api/v1/orders", post(place_order))
        .route("/api/v1/tickets", post(reserve_tickets))
        .route("/api/v1/tickets/reservations", get(reservations))
        .route("/api/v1/tickets/{id}", delete(cancel_reservation))
        .route("/api/v1/tickets/{id}/cancelation", put(cancel_and_refund))
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn field_matches(field: &str, wanted: &Option<String>) -> bool {
    match wanted {
        Some(wanted) => field.to_lowercase().contains(&wanted.to_lowercase()),
        None => true,
    }
}

async fn find_locations(
    State(db): State<Db>,
    Query(query): Query<LocationQuery>,
) -> Result<Json<Pagination<LocationDetail>>, StatusCode> {
    let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    if page_size == 0 {
        return Err(StatusCode::BAD_REQUEST);
    }
    let page_index = query.page_index.unwrap_or(0);

    let backend = db.read().await;
    let hits: Vec<&LocationDetail> = backend
        .locations
        .values()
        .filter(|l| {
            field_matches(&l.name, &query.name)
                && field_matches(&l.address, &query.address)
                && field_matches(&l.city, &query.city)
                && field_matches(&l.country, &query.country)
                && field_matches(&l.postal_code, &query.postal_code)
        })
        .collect();

    let total = hits.len() as u64;
    let data = hits
        .into_iter()
        .skip(page_index as usize * page_size as usize)
        .take(page_size as usize)
        .cloned()
        .collect();
    Ok(Json(Pagination {
        page_index,
        page_size,
        total_pages: total.div_ceil(page_size as u64) as u32,
        total_elements: total,
        data,
    }))
}

async fn get_location(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<Json<LocationDetail>, StatusCode> {
    let backend = db.read().await;
    backend.locations.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn place_order(
    State(db): State<Db>,
    Json(input): Json<OrderPaymentInfo>,
) -> Result<(StatusCode, Json<InvoiceDetail>), StatusCode> {
    if input.ticket_ids.is_empty() || input.billing_name.trim().is_empty() {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    let distinct: BTreeSet<&i64> = input.ticket_ids.iter().collect();
    if distinct.len() != input.ticket_ids.len() {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    let mut backend = db.write().await;
    let mut total = 0.0;
    for id in &input.ticket_ids {
        let ticket = backend.tickets.get(id).ok_or(StatusCode::NOT_FOUND)?;
        if ticket.state != TicketState::Reserved {
            return Err(StatusCode::CONFLICT);
        }
        total += backend.price_of(ticket);
    }
    for id in &input.ticket_ids {
        if let Some(ticket) = backend.tickets.get_mut(id) {
            ticket.state = TicketState::Purchased;
        }
    }
    let invoice = backend.next_invoice(InvoiceType::Purchase, input.ticket_ids, total);
    Ok((StatusCode::CREATED, Json(invoice)))
}

async fn reserve_tickets(
    State(db): State<Db>,
    Json(input): Json<TicketReservation>,
) -> Result<(StatusCode, Json<Vec<TicketMinimal>>), StatusCode> {
    if input.seat_ids.is_empty() {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    let mut backend = db.write().await;
    if !backend.shows.contains_key(&input.event_show_id) {
        return Err(StatusCode::NOT_FOUND);
    }
    let taken = backend
        .tickets
        .values()
        .any(|t| t.event_show_id == input.event_show_id && input.seat_ids.contains(&t.seat_id));
    if taken {
        return Err(StatusCode::CONFLICT);
    }

    let mut reserved = Vec::with_capacity(input.seat_ids.len());
    for seat_id in input.seat_ids {
        let ticket = TicketMinimal {
            id: backend.next_ticket_id,
            seat_id,
            event_show_id: input.event_show_id,
            state: TicketState::Reserved,
        };
        backend.next_ticket_id += 1;
        backend.tickets.insert(ticket.id, ticket.clone());
        reserved.push(ticket);
    }
    Ok((StatusCode::CREATED, Json(reserved)))
}

async fn reservations(
    State(db): State<Db>,
    Query(query): Query<ReservationsQuery>,
) -> Json<Vec<TicketSeating>> {
    let backend = db.read().await;
    let seatings = backend
        .tickets
        .values()
        .filter(|t| query.event_show_id.map_or(true, |show| show == t.event_show_id))
        .filter(|t| {
            query.seating_plan_id.map_or(true, |plan| {
                backend
                    .shows
                    .get(&t.event_show_id)
                    .is_some_and(|show| show.seating_plan_id == plan)
            })
        })
        .map(|t| TicketSeating {
            ticket_id: t.id,
            seat_id: t.seat_id,
            state: t.state,
        })
        .collect();
    Json(seatings)
}

async fn cancel_reservation(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<StatusCode, StatusCode> {
    let mut backend = db.write().await;
    match backend.tickets.get(&id).map(|t| t.state) {
        None => Err(StatusCode::NOT_FOUND),
        Some(TicketState::Purchased) => Err(StatusCode::CONFLICT),
        Some(TicketState::Reserved) => {
            backend.tickets.remove(&id);
            Ok(StatusCode::NO_CONTENT)
        }
    }
}

async fn cancel_and_refund(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<Json<InvoiceDetail>, StatusCode> {
    let mut backend = db.write().await;
    let ticket = backend.tickets.get(&id).cloned().ok_or(StatusCode::NOT_FOUND)?;
    if ticket.state != TicketState::Purchased {
        return Err(StatusCode::CONFLICT);
    }
    backend.tickets.remove(&id);
    let refund = backend.price_of(&ticket);
    Ok(Json(backend.next_invoice(InvoiceType::Cancellation, vec![id], refund)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_serializes_camel_case() {
        let backend = Backend::seeded();
        let json = serde_json::to_value(&backend.locations[&2]).unwrap();
        assert_eq!(json["postalCode"], "1110");
        assert_eq!(json["name"], "Gasometer");
    }

    #[test]
    fn location_query_fields_are_optional() {
        let query: LocationQuery = serde_json::from_str("{}").unwrap();
        assert!(query.city.is_none());
        assert!(query.page_size.is_none());
    }

    #[test]
    fn reservation_rejects_missing_show() {
        let result: Result<TicketReservation, _> = serde_json::from_str(r#"{"seatIds":[1]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn field_matches_is_case_insensitive_substring() {
        assert!(field_matches("Stadthalle", &Some("stadt".to_string())));
        assert!(!field_matches("Arena", &Some("halle".to_string())));
        assert!(field_matches("Arena", &None));
    }

    #[test]
    fn invoice_ids_increase() {
        let mut backend = Backend::seeded();
        let first = backend.next_invoice(InvoiceType::Purchase, vec![1], 1.0);
        let second = backend.next_invoice(InvoiceType::Cancellation, vec![1], 1.0);
        assert_eq!(first.id + 1, second.id);
    }

    #[test]
    fn ticket_state_wire_format() {
        assert_eq!(serde_json::to_value(TicketState::Reserved).unwrap(), "RESERVED");
    }
}
