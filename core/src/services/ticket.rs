//! Ticket reservation, cancellation and seat occupancy.

use crate::endpoint::{Endpoint, ResponseKind, Service};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::query::{filter_search_params, SearchParams};
use crate::types::{InvoiceDetail, TicketMinimal, TicketReservation, TicketReservationsSearch, TicketSeating};

pub const BASE_PATH: &str = "api/v1/tickets";

pub const CANCEL_AND_REFUND_TICKET: Endpoint = Endpoint {
    name: "cancelAndRefundTicket",
    method: HttpMethod::Put,
    path: "{id}/cancelation",
    response: ResponseKind::Json,
};

pub const CANCEL_TICKET_RESERVATION: Endpoint = Endpoint {
    name: "cancelTicketReservation",
    method: HttpMethod::Delete,
    path: "{id}",
    response: ResponseKind::Empty,
};

pub const GET_RESERVATIONS_FOR_SEATING_PLAN: Endpoint = Endpoint {
    name: "getReservationsForSeatingPlan",
    method: HttpMethod::Get,
    path: "reservations",
    response: ResponseKind::Json,
};

pub const RESERVE_TICKETS: Endpoint = Endpoint {
    name: "reserveTickets",
    method: HttpMethod::Post,
    path: "",
    response: ResponseKind::Json,
};

#[derive(Debug, Clone)]
pub struct TicketService {
    service: Service,
}

impl TicketService {
    pub fn new(base_url: &str) -> Self {
        Self::with_service(Service::new(base_url, BASE_PATH))
    }

    pub fn with_service(service: Service) -> Self {
        Self { service }
    }

    /// Cancel a purchased ticket. The backend answers with the refund invoice.
    pub fn build_cancel_and_refund_ticket(&self, id: i64) -> Result<HttpRequest, ApiError> {
        self.service.request_without_body(
            &CANCEL_AND_REFUND_TICKET,
            &[("id", id.to_string())],
            SearchParams::new(),
        )
    }

    pub fn parse_cancel_and_refund_ticket(
        &self,
        response: HttpResponse,
    ) -> Result<InvoiceDetail, ApiError> {
        self.service.parse_json(response)
    }

    /// Release a reserved, not yet purchased ticket.
    pub fn build_cancel_ticket_reservation(&self, id: i64) -> Result<HttpRequest, ApiError> {
        self.service.request_without_body(
            &CANCEL_TICKET_RESERVATION,
            &[("id", id.to_string())],
            SearchParams::new(),
        )
    }

    pub fn parse_cancel_ticket_reservation(&self, response: HttpResponse) -> Result<(), ApiError> {
        self.service.parse_empty(response)
    }

    pub fn search_params(search: &TicketReservationsSearch) -> SearchParams {
        filter_search_params([
            ("seatingPlanId", search.seating_plan_id.into()),
            ("eventShowId", search.event_show_id.into()),
        ])
    }

    pub fn build_get_reservations_for_seating_plan(
        &self,
        search: &TicketReservationsSearch,
    ) -> Result<HttpRequest, ApiError> {
        self.service.request_without_body(
            &GET_RESERVATIONS_FOR_SEATING_PLAN,
            &[],
            Self::search_params(search),
        )
    }

    pub fn parse_get_reservations_for_seating_plan(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<TicketSeating>, ApiError> {
        self.service.parse_json(response)
    }

    pub fn build_reserve_tickets(
        &self,
        reservation: &TicketReservation,
    ) -> Result<HttpRequest, ApiError> {
        self.service
            .request(&RESERVE_TICKETS, &[], SearchParams::new(), Some(reservation))
    }

    pub fn parse_reserve_tickets(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<TicketMinimal>, ApiError> {
        self.service.parse_json(response)
    }
}
