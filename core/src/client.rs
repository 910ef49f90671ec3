//! Async facade over the services and a `Transport`.
//!
//! # Design
//! `TicketlineClient` owns one service per backend resource plus a
//! transport. Every operation is build → execute → parse with nothing in
//! between: no retries, no caching, no shared mutable state. Concurrent
//! calls are independent.

use tracing::Instrument;

use crate::config::ClientConfig;
use crate::endpoint::{Endpoint, Service};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::services::{location, order, ticket, LocationService, OrderService, TicketService};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{
    InvoiceDetail, LocationDetail, LocationSearch, OrderPaymentInfo, Page, Pagination, TicketMinimal,
    TicketReservation, TicketReservationsSearch, TicketSeating,
};

#[derive(Debug, Clone)]
pub struct TicketlineClient<T> {
    location: LocationService,
    order: OrderService,
    ticket: TicketService,
    transport: T,
}

impl TicketlineClient<ReqwestTransport> {
    /// Client backed by `reqwest` with the configured timeout.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(config.timeout)?;
        Ok(Self::new(config, transport))
    }
}

impl<T: Transport> TicketlineClient<T> {
    pub fn new(config: &ClientConfig, transport: T) -> Self {
        tracing::debug!(
            base_url = %config.base_url,
            authenticated = config.bearer_token.is_some(),
            "creating ticketline client"
        );
        let service = |base_path: &str| {
            let service = Service::new(&config.base_url, base_path);
            match &config.bearer_token {
                Some(token) => service.with_bearer_token(token),
                None => service,
            }
        };
        Self {
            location: LocationService::with_service(service(location::BASE_PATH)),
            order: OrderService::with_service(service(order::BASE_PATH)),
            ticket: TicketService::with_service(service(ticket::BASE_PATH)),
            transport,
        }
    }

    pub fn location(&self) -> LocationApi<'_, T> {
        LocationApi { client: self }
    }

    pub fn order(&self) -> OrderApi<'_, T> {
        OrderApi { client: self }
    }

    pub fn ticket(&self) -> TicketApi<'_, T> {
        TicketApi { client: self }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Execute a built request and parse the reply inside a span named after
    /// the endpoint.
    async fn dispatch<R>(
        &self,
        endpoint: &Endpoint,
        request: Result<HttpRequest, ApiError>,
        parse: impl FnOnce(HttpResponse) -> Result<R, ApiError>,
    ) -> Result<R, ApiError> {
        let span = tracing::debug_span!("ticketline", operation = endpoint.name);
        async {
            let response = self.transport.execute(request?).await?;
            parse(response)
        }
        .instrument(span)
        .await
    }
}

pub struct LocationApi<'a, T> {
    client: &'a TicketlineClient<T>,
}

impl<T: Transport> LocationApi<'_, T> {
    pub async fn find_by_filters(
        &self,
        search: &LocationSearch,
        page: &Page,
    ) -> Result<Pagination<LocationDetail>, ApiError> {
        let service = &self.client.location;
        self.client
            .dispatch(
                &location::FIND_BY_FILTERS,
                service.build_find_by_filters(search, page),
                |r| service.parse_find_by_filters(r),
            )
            .await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<LocationDetail, ApiError> {
        let service = &self.client.location;
        self.client
            .dispatch(
                &location::FIND_BY_ID,
                service.build_find_by_id(id),
                |r| service.parse_find_by_id(r),
            )
            .await
    }
}

pub struct OrderApi<'a, T> {
    client: &'a TicketlineClient<T>,
}

impl<T: Transport> OrderApi<'_, T> {
    pub async fn place_order(&self, payment: &OrderPaymentInfo) -> Result<InvoiceDetail, ApiError> {
        let service = &self.client.order;
        self.client
            .dispatch(
                &order::PLACE_ORDER,
                service.build_place_order(payment),
                |r| service.parse_place_order(r),
            )
            .await
    }
}

pub struct TicketApi<'a, T> {
    client: &'a TicketlineClient<T>,
}

impl<T: Transport> TicketApi<'_, T> {
    pub async fn cancel_and_refund_ticket(&self, id: i64) -> Result<InvoiceDetail, ApiError> {
        let service = &self.client.ticket;
        self.client
            .dispatch(
                &ticket::CANCEL_AND_REFUND_TICKET,
                service.build_cancel_and_refund_ticket(id),
                |r| service.parse_cancel_and_refund_ticket(r),
            )
            .await
    }

    pub async fn cancel_ticket_reservation(&self, id: i64) -> Result<(), ApiError> {
        let service = &self.client.ticket;
        self.client
            .dispatch(
                &ticket::CANCEL_TICKET_RESERVATION,
                service.build_cancel_ticket_reservation(id),
                |r| service.parse_cancel_ticket_reservation(r),
            )
            .await
    }

    pub async fn get_reservations_for_seating_plan(
        &self,
        search: &TicketReservationsSearch,
    ) -> Result<Vec<TicketSeating>, ApiError> {
        let service = &self.client.ticket;
        self.client
            .dispatch(
                &ticket::GET_RESERVATIONS_FOR_SEATING_PLAN,
                service.build_get_reservations_for_seating_plan(search),
                |r| service.parse_get_reservations_for_seating_plan(r),
            )
            .await
    }

    pub async fn reserve_tickets(
        &self,
        reservation: &TicketReservation,
    ) -> Result<Vec<TicketMinimal>, ApiError> {
        let service = &self.client.ticket;
        self.client
            .dispatch(
                &ticket::RESERVE_TICKETS,
                service.build_reserve_tickets(reservation),
                |r| service.parse_reserve_tickets(r),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::http::HttpMethod;

    /// Replies with a canned response and remembers what it was asked.
    struct Canned {
        response: HttpResponse,
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl Canned {
        fn new(status: u16, body: &str) -> Self {
            Self {
                response: HttpResponse::new(status, body),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn last(&self) -> HttpRequest {
            self.seen.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl Transport for Canned {
        async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            tracing::debug!(url = %request.url, "canned reply");
            self.seen.lock().unwrap().push(request);
            Ok(self.response.clone())
        }
    }

    struct Unreachable;

    #[async_trait]
    impl Transport for Unreachable {
        async fn execute(&self, _request: HttpRequest) -> Result<HttpResponse, ApiError> {
            Err(ApiError::Transport("connection refused".to_string()))
        }
    }

    fn config() -> ClientConfig {
        ClientConfig::new("http://localhost:3000")
    }

    /// Log sink for asserting on formatted tracing output.
    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    #[tokio::test]
    async fn find_by_id_round_trip() {
        let client = TicketlineClient::new(
            &config(),
            Canned::new(
                200,
                r#"{"id":42,"name":"Arena","address":"Baumgasse 80","postalCode":"1030","city":"Wien","country":"Austria"}"#,
            ),
        );
        let detail = client.location().find_by_id(42).await.unwrap();
        assert_eq!(detail.id, 42);

        let sent = client.transport().last();
        assert_eq!(sent.method, HttpMethod::Get);
        assert_eq!(sent.url, "http://localhost:3000/api/v1/location/42");
        assert!(sent.query.is_empty());
    }

    #[tokio::test]
    async fn cancel_reservation_resolves_to_unit() {
        let client = TicketlineClient::new(&config(), Canned::new(204, ""));
        client.ticket().cancel_ticket_reservation(7).await.unwrap();
        let sent = client.transport().last();
        assert_eq!(sent.method, HttpMethod::Delete);
        assert_eq!(sent.url, "http://localhost:3000/api/v1/tickets/7");
    }

    #[tokio::test]
    async fn cancel_reservation_rejects_on_failure_status() {
        let client = TicketlineClient::new(&config(), Canned::new(500, "oops"));
        let err = client.ticket().cancel_ticket_reservation(7).await.unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 500, .. }));
    }

    #[tokio::test]
    async fn transport_errors_propagate() {
        let client = TicketlineClient::new(&config(), Unreachable);
        let err = client.order().place_order(&OrderPaymentInfo {
            ticket_ids: vec![1],
            billing_name: "A".to_string(),
            billing_address: "B".to_string(),
            payment_method: crate::types::PaymentMethod::BankTransfer,
        })
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }

    #[tokio::test]
    async fn shared_transport_through_arc() {
        let transport = std::sync::Arc::new(Canned::new(200, "[]"));
        let client = TicketlineClient::new(&config(), transport.clone());
        let reserved = client
            .ticket()
            .reserve_tickets(&crate::types::TicketReservation {
                event_show_id: 1,
                seat_ids: vec![4],
            })
            .await
            .unwrap();
        assert!(reserved.is_empty());
        assert_eq!(transport.last().url, "http://localhost:3000/api/v1/tickets");
    }

    #[tokio::test]
    async fn operations_run_inside_a_span_named_after_the_endpoint() {
        let sink = Captured::default();
        let writer = sink.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let client = TicketlineClient::new(&config(), Canned::new(204, ""));
        client.ticket().cancel_ticket_reservation(3).await.unwrap();

        let logs = sink.text();
        assert!(logs.contains("ticketline{operation="), "{logs}");
        assert!(logs.contains("cancelTicketReservation"), "{logs}");
        assert!(logs.contains("canned reply"), "{logs}");
    }

    #[tokio::test]
    async fn bearer_token_reaches_every_service() {
        let mut config = config();
        config.bearer_token = Some("t0k3n".to_string());
        let client = TicketlineClient::new(&config, Canned::new(200, "[]"));
        client
            .ticket()
            .get_reservations_for_seating_plan(&TicketReservationsSearch {
                seating_plan_id: Some(3),
                event_show_id: None,
            })
            .await
            .unwrap();
        let sent = client.transport().last();
        assert_eq!(sent.header("authorization"), Some("Bearer t0k3n"));
        assert_eq!(sent.query, vec![("seatingPlanId".to_string(), "3".to_string())]);
    }
}
