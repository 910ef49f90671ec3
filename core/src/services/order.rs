//! Checkout of reserved tickets.

use crate::endpoint::{Endpoint, ResponseKind, Service};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::query::SearchParams;
use crate::types::{InvoiceDetail, OrderPaymentInfo};

pub const BASE_PATH: &str = "api/v1/orders";

pub const PLACE_ORDER: Endpoint = Endpoint {
    name: "placeOrder",
    method: HttpMethod::Post,
    path: "",
    response: ResponseKind::Json,
};

#[derive(Debug, Clone)]
pub struct OrderService {
    service: Service,
}

impl OrderService {
    pub fn new(base_url: &str) -> Self {
        Self::with_service(Service::new(base_url, BASE_PATH))
    }

    pub fn with_service(service: Service) -> Self {
        Self { service }
    }

    pub fn build_place_order(&self, payment: &OrderPaymentInfo) -> Result<HttpRequest, ApiError> {
        self.service
            .request(&PLACE_ORDER, &[], SearchParams::new(), Some(payment))
    }

    pub fn parse_place_order(&self, response: HttpResponse) -> Result<InvoiceDetail, ApiError> {
        self.service.parse_json(response)
    }
}
