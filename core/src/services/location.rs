//! Location search and lookup.

use crate::endpoint::{Endpoint, ResponseKind, Service};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::query::{filter_search_params, SearchParams};
use crate::types::{LocationDetail, LocationSearch, Page, Pagination};

pub const BASE_PATH: &str = "api/v1/location";

pub const FIND_BY_FILTERS: Endpoint = Endpoint {
    name: "findByFilters",
    method: HttpMethod::Get,
    path: "",
    response: ResponseKind::Json,
};

pub const FIND_BY_ID: Endpoint = Endpoint {
    name: "findById",
    method: HttpMethod::Get,
    path: "{id}",
    response: ResponseKind::Json,
};

#[derive(Debug, Clone)]
pub struct LocationService {
    service: Service,
}

impl LocationService {
    pub fn new(base_url: &str) -> Self {
        Self::with_service(Service::new(base_url, BASE_PATH))
    }

    pub fn with_service(service: Service) -> Self {
        Self { service }
    }

    /// Query parameters for a filtered search, in wire order.
    pub fn search_params(search: &LocationSearch, page: &Page) -> SearchParams {
        filter_search_params([
            ("postalCode", search.postal_code.as_deref().into()),
            ("pageSize", page.page_size.into()),
            ("address", search.address.as_deref().into()),
            ("city", search.city.as_deref().into()),
            ("country", search.country.as_deref().into()),
            ("name", search.name.as_deref().into()),
            ("pageIndex", page.page_index.into()),
        ])
    }

    pub fn build_find_by_filters(
        &self,
        search: &LocationSearch,
        page: &Page,
    ) -> Result<HttpRequest, ApiError> {
        self.service
            .request_without_body(&FIND_BY_FILTERS, &[], Self::search_params(search, page))
    }

    pub fn parse_find_by_filters(
        &self,
        response: HttpResponse,
    ) -> Result<Pagination<LocationDetail>, ApiError> {
        self.service.parse_json(response)
    }

    pub fn build_find_by_id(&self, id: i64) -> Result<HttpRequest, ApiError> {
        self.service
            .request_without_body(&FIND_BY_ID, &[("id", id.to_string())], SearchParams::new())
    }

    pub fn parse_find_by_id(&self, response: HttpResponse) -> Result<LocationDetail, ApiError> {
        self.service.parse_json(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locations() -> LocationService {
        LocationService::new("http://localhost:3000")
    }

    #[test]
    fn find_by_id_targets_resource_path() {
        let req = locations().build_find_by_id(42).unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/api/v1/location/42");
        assert!(req.query.is_empty());
        assert!(req.body.is_none());
    }

    #[test]
    fn find_by_filters_sends_only_present_fields_in_order() {
        let search = LocationSearch {
            name: Some(String::new()),
            city: Some("Paris".to_string()),
            postal_code: Some("75001".to_string()),
            ..Default::default()
        };
        let page = Page {
            page_index: Some(0),
            page_size: Some(20),
        };
        let req = locations().build_find_by_filters(&search, &page).unwrap();
        assert_eq!(req.url, "http://localhost:3000/api/v1/location");
        let query: Vec<(&str, &str)> = req.query.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(
            query,
            vec![("postalCode", "75001"), ("pageSize", "20"), ("city", "Paris"), ("pageIndex", "0")]
        );
    }

    #[test]
    fn find_by_filters_without_criteria_has_no_query() {
        let req = locations()
            .build_find_by_filters(&LocationSearch::default(), &Page::default())
            .unwrap();
        assert!(req.query.is_empty());
    }

    #[test]
    fn parse_find_by_id_success() {
        let response = HttpResponse::new(
            200,
            r#"{"id":42,"name":"Gasometer","address":"Guglgasse 8","postalCode":"1110","city":"Wien","country":"Austria"}"#,
        );
        let detail = locations().parse_find_by_id(response).unwrap();
        assert_eq!(detail.id, 42);
        assert_eq!(detail.postal_code, "1110");
    }

    #[test]
    fn parse_find_by_id_not_found() {
        let err = locations()
            .parse_find_by_id(HttpResponse::new(404, ""))
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn parse_find_by_filters_page() {
        let response = HttpResponse::new(
            200,
            r#"{"pageIndex":0,"pageSize":10,"totalPages":1,"totalElements":1,"data":[{"id":1,"name":"Arena","address":"Baumgasse 80","postalCode":"1030","city":"Wien","country":"Austria"}]}"#,
        );
        let page = locations().parse_find_by_filters(response).unwrap();
        assert_eq!(page.total_elements, 1);
        assert_eq!(page.data[0].name, "Arena");
    }

    #[test]
    fn endpoints_match_operations() {
        let table: Vec<(&str, &str)> = [FIND_BY_FILTERS, FIND_BY_ID]
            .iter()
            .map(|e| (e.name, e.path))
            .collect();
        assert_eq!(table, vec![("findByFilters", ""), ("findById", "{id}")]);
    }

    #[test]
    fn parse_find_by_filters_bad_json() {
        let err = locations()
            .parse_find_by_filters(HttpResponse::new(200, "not json"))
            .unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }
}
