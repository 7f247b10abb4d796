//! Domain DTOs for the nationalize.io API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! Integration tests catch any drift between the two crates. `RateLimit` is
//! not part of any body; it is lifted from response headers.

use serde::{Deserialize, Serialize};

use crate::http::{find_header, HttpResponse};

pub const RATE_LIMIT_LIMIT_HEADER: &str = "X-Rate-Limit-Limit";
pub const RATE_LIMIT_REMAINING_HEADER: &str = "X-Rate-Limit-Remaining";
pub const RATE_LIMIT_RESET_HEADER: &str = "X-Rate-Reset";

/// Probable countries of origin for a single name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prediction {
    pub name: String,
    /// In the order the service returned them; never re-sorted.
    pub country: Vec<Country>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Country {
    pub country_id: String,
    pub probability: f64,
}

/// Rate-limit metadata copied verbatim from response headers.
///
/// Values are not parsed. A missing header leaves its field empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimit {
    pub limit: String,
    pub remaining: String,
    pub reset: String,
}

impl RateLimit {
    pub fn from_response(response: &HttpResponse) -> Self {
        Self::from_headers(&response.headers)
    }

    pub fn from_headers(headers: &[(String, String)]) -> Self {
        let get = |name: &str| find_header(headers, name).unwrap_or_default().to_string();
        Self {
            limit: get(RATE_LIMIT_LIMIT_HEADER),
            remaining: get(RATE_LIMIT_REMAINING_HEADER),
            reset: get(RATE_LIMIT_RESET_HEADER),
        }
    }
}

/// A successful call: the decoded body plus the rate-limit headers that came
/// with it.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub data: T,
    pub rate_limit: RateLimit,
}

/// Body the service sends with any non-200 status.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_copies_headers_verbatim() {
        let response = HttpResponse {
            status: 200,
            headers: vec![
                ("X-Rate-Limit-Limit".to_string(), "1000".to_string()),
                ("X-Rate-Limit-Remaining".to_string(), " 0728".to_string()),
                ("X-Rate-Reset".to_string(), "soon".to_string()),
            ],
            body: Vec::new(),
        };
        let rate_limit = RateLimit::from_response(&response);
        assert_eq!(rate_limit.limit, "1000");
        assert_eq!(rate_limit.remaining, " 0728");
        assert_eq!(rate_limit.reset, "soon");
    }

    #[test]
    fn rate_limit_missing_headers_are_empty() {
        let response = HttpResponse {
            status: 401,
            headers: Vec::new(),
            body: Vec::new(),
        };
        assert_eq!(RateLimit::from_response(&response), RateLimit::default());
    }

    #[test]
    fn prediction_keeps_country_order() {
        let body = r#"{"name":"michael","country":[
            {"country_id":"NZ","probability":0.04},
            {"country_id":"US","probability":0.08}
        ]}"#;
        let prediction: Prediction = serde_json::from_str(body).unwrap();
        let ids: Vec<_> = prediction.country.iter().map(|c| c.country_id.as_str()).collect();
        assert_eq!(ids, ["NZ", "US"]);
    }

    #[test]
    fn prediction_rejects_missing_country() {
        let result: Result<Prediction, _> = serde_json::from_str(r#"{"name":"michael"}"#);
        assert!(result.is_err());
    }
}
