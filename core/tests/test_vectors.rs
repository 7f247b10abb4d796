//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected request URLs, simulated
//! responses, and expected parse results. Results are compared as parsed
//! JSON so field ordering in the fixtures does not matter.

use nationalize_core::{
    ApiError, ApiResponse, HttpMethod, HttpResponse, NationalizeClient, Prediction, RateLimit,
};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:3000";

fn client(api_key: &str) -> NationalizeClient {
    NationalizeClient::builder()
        .base_url(BASE_URL)
        .api_key(api_key)
        .build()
}

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        other => panic!("unknown method: {other}"),
    }
}

fn simulated_response(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    let headers = sim["headers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let pair = h.as_array().unwrap();
            (pair[0].as_str().unwrap().to_string(), pair[1].as_str().unwrap().to_string())
        })
        .collect();
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers,
        body: sim["body"].as_str().unwrap().as_bytes().to_vec(),
    }
}

/// Compare a parse outcome with `expected_result` / `expected_error` and
/// `expected_rate_limit`.
fn check_outcome<T: serde::de::DeserializeOwned + PartialEq + std::fmt::Debug>(
    name: &str,
    case: &Value,
    result: Result<ApiResponse<T>, ApiError>,
) {
    let expected_rate_limit: RateLimit =
        serde_json::from_value(case["expected_rate_limit"].clone()).unwrap();

    if let Some(expected_error) = case.get("expected_error") {
        let err = result.unwrap_err();
        match expected_error["kind"].as_str().unwrap() {
            "Service" => {
                assert!(err.is_service(), "{name}: expected Service, got {err:?}");
                let message = expected_error["message"].as_str().unwrap();
                assert_eq!(err.to_string(), message, "{name}: message");
            }
            "Decode" => assert!(
                matches!(err, ApiError::Decode { .. }),
                "{name}: expected Decode, got {err:?}"
            ),
            other => panic!("{name}: unknown expected_error: {other}"),
        }
        assert_eq!(err.rate_limit(), Some(&expected_rate_limit), "{name}: rate limit");
    } else {
        let response = result.unwrap();
        let expected: T = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(response.data, expected, "{name}: parsed result");
        assert_eq!(response.rate_limit, expected_rate_limit, "{name}: rate limit");
    }
}

// ---------------------------------------------------------------------------
// Predict
// ---------------------------------------------------------------------------

#[test]
fn predict_test_vectors() {
    let raw = include_str!("../../test-vectors/predict.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let c = client(case["api_key"].as_str().unwrap());
        let expected_req = &case["expected_request"];

        // Verify build
        let req = c.build_predict(case["input"].as_str().unwrap()).unwrap();
        let method = parse_method(expected_req["method"].as_str().unwrap());
        let query = expected_req["query"].as_str().unwrap();
        assert_eq!(req.method, method, "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{query}"), "{name}: url");

        // Verify parse
        let result = c.parse_predict(simulated_response(case));
        check_outcome::<Prediction>(name, case, result);
    }
}

// ---------------------------------------------------------------------------
// Batch predict
// ---------------------------------------------------------------------------

#[test]
fn batch_test_vectors() {
    let raw = include_str!("../../test-vectors/batch.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let c = client(case["api_key"].as_str().unwrap());
        let names: Vec<String> = serde_json::from_value(case["input"].clone()).unwrap();
        let expected_req = &case["expected_request"];

        // Verify build
        let req = c.build_batch_predict(&names).unwrap();
        let method = parse_method(expected_req["method"].as_str().unwrap());
        let query = expected_req["query"].as_str().unwrap();
        assert_eq!(req.method, method, "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{query}"), "{name}: url");

        // Verify parse
        let result = c.parse_batch_predict(simulated_response(case));
        check_outcome::<Vec<Prediction>>(name, case, result);
    }
}
