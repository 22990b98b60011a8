//! Verify request building and response dispatch against the JSON vectors in
//! `test-vectors/`.
//!
//! Each case names an endpoint, the request the client must build for it, a
//! simulated server response, and the expected outcome. Bodies are compared as
//! parsed JSON so field order does not matter.

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde_json::Value;
use v2ex_core::{
    Client, CreatedToken, DecodeError, Endpoint, Error, HttpMethod, HttpRequest, HttpResponse, Node, Notification,
    Profile, Reply, TokenInfo, Topic, TopicSummary, Transport, TransportError,
};

/// The vectors never reach the network.
struct Offline;

impl Transport for Offline {
    fn execute(&self, _request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        Err(TransportError::Send("test vectors are offline".into()))
    }
}

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn endpoint(case: &Value) -> Endpoint {
    let mut ep = Endpoint::new(
        parse_method(case["method"].as_str().unwrap()),
        case["path"].as_str().unwrap(),
    );
    for (k, v) in case["query"].as_object().unwrap() {
        ep = ep.query(k.as_str(), v.as_str().unwrap());
    }
    if !case["body"].is_null() {
        ep = ep.json(&case["body"]).unwrap();
    }
    ep
}

/// Check a dispatch result against the case's `expect` block.
fn check<R>(name: &str, outcome: Result<R, Error>, expect: &Value)
where
    R: DeserializeOwned + PartialEq + Debug,
{
    match expect["kind"].as_str().unwrap() {
        "value" => {
            let expected: R = serde_json::from_value(expect["result"].clone()).unwrap();
            assert_eq!(outcome.unwrap(), expected, "{name}: parsed result");
        }
        "unit" => assert!(outcome.is_ok(), "{name}: expected success"),
        "api_error" => {
            let err = outcome.unwrap_err();
            assert_eq!(err.api_message(), expect["message"].as_str(), "{name}: api message");
        }
        "decode_error" => {
            let err = outcome.unwrap_err();
            let stage = match &err {
                Error::Decode(DecodeError::Envelope(_)) => "envelope",
                Error::Decode(DecodeError::Payload(_)) => "payload",
                Error::Decode(DecodeError::MissingResult) => "missing_result",
                other => panic!("{name}: expected decode error, got {other}"),
            };
            assert_eq!(stage, expect["stage"].as_str().unwrap(), "{name}: decode stage");
        }
        other => panic!("{name}: unknown expectation kind: {other}"),
    }
}

#[test]
fn endpoint_test_vectors() {
    let raw = include_str!("../../test-vectors/endpoints.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let base_url = vectors["base_url"].as_str().unwrap();
    let c = Client::with_transport(base_url, vectors["token"].as_str().unwrap(), Offline);

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let expected_req = &case["expected_request"];

        // Verify build
        let req = c.build_request(&endpoint(&case["endpoint"])).unwrap();
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{base_url}{}", expected_req["url"].as_str().unwrap()), "{name}: url");

        let expected_headers: Vec<(String, String)> = expected_req["headers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");

        match req.body.as_deref() {
            Some(body) => {
                let body: Value = serde_json::from_str(body).unwrap();
                assert_eq!(body, expected_req["body"], "{name}: body");
            }
            None => assert!(expected_req["body"].is_null(), "{name}: body should be None"),
        }

        // Verify dispatch
        let sim = &case["simulated_response"];
        let response = HttpResponse {
            status: sim["status"].as_u64().unwrap() as u16,
            body: sim["body"].as_str().unwrap().as_bytes().to_vec(),
        };
        let expect = &case["expect"];
        match case["shape"].as_str().unwrap() {
            "node" => check::<Node>(name, c.parse(&response), expect),
            "topics" => check::<Vec<TopicSummary>>(name, c.parse(&response), expect),
            "topic" => check::<Topic>(name, c.parse(&response), expect),
            "replies" => check::<Vec<Reply>>(name, c.parse(&response), expect),
            "token_info" => check::<TokenInfo>(name, c.parse(&response), expect),
            "created_token" => check::<CreatedToken>(name, c.parse(&response), expect),
            "profile" => check::<Profile>(name, c.parse(&response), expect),
            "notifications" => check::<Vec<Notification>>(name, c.parse(&response), expect),
            "none" => check::<()>(name, c.parse_command(&response), expect),
            other => panic!("{name}: unknown shape: {other}"),
        }
    }
}

#[test]
fn query_keys_appear_once_with_their_values() {
    let c = Client::with_transport("http://localhost:3000/api/v2", "t", Offline);
    let pairs = [("p", "3"), ("sort", "hot&new"), ("tag", "rust lang"), ("x", "=")];

    let mut ep = Endpoint::get("/notifications");
    for (k, v) in pairs {
        ep = ep.query(k, v);
    }
    let req = c.build_request(&ep).unwrap();

    let (prefix, query) = req.url.split_once('?').unwrap();
    assert_eq!(prefix, "http://localhost:3000/api/v2/notifications");

    let decoded: Vec<(String, String)> = query
        .split('&')
        .map(|pair| {
            let (k, v) = pair.split_once('=').unwrap();
            (
                urlencoding::decode(k).unwrap().into_owned(),
                urlencoding::decode(v).unwrap().into_owned(),
            )
        })
        .collect();
    for (k, v) in pairs {
        let hits: Vec<_> = decoded.iter().filter(|(dk, _)| dk == k).collect();
        assert_eq!(hits.len(), 1, "{k} should appear once");
        assert_eq!(hits[0].1, v);
    }
}
