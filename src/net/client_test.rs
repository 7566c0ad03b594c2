use super::*;
use futures::executor::block_on;

use crate::net::test_support::{MockTransport, auth_payload};
use crate::util::token_store::MemoryTokenStore;

struct Harness {
    session: Session,
    client: ApiClient,
    transport: MockTransport,
}

fn harness(stored: Option<&str>) -> Harness {
    let config = ClientConfig::new("http://api.test/");
    let transport = MockTransport::new();
    let store = match stored {
        Some(payload) => MemoryTokenStore::with_payload(payload),
        None => MemoryTokenStore::new(),
    };
    let session = Session::restore(&config, Arc::new(store), Arc::new(transport.clone()));
    let client = ApiClient::new(&config, Arc::new(transport.clone()));
    client.attach_session(&session);
    Harness {
        session,
        client,
        transport,
    }
}

fn bearer_for(payload: &str) -> String {
    let value: serde_json::Value = serde_json::from_str(payload).unwrap();
    format!("Bearer {}", value["access"].as_str().unwrap())
}

// =============================================================
// Bearer hook
// =============================================================

#[test]
fn authenticated_request_carries_bearer() {
    let payload = auth_payload("ana", false);
    let h = harness(Some(&payload));
    h.transport.respond(200, "[]");

    block_on(h.client.get("/api/mis-pedidos/").send()).unwrap();

    let request = h.transport.last_request().unwrap();
    assert_eq!(request.url, "http://api.test/api/mis-pedidos/");
    assert_eq!(request.header("authorization"), Some(bearer_for(&payload).as_str()));
}

#[test]
fn anonymous_request_has_no_authorization_header() {
    let h = harness(None);
    h.transport.respond(200, "[]");

    block_on(h.client.get("/api/data/sucursales/").send()).unwrap();

    assert_eq!(h.transport.last_request().unwrap().header("authorization"), None);
}

#[test]
fn hook_follows_login_and_logout_live() {
    let h = harness(None);
    let payload = auth_payload("ana", true);
    h.transport.respond(200, "{}");
    h.transport.respond(200, &payload);
    h.transport.respond(200, "{}");
    h.transport.respond(200, "{}");

    block_on(h.client.get("/a/").send()).unwrap();
    block_on(h.session.login("ana", "pw")).unwrap();
    block_on(h.client.get("/b/").send()).unwrap();
    h.session.logout();
    block_on(h.client.get("/c/").send()).unwrap();

    let requests = h.transport.requests();
    assert_eq!(requests.len(), 4);
    assert_eq!(requests[0].header("authorization"), None);
    assert_eq!(requests[2].header("authorization"), Some(bearer_for(&payload).as_str()));
    assert_eq!(requests[3].header("authorization"), None);
}

#[test]
fn in_flight_request_keeps_dispatch_time_headers() {
    let h = harness(None);
    let pending_response = h.transport.deferred();
    h.transport.respond(200, &auth_payload("ana", false));

    let in_flight = h.client.get("/api/data/camiones/").send();
    block_on(h.session.login("ana", "pw")).unwrap();
    pending_response.send(RawResponse::new(200, "[]")).unwrap();
    let response = block_on(in_flight).unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(h.transport.requests()[0].header("authorization"), None);
}

#[test]
fn caller_supplied_authorization_is_replaced_or_removed() {
    let h = harness(None);
    h.transport.respond(200, "{}");
    let mut builder = h.client.get("/x/");
    builder.request.set_header("Authorization", "Bearer stale".to_owned());
    block_on(builder.send()).unwrap();
    assert_eq!(h.transport.last_request().unwrap().header("authorization"), None);
}

#[test]
fn reattaching_keeps_exactly_one_hook() {
    let h = harness(None);
    assert_eq!(h.client.hook_count(), 1);
    h.client.attach_session(&h.session);
    h.client.attach_session(&h.session);
    assert_eq!(h.client.hook_count(), 1);

    h.client.detach_session();
    assert_eq!(h.client.hook_count(), 0);
    h.client.detach_session();
    assert_eq!(h.client.hook_count(), 0);
}

#[test]
fn clones_share_hooks() {
    let h = harness(Some(&auth_payload("ana", false)));
    let other = h.client.clone();
    h.client.detach_session();
    h.transport.respond(200, "{}");
    block_on(other.get("/x/").send()).unwrap();
    assert_eq!(h.transport.last_request().unwrap().header("authorization"), None);
}

// =============================================================
// Status and decoding
// =============================================================

#[test]
fn unauthorized_status_is_returned_unchanged() {
    let h = harness(Some(&auth_payload("ana", false)));
    h.transport.respond(401, r#"{"detail":"expired"}"#);

    let err = block_on(h.client.get("/api/admin/pedidos/").send_empty()).unwrap_err();

    assert!(err.is_unauthorized());
    assert!(!err.is_forbidden());
    assert!(h.session.snapshot().is_authenticated());
}

#[test]
fn forbidden_status_is_classified() {
    let h = harness(Some(&auth_payload("ana", false)));
    h.transport.respond(403, "");
    let err = block_on(h.client.get("/api/admin/camiones/").send_empty()).unwrap_err();
    assert!(err.is_forbidden());
    assert_eq!(err.status(), Some(403));
}

#[test]
fn send_json_decodes_success_body() {
    let h = harness(None);
    h.transport.respond(200, "[1,2,3]");
    let values: Vec<u32> = block_on(h.client.get("/n/").send_json()).unwrap();
    assert_eq!(values, vec![1, 2, 3]);
}

#[test]
fn send_json_reports_decode_failure() {
    let h = harness(None);
    h.transport.respond(200, "not json");
    let result: Result<Vec<u32>, _> = block_on(h.client.get("/n/").send_json());
    assert!(matches!(result, Err(ApiError::Decode(_))));
}

#[test]
fn transport_failure_surfaces() {
    let h = harness(None);
    h.transport.fail_network();
    let err = block_on(h.client.get("/n/").send()).unwrap_err();
    assert!(matches!(err, ApiError::Transport(TransportError::Network(_))));
}

#[test]
fn json_body_sets_content_type() {
    let h = harness(None);
    h.transport.respond(201, "{}");
    block_on(h.client.post("/api/register/").json(&serde_json::json!({ "a": 1 })).send()).unwrap();

    let request = h.transport.last_request().unwrap();
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.header("content-type"), Some("application/json"));
    assert_eq!(request.body.as_deref(), Some(r#"{"a":1}"#));
}

#[test]
fn query_parameters_are_encoded() {
    let h = harness(None);
    h.transport.respond(200, "[]");
    block_on(
        h.client
            .get("/api/admin/camiones/")
            .query("sucursal_id", 7)
            .query("q", "a b&c")
            .send(),
    )
    .unwrap();
    assert_eq!(
        h.transport.last_request().unwrap().url,
        "http://api.test/api/admin/camiones/?sucursal_id=7&q=a%20b%26c"
    );
}

// =============================================================
// Cancellation
// =============================================================

#[test]
fn cancelled_token_prevents_dispatch() {
    let h = harness(None);
    let token = CancelToken::new();
    token.cancel();

    let err = block_on(h.client.get("/n/").cancel_with(&token).send()).unwrap_err();

    assert!(err.is_cancelled());
    assert!(h.transport.requests().is_empty());
}

#[test]
fn cancel_after_dispatch_discards_response() {
    let h = harness(None);
    let pending_response = h.transport.deferred();
    let token = CancelToken::new();

    let in_flight = h.client.get("/n/").cancel_with(&token).send();
    token.cancel();
    let _ = pending_response.send(RawResponse::new(200, "[]"));

    assert_eq!(block_on(in_flight), Err(ApiError::Cancelled));
    assert_eq!(h.transport.requests().len(), 1);
}

#[test]
fn uncancelled_token_passes_response_through() {
    let h = harness(None);
    h.transport.respond(200, "{}");
    let token = CancelToken::new();
    let response = block_on(h.client.get("/n/").cancel_with(&token).send()).unwrap();
    assert_eq!(response.body(), "{}");
    assert!(!token.is_cancelled());
}

#[test]
fn finished_calls_release_their_abort_handles() {
    let h = harness(None);
    let token = CancelToken::new();
    for _ in 0..50 {
        h.transport.respond(200, "[]");
        block_on(h.client.get("/n/").cancel_with(&token).send()).unwrap();
    }
    h.transport.respond(500, "");
    let _ = block_on(h.client.get("/n/").cancel_with(&token).send());
    block_on(h.client.get("/n/").cancel_with(&token).send()).unwrap_err();

    assert_eq!(token.in_flight(), 0);
    assert_eq!(h.transport.requests().len(), 52);
}

#[test]
fn pending_call_holds_handle_until_it_resolves() {
    let h = harness(None);
    let pending_response = h.transport.deferred();
    let token = CancelToken::new();

    let in_flight = h.client.get("/n/").cancel_with(&token).send();
    assert_eq!(token.in_flight(), 1);
    let _ = pending_response.send(RawResponse::new(200, "[]"));
    block_on(in_flight).unwrap();

    assert_eq!(token.in_flight(), 0);
}

#[test]
fn dropped_call_releases_its_handle() {
    let h = harness(None);
    let _pending_response = h.transport.deferred();
    let token = CancelToken::new();

    drop(h.client.get("/n/").cancel_with(&token).send());

    assert_eq!(token.in_flight(), 0);
}

#[test]
fn cancel_clears_in_flight_calls() {
    let h = harness(None);
    let _first = h.transport.deferred();
    let _second = h.transport.deferred();
    let token = CancelToken::new();

    let a = h.client.get("/a/").cancel_with(&token).send();
    let b = h.client.get("/b/").cancel_with(&token).send();
    assert_eq!(token.in_flight(), 2);
    token.cancel();

    assert_eq!(token.in_flight(), 0);
    assert_eq!(block_on(a), Err(ApiError::Cancelled));
    assert_eq!(block_on(b), Err(ApiError::Cancelled));
}

#[test]
fn append_query_respects_existing_query() {
    let query = vec![("b".to_owned(), "2".to_owned())];
    assert_eq!(append_query("http://h/p?a=1", &query), "http://h/p?a=1&b=2");
}
