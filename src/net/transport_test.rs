use super::*;

#[test]
fn method_as_str_is_uppercase_verb() {
    assert_eq!(Method::Get.as_str(), "GET");
    assert_eq!(Method::Patch.as_str(), "PATCH");
    assert_eq!(Method::Delete.as_str(), "DELETE");
}

#[test]
fn header_lookup_is_case_insensitive() {
    let mut req = PreparedRequest::new(Method::Get, "http://x/api".to_owned());
    req.set_header("Authorization", "Bearer t".to_owned());
    assert_eq!(req.header("authorization"), Some("Bearer t"));
}

#[test]
fn set_header_replaces_existing_value() {
    let mut req = PreparedRequest::new(Method::Get, "http://x/api".to_owned());
    req.set_header("authorization", "Bearer old".to_owned());
    req.set_header("Authorization", "Bearer new".to_owned());
    assert_eq!(req.headers.len(), 1);
    assert_eq!(req.header("Authorization"), Some("Bearer new"));
}

#[test]
fn remove_header_drops_all_cases() {
    let mut req = PreparedRequest::new(Method::Get, "http://x/api".to_owned());
    req.headers.push(("AUTHORIZATION".to_owned(), "a".to_owned()));
    req.remove_header("Authorization");
    assert_eq!(req.header("authorization"), None);
}

#[test]
fn raw_response_success_range() {
    assert!(RawResponse::new(200, "").is_success());
    assert!(RawResponse::new(204, "").is_success());
    assert!(!RawResponse::new(301, "").is_success());
    assert!(!RawResponse::new(401, "").is_success());
}

#[test]
fn unavailable_transport_reports_network_error() {
    let req = PreparedRequest::new(Method::Get, "http://x/api".to_owned());
    let result = futures::executor::block_on(UnavailableTransport.execute(req));
    assert!(matches!(result, Err(TransportError::Network(_))));
}
