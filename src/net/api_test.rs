use super::*;
use std::sync::Arc;

use futures::executor::block_on;
use serde_json::json;

use crate::config::ClientConfig;
use crate::net::test_support::MockTransport;
use crate::net::transport::Method;

fn client() -> (ApiClient, MockTransport) {
    let transport = MockTransport::new();
    let client = ApiClient::new(&ClientConfig::new("http://api.test"), Arc::new(transport.clone()));
    (client, transport)
}

fn truck_json(id: i64, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "matricula": format!("AA-{id}"),
        "capacidad": "GC",
        "sucursal_base": "Osorno",
        "conductor_asignado": null,
        "estado": status
    })
}

fn employee_json(id: i64, role: &str) -> serde_json::Value {
    json!({
        "id": id,
        "user": { "id": id, "username": format!("user{id}"), "email": "", "first_name": "", "last_name": "" },
        "cargo": role,
        "sucursal": "Osorno"
    })
}

fn request_json(id: i64, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "cliente_username": "acme",
        "sucursal_origen_display": "Osorno",
        "destino": "Valdivia",
        "tipo_carga": "General",
        "fecha_deseada": "2026-02-01",
        "estado": status,
        "fecha_solicitud": "2026-01-01T00:00:00Z",
        "costo_estimado": null,
        "precio_cotizado": null,
        "camion_asignado_display": null
    })
}

// =============================================================
// Paths
// =============================================================

#[test]
fn detail_path_appends_id_and_slash() {
    assert_eq!(detail_path(ADMIN_TRUCKS_PATH, 12), "/api/admin/camiones/12/");
    assert_eq!(detail_path(BRANCHES_PATH, 3), "/api/data/sucursales/3/");
}

#[test]
fn branch_scoped_listing_adds_filter() {
    let (client, transport) = client();
    transport.respond(200, "[]");
    block_on(list_employees(&client, Some(4), &CancelToken::new())).unwrap();
    assert_eq!(
        transport.last_request().unwrap().url,
        "http://api.test/api/admin/empleados/?sucursal_id=4"
    );
}

#[test]
fn unscoped_listing_has_no_query() {
    let (client, transport) = client();
    transport.respond(200, "[]");
    block_on(list_admin_requests(&client, None, &CancelToken::new())).unwrap();
    assert_eq!(transport.last_request().unwrap().url, "http://api.test/api/admin/pedidos/");
}

#[test]
fn update_request_is_a_patch_with_nulls() {
    let (client, transport) = client();
    transport.respond(200, "{}");
    let update = AdminRequestUpdate::from_form(RequestStatus::Quoted, "1500", "", Some(2));
    block_on(update_admin_request(&client, 8, &update, &CancelToken::new())).unwrap();

    let request = transport.last_request().unwrap();
    assert_eq!(request.method, Method::Patch);
    assert_eq!(request.url, "http://api.test/api/admin/pedidos/8/");
    let body: serde_json::Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
    assert_eq!(body["costo_estimado"], serde_json::Value::Null);
    assert_eq!(body["precio_cotizado"], json!("1500"));
    assert_eq!(body["camion_asignado"], json!(2));
}

#[test]
fn delete_truck_uses_detail_path() {
    let (client, transport) = client();
    transport.respond(204, "");
    block_on(delete_truck(&client, 5, &CancelToken::new())).unwrap();
    let request = transport.last_request().unwrap();
    assert_eq!(request.method, Method::Delete);
    assert_eq!(request.url, "http://api.test/api/admin/camiones/5/");
}

#[test]
fn update_employee_sends_role_and_branch_only() {
    let (client, transport) = client();
    transport.respond(200, "{}");
    let update = EmployeeUpdate {
        role: EmployeeRole::Driver,
        branch_id: 1,
    };
    block_on(update_employee(&client, 3, &update, &CancelToken::new())).unwrap();
    let request = transport.last_request().unwrap();
    assert_eq!(request.method, Method::Put);
    assert_eq!(request.body.as_deref(), Some(r#"{"cargo":"CON","sucursal":1}"#));
}

// =============================================================
// Messages
// =============================================================

#[test]
fn my_requests_forbidden_means_not_a_client() {
    let forbidden = ApiError::Status {
        status: 403,
        body: String::new(),
    };
    assert_eq!(my_requests_error_message(&forbidden), "Your account is not a client account.");
    assert_eq!(my_requests_error_message(&ApiError::Cancelled), "Could not load your requests.");
}

#[test]
fn admin_error_message_by_kind() {
    let status = |status| ApiError::Status {
        status,
        body: String::new(),
    };
    assert_eq!(admin_error_message(&status(403)), "You are not allowed to do that.");
    assert_eq!(admin_error_message(&status(400)), "The server rejected the change (400).");
    assert_eq!(admin_error_message(&ApiError::Cancelled), "");
}

// =============================================================
// Registration
// =============================================================

fn registration() -> RegistrationPayload {
    RegistrationPayload {
        username: "nuevo".to_owned(),
        email: "n@acme.cl".to_owned(),
        password: "secret".to_owned(),
        company_name: None,
    }
}

#[test]
fn registration_success() {
    let (client, transport) = client();
    transport.respond(201, r#"{"id":1,"username":"nuevo","email":"n@acme.cl"}"#);
    assert_eq!(block_on(register(&client, &registration())), Ok(()));
    assert_eq!(transport.last_request().unwrap().url, "http://api.test/api/register/");
}

#[test]
fn registration_reports_first_username_error() {
    let (client, transport) = client();
    transport.respond(400, r#"{"username":["A user with that username already exists."]}"#);
    let err = block_on(register(&client, &registration())).unwrap_err();
    assert_eq!(err.user_message(), "Error: A user with that username already exists.");
}

#[test]
fn registration_falls_back_to_password_then_generic() {
    assert_eq!(
        RegistrationError::from_response(400, r#"{"password":["Too short."]}"#),
        RegistrationError::Rejected("Too short.".to_owned())
    );
    assert_eq!(
        RegistrationError::from_response(400, r#"{"email":["Invalid."]}"#),
        RegistrationError::Failed
    );
    assert_eq!(RegistrationError::from_response(500, "<html>"), RegistrationError::Failed);
}

#[test]
fn registration_network_failure_is_generic() {
    let (client, transport) = client();
    transport.fail_network();
    let err = block_on(register(&client, &registration())).unwrap_err();
    assert_eq!(err.user_message(), "Something went wrong. Please try again.");
}

// =============================================================
// Branch dashboard
// =============================================================

#[test]
fn dashboard_joins_four_calls_and_summarizes() {
    let (client, transport) = client();
    transport.respond(200, r#"{"id":2,"nombre":"Osorno","ciudad":"Osorno"}"#);
    transport.respond(200, &json!([truck_json(1, "DIS"), truck_json(2, "MAN")]).to_string());
    transport.respond(
        200,
        &json!([employee_json(1, "CON"), employee_json(2, "CON"), employee_json(3, "ADM")]).to_string(),
    );
    transport.respond(
        200,
        &json!([request_json(1, "SOLICITADO"), request_json(2, "COMPLETADO")]).to_string(),
    );

    let dashboard = block_on(fetch_branch_dashboard(&client, 2, &CancelToken::new())).unwrap();

    assert_eq!(dashboard.branch.name, "Osorno");
    assert_eq!(
        dashboard.summary(),
        BranchSummary {
            trucks: 2,
            available_trucks: 1,
            employees: 3,
            drivers: 2,
            requests: 2,
            open_requests: 1,
        }
    );
    let urls: Vec<String> = transport.requests().into_iter().map(|r| r.url).collect();
    assert_eq!(
        urls,
        vec![
            "http://api.test/api/data/sucursales/2/",
            "http://api.test/api/admin/camiones/?sucursal_id=2",
            "http://api.test/api/admin/empleados/?sucursal_id=2",
            "http://api.test/api/admin/pedidos/?sucursal_id=2",
        ]
    );
}

#[test]
fn dashboard_fails_when_any_call_fails() {
    let (client, transport) = client();
    transport.respond(404, r#"{"detail":"Not found."}"#);
    transport.respond(200, "[]");
    transport.respond(200, "[]");
    transport.respond(200, "[]");

    let err = block_on(fetch_branch_dashboard(&client, 99, &CancelToken::new())).unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[test]
fn cancelled_dashboard_never_dispatches() {
    let (client, transport) = client();
    let cancel = CancelToken::new();
    cancel.cancel();
    let err = block_on(fetch_branch_dashboard(&client, 1, &cancel)).unwrap_err();
    assert!(err.is_cancelled());
    assert!(transport.requests().is_empty());
}
