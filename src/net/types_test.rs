use super::*;
use serde_json::json;

// =============================================================
// Choice enums
// =============================================================

#[test]
fn choice_codes_round_trip_through_from_code() {
    for status in RequestStatus::ALL {
        assert_eq!(RequestStatus::from_code(status.code()), Some(*status));
    }
    assert_eq!(RequestStatus::from_code("UNKNOWN"), None);
}

#[test]
fn choice_enums_serialize_as_wire_codes() {
    assert_eq!(serde_json::to_value(RequestStatus::InTransit).unwrap(), json!("EN_RUTA"));
    assert_eq!(serde_json::to_value(EmployeeRole::Driver).unwrap(), json!("CON"));
    assert_eq!(serde_json::to_value(TruckCapacity::Large).unwrap(), json!("GC"));
}

#[test]
fn choice_lists_are_complete() {
    assert_eq!(TruckCapacity::ALL.len(), 2);
    assert_eq!(TruckStatus::ALL.len(), 4);
    assert_eq!(EmployeeRole::ALL.len(), 5);
    assert_eq!(EmployeeStatus::ALL.len(), 5);
    assert_eq!(RequestStatus::ALL.len(), 6);
    assert_eq!(RequestStatus::ALL[0], RequestStatus::Requested);
}

#[test]
fn shared_codes_map_per_enum() {
    assert_eq!(TruckStatus::from_code("RUT"), Some(TruckStatus::OnRoute));
    assert_eq!(EmployeeStatus::from_code("RUT"), Some(EmployeeStatus::OnRoute));
    assert_eq!(TruckStatus::from_code("VAC"), None);
}

// =============================================================
// Read shapes
// =============================================================

#[test]
fn truck_read_decodes_admin_listing() {
    let truck: TruckRead = serde_json::from_value(json!({
        "id": 3,
        "matricula": "AB-1234",
        "capacidad": "MC",
        "sucursal_base": "Osorno",
        "conductor_asignado": null,
        "get_capacidad_display": "Mediana Capacidad"
    }))
    .unwrap();
    assert_eq!(truck.plate, "AB-1234");
    assert_eq!(truck.capacity, TruckCapacity::Medium);
    assert_eq!(truck.driver, None);
    assert_eq!(truck.status, None);
}

#[test]
fn employee_read_decodes_nested_user() {
    let employee: EmployeeRead = serde_json::from_value(json!({
        "id": 9,
        "user": { "id": 4, "username": "jperez", "email": "j@acme.cl", "first_name": "", "last_name": "" },
        "cargo": "MEC",
        "get_cargo_display": "Mecánico",
        "sucursal": "Puerto Montt"
    }))
    .unwrap();
    assert_eq!(employee.user.username, "jperez");
    assert_eq!(employee.role, EmployeeRole::Mechanic);
    assert_eq!(employee.branch, "Puerto Montt");
}

#[test]
fn admin_request_accepts_decimal_strings_numbers_and_null() {
    let base = json!({
        "id": 1,
        "cliente_username": "acme",
        "sucursal_origen_display": "Osorno",
        "destino": "Valdivia",
        "tipo_carga": "General",
        "fecha_deseada": "2026-01-10",
        "estado": "COTIZADO",
        "fecha_solicitud": "2026-01-01T10:00:00Z",
        "costo_estimado": "1000.00",
        "precio_cotizado": 1500,
        "camion_asignado_display": null
    });
    let request: AdminRequest = serde_json::from_value(base).unwrap();
    assert_eq!(request.estimated_cost.as_deref(), Some("1000.00"));
    assert_eq!(request.quoted_price.as_deref(), Some("1500"));
    assert_eq!(request.truck, None);
    assert_eq!(request.status, RequestStatus::Quoted);
}

#[test]
fn admin_request_rejects_non_decimal_price() {
    let result = serde_json::from_value::<AdminRequest>(json!({
        "id": 1,
        "cliente_username": "acme",
        "sucursal_origen_display": "Osorno",
        "destino": "Valdivia",
        "tipo_carga": "General",
        "fecha_deseada": "2026-01-10",
        "estado": "COTIZADO",
        "fecha_solicitud": "2026-01-01T10:00:00Z",
        "precio_cotizado": [1]
    }));
    assert!(result.is_err());
}

// =============================================================
// Write shapes
// =============================================================

#[test]
fn request_update_sends_blank_fields_as_null() {
    let update = AdminRequestUpdate::from_form(RequestStatus::Confirmed, "  ", "1200.50", None);
    assert_eq!(
        serde_json::to_value(&update).unwrap(),
        json!({
            "estado": "CONFIRMADO",
            "precio_cotizado": null,
            "costo_estimado": "1200.50",
            "camion_asignado": null
        })
    );
}

#[test]
fn employee_update_carries_only_role_and_branch() {
    let update = EmployeeUpdate {
        role: EmployeeRole::Manager,
        branch_id: 2,
    };
    assert_eq!(serde_json::to_value(&update).unwrap(), json!({ "cargo": "GER", "sucursal": 2 }));
}

#[test]
fn truck_write_uses_foreign_keys() {
    let truck = TruckWrite {
        plate: "ZZ-9".to_owned(),
        capacity: TruckCapacity::Large,
        branch_id: 1,
        driver_id: Some(5),
    };
    assert_eq!(
        serde_json::to_value(&truck).unwrap(),
        json!({ "matricula": "ZZ-9", "capacidad": "GC", "sucursal_base": 1, "conductor_asignado": 5 })
    );
}

#[test]
fn registration_omits_missing_company() {
    let payload = RegistrationPayload {
        username: "u".to_owned(),
        email: "u@x.cl".to_owned(),
        password: "p".to_owned(),
        company_name: None,
    };
    assert_eq!(
        serde_json::to_value(&payload).unwrap(),
        json!({ "username": "u", "email": "u@x.cl", "password": "p" })
    );
}
