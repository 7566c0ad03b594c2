//! Wire DTOs for the freight REST API.
//!
//! DESIGN
//! ======
//! Field names follow the API's JSON keys (Spanish) through `serde(rename)`
//! so Rust code reads in English while payloads stay byte-compatible.
//! Read and write shapes are separate types because the API answers with
//! display strings where it accepts foreign keys.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Declares a backend choice field: wire code, display label, and the full
/// ordered list of values.
macro_rules! choice_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => ($code:literal, $label:literal)),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $code)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Code as sent on the wire.
            pub fn code(self) -> &'static str {
                match self {
                    $(Self::$variant => $code),+
                }
            }

            /// Human-readable label.
            pub fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }

            pub fn from_code(code: &str) -> Option<Self> {
                match code {
                    $($code => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

choice_enum!(
    /// Truck load class.
    TruckCapacity {
        Medium => ("MC", "Medium capacity"),
        Large => ("GC", "Large capacity"),
    }
);

choice_enum!(
    /// Operational state of a truck.
    TruckStatus {
        Available => ("DIS", "Available"),
        OnRoute => ("RUT", "On route"),
        Maintenance => ("MAN", "In maintenance"),
        Repair => ("REP", "In repair"),
    }
);

choice_enum!(
    /// Employee job role.
    EmployeeRole {
        Administrator => ("ADM", "Administrator"),
        Driver => ("CON", "Driver"),
        Mechanic => ("MEC", "Mechanic"),
        Assistant => ("AUX", "Assistant"),
        Manager => ("GER", "Manager"),
    }
);

choice_enum!(
    /// Employee availability.
    EmployeeStatus {
        Available => ("DIS", "Available"),
        OnRoute => ("RUT", "On route"),
        SickLeave => ("LIC", "Leave"),
        Vacation => ("VAC", "Vacation"),
        Permit => ("PER", "Permit"),
    }
);

choice_enum!(
    /// Lifecycle of a freight request.
    RequestStatus {
        Requested => ("SOLICITADO", "Requested"),
        Quoted => ("COTIZADO", "Quoted"),
        Confirmed => ("CONFIRMADO", "Confirmed"),
        InTransit => ("EN_RUTA", "In transit"),
        Completed => ("COMPLETADO", "Completed"),
        Cancelled => ("CANCELADO", "Cancelled"),
    }
);

/// A company branch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "ciudad")]
    pub city: String,
}

/// Truck as listed by the admin endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TruckRead {
    pub id: i64,
    /// License plate.
    #[serde(rename = "matricula")]
    pub plate: String,
    #[serde(rename = "capacidad")]
    pub capacity: TruckCapacity,
    /// Home branch name.
    #[serde(rename = "sucursal_base")]
    pub branch: String,
    /// Assigned driver description, absent when unassigned.
    #[serde(rename = "conductor_asignado", default)]
    pub driver: Option<String>,
    #[serde(rename = "estado", default)]
    pub status: Option<TruckStatus>,
}

/// Truck create/update body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TruckWrite {
    #[serde(rename = "matricula")]
    pub plate: String,
    #[serde(rename = "capacidad")]
    pub capacity: TruckCapacity,
    #[serde(rename = "sucursal_base")]
    pub branch_id: i64,
    /// Driver employee id; `null` leaves the truck unassigned.
    #[serde(rename = "conductor_asignado")]
    pub driver_id: Option<i64>,
}

/// Account fields nested in an employee record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Employee as listed by the admin endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRead {
    pub id: i64,
    pub user: UserSummary,
    #[serde(rename = "cargo")]
    pub role: EmployeeRole,
    /// Branch name.
    #[serde(rename = "sucursal")]
    pub branch: String,
    #[serde(rename = "estado", default)]
    pub status: Option<EmployeeStatus>,
}

/// New employee with login account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeCreate {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "cargo")]
    pub role: EmployeeRole,
    #[serde(rename = "sucursal")]
    pub branch_id: i64,
}

/// Employee edit. Account fields are never sent on update.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeUpdate {
    #[serde(rename = "cargo")]
    pub role: EmployeeRole,
    #[serde(rename = "sucursal")]
    pub branch_id: i64,
}

/// Freight request as seen by the client who placed it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRequest {
    pub id: i64,
    /// Origin branch id.
    #[serde(rename = "sucursal_origen")]
    pub origin_branch_id: i64,
    #[serde(rename = "destino")]
    pub destination: String,
    #[serde(rename = "tipo_carga")]
    pub cargo_type: String,
    #[serde(rename = "detalles_carga", default)]
    pub cargo_details: Option<String>,
    /// Desired date, `YYYY-MM-DD`.
    #[serde(rename = "fecha_deseada")]
    pub desired_date: String,
    #[serde(rename = "estado")]
    pub status: RequestStatus,
    /// Submission timestamp (ISO 8601).
    #[serde(rename = "fecha_solicitud")]
    pub requested_at: String,
}

/// New freight request submitted by a client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClientRequest {
    #[serde(rename = "sucursal_origen")]
    pub origin_branch_id: i64,
    #[serde(rename = "destino")]
    pub destination: String,
    #[serde(rename = "tipo_carga")]
    pub cargo_type: String,
    #[serde(rename = "detalles_carga")]
    pub cargo_details: String,
    #[serde(rename = "fecha_deseada")]
    pub desired_date: String,
}

/// Freight request as listed for administrators.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminRequest {
    pub id: i64,
    #[serde(rename = "cliente_username")]
    pub client_username: String,
    /// Origin branch name.
    #[serde(rename = "sucursal_origen_display")]
    pub origin: String,
    #[serde(rename = "destino")]
    pub destination: String,
    #[serde(rename = "tipo_carga")]
    pub cargo_type: String,
    #[serde(rename = "fecha_deseada")]
    pub desired_date: String,
    #[serde(rename = "estado")]
    pub status: RequestStatus,
    #[serde(rename = "fecha_solicitud")]
    pub requested_at: String,
    /// Internal cost estimate as decimal text.
    #[serde(rename = "costo_estimado", default, deserialize_with = "deserialize_decimal_text")]
    pub estimated_cost: Option<String>,
    /// Price quoted to the client as decimal text.
    #[serde(rename = "precio_cotizado", default, deserialize_with = "deserialize_decimal_text")]
    pub quoted_price: Option<String>,
    /// Assigned truck description, matching [`TruckOption::display_name`].
    #[serde(rename = "camion_asignado_display", default)]
    pub truck: Option<String>,
}

/// Partial update of a freight request. Blank inputs become `null`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminRequestUpdate {
    #[serde(rename = "estado")]
    pub status: RequestStatus,
    #[serde(rename = "precio_cotizado")]
    pub quoted_price: Option<String>,
    #[serde(rename = "costo_estimado")]
    pub estimated_cost: Option<String>,
    #[serde(rename = "camion_asignado")]
    pub truck_id: Option<i64>,
}

impl AdminRequestUpdate {
    /// Build an update from raw form inputs.
    pub fn from_form(status: RequestStatus, quoted_price: &str, estimated_cost: &str, truck_id: Option<i64>) -> Self {
        Self {
            status,
            quoted_price: non_blank(quoted_price),
            estimated_cost: non_blank(estimated_cost),
            truck_id,
        }
    }
}

/// Driver entry for dropdowns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverOption {
    pub id: i64,
    pub username: String,
}

/// Truck entry for dropdowns, labelled `PLATE (driver)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TruckOption {
    pub id: i64,
    pub display_name: String,
}

/// Self-service client sign-up.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationPayload {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "nombre_empresa", skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Accept decimals as JSON strings (`"1500.00"`) or numbers.
fn deserialize_decimal_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(text)) => Ok(Some(text)),
        Some(serde_json::Value::Number(number)) => Ok(Some(number.to_string())),
        Some(_) => Err(D::Error::custom("expected decimal string or number")),
    }
}
