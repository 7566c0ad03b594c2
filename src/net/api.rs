//! Typed REST bindings for the freight API.
//!
//! Every call goes through the shared [`ApiClient`], so the bearer hook
//! decides the `Authorization` header. Calls dispatch as soon as they are
//! made and return a `'static` future screens can hand to `spawn_local` or a
//! `LocalResource`.
//!
//! ERROR HANDLING
//! ==============
//! Functions return `ApiError` unchanged. Screens turn it into text with
//! the `*_message` helpers here; 401 and 403 are never acted on centrally.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use futures::future::{LocalBoxFuture, try_join4};
use serde::Deserialize;

use super::client::{ApiClient, ApiError, CancelToken, RequestBuilder};
use super::types::{
    AdminRequest, AdminRequestUpdate, Branch, ClientRequest, DriverOption, EmployeeCreate, EmployeeRead,
    EmployeeRole, EmployeeUpdate, NewClientRequest, RegistrationPayload, RequestStatus, TruckOption, TruckRead,
    TruckStatus, TruckWrite,
};

pub(crate) const REGISTER_PATH: &str = "/api/register/";
pub(crate) const MY_REQUESTS_PATH: &str = "/api/mis-pedidos/";
pub(crate) const BRANCHES_PATH: &str = "/api/data/sucursales/";
pub(crate) const DRIVERS_PATH: &str = "/api/data/conductores/";
pub(crate) const TRUCK_OPTIONS_PATH: &str = "/api/data/camiones/";
pub(crate) const ADMIN_TRUCKS_PATH: &str = "/api/admin/camiones/";
pub(crate) const ADMIN_EMPLOYEES_PATH: &str = "/api/admin/empleados/";
pub(crate) const ADMIN_REQUESTS_PATH: &str = "/api/admin/pedidos/";

const BRANCH_FILTER: &str = "sucursal_id";

type ApiFuture<T> = LocalBoxFuture<'static, Result<T, ApiError>>;

fn detail_path(collection: &str, id: i64) -> String {
    format!("{collection}{id}/")
}

fn listing(client: &ApiClient, path: &str, branch_id: Option<i64>, cancel: &CancelToken) -> RequestBuilder {
    let builder = client.get(path).cancel_with(cancel);
    match branch_id {
        Some(id) => builder.query(BRANCH_FILTER, id),
        None => builder,
    }
}

// =============================================================
// Dropdown data
// =============================================================

pub fn list_branches(client: &ApiClient, cancel: &CancelToken) -> ApiFuture<Vec<Branch>> {
    client.get(BRANCHES_PATH).cancel_with(cancel).send_json()
}

pub fn fetch_branch(client: &ApiClient, branch_id: i64, cancel: &CancelToken) -> ApiFuture<Branch> {
    client
        .get(&detail_path(BRANCHES_PATH, branch_id))
        .cancel_with(cancel)
        .send_json()
}

pub fn list_drivers(client: &ApiClient, cancel: &CancelToken) -> ApiFuture<Vec<DriverOption>> {
    client.get(DRIVERS_PATH).cancel_with(cancel).send_json()
}

pub fn list_truck_options(client: &ApiClient, cancel: &CancelToken) -> ApiFuture<Vec<TruckOption>> {
    client.get(TRUCK_OPTIONS_PATH).cancel_with(cancel).send_json()
}

// =============================================================
// Client portal
// =============================================================

pub fn register(client: &ApiClient, payload: &RegistrationPayload) -> LocalBoxFuture<'static, Result<(), RegistrationError>> {
    let pending = client.post(REGISTER_PATH).json(payload).send();
    Box::pin(async move {
        let response = pending.await.map_err(|e| {
            log::warn!("api: registration failed: {e}");
            RegistrationError::Failed
        })?;
        match response.error_for_status() {
            Ok(_) => Ok(()),
            Err(ApiError::Status { status, body }) => Err(RegistrationError::from_response(status, &body)),
            Err(_) => Err(RegistrationError::Failed),
        }
    })
}

pub fn list_my_requests(client: &ApiClient, cancel: &CancelToken) -> ApiFuture<Vec<ClientRequest>> {
    client.get(MY_REQUESTS_PATH).cancel_with(cancel).send_json()
}

pub fn create_my_request(client: &ApiClient, request: &NewClientRequest, cancel: &CancelToken) -> ApiFuture<()> {
    client.post(MY_REQUESTS_PATH).json(request).cancel_with(cancel).send_empty()
}

/// Text shown when the client's own requests cannot be loaded.
pub fn my_requests_error_message(error: &ApiError) -> &'static str {
    if error.is_forbidden() {
        "Your account is not a client account."
    } else {
        "Could not load your requests."
    }
}

// =============================================================
// Admin: trucks
// =============================================================

pub fn list_trucks(client: &ApiClient, branch_id: Option<i64>, cancel: &CancelToken) -> ApiFuture<Vec<TruckRead>> {
    listing(client, ADMIN_TRUCKS_PATH, branch_id, cancel).send_json()
}

pub fn create_truck(client: &ApiClient, truck: &TruckWrite, cancel: &CancelToken) -> ApiFuture<()> {
    client.post(ADMIN_TRUCKS_PATH).json(truck).cancel_with(cancel).send_empty()
}

pub fn update_truck(client: &ApiClient, truck_id: i64, truck: &TruckWrite, cancel: &CancelToken) -> ApiFuture<()> {
    client
        .put(&detail_path(ADMIN_TRUCKS_PATH, truck_id))
        .json(truck)
        .cancel_with(cancel)
        .send_empty()
}

pub fn delete_truck(client: &ApiClient, truck_id: i64, cancel: &CancelToken) -> ApiFuture<()> {
    client
        .delete(&detail_path(ADMIN_TRUCKS_PATH, truck_id))
        .cancel_with(cancel)
        .send_empty()
}

// =============================================================
// Admin: employees
// =============================================================

pub fn list_employees(client: &ApiClient, branch_id: Option<i64>, cancel: &CancelToken) -> ApiFuture<Vec<EmployeeRead>> {
    listing(client, ADMIN_EMPLOYEES_PATH, branch_id, cancel).send_json()
}

pub fn create_employee(client: &ApiClient, employee: &EmployeeCreate, cancel: &CancelToken) -> ApiFuture<()> {
    client
        .post(ADMIN_EMPLOYEES_PATH)
        .json(employee)
        .cancel_with(cancel)
        .send_empty()
}

pub fn update_employee(
    client: &ApiClient,
    employee_id: i64,
    employee: &EmployeeUpdate,
    cancel: &CancelToken,
) -> ApiFuture<()> {
    client
        .put(&detail_path(ADMIN_EMPLOYEES_PATH, employee_id))
        .json(employee)
        .cancel_with(cancel)
        .send_empty()
}

pub fn delete_employee(client: &ApiClient, employee_id: i64, cancel: &CancelToken) -> ApiFuture<()> {
    client
        .delete(&detail_path(ADMIN_EMPLOYEES_PATH, employee_id))
        .cancel_with(cancel)
        .send_empty()
}

// =============================================================
// Admin: freight requests
// =============================================================

pub fn list_admin_requests(
    client: &ApiClient,
    branch_id: Option<i64>,
    cancel: &CancelToken,
) -> ApiFuture<Vec<AdminRequest>> {
    listing(client, ADMIN_REQUESTS_PATH, branch_id, cancel).send_json()
}

pub fn update_admin_request(
    client: &ApiClient,
    request_id: i64,
    update: &AdminRequestUpdate,
    cancel: &CancelToken,
) -> ApiFuture<()> {
    client
        .patch(&detail_path(ADMIN_REQUESTS_PATH, request_id))
        .json(update)
        .cancel_with(cancel)
        .send_empty()
}

/// Text shown when an admin mutation fails.
pub fn admin_error_message(error: &ApiError) -> String {
    match error {
        ApiError::Status { status: 401 | 403, .. } => "You are not allowed to do that.".to_owned(),
        ApiError::Status { status, .. } => format!("The server rejected the change ({status})."),
        ApiError::Cancelled => String::new(),
        _ => "Could not reach the server.".to_owned(),
    }
}

// =============================================================
// Branch dashboard
// =============================================================

/// Everything the branch dashboard shows for one branch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BranchDashboard {
    pub branch: Branch,
    pub trucks: Vec<TruckRead>,
    pub employees: Vec<EmployeeRead>,
    pub requests: Vec<AdminRequest>,
}

/// Headline counts for the dashboard cards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BranchSummary {
    pub trucks: usize,
    pub available_trucks: usize,
    pub employees: usize,
    pub drivers: usize,
    pub requests: usize,
    /// Requests not yet completed or cancelled.
    pub open_requests: usize,
}

impl BranchDashboard {
    pub fn summary(&self) -> BranchSummary {
        BranchSummary {
            trucks: self.trucks.len(),
            available_trucks: self
                .trucks
                .iter()
                .filter(|truck| truck.status.is_none_or(|status| status == TruckStatus::Available))
                .count(),
            employees: self.employees.len(),
            drivers: self
                .employees
                .iter()
                .filter(|employee| employee.role == EmployeeRole::Driver)
                .count(),
            requests: self.requests.len(),
            open_requests: self
                .requests
                .iter()
                .filter(|request| !matches!(request.status, RequestStatus::Completed | RequestStatus::Cancelled))
                .count(),
        }
    }
}

/// Load the branch and its trucks, employees and requests. The four calls
/// are dispatched together; the first failure wins.
pub fn fetch_branch_dashboard(client: &ApiClient, branch_id: i64, cancel: &CancelToken) -> ApiFuture<BranchDashboard> {
    let branch = fetch_branch(client, branch_id, cancel);
    let trucks = list_trucks(client, Some(branch_id), cancel);
    let employees = list_employees(client, Some(branch_id), cancel);
    let requests = list_admin_requests(client, Some(branch_id), cancel);
    Box::pin(async move {
        let (branch, trucks, employees, requests) = try_join4(branch, trucks, employees, requests).await?;
        Ok(BranchDashboard {
            branch,
            trucks,
            employees,
            requests,
        })
    })
}

// =============================================================
// Registration errors
// =============================================================

/// Sign-up failure with the text to show.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    /// The API rejected a field; carries its first message.
    #[error("{0}")]
    Rejected(String),
    #[error("registration failed")]
    Failed,
}

#[derive(Deserialize)]
struct FieldErrors {
    #[serde(default)]
    username: Vec<String>,
    #[serde(default)]
    password: Vec<String>,
}

impl RegistrationError {
    fn from_response(status: u16, body: &str) -> Self {
        log::warn!("api: registration rejected with status {status}");
        let Ok(fields) = serde_json::from_str::<FieldErrors>(body) else {
            return Self::Failed;
        };
        fields
            .username
            .into_iter()
            .chain(fields.password)
            .next()
            .map_or(Self::Failed, Self::Rejected)
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected(message) => format!("Error: {message}"),
            Self::Failed => "Something went wrong. Please try again.".to_owned(),
        }
    }
}
