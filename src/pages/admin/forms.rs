//! Edit-form state for the admin screens.
//!
//! The API lists trucks and employees with display names where it accepts
//! ids, so pre-filling an edit form maps names back to ids through the
//! dropdown data.

#[cfg(test)]
#[path = "forms_test.rs"]
mod forms_test;

use crate::net::types::{
    AdminRequest, AdminRequestUpdate, Branch, DriverOption, EmployeeCreate, EmployeeRead, EmployeeRole,
    EmployeeUpdate, RequestStatus, TruckCapacity, TruckOption, TruckRead, TruckWrite,
};

fn branch_id_by_name(branches: &[Branch], name: &str) -> Option<i64> {
    branches.iter().find(|branch| branch.name == name).map(|branch| branch.id)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TruckForm {
    pub editing: Option<i64>,
    pub plate: String,
    pub capacity: TruckCapacity,
    pub branch_id: Option<i64>,
    pub driver_id: Option<i64>,
}

impl TruckForm {
    pub(crate) fn new(default_branch: Option<i64>) -> Self {
        Self {
            editing: None,
            plate: String::new(),
            capacity: TruckCapacity::Medium,
            branch_id: default_branch,
            driver_id: None,
        }
    }

    /// Pre-fill from a listed truck. The driver text starts with the
    /// driver's username.
    pub(crate) fn edit(row: &TruckRead, branches: &[Branch], drivers: &[DriverOption]) -> Self {
        let driver_id = row.driver.as_deref().and_then(|text| {
            let username = text.split_whitespace().next()?;
            drivers.iter().find(|driver| driver.username == username).map(|driver| driver.id)
        });
        Self {
            editing: Some(row.id),
            plate: row.plate.clone(),
            capacity: row.capacity,
            branch_id: branch_id_by_name(branches, &row.branch),
            driver_id,
        }
    }

    pub(crate) fn validate(&self) -> Result<TruckWrite, &'static str> {
        let plate = self.plate.trim();
        if plate.is_empty() {
            return Err("Enter a license plate.");
        }
        let Some(branch_id) = self.branch_id else {
            return Err("Select a base branch.");
        };
        Ok(TruckWrite {
            plate: plate.to_uppercase(),
            capacity: self.capacity,
            branch_id,
            driver_id: self.driver_id,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct EmployeeForm {
    pub editing: Option<i64>,
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: EmployeeRole,
    pub branch_id: Option<i64>,
}

/// Validated employee form, split by whether it creates or edits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum EmployeeSubmission {
    Create(EmployeeCreate),
    Update(i64, EmployeeUpdate),
}

impl EmployeeForm {
    pub(crate) fn new(default_branch: Option<i64>) -> Self {
        Self {
            editing: None,
            username: String::new(),
            email: String::new(),
            password: String::new(),
            role: EmployeeRole::Driver,
            branch_id: default_branch,
        }
    }

    pub(crate) fn edit(row: &EmployeeRead, branches: &[Branch]) -> Self {
        Self {
            editing: Some(row.id),
            username: row.user.username.clone(),
            email: row.user.email.clone(),
            password: String::new(),
            role: row.role,
            branch_id: branch_id_by_name(branches, &row.branch),
        }
    }

    /// Edits submit only role and branch; account fields are create-only.
    pub(crate) fn validate(&self) -> Result<EmployeeSubmission, &'static str> {
        let Some(branch_id) = self.branch_id else {
            return Err("Select a branch.");
        };
        if let Some(id) = self.editing {
            return Ok(EmployeeSubmission::Update(
                id,
                EmployeeUpdate {
                    role: self.role,
                    branch_id,
                },
            ));
        }
        let username = self.username.trim();
        let email = self.email.trim();
        if username.is_empty() || email.is_empty() || self.password.is_empty() {
            return Err("Username, email and password are required.");
        }
        Ok(EmployeeSubmission::Create(EmployeeCreate {
            username: username.to_owned(),
            email: email.to_owned(),
            password: self.password.clone(),
            role: self.role,
            branch_id,
        }))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RequestEditForm {
    pub request_id: i64,
    pub status: RequestStatus,
    pub quoted_price: String,
    pub estimated_cost: String,
    pub truck_id: Option<i64>,
}

impl RequestEditForm {
    pub(crate) fn edit(row: &AdminRequest, trucks: &[TruckOption]) -> Self {
        let truck_id = row
            .truck
            .as_deref()
            .and_then(|label| trucks.iter().find(|truck| truck.display_name == label))
            .map(|truck| truck.id);
        Self {
            request_id: row.id,
            status: row.status,
            quoted_price: row.quoted_price.clone().unwrap_or_default(),
            estimated_cost: row.estimated_cost.clone().unwrap_or_default(),
            truck_id,
        }
    }

    pub(crate) fn validate(&self) -> Result<AdminRequestUpdate, &'static str> {
        for amount in [&self.quoted_price, &self.estimated_cost] {
            let amount = amount.trim();
            if !amount.is_empty() && !amount.parse::<f64>().is_ok_and(|value| value.is_finite() && value >= 0.0) {
                return Err("Amounts must be non-negative numbers.");
            }
        }
        Ok(AdminRequestUpdate::from_form(
            self.status,
            &self.quoted_price,
            &self.estimated_cost,
            self.truck_id,
        ))
    }
}

/// Parse an optional id from a `<select>` value; blank means none.
pub(crate) fn parse_optional_id(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}
