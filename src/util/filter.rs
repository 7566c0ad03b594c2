//! Client-side search over fetched admin tables.
//!
//! Filters borrow the fetched list and return matching references; the list
//! itself is never reordered or mutated.

#[cfg(test)]
#[path = "filter_test.rs"]
mod filter_test;

use crate::net::types::{AdminRequest, EmployeeRead, RequestStatus, TruckRead};

/// Rows that expose the text columns a search box matches against.
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;
}

impl Searchable for TruckRead {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.plate.as_str(), self.branch.as_str()];
        if let Some(driver) = &self.driver {
            fields.push(driver);
        }
        fields
    }
}

impl Searchable for EmployeeRead {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.user.username.as_str(),
            self.user.email.as_str(),
            self.role.label(),
            self.branch.as_str(),
        ]
    }
}

impl Searchable for AdminRequest {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.client_username.as_str(),
            self.origin.as_str(),
            self.destination.as_str(),
            self.cargo_type.as_str(),
        ]
    }
}

/// Case-insensitive substring match against any search field. A blank
/// query matches every row.
pub fn matches_query<T: Searchable>(row: &T, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    needle.is_empty()
        || row
            .search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
}

pub fn filter_rows<'a, T: Searchable>(rows: &'a [T], query: &str) -> Vec<&'a T> {
    rows.iter().filter(|row| matches_query(*row, query)).collect()
}

/// Request filter with an optional status restriction.
pub fn filter_requests<'a>(
    rows: &'a [AdminRequest],
    query: &str,
    status: Option<RequestStatus>,
) -> Vec<&'a AdminRequest> {
    rows.iter()
        .filter(|row| status.is_none_or(|wanted| row.status == wanted))
        .filter(|row| matches_query(*row, query))
        .collect()
}
