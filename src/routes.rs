//! Routing table.
//!
//! Each entry pairs a path pattern with an optional guard and a constructor
//! for the screen it shows. `resolve` runs the guard first and only builds
//! the screen once the guard allows it.
//!
//! Branch sub-routes share one layout shell: they resolve to
//! `Screen::Branch` with the tab that fills the shell's child slot.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use crate::state::session::SessionState;
use crate::util::auth::{ADMIN, AUTHENTICATED, Guard, GuardDecision};

/// Child slot of the branch layout shell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BranchTab {
    Dashboard,
    Trucks,
    Employees,
    Requests,
}

impl BranchTab {
    pub const ALL: [Self; 4] = [Self::Dashboard, Self::Trucks, Self::Employees, Self::Requests];

    pub fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Summary",
            Self::Trucks => "Trucks",
            Self::Employees => "Employees",
            Self::Requests => "Requests",
        }
    }

    /// Path of this tab for a given branch.
    pub fn href(self, branch_id: i64) -> String {
        match self {
            Self::Dashboard => format!("/admin/sucursales/{branch_id}"),
            Self::Trucks => format!("/admin/sucursales/{branch_id}/camiones"),
            Self::Employees => format!("/admin/sucursales/{branch_id}/empleados"),
            Self::Requests => format!("/admin/sucursales/{branch_id}/pedidos"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Home,
    Information,
    Contact,
    Register,
    Login,
    MyRequests,
    Branches,
    Branch { branch_id: i64, tab: BranchTab },
    Trucks,
    Employees,
    Requests,
}

impl Screen {
    /// Admin console screens get the admin navbar.
    pub fn is_admin(self) -> bool {
        matches!(
            self,
            Self::Branches | Self::Branch { .. } | Self::Trucks | Self::Employees | Self::Requests
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    Render(Screen),
    Redirect(&'static str),
    NotFound,
}

pub struct RouteEntry {
    /// Slash-separated segments; `:id` captures a numeric id.
    pub pattern: &'static str,
    pub guard: Option<&'static dyn Guard>,
    build: fn(Option<i64>) -> Screen,
}

impl RouteEntry {
    const fn open(pattern: &'static str, build: fn(Option<i64>) -> Screen) -> Self {
        Self {
            pattern,
            guard: None,
            build,
        }
    }

    const fn guarded(pattern: &'static str, guard: &'static dyn Guard, build: fn(Option<i64>) -> Screen) -> Self {
        Self {
            pattern,
            guard: Some(guard),
            build,
        }
    }

    /// `Some(captured id)` when `segments` fit the pattern.
    fn capture(&self, segments: &[&str]) -> Option<Option<i64>> {
        let pattern: Vec<&str> = split(self.pattern);
        if pattern.len() != segments.len() {
            return None;
        }
        let mut id = None;
        for (expected, actual) in pattern.iter().zip(segments) {
            if *expected == ":id" {
                id = Some(actual.parse::<i64>().ok()?);
            } else if expected != actual {
                return None;
            }
        }
        Some(id)
    }
}

fn branch(id: Option<i64>, tab: BranchTab) -> Screen {
    Screen::Branch {
        branch_id: id.unwrap_or_default(),
        tab,
    }
}

pub static ROUTES: &[RouteEntry] = &[
    RouteEntry::open("/", |_| Screen::Home),
    RouteEntry::open("/informacion", |_| Screen::Information),
    RouteEntry::open("/contacto", |_| Screen::Contact),
    RouteEntry::open("/registro", |_| Screen::Register),
    RouteEntry::open("/login", |_| Screen::Login),
    RouteEntry::guarded("/mis-pedidos", &AUTHENTICATED, |_| Screen::MyRequests),
    RouteEntry::guarded("/admin/sucursales", &ADMIN, |_| Screen::Branches),
    RouteEntry::guarded("/admin/sucursales/:id", &ADMIN, |id| branch(id, BranchTab::Dashboard)),
    RouteEntry::guarded("/admin/sucursales/:id/camiones", &ADMIN, |id| branch(id, BranchTab::Trucks)),
    RouteEntry::guarded("/admin/sucursales/:id/empleados", &ADMIN, |id| branch(id, BranchTab::Employees)),
    RouteEntry::guarded("/admin/sucursales/:id/pedidos", &ADMIN, |id| branch(id, BranchTab::Requests)),
    RouteEntry::guarded("/admin/camiones", &ADMIN, |_| Screen::Trucks),
    RouteEntry::guarded("/admin/empleados", &ADMIN, |_| Screen::Employees),
    RouteEntry::guarded("/admin/pedidos", &ADMIN, |_| Screen::Requests),
];

fn split(path: &str) -> Vec<&str> {
    path.split('/').filter(|segment| !segment.is_empty()).collect()
}

/// Decide what `path` shows for the given session.
pub fn resolve(path: &str, state: &SessionState) -> Resolution {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let segments = split(path);
    for entry in ROUTES {
        let Some(id) = entry.capture(&segments) else {
            continue;
        };
        if let Some(guard) = entry.guard {
            if let GuardDecision::Redirect(to) = guard.check(state) {
                log::debug!("routes: {} guard redirected {path} to {to}", guard.name());
                return Resolution::Redirect(to);
            }
        }
        return Resolution::Render((entry.build)(id));
    }
    Resolution::NotFound
}
