//! Session context, roles and role gated routes.
//!
//! The session is a plain value owned by the application model. It is
//! read once at startup and only replaced by [`Session::login`] and
//! [`Session::logout`].

use clap::ValueEnum;
use tracing::{debug, info};

use crate::domain::SpotlessError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Role {
    Admin,
    Cleaner,
    Customer,
    Agency,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Cleaner => "cleaner",
            Role::Customer => "customer",
            Role::Agency => "agency",
        }
    }

    /// Agencies are served by the customer area.
    pub fn satisfies(&self, required: Role) -> bool {
        match required {
            Role::Customer => matches!(self, Role::Customer | Role::Agency),
            other => *self == other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub user_id: u32,
    pub username: String,
    pub role: Role,
}

/// Known accounts. There is no backend, so login is a lookup.
#[derive(Debug, Clone)]
pub struct UserDirectory {
    users: Vec<User>,
}

impl UserDirectory {
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }

    pub fn mock() -> Self {
        let user = |user_id, username: &str, role| User {
            user_id,
            username: username.to_string(),
            role,
        };
        Self::new(vec![
            user(1, "admin", Role::Admin),
            user(2, "john", Role::Cleaner),
            user(3, "maria", Role::Cleaner),
            user(4, "jane", Role::Customer),
            user(5, "cleanco", Role::Agency),
        ])
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn authenticate(&self, username: &str) -> Result<User, SpotlessError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(SpotlessError::InvalidCredentials);
        }
        self.users
            .iter()
            .find(|u| u.username.eq_ignore_ascii_case(username))
            .cloned()
            .ok_or(SpotlessError::InvalidCredentials)
    }

    /// Startup sign in: a username, or a role name standing for the first
    /// account with that role.
    pub fn sign_in_as(&self, name: &str) -> Result<User, SpotlessError> {
        self.authenticate(name).or_else(|err| {
            let role = Role::from_str(name.trim(), true).map_err(|_| err)?;
            debug!("Signing in as first {} account", role.as_str());
            self.users
                .iter()
                .find(|u| u.role == role)
                .cloned()
                .ok_or(SpotlessError::InvalidCredentials)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    pub user: Option<User>,
    pub loading: bool,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn loading() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }

    pub fn signed_in(user: User) -> Self {
        Self {
            user: Some(user),
            loading: false,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    pub fn login(&mut self, directory: &UserDirectory, username: &str) -> Result<User, SpotlessError> {
        let user = directory.authenticate(username)?;
        info!("Signed in as {} ({})", user.username, user.role.as_str());
        *self = Session::signed_in(user.clone());
        Ok(user)
    }

    pub fn logout(&mut self) {
        if let Some(user) = &self.user {
            info!("Signed out {}", user.username);
        }
        *self = Session::anonymous();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    AdminDashboard,
    Cleaners,
    Customers,
    Agencies,
    Services,
    Invoices,
    CleanerDashboard,
    CleanerSchedule,
    CleanerServices,
    CustomerDashboard,
    CustomerServices,
    CustomerInvoices,
    Settings,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::AdminDashboard => "/admin",
            Route::Cleaners => "/cleaners",
            Route::Customers => "/customers",
            Route::Agencies => "/agencies",
            Route::Services => "/services",
            Route::Invoices => "/invoices",
            Route::CleanerDashboard => "/cleaner",
            Route::CleanerSchedule => "/cleaner/schedule",
            Route::CleanerServices => "/cleaner/services",
            Route::CustomerDashboard => "/customer",
            Route::CustomerServices => "/customer/services",
            Route::CustomerInvoices => "/customer/invoices",
            Route::Settings => "/settings",
        }
    }

    /// `None` for routes any signed in user may open.
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Route::Login | Route::Settings => None,
            Route::AdminDashboard
            | Route::Cleaners
            | Route::Customers
            | Route::Agencies
            | Route::Services
            | Route::Invoices => Some(Role::Admin),
            Route::CleanerDashboard | Route::CleanerSchedule | Route::CleanerServices => {
                Some(Role::Cleaner)
            }
            Route::CustomerDashboard | Route::CustomerServices | Route::CustomerInvoices => {
                Some(Role::Customer)
            }
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Sign in",
            Route::AdminDashboard | Route::CleanerDashboard | Route::CustomerDashboard => {
                "Dashboard"
            }
            Route::Cleaners => "Cleaners",
            Route::Customers => "Customers",
            Route::Agencies => "Agencies",
            Route::Services => "Services",
            Route::Invoices | Route::CustomerInvoices => "Invoices",
            Route::CleanerSchedule => "My Schedule",
            Route::CleanerServices | Route::CustomerServices => "My Services",
            Route::Settings => "Settings",
        }
    }
}

pub fn home_for(role: Role) -> Route {
    match role {
        Role::Admin => Route::AdminDashboard,
        Role::Cleaner => Route::CleanerDashboard,
        Role::Customer | Role::Agency => Route::CustomerDashboard,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Loading,
    RedirectToLogin,
    Redirect(Route),
    Granted,
}

pub fn authorize(session: &Session, route: Route) -> Access {
    if session.loading {
        return Access::Loading;
    }
    if route == Route::Login {
        return Access::Granted;
    }
    let Some(user) = &session.user else {
        return Access::RedirectToLogin;
    };
    match route.required_role() {
        Some(required) if !user.role.satisfies(required) => {
            debug!(
                "{} may not open {}, redirecting",
                user.role.as_str(),
                route.path()
            );
            Access::Redirect(home_for(user.role))
        }
        _ => Access::Granted,
    }
}

/// Sidebar entries for a role, in display order.
pub fn nav_links(role: Role) -> Vec<Route> {
    let mut links = match role {
        Role::Admin => vec![
            Route::AdminDashboard,
            Route::Cleaners,
            Route::Customers,
            Route::Agencies,
            Route::Services,
            Route::Invoices,
        ],
        Role::Cleaner => vec![
            Route::CleanerDashboard,
            Route::CleanerSchedule,
            Route::CleanerServices,
        ],
        Role::Customer | Role::Agency => vec![
            Route::CustomerDashboard,
            Route::CustomerServices,
            Route::CustomerInvoices,
        ],
    };
    links.push(Route::Settings);
    links
}
