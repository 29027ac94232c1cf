//! Role dashboards as a handful of stat cards.

use crate::auth::{Role, User};
use crate::entities::{Catalog, EntityKind};
use crate::grid::{Record, Value, ValueKind, format_currency};

#[derive(Debug, Clone, PartialEq)]
pub struct StatCard {
    pub title: &'static str,
    pub value: String,
}

impl StatCard {
    fn new(title: &'static str, value: impl Into<String>) -> Self {
        Self {
            title,
            value: value.into(),
        }
    }
}

fn is_true(record: &Record, field: &str) -> bool {
    record.get(field) == Some(&Value::Bool(true))
}

fn number(record: &Record, field: &str) -> f64 {
    match record.get(field).map(|v| v.coerce(ValueKind::Number).into_owned()) {
        Some(Value::Number(n)) => n,
        _ => 0.0,
    }
}

fn has_status(record: &Record, status: &str) -> bool {
    matches!(record.get("status"), Some(Value::Text(s)) if s.eq_ignore_ascii_case(status))
}

fn currency(amount: f64) -> String {
    format_currency(&Value::Number(amount))
}

pub fn stat_cards(catalog: &Catalog, user: &User) -> Vec<StatCard> {
    match user.role {
        Role::Admin => {
            let active_cleaners = catalog
                .cleaners
                .iter()
                .filter(|r| is_true(r, "is_active"))
                .count();
            let revenue: f64 = catalog
                .invoices
                .iter()
                .filter(|r| has_status(r, "Paid"))
                .map(|r| number(r, "total"))
                .sum();
            vec![
                StatCard::new("Total Customers", catalog.customers.len().to_string()),
                StatCard::new("Active Cleaners", active_cleaners.to_string()),
                StatCard::new("Partner Agencies", catalog.agencies.len().to_string()),
                StatCard::new("Revenue", currency(revenue)),
            ]
        }
        Role::Cleaner => {
            let active = catalog.active_services();
            let pets = active.iter().filter(|r| is_true(r, "pet")).count();
            let average_rate = if active.is_empty() {
                0.0
            } else {
                active.iter().map(|r| number(r, "rate")).sum::<f64>() / active.len() as f64
            };
            vec![
                StatCard::new("Active Services", active.len().to_string()),
                StatCard::new("Pet-Friendly Jobs", pets.to_string()),
                StatCard::new("Average Rate", currency(average_rate)),
            ]
        }
        Role::Customer | Role::Agency => {
            let services = catalog.owned_by(EntityKind::Services, user);
            let invoices = catalog.owned_by(EntityKind::Invoices, user);
            let open: Vec<&Record> = invoices.iter().filter(|r| has_status(r, "Sent")).collect();
            let outstanding: f64 = open.iter().map(|r| number(r, "total")).sum();
            vec![
                StatCard::new("Services", services.len().to_string()),
                StatCard::new("Open Invoices", open.len().to_string()),
                StatCard::new("Outstanding", currency(outstanding)),
            ]
        }
    }
}
