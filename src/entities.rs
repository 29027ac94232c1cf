//! Domain entities, the built-in mock catalogue and the column sets of
//! the entity pages.

use std::sync::Arc;

use crate::auth::{Role, Route, User};
use crate::grid::value::parse_date;
use crate::grid::{ColumnDescriptor, Record, Value, ValueKind, format_currency};

#[derive(Debug, Clone)]
pub struct Cleaner {
    pub id: u32,
    pub title: String,
    pub first_name: String,
    pub sure_name: String,
    pub email: String,
    pub mobile_phone: String,
    pub address_line: String,
    pub city: String,
    pub post_code: String,
    pub is_active: bool,
    pub rate: f64,
    pub register_date: String,
    pub gender: String,
}

#[derive(Debug, Clone)]
pub struct Customer {
    pub id: u32,
    pub title: String,
    pub first_name: String,
    pub sure_name: String,
    pub email: String,
    pub mobile_phone: String,
    pub address_line: String,
    pub city: String,
    pub post_code: String,
    pub rate: f64,
}

#[derive(Debug, Clone)]
pub struct Agency {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    pub city: String,
    pub post_code: String,
    pub rate: f64,
}

#[derive(Debug, Clone)]
pub struct Service {
    pub id: String,
    pub customer_id: Option<u32>,
    pub agency_id: Option<u32>,
    pub agency_staff_id: Option<u32>,
    pub ref_no: Option<String>,
    pub rate: f64,
    pub address_line: String,
    pub city: String,
    pub post_code: String,
    pub beds: u32,
    pub kitchen: u32,
    pub bathroom: u32,
    pub pet: bool,
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceStatus {
    Sent,
    Paid,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Sent => "Sent",
            InvoiceStatus::Paid => "Paid",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Invoice {
    pub id: String,
    pub service_record_id: String,
    pub invoice_number: String,
    pub customer_id: Option<u32>,
    pub agency_id: Option<u32>,
    pub agency_staff_id: Option<u32>,
    pub pdf_path: String,
    pub total: f64,
    pub status: InvoiceStatus,
    pub sent_date: String,
    pub paid_date: Option<String>,
}

fn date_value(s: &str) -> Value {
    parse_date(s).unwrap_or_else(|| Value::text(s))
}

impl From<&Cleaner> for Record {
    fn from(c: &Cleaner) -> Self {
        Record::new()
            .with("id", c.id)
            .with("title", c.title.as_str())
            .with("first_name", c.first_name.as_str())
            .with("sure_name", c.sure_name.as_str())
            .with("email", c.email.as_str())
            .with("mobile_phone", c.mobile_phone.as_str())
            .with("address_line", c.address_line.as_str())
            .with("city", c.city.as_str())
            .with("post_code", c.post_code.as_str())
            .with("is_active", c.is_active)
            .with("rate", c.rate)
            .with("register_date", date_value(&c.register_date))
            .with("gender", c.gender.as_str())
    }
}

impl From<&Customer> for Record {
    fn from(c: &Customer) -> Self {
        Record::new()
            .with("id", c.id)
            .with("title", c.title.as_str())
            .with("first_name", c.first_name.as_str())
            .with("sure_name", c.sure_name.as_str())
            .with("email", c.email.as_str())
            .with("mobile_phone", c.mobile_phone.as_str())
            .with("address_line", c.address_line.as_str())
            .with("city", c.city.as_str())
            .with("post_code", c.post_code.as_str())
            .with("rate", c.rate)
    }
}

impl From<&Agency> for Record {
    fn from(a: &Agency) -> Self {
        Record::new()
            .with("id", a.id)
            .with("name", a.name.as_str())
            .with("email", a.email.as_str())
            .with("phone_number", a.phone_number.as_str())
            .with("address", a.address.as_str())
            .with("city", a.city.as_str())
            .with("post_code", a.post_code.as_str())
            .with("rate", a.rate)
    }
}

impl From<&Service> for Record {
    fn from(s: &Service) -> Self {
        Record::new()
            .with("id", s.id.as_str())
            .with("customer_id", s.customer_id)
            .with("agency_id", s.agency_id)
            .with("agency_staff_id", s.agency_staff_id)
            .with("ref_no", s.ref_no.clone())
            .with("rate", s.rate)
            .with("address_line", s.address_line.as_str())
            .with("city", s.city.as_str())
            .with("post_code", s.post_code.as_str())
            .with("beds", s.beds)
            .with("kitchen", s.kitchen)
            .with("bathroom", s.bathroom)
            .with("pet", s.pet)
            .with("is_active", s.is_active)
    }
}

impl From<&Invoice> for Record {
    fn from(i: &Invoice) -> Self {
        Record::new()
            .with("id", i.id.as_str())
            .with("service_record_id", i.service_record_id.as_str())
            .with("invoice_number", i.invoice_number.as_str())
            .with("customer_id", i.customer_id)
            .with("agency_id", i.agency_id)
            .with("agency_staff_id", i.agency_staff_id)
            .with("pdf_path", i.pdf_path.as_str())
            .with("total", i.total)
            .with("status", i.status.as_str())
            .with("sent_date", date_value(&i.sent_date))
            .with(
                "paid_date",
                i.paid_date.as_deref().map(date_value).unwrap_or(Value::Empty),
            )
    }
}

/// Which table a record list belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Cleaners,
    Customers,
    Agencies,
    Services,
    Invoices,
}

impl EntityKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cleaners" | "cleaner" => Some(EntityKind::Cleaners),
            "customers" | "customer" => Some(EntityKind::Customers),
            "agencies" | "agency" => Some(EntityKind::Agencies),
            "services" | "service" => Some(EntityKind::Services),
            "invoices" | "invoice" => Some(EntityKind::Invoices),
            _ => None,
        }
    }

    pub fn columns(&self) -> Vec<ColumnDescriptor> {
        match self {
            EntityKind::Cleaners => cleaner_columns(),
            EntityKind::Customers => customer_columns(),
            EntityKind::Agencies => agency_columns(),
            EntityKind::Services => service_columns(),
            EntityKind::Invoices => invoice_columns(),
        }
    }
}

/// Shared, read-only record lists of every entity.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub cleaners: Arc<Vec<Record>>,
    pub customers: Arc<Vec<Record>>,
    pub agencies: Arc<Vec<Record>>,
    pub services: Arc<Vec<Record>>,
    pub invoices: Arc<Vec<Record>>,
}

fn to_records<'a, T: 'a>(items: impl IntoIterator<Item = &'a T>) -> Arc<Vec<Record>>
where
    Record: From<&'a T>,
{
    Arc::new(items.into_iter().map(Record::from).collect())
}

impl Catalog {
    pub fn mock() -> Self {
        Self {
            cleaners: to_records(&mock_cleaners()),
            customers: to_records(&mock_customers()),
            agencies: to_records(&mock_agencies()),
            services: to_records(&mock_services()),
            invoices: to_records(&mock_invoices()),
        }
    }

    pub fn get(&self, kind: EntityKind) -> &Arc<Vec<Record>> {
        match kind {
            EntityKind::Cleaners => &self.cleaners,
            EntityKind::Customers => &self.customers,
            EntityKind::Agencies => &self.agencies,
            EntityKind::Services => &self.services,
            EntityKind::Invoices => &self.invoices,
        }
    }

    pub fn set(&mut self, kind: EntityKind, records: Arc<Vec<Record>>) {
        match kind {
            EntityKind::Cleaners => self.cleaners = records,
            EntityKind::Customers => self.customers = records,
            EntityKind::Agencies => self.agencies = records,
            EntityKind::Services => self.services = records,
            EntityKind::Invoices => self.invoices = records,
        }
    }

    /// Records of `kind` that a customer or agency user owns.
    pub fn owned_by(&self, kind: EntityKind, user: &User) -> Arc<Vec<Record>> {
        let owner_field = match user.role {
            Role::Customer => "customer_id",
            Role::Agency => "agency_id",
            Role::Admin | Role::Cleaner => return Arc::clone(self.get(kind)),
        };
        let owner = Value::Number(user.user_id as f64);
        Arc::new(
            self.get(kind)
                .iter()
                .filter(|r| r.get(owner_field) == Some(&owner))
                .cloned()
                .collect(),
        )
    }

    pub fn active_services(&self) -> Arc<Vec<Record>> {
        Arc::new(
            self.services
                .iter()
                .filter(|r| r.get("is_active") == Some(&Value::Bool(true)))
                .cloned()
                .collect(),
        )
    }

    /// The table a route shows for `user`, if it is a table page.
    pub fn table_for(&self, route: Route, user: &User) -> Option<(EntityKind, Arc<Vec<Record>>)> {
        let table = match route {
            Route::Cleaners => (EntityKind::Cleaners, Arc::clone(&self.cleaners)),
            Route::Customers => (EntityKind::Customers, Arc::clone(&self.customers)),
            Route::Agencies => (EntityKind::Agencies, Arc::clone(&self.agencies)),
            Route::Services | Route::CleanerServices => {
                (EntityKind::Services, Arc::clone(&self.services))
            }
            Route::Invoices => (EntityKind::Invoices, Arc::clone(&self.invoices)),
            Route::CleanerSchedule => (EntityKind::Services, self.active_services()),
            Route::CustomerServices => (
                EntityKind::Services,
                self.owned_by(EntityKind::Services, user),
            ),
            Route::CustomerInvoices => (
                EntityKind::Invoices,
                self.owned_by(EntityKind::Invoices, user),
            ),
            Route::Login
            | Route::AdminDashboard
            | Route::CleanerDashboard
            | Route::CustomerDashboard
            | Route::Settings => return None,
        };
        Some(table)
    }
}

fn text_of(record: &Record, field: &str) -> String {
    record.get(field).map(|v| v.to_string()).unwrap_or_default()
}

fn joined(record: &Record, fields: &[&str], sep: &str) -> Value {
    let parts: Vec<String> = fields
        .iter()
        .map(|f| text_of(record, f))
        .filter(|s| !s.is_empty())
        .collect();
    Value::Text(parts.join(sep))
}

fn active_label(value: &Value) -> String {
    match value {
        Value::Bool(true) => "Active".to_string(),
        Value::Bool(false) => "Inactive".to_string(),
        other => other.to_string(),
    }
}

fn date_only(value: &Value) -> String {
    match value {
        Value::DateTime(dt) => dt.date().format("%d/%m/%Y").to_string(),
        Value::Date(d) => d.format("%d/%m/%Y").to_string(),
        other => other.to_string(),
    }
}

pub fn cleaner_columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::by_name("ID", "id", ValueKind::Number).sortable(true),
        ColumnDescriptor::derived("Name", ValueKind::Text, |r| {
            joined(r, &["title", "first_name", "sure_name"], " ")
        })
        .sortable(true),
        ColumnDescriptor::by_name("Email", "email", ValueKind::Text),
        ColumnDescriptor::by_name("Contact", "mobile_phone", ValueKind::Text).sortable(true),
        ColumnDescriptor::derived("Location", ValueKind::Text, |r| {
            joined(r, &["city", "post_code"], ", ")
        }),
        ColumnDescriptor::by_name("Rate", "rate", ValueKind::Number)
            .sortable(true)
            .with_format(format_currency),
        ColumnDescriptor::by_name("Status", "is_active", ValueKind::Bool)
            .sortable(true)
            .with_format(active_label),
    ]
}

pub fn customer_columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::by_name("ID", "id", ValueKind::Number).sortable(true),
        ColumnDescriptor::derived("Name", ValueKind::Text, |r| {
            joined(r, &["title", "first_name", "sure_name"], " ")
        })
        .sortable(true),
        ColumnDescriptor::by_name("Email", "email", ValueKind::Text).sortable(true),
        ColumnDescriptor::by_name("Phone", "mobile_phone", ValueKind::Text),
        ColumnDescriptor::derived("Address", ValueKind::Text, |r| {
            joined(r, &["address_line", "city", "post_code"], ", ")
        }),
        ColumnDescriptor::by_name("Rate", "rate", ValueKind::Number)
            .sortable(true)
            .with_format(format_currency),
    ]
}

pub fn agency_columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::by_name("ID", "id", ValueKind::Number).sortable(true),
        ColumnDescriptor::by_name("Agency Name", "name", ValueKind::Text).sortable(true),
        ColumnDescriptor::by_name("Email", "email", ValueKind::Text),
        ColumnDescriptor::by_name("Phone", "phone_number", ValueKind::Text),
        ColumnDescriptor::derived("Address", ValueKind::Text, |r| {
            joined(r, &["address", "city", "post_code"], ", ")
        }),
        ColumnDescriptor::by_name("Rate", "rate", ValueKind::Number)
            .sortable(true)
            .with_format(format_currency),
    ]
}

pub fn service_columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::by_name("Ref", "ref_no", ValueKind::Text).sortable(true),
        ColumnDescriptor::derived("Address", ValueKind::Text, |r| {
            joined(r, &["address_line", "city", "post_code"], ", ")
        }),
        ColumnDescriptor::by_name("Beds", "beds", ValueKind::Number).sortable(true),
        ColumnDescriptor::by_name("Kitchen", "kitchen", ValueKind::Number),
        ColumnDescriptor::by_name("Bathroom", "bathroom", ValueKind::Number),
        ColumnDescriptor::by_name("Pet", "pet", ValueKind::Bool).with_format(|v| match v {
            Value::Bool(true) => "Yes".to_string(),
            Value::Bool(false) => "No".to_string(),
            other => other.to_string(),
        }),
        ColumnDescriptor::by_name("Rate", "rate", ValueKind::Number)
            .sortable(true)
            .with_format(format_currency),
        ColumnDescriptor::by_name("Status", "is_active", ValueKind::Bool)
            .sortable(true)
            .with_format(active_label),
    ]
}

pub fn invoice_columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::by_name("Invoice #", "invoice_number", ValueKind::Text).sortable(true),
        ColumnDescriptor::by_name("Date", "sent_date", ValueKind::Date)
            .sortable(true)
            .with_format(date_only),
        ColumnDescriptor::by_name("Amount", "total", ValueKind::Number)
            .sortable(true)
            .with_format(format_currency),
        ColumnDescriptor::by_name("Status", "status", ValueKind::Text).sortable(true),
        ColumnDescriptor::derived("Payment Date", ValueKind::Date, |r| {
            r.get("paid_date").cloned().unwrap_or(Value::Empty)
        })
        .with_format(date_only),
    ]
}

#[allow(clippy::too_many_arguments)]
fn cleaner(
    id: u32,
    title: &str,
    first_name: &str,
    sure_name: &str,
    mobile_phone: &str,
    address_line: &str,
    city: &str,
    post_code: &str,
    is_active: bool,
    rate: f64,
    register_date: &str,
    gender: &str,
) -> Cleaner {
    Cleaner {
        id,
        title: title.into(),
        first_name: first_name.into(),
        sure_name: sure_name.into(),
        email: format!(
            "{}.{}@example.com",
            first_name.to_lowercase(),
            sure_name.to_lowercase()
        ),
        mobile_phone: mobile_phone.into(),
        address_line: address_line.into(),
        city: city.into(),
        post_code: post_code.into(),
        is_active,
        rate,
        register_date: register_date.into(),
        gender: gender.into(),
    }
}

pub fn mock_cleaners() -> Vec<Cleaner> {
    vec![
        cleaner(2, "Mr", "John", "Smith", "07123456789", "123 Baker Street", "London", "W1U 6TY", true, 15.50, "2023-05-14", "Male"),
        cleaner(3, "Ms", "Maria", "Garcia", "07987654321", "45 High Street", "Manchester", "M1 1AE", true, 16.00, "2023-06-22", "Female"),
        cleaner(6, "Mrs", "Ana", "Rodriguez", "07555123456", "78 Park Lane", "Birmingham", "B1 1AA", false, 15.00, "2023-03-10", "Female"),
        cleaner(7, "Mr", "Michael", "Johnson", "07444987654", "15 Queen Street", "Edinburgh", "EH2 1JX", true, 16.50, "2023-08-05", "Male"),
        cleaner(8, "Ms", "Priya", "Patel", "07700900123", "9 Mill Road", "Leicester", "LE1 5FQ", true, 14.75, "2023-09-18", "Female"),
        cleaner(9, "Mr", "Tomasz", "Nowak", "07700900456", "31 Church Street", "Liverpool", "L1 3AY", true, 15.25, "2023-10-02", "Male"),
        cleaner(10, "Mrs", "Grace", "Okafor", "07700900789", "4 Station Road", "Leeds", "LS1 4DY", false, 14.50, "2023-11-11", "Female"),
        cleaner(11, "Mr", "Liam", "Murphy", "07700900321", "60 Castle Street", "Cardiff", "CF10 1BT", true, 17.00, "2024-01-08", "Male"),
        cleaner(12, "Ms", "Sofia", "Rossi", "07700900654", "12 King Street", "Bristol", "BS1 4EF", true, 16.25, "2024-02-19", "Female"),
        cleaner(13, "Mr", "David", "Brown", "07700900987", "88 Victoria Road", "Glasgow", "G2 1DU", true, 15.75, "2024-03-27", "Male"),
        cleaner(14, "Mrs", "Fatima", "Khan", "07700900111", "5 Market Place", "Sheffield", "S1 2GH", true, 14.00, "2024-04-30", "Female"),
        cleaner(15, "Mr", "Oliver", "Wilson", "07700900222", "22 Bridge Street", "Newcastle", "NE1 8AQ", false, 17.25, "2024-05-21", "Male"),
    ]
}

pub fn mock_customers() -> Vec<Customer> {
    let customer = |id, title: &str, first: &str, last: &str, phone: &str, address: &str, city: &str, post_code: &str, rate| Customer {
        id,
        title: title.into(),
        first_name: first.into(),
        sure_name: last.into(),
        email: format!("{}.{}@example.com", first.to_lowercase(), last.to_lowercase()),
        mobile_phone: phone.into(),
        address_line: address.into(),
        city: city.into(),
        post_code: post_code.into(),
        rate,
    };
    vec![
        customer(4, "Ms", "Jane", "Doe", "07111222333", "10 Downing Lane", "London", "SW1A 2AA", 20.00),
        customer(16, "Mr", "Robert", "Taylor", "07222333444", "3 Elm Grove", "Oxford", "OX1 2JD", 18.50),
        customer(17, "Mrs", "Emily", "Clark", "07333444555", "77 Harbour Way", "Brighton", "BN1 1AA", 22.00),
        customer(18, "Dr", "Samuel", "Lee", "07444555666", "19 College Road", "Cambridge", "CB2 1TN", 19.75),
    ]
}

pub fn mock_agencies() -> Vec<Agency> {
    let agency = |id, name: &str, email: &str, phone: &str, address: &str, city: &str, post_code: &str, rate| Agency {
        id,
        name: name.into(),
        email: email.into(),
        phone_number: phone.into(),
        address: address.into(),
        city: city.into(),
        post_code: post_code.into(),
        rate,
    };
    vec![
        agency(5, "CleanCo Lettings", "office@cleanco.example.com", "02079460000", "1 Canary Wharf", "London", "E14 5AB", 17.50),
        agency(19, "Northern Homes", "hello@northernhomes.example.com", "01619460111", "25 Deansgate", "Manchester", "M3 4LQ", 16.75),
        agency(20, "Harbour Stays", "stay@harbour.example.com", "01179460222", "8 Welsh Back", "Bristol", "BS1 4SP", 18.25),
    ]
}

pub fn mock_services() -> Vec<Service> {
    #[allow(clippy::too_many_arguments)]
    fn service(
        id: &str,
        customer_id: Option<u32>,
        agency_id: Option<u32>,
        ref_no: &str,
        rate: f64,
        address_line: &str,
        city: &str,
        post_code: &str,
        beds: u32,
        pet: bool,
        is_active: bool,
    ) -> Service {
        Service {
            id: id.into(),
            customer_id,
            agency_id,
            agency_staff_id: agency_id.map(|_| 1),
            ref_no: Some(ref_no.into()),
            rate,
            address_line: address_line.into(),
            city: city.into(),
            post_code: post_code.into(),
            beds,
            kitchen: 1,
            bathroom: beds.div_ceil(2),
            pet,
            is_active,
        }
    }
    vec![
        service("s-001", Some(4), None, "REF-1001", 20.00, "10 Downing Lane", "London", "SW1A 2AA", 3, true, true),
        service("s-002", None, Some(5), "REF-1002", 17.50, "Flat 4, 1 Canary Wharf", "London", "E14 5AB", 2, false, true),
        service("s-003", Some(16), None, "REF-1003", 18.50, "3 Elm Grove", "Oxford", "OX1 2JD", 4, false, false),
        service("s-004", None, Some(5), "REF-1004", 17.50, "Flat 9, 1 Canary Wharf", "London", "E14 5AB", 1, true, true),
        service("s-005", Some(17), None, "REF-1005", 22.00, "77 Harbour Way", "Brighton", "BN1 1AA", 5, true, true),
        service("s-006", None, Some(19), "REF-1006", 16.75, "25 Deansgate", "Manchester", "M3 4LQ", 2, false, true),
    ]
}

pub fn mock_invoices() -> Vec<Invoice> {
    #[allow(clippy::too_many_arguments)]
    fn invoice(
        id: &str,
        number: &str,
        customer_id: Option<u32>,
        agency_id: Option<u32>,
        total: f64,
        status: InvoiceStatus,
        sent_date: &str,
        paid_date: Option<&str>,
    ) -> Invoice {
        Invoice {
            id: id.into(),
            service_record_id: format!("sr-{id:0>3}"),
            invoice_number: number.into(),
            customer_id,
            agency_id,
            agency_staff_id: agency_id.map(|_| 1),
            pdf_path: format!("/invoices/{number}.pdf"),
            total,
            status,
            sent_date: sent_date.into(),
            paid_date: paid_date.map(Into::into),
        }
    }
    vec![
        invoice("1", "001-0001-0225", Some(4), None, 120.00, InvoiceStatus::Sent, "2025-02-01T10:00:00", None),
        invoice("2", "002-0002-0225", None, Some(5), 250.00, InvoiceStatus::Paid, "2025-02-02T11:00:00", Some("2025-02-03T14:30:00")),
        invoice("3", "003-0003-0225", Some(16), None, 95.50, InvoiceStatus::Paid, "2025-02-05T09:15:00", Some("2025-02-10T08:00:00")),
        invoice("4", "004-0004-0325", None, Some(5), 180.00, InvoiceStatus::Sent, "2025-03-01T12:00:00", None),
        invoice("5", "005-0005-0325", Some(4), None, 140.00, InvoiceStatus::Paid, "2025-03-04T16:45:00", Some("2025-03-06T10:20:00")),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{GridAction, GridConfig, GridEngine};

    #[test]
    fn mock_cleaners_paginate() {
        let catalog = Catalog::mock();
        assert_eq!(catalog.cleaners.len(), 12);
        let mut engine = GridEngine::new(
            Arc::clone(&catalog.cleaners),
            cleaner_columns(),
            GridConfig::default(),
        );
        assert_eq!(engine.total_pages(), 2);
        engine.dispatch(GridAction::Search("maria".into()));
        let view = engine.view();
        assert_eq!(view.total_filtered_count, 1);
        assert_eq!(engine.columns()[1].render(view.visible_records[0]), "Ms Maria Garcia");
    }

    #[test]
    fn cleaner_columns_render_formatted_values() {
        let records = to_records(&mock_cleaners());
        let columns = cleaner_columns();
        let ana = &records[2];
        assert_eq!(columns[4].render(ana), "Birmingham, B1 1AA");
        assert_eq!(columns[5].render(ana), "£15.00");
        assert_eq!(columns[6].render(ana), "Inactive");
    }

    #[test]
    fn invoices_render_dates_and_missing_payment() {
        let records = to_records(&mock_invoices());
        let columns = invoice_columns();
        assert_eq!(columns[1].render(&records[0]), "01/02/2025");
        assert_eq!(columns[4].render(&records[0]), "");
        assert_eq!(columns[4].render(&records[1]), "03/02/2025");
    }

    #[test]
    fn customers_and_agencies_only_see_their_records() {
        let catalog = Catalog::mock();
        let jane = User {
            user_id: 4,
            username: "jane".into(),
            role: Role::Customer,
        };
        let agency = User {
            user_id: 5,
            username: "cleanco".into(),
            role: Role::Agency,
        };
        assert_eq!(catalog.owned_by(EntityKind::Invoices, &jane).len(), 2);
        assert_eq!(catalog.owned_by(EntityKind::Services, &agency).len(), 2);

        let (kind, rows) = catalog.table_for(Route::CustomerInvoices, &agency).unwrap();
        assert_eq!(kind, EntityKind::Invoices);
        assert_eq!(rows.len(), 2);
        assert!(catalog.table_for(Route::AdminDashboard, &jane).is_none());
    }

    #[test]
    fn schedule_shows_active_services_only() {
        let catalog = Catalog::mock();
        assert_eq!(catalog.active_services().len(), 5);
    }

    #[test]
    fn entity_kind_parses_singular_and_plural() {
        assert_eq!(EntityKind::parse("Cleaners"), Some(EntityKind::Cleaners));
        assert_eq!(EntityKind::parse("invoice"), Some(EntityKind::Invoices));
        assert_eq!(EntityKind::parse("schedules"), None);
    }
}
