use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use super::record::Record;
use super::value::{Value, ValueKind};

pub type Derivation = Arc<dyn Fn(&Record) -> Value + Send + Sync>;
pub type Formatter = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// How a column reads its value out of a record.
#[derive(Clone)]
pub enum FieldAccessor {
    ByName(String),
    Derived(Derivation),
}

impl FieldAccessor {
    /// Must be total over the record shape handed to the grid. A field
    /// missing from the record reads as `Value::Empty`.
    pub fn value_of<'a>(&self, record: &'a Record) -> Cow<'a, Value> {
        match self {
            FieldAccessor::ByName(name) => match record.get(name) {
                Some(v) => Cow::Borrowed(v),
                None => Cow::Owned(Value::Empty),
            },
            FieldAccessor::Derived(f) => Cow::Owned(f(record)),
        }
    }
}

impl fmt::Debug for FieldAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldAccessor::ByName(name) => f.debug_tuple("ByName").field(name).finish(),
            FieldAccessor::Derived(_) => f.write_str("Derived(..)"),
        }
    }
}

/// Label, accessor and sort metadata of one table column.
#[derive(Clone)]
pub struct ColumnDescriptor {
    pub label: String,
    pub accessor: FieldAccessor,
    pub sortable: bool,
    pub kind: ValueKind,
    format: Option<Formatter>,
}

impl ColumnDescriptor {
    pub fn by_name(label: impl Into<String>, field: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            label: label.into(),
            accessor: FieldAccessor::ByName(field.into()),
            sortable: false,
            kind,
            format: None,
        }
    }

    pub fn derived<F>(label: impl Into<String>, kind: ValueKind, f: F) -> Self
    where
        F: Fn(&Record) -> Value + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            accessor: FieldAccessor::Derived(Arc::new(f)),
            sortable: false,
            kind,
            format: None,
        }
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    /// Display formatting only; sorting and searching never see it.
    pub fn with_format<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.format = Some(Arc::new(f));
        self
    }

    pub fn value_of<'a>(&self, record: &'a Record) -> Cow<'a, Value> {
        self.accessor.value_of(record)
    }

    /// The value coerced to the column's declared kind.
    pub fn sort_key(&self, record: &Record) -> Value {
        let value = self.value_of(record);
        value.coerce(self.kind).into_owned()
    }

    pub fn render(&self, record: &Record) -> String {
        let value = self.value_of(record);
        match &self.format {
            Some(f) if !value.is_empty() => f(&value),
            _ => value.to_string(),
        }
    }
}

impl fmt::Debug for ColumnDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("label", &self.label)
            .field("accessor", &self.accessor)
            .field("sortable", &self.sortable)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Formats a number as pounds with two decimals.
pub fn format_currency(value: &Value) -> String {
    match value {
        Value::Number(n) => format!("£{n:.2}"),
        other => other.to_string(),
    }
}
