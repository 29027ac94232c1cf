use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A single cell value of a record.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Empty,
    Bool(bool),
    Number(f64),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Text(String),
}

/// The semantic type a column declares for its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueKind {
    #[default]
    Text,
    Number,
    Bool,
    Date,
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    pub fn kind(&self) -> Option<ValueKind> {
        match self {
            Value::Empty => None,
            Value::Bool(_) => Some(ValueKind::Bool),
            Value::Number(_) => Some(ValueKind::Number),
            Value::Date(_) | Value::DateTime(_) => Some(ValueKind::Date),
            Value::Text(_) => Some(ValueKind::Text),
        }
    }

    // Ordering between values whose types still differ after coercion.
    fn rank(&self) -> u8 {
        match self {
            Value::Empty => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::Date(_) | Value::DateTime(_) => 3,
            Value::Text(_) => 4,
        }
    }

    /// Converts the value into the representation of `kind` where possible.
    ///
    /// Text that parses as the declared kind is converted (`"15.50"` in a
    /// number column becomes `15.5`). Values that cannot be converted are
    /// returned unchanged. Empty stays empty.
    pub fn coerce(&self, kind: ValueKind) -> Cow<'_, Value> {
        match (kind, self) {
            (_, Value::Empty) => Cow::Borrowed(self),
            (ValueKind::Text, Value::Text(_)) => Cow::Borrowed(self),
            (ValueKind::Text, other) => Cow::Owned(Value::Text(other.to_string())),
            (ValueKind::Number, Value::Text(s)) => match s.trim().parse::<f64>() {
                Ok(n) => Cow::Owned(Value::Number(n)),
                Err(_) => Cow::Borrowed(self),
            },
            (ValueKind::Bool, Value::Text(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Cow::Owned(Value::Bool(true)),
                "false" => Cow::Owned(Value::Bool(false)),
                _ => Cow::Borrowed(self),
            },
            (ValueKind::Date, Value::Text(s)) => match parse_date(s) {
                Some(v) => Cow::Owned(v),
                None => Cow::Borrowed(self),
            },
            _ => Cow::Borrowed(self),
        }
    }

    /// Case-insensitive substring test on the value's textual form.
    /// `needle` must already be lowercase.
    pub fn contains_lowercase(&self, needle: &str) -> bool {
        match self {
            Value::Text(s) => s.to_lowercase().contains(needle),
            other => other.to_string().to_lowercase().contains(needle),
        }
    }
}

/// Parses `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SS` (a space separator is accepted too).
pub fn parse_date(s: &str) -> Option<Value> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
        return Some(Value::Date(d));
    }
    NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(Value::DateTime)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Empty => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            Value::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_FORMAT)),
            Value::Text(s) => f.write_str(s),
        }
    }
}

/// Locale-style string collation.
///
/// Letters compare case-insensitively first; on a tie the lowercase form
/// sorts before the uppercase one, then raw code points decide.
pub fn collate(a: &str, b: &str) -> Ordering {
    let folded_a = a.chars().flat_map(char::to_lowercase);
    let folded_b = b.chars().flat_map(char::to_lowercase);
    folded_a
        .cmp(folded_b)
        .then_with(|| {
            a.chars()
                .zip(b.chars())
                .find(|(x, y)| x != y)
                .map(|(x, y)| x.is_uppercase().cmp(&y.is_uppercase()))
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| a.cmp(b))
}

/// Total ordering used by the sort stage.
///
/// Same-typed values use their natural order. Values of different types
/// order by type rank: empty, bool, number, date, text.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Text(x), Value::Text(y)) => collate(x, y),
        (Value::Number(x), Value::Number(y)) => {
            if x == y {
                Ordering::Equal
            } else {
                x.partial_cmp(y)
                    .unwrap_or_else(|| x.is_nan().cmp(&y.is_nan()))
            }
        }
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Date(x), Value::Date(y)) => x.cmp(y),
        (Value::DateTime(x), Value::DateTime(y)) => x.cmp(y),
        (Value::Date(x), Value::DateTime(y)) => x.and_time(NaiveTime::MIN).cmp(y),
        (Value::DateTime(x), Value::Date(y)) => x.cmp(&y.and_time(NaiveTime::MIN)),
        _ => a.rank().cmp(&b.rank()),
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_natural_text_form() {
        assert_eq!(Value::Number(16.0).to_string(), "16");
        assert_eq!(Value::Number(15.5).to_string(), "15.5");
        assert_eq!(Value::Bool(false).to_string(), "false");
        assert_eq!(Value::Empty.to_string(), "");
        let d = NaiveDate::from_ymd_opt(2023, 5, 14).unwrap();
        assert_eq!(Value::Date(d).to_string(), "2023-05-14");
        assert_eq!(
            parse_date("2025-02-01T10:00:00").unwrap().to_string(),
            "2025-02-01T10:00:00"
        );
    }

    #[test]
    fn collate_ignores_case_first() {
        assert_eq!(collate("apple", "Banana"), Ordering::Less);
        assert_eq!(collate("Zed", "alpha"), Ordering::Greater);
        assert_eq!(collate("a", "A"), Ordering::Less);
        assert_eq!(collate("Maria", "Maria"), Ordering::Equal);
        assert_eq!(collate("Ana", "Anabel"), Ordering::Less);
    }

    #[test]
    fn numbers_dates_and_bools_use_natural_order() {
        assert_eq!(compare_values(&Value::Number(2.0), &Value::Number(10.0)), Ordering::Less);
        assert_eq!(compare_values(&true.into(), &false.into()), Ordering::Greater);
        assert_eq!(compare_values(&Value::Number(3.0), &Value::Number(3.0)), Ordering::Equal);
        let early = parse_date("2023-03-10").unwrap();
        let late = parse_date("2023-03-10T08:30:00").unwrap();
        assert_eq!(compare_values(&early, &late), Ordering::Less);
    }

    #[test]
    fn mixed_types_order_by_rank() {
        assert_eq!(compare_values(&Value::Empty, &Value::Number(1.0)), Ordering::Less);
        assert_eq!(compare_values(&"x".into(), &Value::Number(1.0)), Ordering::Greater);
        assert_eq!(compare_values(&true.into(), &Value::Number(0.0)), Ordering::Less);
    }

    #[test]
    fn coerce_parses_text_into_declared_kind() {
        assert_eq!(
            *Value::text(" 15.50 ").coerce(ValueKind::Number),
            Value::Number(15.5)
        );
        assert_eq!(*Value::text("TRUE").coerce(ValueKind::Bool), Value::Bool(true));
        assert_eq!(*Value::text("n/a").coerce(ValueKind::Number), Value::text("n/a"));
        assert_eq!(*Value::Number(3.0).coerce(ValueKind::Text), Value::text("3"));
        assert_eq!(*Value::Empty.coerce(ValueKind::Date), Value::Empty);
    }

    #[test]
    fn contains_is_case_insensitive() {
        assert!(Value::text("Maria").contains_lowercase("mar"));
        assert!(Value::Number(15.5).contains_lowercase("15.5"));
        assert!(Value::Bool(true).contains_lowercase("tru"));
        assert!(!Value::Empty.contains_lowercase("a"));
    }
}
