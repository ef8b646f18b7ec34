//! Filters and their translation into query parameters.
//!
//! A [`Filters`] value maps field names to [`FilterValue`]s in insertion
//! order. [`translate`] turns it into the ordered [`QueryParam`] list the
//! API expects: `session_key=9161`, `speed>=315`, `date<2023-09-16T14:00:00`.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone};
use serde_json::Value;

use openf1_client::security::is_valid_field_name;
use openf1_client::{Error, QueryParam, Result};

/// A comparison operator accepted by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Operator {
    /// All operators, in token order.
    pub const ALL: [Operator; 6] = [
        Operator::Eq,
        Operator::Ne,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
    ];

    /// The wire token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
        }
    }

    /// Parse a wire token.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == token)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.as_str().to_string()
    }
}

/// A scalar filter value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// ISO-8601 text, sent exactly as stored.
    Timestamp(String),
}

impl Literal {
    /// Encode for the query string.
    ///
    /// Floats use the shortest round-trip form (`90.5`, `90`). NaN and
    /// infinities are rejected.
    pub fn encode(&self) -> Result<String> {
        match self {
            Literal::Str(s) | Literal::Timestamp(s) => Ok(s.clone()),
            Literal::Int(i) => Ok(i.to_string()),
            Literal::Float(f) if f.is_finite() => Ok(f.to_string()),
            Literal::Float(f) => Err(Error::config(format!(
                "Filter value {f} is not a finite number"
            ))),
            Literal::Bool(b) => Ok(b.to_string()),
        }
    }

    /// Convert a JSON scalar. Null, arrays and objects are rejected.
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(Literal::Str(s.clone())),
            Value::Bool(b) => Ok(Literal::Bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Literal::Int(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(Literal::Float(f))
                } else {
                    Ok(Literal::Str(n.to_string()))
                }
            }
            Value::Null => Err(Error::config("Null is not a filter value")),
            Value::Array(_) => Err(Error::config("Arrays are not supported as filter values")),
            Value::Object(_) => Err(Error::config(
                "Objects are only supported as operator mappings",
            )),
        }
    }
}

macro_rules! literal_from {
    ($variant:ident: $($ty:ty),+ => $conv:expr) => {
        $(
            impl From<$ty> for Literal {
                fn from(value: $ty) -> Self {
                    Literal::$variant($conv(value))
                }
            }
        )+
    };
}

literal_from!(Str: &str, &String, String => |v: _| String::from(v));
literal_from!(Int: i8, i16, i32, i64, u8, u16, u32 => i64::from);
literal_from!(Float: f64 => f64::from);
literal_from!(Bool: bool => |v| v);

impl From<f32> for Literal {
    /// Goes through the shortest decimal form so `0.1f32` encodes as `0.1`.
    fn from(value: f32) -> Self {
        let widened = value.to_string().parse().unwrap_or(f64::from(value));
        Literal::Float(widened)
    }
}

impl From<NaiveDateTime> for Literal {
    fn from(value: NaiveDateTime) -> Self {
        Literal::Timestamp(value.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
    }
}

impl From<NaiveDate> for Literal {
    fn from(value: NaiveDate) -> Self {
        Literal::Timestamp(value.format("%Y-%m-%d").to_string())
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Literal
where
    Tz::Offset: fmt::Display,
{
    fn from(value: DateTime<Tz>) -> Self {
        Literal::Timestamp(value.to_rfc3339_opts(SecondsFormat::AutoSi, false))
    }
}

/// The constraint placed on one field.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// `field=value`
    Equals(Literal),
    /// `field<op>value` for each entry, in order. Tokens are checked when
    /// the filter is translated.
    Compare(Vec<(String, Literal)>),
    /// No constraint. Emits nothing.
    Absent,
}

impl FilterValue {
    /// An equality constraint.
    pub fn equals(value: impl Into<Literal>) -> Self {
        FilterValue::Equals(value.into())
    }

    /// A comparison constraint from `(token, value)` pairs.
    ///
    /// A repeated token replaces the earlier value in place.
    pub fn compare<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Literal>,
    {
        let mut entries = Vec::new();
        for (token, value) in pairs {
            set_token(&mut entries, token.into(), value.into());
        }
        FilterValue::Compare(entries)
    }

    /// Returns true for [`FilterValue::Absent`].
    pub fn is_absent(&self) -> bool {
        matches!(self, FilterValue::Absent)
    }

    /// Build from JSON: a scalar, `null`, or an object of token to scalar.
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(FilterValue::Absent),
            Value::Object(map) => {
                let mut entries = Vec::with_capacity(map.len());
                for (token, v) in map {
                    let literal = Literal::from_json(v).map_err(|e| {
                        Error::config(format!(
                            "Invalid value for operator '{token}': {}",
                            e.message()
                        ))
                    })?;
                    set_token(&mut entries, token.clone(), literal);
                }
                Ok(FilterValue::Compare(entries))
            }
            other => Literal::from_json(other).map(FilterValue::Equals),
        }
    }
}

pub(crate) fn set_token(entries: &mut Vec<(String, Literal)>, token: String, value: Literal) {
    match entries.iter_mut().find(|(t, _)| *t == token) {
        Some(entry) => entry.1 = value,
        None => entries.push((token, value)),
    }
}

impl From<Literal> for FilterValue {
    fn from(value: Literal) -> Self {
        FilterValue::Equals(value)
    }
}

macro_rules! filter_value_from {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for FilterValue {
                fn from(value: $ty) -> Self {
                    FilterValue::Equals(value.into())
                }
            }

            impl From<Option<$ty>> for FilterValue {
                fn from(value: Option<$ty>) -> Self {
                    value.map_or(FilterValue::Absent, |v| FilterValue::Equals(v.into()))
                }
            }
        )+
    };
}

filter_value_from!(
    &str,
    &String,
    String,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    f32,
    f64,
    bool,
    NaiveDate,
    NaiveDateTime
);

impl<Tz: TimeZone> From<DateTime<Tz>> for FilterValue
where
    Tz::Offset: fmt::Display,
{
    fn from(value: DateTime<Tz>) -> Self {
        FilterValue::Equals(value.into())
    }
}

/// Insertion-ordered field filters.
///
/// Inserting a field that already exists replaces its value and keeps its
/// position.
///
/// # Example
///
/// ```
/// use openf1_rest::{FilterValue, Filters};
///
/// let filters = Filters::new()
///     .with("session_key", 9161)
///     .with("driver_number", 63)
///     .with("speed", FilterValue::compare([(">=", 315)]));
/// assert_eq!(filters.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
    entries: Vec<(String, FilterValue)>,
}

impl Filters {
    /// An empty filter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a field, returning the previous value.
    pub fn insert(
        &mut self,
        field: impl Into<String>,
        value: impl Into<FilterValue>,
    ) -> Option<FilterValue> {
        let field = field.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(f, _)| *f == field) {
            Some(entry) => Some(std::mem::replace(&mut entry.1, value)),
            None => {
                self.entries.push((field, value));
                None
            }
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// The value for a field.
    pub fn get(&self, field: &str) -> Option<&FilterValue> {
        self.entries
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, v)| v)
    }

    pub(crate) fn get_mut(&mut self, field: &str) -> Option<&mut FilterValue> {
        self.entries
            .iter_mut()
            .find(|(f, _)| f == field)
            .map(|(_, v)| v)
    }

    /// Remove a field.
    pub fn remove(&mut self, field: &str) -> Option<FilterValue> {
        let pos = self.entries.iter().position(|(f, _)| f == field)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fields and values in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.entries.iter().map(|(f, v)| (f.as_str(), v))
    }

    /// Build from a JSON object.
    ///
    /// Values may be scalars (equality), `null` (no filter) or objects of
    /// operator token to scalar. Arrays and nested objects are rejected.
    pub fn from_json(value: &Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(Error::config("Filters must be a JSON object"));
        };

        let mut filters = Filters::new();
        for (field, v) in map {
            let filter = FilterValue::from_json(v).map_err(|e| {
                Error::config(format!("Invalid filter for field '{field}': {}", e.message()))
            })?;
            filters.insert(field.clone(), filter);
        }
        Ok(filters)
    }

    /// Translate into query parameters. See [`translate`].
    pub fn to_params(&self) -> Result<Vec<QueryParam>> {
        translate(self)
    }
}

impl<K, V> FromIterator<(K, V)> for Filters
where
    K: Into<String>,
    V: Into<FilterValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut filters = Filters::new();
        filters.extend(iter);
        filters
    }
}

impl<K, V> Extend<(K, V)> for Filters
where
    K: Into<String>,
    V: Into<FilterValue>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (field, value) in iter {
            self.insert(field, value);
        }
    }
}

/// Translate filters into ordered query parameters.
///
/// Parameters follow the insertion order of `filters`, then token order
/// within a comparison. The `=` token emits a plain equality parameter.
/// Invalid field names, unknown tokens and non-finite floats are `Config`
/// errors.
pub fn translate(filters: &Filters) -> Result<Vec<QueryParam>> {
    let mut params = Vec::with_capacity(filters.len());

    for (field, value) in filters.iter() {
        if !is_valid_field_name(field) {
            return Err(Error::config(format!("Invalid filter field name: '{field}'")));
        }

        match value {
            FilterValue::Absent => {}
            FilterValue::Equals(literal) => {
                params.push(QueryParam::new(field, literal.encode()?));
            }
            FilterValue::Compare(entries) => {
                for (token, literal) in entries {
                    let op = Operator::from_token(token).ok_or_else(|| {
                        Error::config(format!(
                            "Unknown comparison operator '{token}' for field '{field}'"
                        ))
                    })?;
                    let name = match op {
                        Operator::Eq => field.to_string(),
                        op => format!("{field}{op}"),
                    };
                    params.push(QueryParam::new(name, literal.encode()?));
                }
            }
        }
    }

    Ok(params)
}
