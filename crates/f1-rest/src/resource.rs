//! Generic endpoint accessor.
//!
//! A [`Resource`] pairs an endpoint path with a [`RecordDecoder`] and offers
//! the same operations on every endpoint: `list`, `first`, `list_raw`,
//! `list_csv`, `list_csv_parsed` and `count`.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument};

use openf1_client::{
    Error, ErrorKind, RawResponse, RequestDescriptor, ResponseFormat, Result, Transport,
};

use crate::filter::{translate, Filters};

/// Decodes one JSON element into a record.
pub trait RecordDecoder<T>: Send + Sync {
    fn decode(&self, value: Value) -> Result<T>;
}

/// Decoder backed by `serde::Deserialize`.
pub struct SerdeDecoder<T>(PhantomData<fn() -> T>);

impl<T> SerdeDecoder<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for SerdeDecoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for SerdeDecoder<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for SerdeDecoder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SerdeDecoder<{}>", short_type_name::<T>())
    }
}

impl<T: DeserializeOwned> RecordDecoder<T> for SerdeDecoder<T> {
    fn decode(&self, value: Value) -> Result<T> {
        serde_json::from_value(value).map_err(|err| {
            let field = field_of(&err.to_string());
            Error::with_source(ErrorKind::Validation { index: None, field }, err.to_string(), err)
        })
    }
}

impl<T, F> RecordDecoder<T> for F
where
    F: Fn(Value) -> Result<T> + Send + Sync,
{
    fn decode(&self, value: Value) -> Result<T> {
        self(value)
    }
}

/// A response in either format.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Vec<Value>),
    Csv(String),
}

/// One CSV row: column name to value, in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvRow {
    columns: Vec<(String, String)>,
}

impl CsvRow {
    /// The value of a column.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Columns in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Header names in order.
    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(k, _)| k.as_str())
    }
}

/// Parse CSV text with a header row.
///
/// A blank body yields no rows. Rows whose length differs from the header
/// are a `Validation` error.
pub fn parse_csv(text: &str) -> Result<Vec<CsvRow>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(str::to_string)
        .collect();

    reader
        .records()
        .map(|record| {
            let record = record.map_err(csv_error)?;
            Ok(CsvRow {
                columns: headers
                    .iter()
                    .cloned()
                    .zip(record.iter().map(str::to_string))
                    .collect(),
            })
        })
        .collect()
}

fn csv_error(err: csv::Error) -> Error {
    let index = err
        .position()
        .and_then(|pos| usize::try_from(pos.record()).ok())
        .map(|record| record.saturating_sub(1));
    Error::with_source(
        ErrorKind::Validation { index, field: None },
        format!("Malformed CSV response: {err}"),
        err,
    )
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Field named in a serde error message, if any.
fn field_of(message: &str) -> Option<String> {
    ["missing field `", "unknown field `", "duplicate field `"]
        .iter()
        .find_map(|marker| {
            let start = message.find(marker)? + marker.len();
            let len = message[start..].find('`')?;
            Some(message[start..start + len].to_string())
        })
}

/// Operations shared by every endpoint.
///
/// Stateless apart from the shared transport, so a resource can be used
/// from several threads at once.
pub struct Resource<T, D = SerdeDecoder<T>> {
    transport: Arc<Transport>,
    path: String,
    default_format: ResponseFormat,
    decoder: D,
    _record: PhantomData<fn() -> T>,
}

impl<T, D> std::fmt::Debug for Resource<T, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resource")
            .field("path", &self.path)
            .field("record", &short_type_name::<T>())
            .field("default_format", &self.default_format)
            .finish_non_exhaustive()
    }
}

impl<T, D: Clone> Clone for Resource<T, D> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            path: self.path.clone(),
            default_format: self.default_format,
            decoder: self.decoder.clone(),
            _record: PhantomData,
        }
    }
}

impl<T: DeserializeOwned> Resource<T> {
    /// A resource decoding records with serde.
    pub fn new(transport: Arc<Transport>, path: impl Into<String>) -> Self {
        Self::with_decoder(transport, path, SerdeDecoder::new())
    }
}

impl<T, D: RecordDecoder<T>> Resource<T, D> {
    /// A resource with a custom decoder.
    pub fn with_decoder(transport: Arc<Transport>, path: impl Into<String>, decoder: D) -> Self {
        Self {
            transport,
            path: path.into(),
            default_format: ResponseFormat::Json,
            decoder,
            _record: PhantomData,
        }
    }

    /// Format used by [`fetch`](Self::fetch) when none is given.
    pub fn with_default_format(mut self, format: ResponseFormat) -> Self {
        self.default_format = format;
        self
    }

    /// The endpoint path.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn transport(&self) -> &Arc<Transport> {
        &self.transport
    }

    fn send(&self, filters: &Filters, format: ResponseFormat) -> Result<RawResponse> {
        let request = RequestDescriptor::get(self.path.clone())
            .with_params(translate(filters)?)
            .with_format(format);
        self.transport.send(&request)
    }

    fn fetch_json(&self, filters: &Filters) -> Result<Vec<Value>> {
        let response = self.send(filters, ResponseFormat::Json)?;
        match response.json::<Value>()? {
            Value::Array(items) => Ok(items),
            other => Err(Error::validation(format!(
                "Expected a JSON array from '{}', got {}",
                self.path,
                json_kind(&other)
            ))
            .with_status(response.status)
            .with_body(&response.text_lossy())),
        }
    }

    /// Decode raw elements, failing on the first bad one.
    pub fn decode(&self, items: Vec<Value>) -> Result<Vec<T>> {
        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                self.decoder
                    .decode(item)
                    .map_err(|err| self.element_error(index, err))
            })
            .collect()
    }

    fn element_error(&self, index: usize, err: Error) -> Error {
        let field = match &err.kind {
            ErrorKind::Validation { field: Some(f), .. } => Some(f.clone()),
            _ => field_of(err.message()),
        };
        let message = format!(
            "Failed to decode {} at element {index}: {}",
            short_type_name::<T>(),
            err.message()
        );
        Error {
            kind: ErrorKind::Validation {
                index: Some(index),
                field,
            },
            envelope: openf1_client::ErrorEnvelope {
                message,
                ..err.envelope.clone()
            },
            source: Some(Box::new(err)),
        }
    }

    /// All matching records, decoded.
    #[instrument(skip(self, filters), fields(resource = %self.path))]
    pub fn list(&self, filters: &Filters) -> Result<Vec<T>> {
        let items = self.fetch_json(filters)?;
        let records = self.decode(items)?;
        debug!(count = records.len(), "Decoded records");
        Ok(records)
    }

    /// The first matching record, or `None` for an empty result.
    pub fn first(&self, filters: &Filters) -> Result<Option<T>> {
        Ok(self.list(filters)?.into_iter().next())
    }

    /// All matching records as untyped JSON.
    #[instrument(skip(self, filters), fields(resource = %self.path))]
    pub fn list_raw(&self, filters: &Filters) -> Result<Vec<Value>> {
        self.fetch_json(filters)
    }

    /// All matching records as CSV text, returned verbatim.
    #[instrument(skip(self, filters), fields(resource = %self.path))]
    pub fn list_csv(&self, filters: &Filters) -> Result<String> {
        self.send(filters, ResponseFormat::Csv)?.text()
    }

    /// CSV records parsed into rows.
    pub fn list_csv_parsed(&self, filters: &Filters) -> Result<Vec<CsvRow>> {
        parse_csv(&self.list_csv(filters)?)
    }

    /// Fetch in `format`, or the resource default, without decoding.
    pub fn fetch(&self, filters: &Filters, format: Option<ResponseFormat>) -> Result<Payload> {
        match format.unwrap_or(self.default_format) {
            ResponseFormat::Json => self.list_raw(filters).map(Payload::Json),
            ResponseFormat::Csv => self.list_csv(filters).map(Payload::Csv),
        }
    }

    /// Number of matching records.
    ///
    /// The API has no count query, so this downloads the records and counts
    /// them without decoding.
    pub fn count(&self, filters: &Filters) -> Result<usize> {
        Ok(self.fetch_json(filters)?.len())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
