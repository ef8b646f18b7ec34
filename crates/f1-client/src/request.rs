//! Request descriptors and wire-level query encoding.

use std::fmt;

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    Get,
    Post,
}

impl RequestMethod {
    /// Convert to reqwest::Method.
    pub fn to_reqwest(&self) -> reqwest::Method {
        match self {
            RequestMethod::Get => reqwest::Method::GET,
            RequestMethod::Post => reqwest::Method::POST,
        }
    }

    /// Returns true if repeating the request cannot change server state.
    pub fn is_idempotent(&self) -> bool {
        matches!(self, RequestMethod::Get)
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestMethod::Get => f.write_str("GET"),
            RequestMethod::Post => f.write_str("POST"),
        }
    }
}

/// Body format requested from the API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseFormat {
    #[default]
    Json,
    Csv,
}

impl ResponseFormat {
    /// Value for the `Accept` header.
    pub fn accept(&self) -> &'static str {
        match self {
            ResponseFormat::Json => "application/json",
            ResponseFormat::Csv => "text/csv",
        }
    }
}

impl std::str::FromStr for ResponseFormat {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ResponseFormat::Json),
            "csv" => Ok(ResponseFormat::Csv),
            other => Err(crate::Error::config(format!(
                "default_format must be 'json' or 'csv': {other}"
            ))),
        }
    }
}

/// One query parameter, ready for the wire.
///
/// A comparison parameter carries its operator at the end of the name
/// (`speed>=`); the value follows it directly on the wire (`speed>=315`).
/// Any other name is joined to its value with `=`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParam {
    pub name: String,
    pub value: String,
}

impl QueryParam {
    /// Create a new query parameter.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Returns true if the name ends with a comparison operator.
    pub fn is_comparison(&self) -> bool {
        self.name.ends_with(['=', '<', '>'])
    }

    /// Encode as `name=value` or `name<op>value`.
    ///
    /// The value is percent-encoded. The name is written as is: field names
    /// are validated identifiers and operator characters stay literal.
    pub fn to_wire(&self) -> String {
        let value = urlencoding::encode(&self.value);
        if self.is_comparison() {
            format!("{}{}", self.name, value)
        } else {
            format!("{}={}", self.name, value)
        }
    }
}

/// Everything needed to issue one API request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: RequestMethod,
    /// Resource path segment (`laps`) or an absolute URL.
    pub path: String,
    pub params: Vec<QueryParam>,
    pub format: ResponseFormat,
    /// Form fields for POST requests.
    pub form: Option<Vec<(String, String)>>,
}

impl RequestDescriptor {
    /// Create a GET request for a resource path.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: RequestMethod::Get,
            path: path.into(),
            params: Vec::new(),
            format: ResponseFormat::Json,
            form: None,
        }
    }

    /// Create a form POST to a path or absolute URL.
    pub fn post_form(path: impl Into<String>, form: Vec<(String, String)>) -> Self {
        Self {
            method: RequestMethod::Post,
            path: path.into(),
            params: Vec::new(),
            format: ResponseFormat::Json,
            form: Some(form),
        }
    }

    /// Set the query parameters.
    pub fn with_params(mut self, params: Vec<QueryParam>) -> Self {
        self.params = params;
        self
    }

    /// Set the response format.
    pub fn with_format(mut self, format: ResponseFormat) -> Self {
        self.format = format;
        self
    }

    /// The encoded query string, without the leading `?`.
    pub fn query_string(&self) -> String {
        let mut parts: Vec<String> = self.params.iter().map(QueryParam::to_wire).collect();
        if self.format == ResponseFormat::Csv {
            parts.push("csv=true".to_string());
        }
        parts.join("&")
    }

    /// Resolve the full request URL against `base_url`.
    pub fn url(&self, base_url: &str) -> String {
        let mut url = if self.path.starts_with("http://") || self.path.starts_with("https://") {
            self.path.clone()
        } else {
            format!(
                "{}/{}",
                base_url.trim_end_matches('/'),
                self.path.trim_start_matches('/')
            )
        };

        let query = self.query_string();
        if !query.is_empty() {
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&query);
        }
        url
    }

    /// Form body encoded as `application/x-www-form-urlencoded`.
    pub fn form_body(&self) -> crate::Result<Option<String>> {
        self.form
            .as_ref()
            .map(|fields| {
                serde_urlencoded::to_string(fields).map_err(|e| {
                    crate::Error::with_source(
                        crate::ErrorKind::Config,
                        "Failed to encode form body",
                        e,
                    )
                })
            })
            .transpose()
    }
}
