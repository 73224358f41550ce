// API client module: a small blocking HTTP client that talks to an Apollo
// server. Every remote action goes through `ApiClient::send`, which turns
// an endpoint descriptor plus argument values into one HTTP request and
// hands back the decoded body.

use crate::config::{Auth, Session};
use crate::endpoint::{Endpoint, Method};
use crate::error::TransportError;
use crate::normalize::{self, Filter, Output};
use crate::{Error, Result};
use reqwest::blocking::{multipart, Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::redirect::Policy;
use serde_json::{Map, Value};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Argument values for one request, keyed by the service's parameter name.
/// Values stay as JSON so that strings, booleans, numbers and nested
/// structures all travel through the same map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(Map<String, Value>);

impl Params {
    pub fn new() -> Self {
        Params(Map::new())
    }

    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.0.insert(name.to_string(), value.into());
        self
    }

    /// Like [`Params::with`], skipping the parameter when `value` is `None`.
    pub fn with_opt<V: Into<Value>>(self, name: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.with(name, v),
            None => self,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

/// A file attached to a multipart request under a given form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub field: String,
    pub path: PathBuf,
}

impl Upload {
    pub fn new(field: &str, path: impl Into<PathBuf>) -> Self {
        Upload {
            field: field.to_string(),
            path: path.into(),
        }
    }
}

/// Decoded response body, before any shape is imposed on it.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
    Bytes(Vec<u8>),
    Empty,
}

/// Blocking client bound to one Apollo session. Cloning is cheap: the
/// underlying reqwest client shares its connection pool.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    session: Session,
}

impl ApiClient {
    /// Build a client for `session`. Redirects are not followed: Apollo
    /// answers unauthenticated calls with a redirect to its login page,
    /// which is reported as a status error instead.
    pub fn new(session: Session) -> Result<Self> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .redirect(Policy::none());
        if let Some(timeout) = session.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(ApiClient { client, session })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn url(&self, endpoint: &Endpoint) -> String {
        format!("{}/{}", self.session.base_url(), endpoint.path())
    }

    /// Authorization header map for API-key sessions; empty otherwise.
    fn auth_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Auth::ApiKey(key) = self.session.auth() {
            let val = HeaderValue::from_str(&format!("Bearer {key}"))
                .map_err(|_| Error::Config("api key contains invalid header characters".into()))?;
            headers.insert(AUTHORIZATION, val);
        }
        Ok(headers)
    }

    /// Credential fields merged into the body, form or query string.
    fn credential_fields(&self) -> Vec<(&'static str, String)> {
        match self.session.auth() {
            Auth::Password { username, password } => {
                vec![("username", username.clone()), ("password", password.clone())]
            }
            Auth::ApiKey(_) => Vec::new(),
        }
    }

    /// Send one request for `endpoint` and return the decoded body.
    ///
    /// GET endpoints carry their parameters in the query string. POST
    /// endpoints with file slots are sent as multipart/form-data with the
    /// parameters as text fields; all other POSTs carry a JSON body.
    pub fn send(&self, endpoint: &Endpoint, params: Params, files: &[Upload]) -> Result<Payload> {
        validate(endpoint, &params, files)?;
        let url = self.url(endpoint);
        debug!(
            method = ?endpoint.method,
            %url,
            params = ?params.names(),
            files = files.len(),
            "sending request"
        );

        let req = self
            .client
            .request(endpoint.method.as_reqwest(), &url)
            .headers(self.auth_headers()?);
        let req = match endpoint.method {
            Method::Get => self.query_request(req, params),
            Method::Post if endpoint.is_multipart() => self.multipart_request(req, params, files)?,
            Method::Post => self.json_request(req, params),
        };

        let res = req.send().map_err(|source| TransportError::Network {
            url: url.clone(),
            source,
        })?;
        read_payload(endpoint, &url, res)
    }

    /// Send and normalize into the endpoint's declared shape.
    pub fn call(&self, endpoint: &Endpoint, params: Params, files: &[Upload]) -> Result<Output> {
        let payload = self.send(endpoint, params, files)?;
        normalize::normalize(endpoint.name, payload, endpoint.shape, None)
    }

    /// Like [`ApiClient::call`], keeping only list entries accepted by `filter`.
    pub fn call_filtered(
        &self,
        endpoint: &Endpoint,
        params: Params,
        files: &[Upload],
        filter: &Filter,
    ) -> Result<Output> {
        let payload = self.send(endpoint, params, files)?;
        normalize::normalize(endpoint.name, payload, endpoint.shape, Some(filter))
    }

    fn query_request(&self, req: RequestBuilder, params: Params) -> RequestBuilder {
        let mut pairs: Vec<(String, String)> = params
            .iter()
            .map(|(k, v)| (k.clone(), form_value(v)))
            .collect();
        pairs.extend(
            self.credential_fields()
                .into_iter()
                .map(|(k, v)| (k.to_string(), v)),
        );
        req.query(&pairs)
    }

    fn json_request(&self, req: RequestBuilder, params: Params) -> RequestBuilder {
        let mut body = params.into_map();
        for (k, v) in self.credential_fields() {
            body.insert(k.to_string(), Value::String(v));
        }
        req.json(&Value::Object(body))
    }

    fn multipart_request(
        &self,
        req: RequestBuilder,
        params: Params,
        files: &[Upload],
    ) -> Result<RequestBuilder> {
        let mut form = multipart::Form::new();
        for (k, v) in params.iter() {
            form = form.text(k.clone(), form_value(v));
        }
        for (k, v) in self.credential_fields() {
            form = form.text(k, v);
        }
        for upload in files {
            form = form.part(upload.field.clone(), file_part(&upload.path)?);
        }
        Ok(req.multipart(form))
    }
}

/// Reject parameters and file slots the descriptor does not declare, and
/// uploads missing for a declared slot, before touching the network.
fn validate(endpoint: &Endpoint, params: &Params, files: &[Upload]) -> Result<()> {
    if let Some(name) = params.names().into_iter().find(|n| !endpoint.accepts(n)) {
        return Err(Error::InvalidArgument(format!(
            "{endpoint} does not take a `{name}` parameter"
        )));
    }
    if let Some(upload) = files
        .iter()
        .find(|u| !endpoint.files.iter().any(|slot| *slot == u.field))
    {
        return Err(Error::InvalidArgument(format!(
            "{endpoint} has no `{}` file field",
            upload.field
        )));
    }
    if let Some(slot) = endpoint
        .files
        .iter()
        .find(|slot| !files.iter().any(|u| u.field == **slot))
    {
        return Err(Error::InvalidArgument(format!(
            "{endpoint} requires a `{slot}` upload"
        )));
    }
    Ok(())
}

/// Open an archive as a multipart part. The file name is kept so the
/// service can tell `.zip` from `.tar.gz`.
fn file_part(path: &Path) -> Result<multipart::Part> {
    let file = File::open(path)
        .map_err(|e| std::io::Error::new(e.kind(), format!("{}: {e}", path.display())))?;
    let len = file.metadata()?.len();
    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("data.tar.gz")
        .to_string();
    multipart::Part::reader_with_length(file, len)
        .file_name(file_name.clone())
        .mime_str(archive_mime(&file_name))
        .map_err(|e| Error::InvalidArgument(format!("{file_name}: {e}")))
}

pub(crate) fn archive_mime(file_name: &str) -> &'static str {
    let lower = file_name.to_ascii_lowercase();
    if lower.ends_with(".tar.gz") || lower.ends_with(".tgz") {
        "application/gzip"
    } else if lower.ends_with(".zip") {
        "application/zip"
    } else {
        "application/octet-stream"
    }
}

/// Text rendering of a parameter for form fields and query strings.
pub(crate) fn form_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn read_payload(endpoint: &Endpoint, url: &str, res: Response) -> Result<Payload> {
    let status = res.status();
    let is_json = res
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.contains("json"))
        .unwrap_or(false);
    let bytes = res.bytes().map_err(|source| TransportError::Network {
        url: url.to_string(),
        source,
    })?;
    debug!(%status, len = bytes.len(), json = is_json, "response received");

    if !status.is_success() {
        return Err(TransportError::Status {
            status: status.as_u16(),
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
        .into());
    }
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Payload::Empty);
    }
    if is_json {
        return serde_json::from_slice(&bytes)
            .map(Payload::Json)
            .map_err(|e| TransportError::MalformedBody(format!("{}: {e}", endpoint.name)).into());
    }
    Ok(match String::from_utf8(bytes.to_vec()) {
        Ok(text) => Payload::Text(text),
        Err(e) => Payload::Bytes(e.into_bytes()),
    })
}
