// Session configuration: where the Apollo server lives and how to
// authenticate against it. A `Session` is built once at start-up and is
// read-only afterwards; every request made through an `ApiClient` carries
// its credentials.

use crate::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name of the per-user instance file, looked up in the home directory.
pub const CONFIG_FILE_NAME: &str = ".apollo-arrow.json";

/// Credentials attached to every request.
#[derive(Clone, PartialEq, Eq)]
pub enum Auth {
    /// Sent as `username` / `password` fields of the request body (or
    /// query string for GET endpoints).
    Password { username: String, password: String },
    /// Sent as a bearer token in the `Authorization` header.
    ApiKey(String),
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Auth::Password { username, .. } => f
                .debug_struct("Password")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Auth::ApiKey(_) => f.debug_tuple("ApiKey").field(&"<redacted>").finish(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    base_url: String,
    auth: Auth,
    timeout: Option<Duration>,
}

impl Session {
    pub fn new(base_url: impl Into<String>, auth: Auth) -> Result<Self> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(Error::Config("apollo url is empty".into()));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "apollo url must start with http:// or https://, got {base_url}"
            )));
        }
        Ok(Session {
            base_url,
            auth,
            timeout: None,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

/// One named server entry of the config file. The same shape is used for
/// values coming from flags and the environment so the sources can be
/// merged field by field.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Instance {
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub api_key: Option<String>,
    pub timeout: Option<u64>,
}

impl Instance {
    /// Fill every unset field of `self` from `fallback`.
    pub fn merge(self, fallback: Instance) -> Instance {
        Instance {
            url: self.url.or(fallback.url),
            username: self.username.or(fallback.username),
            password: self.password.or(fallback.password),
            api_key: self.api_key.or(fallback.api_key),
            timeout: self.timeout.or(fallback.timeout),
        }
    }

    /// Whether a password still has to be obtained before a session can be built.
    pub fn needs_password(&self) -> bool {
        self.api_key.is_none() && self.username.is_some() && self.password.is_none()
    }

    pub fn into_session(self) -> Result<Session> {
        let url = self.url.ok_or_else(|| {
            Error::Config("no apollo url configured (set APOLLO_URL or --url)".into())
        })?;
        let auth = match (self.api_key, self.username, self.password) {
            (Some(key), _, _) => Auth::ApiKey(key),
            (None, Some(username), Some(password)) => Auth::Password { username, password },
            (None, Some(username), None) => {
                return Err(Error::Config(format!("no password configured for user {username}")))
            }
            (None, None, _) => {
                return Err(Error::Config(
                    "no credentials configured \
                     (set APOLLO_USERNAME/APOLLO_PASSWORD or APOLLO_API_KEY)"
                        .into(),
                ))
            }
        };
        let session = Session::new(url, auth)?;
        Ok(match self.timeout {
            Some(secs) => session.with_timeout(Duration::from_secs(secs)),
            None => session,
        })
    }
}

/// Contents of `~/.apollo-arrow.json`:
///
/// ```json
/// {
///     "__default": "local",
///     "local": {
///         "url": "http://localhost:8080/apollo",
///         "username": "admin@local.host",
///         "password": "secret"
///     }
/// }
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(rename = "__default")]
    pub default: Option<String>,
    #[serde(flatten)]
    pub instances: BTreeMap<String, Instance>,
}

impl ConfigFile {
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
    }

    /// Load the file at `path`. A missing file yields an empty config.
    pub fn load(path: &Path) -> Result<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(ConfigFile::default()),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&text)
            .map_err(|e| Error::Config(format!("invalid config file {}: {e}", path.display())))
    }

    /// Pick an instance by name, or the `__default` one when no name is given.
    pub fn instance(&self, name: Option<&str>) -> Result<Option<Instance>> {
        let Some(name) = name.or(self.default.as_deref()) else {
            return Ok(None);
        };
        self.instances
            .get(name)
            .cloned()
            .map(Some)
            .ok_or_else(|| Error::Config(format!("unknown apollo instance {name}")))
    }
}
