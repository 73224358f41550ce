// Resource operations, one module per Apollo controller. Each operation is
// a thin typed wrapper: it fills `Params` for a fixed endpoint descriptor
// and lets `ApiClient::call` do the sending and normalizing.

pub mod annotations;
pub mod cannedvalues;
pub mod organisms;
pub mod status;
pub mod users;

pub use annotations::{Annotations, SequenceContext};
pub use cannedvalues::CannedValues;
pub use organisms::{AddOrganism, Organisms};
pub use status::Statuses;
pub use users::Users;

use crate::api::ApiClient;
use crate::error::{RemoteOperationError, TransportError};
use crate::normalize::Output;
use crate::Result;
use serde_json::Value;

impl ApiClient {
    pub fn organisms(&self) -> Organisms<'_> {
        Organisms::new(self)
    }

    /// Annotation operations with an empty sequence context.
    pub fn annotations(&self) -> Annotations<'_> {
        Annotations::new(self)
    }

    pub fn canned_values(&self) -> CannedValues<'_> {
        CannedValues::new(self)
    }

    pub fn statuses(&self) -> Statuses<'_> {
        Statuses::new(self)
    }

    pub fn users(&self) -> Users<'_> {
        Users::new(self)
    }
}

/// Apollo ids are numeric, but callers (and the command line) hand them
/// over as text. Send a number when the text is one.
pub(crate) fn id_value(id: &str) -> Value {
    match id.trim().parse::<i64>() {
        Ok(n) => Value::from(n),
        Err(_) => Value::String(id.to_string()),
    }
}

/// First record of a list result as a dict, or a remote error built from
/// `missing` when the service returned nothing.
pub(crate) fn first_record(
    endpoint: &str,
    items: Vec<Value>,
    missing: impl FnOnce() -> String,
) -> Result<Output> {
    match items.into_iter().next() {
        Some(Value::Object(map)) => Ok(Output::Dict(map)),
        Some(_) => Err(TransportError::MalformedBody(format!(
            "{endpoint}: expected a list of objects"
        ))
        .into()),
        None => Err(RemoteOperationError::new(endpoint, missing()).into()),
    }
}
