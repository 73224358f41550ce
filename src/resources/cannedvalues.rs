// Canned values (`/cannedValue/` controller): predefined values offered
// for annotation fields.

use super::{first_record, id_value};
use crate::api::{ApiClient, Params};
use crate::endpoint::{CREATE_VALUE, DELETE_VALUE, SHOW_VALUE, UPDATE_VALUE};
use crate::normalize::{Filter, Output};
use crate::Result;
use serde_json::Value;

pub struct CannedValues<'a> {
    client: &'a ApiClient,
}

impl<'a> CannedValues<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        CannedValues { client }
    }

    pub fn find_all_values(&self) -> Result<Output> {
        self.client.call(&SHOW_VALUE, Params::new(), &[])
    }

    /// The canned value whose label is `label`.
    pub fn show_value(&self, label: &str) -> Result<Output> {
        let filter = Filter::field_equals("label", label);
        let matches = self
            .client
            .call_filtered(&SHOW_VALUE, Params::new(), &[], &filter)?
            .into_list();
        first_record(SHOW_VALUE.name, matches, || format!("unknown canned value {label}"))
    }

    /// Create a canned value. `metadata` travels as serialized JSON text.
    pub fn add_value(&self, value: &str, metadata: Option<&Value>) -> Result<Output> {
        let params = Params::new()
            .with("value", value)
            .with_opt("metadata", metadata.map(Value::to_string));
        self.client.call(&CREATE_VALUE, params, &[])
    }

    pub fn update_value(
        &self,
        id: &str,
        new_value: &str,
        metadata: Option<&Value>,
    ) -> Result<Output> {
        let params = Params::new()
            .with("id", id_value(id))
            .with("new_value", new_value)
            .with_opt("metadata", metadata.map(Value::to_string));
        self.client.call(&UPDATE_VALUE, params, &[])
    }

    pub fn delete_value(&self, id: &str) -> Result<Output> {
        let params = Params::new().with("id", id_value(id));
        self.client.call(&DELETE_VALUE, params, &[])
    }
}
