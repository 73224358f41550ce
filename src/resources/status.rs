// Annotation statuses (`/availableStatus/` controller).

use super::{first_record, id_value};
use crate::api::{ApiClient, Params};
use crate::endpoint::{CREATE_STATUS, DELETE_STATUS, SHOW_STATUS, UPDATE_STATUS};
use crate::normalize::{Filter, Output};
use crate::Result;

pub struct Statuses<'a> {
    client: &'a ApiClient,
}

impl<'a> Statuses<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Statuses { client }
    }

    pub fn get_statuses(&self) -> Result<Output> {
        self.client.call(&SHOW_STATUS, Params::new(), &[])
    }

    pub fn show_status(&self, value: &str) -> Result<Output> {
        let filter = Filter::field_equals("value", value);
        let matches = self
            .client
            .call_filtered(&SHOW_STATUS, Params::new(), &[], &filter)?
            .into_list();
        first_record(SHOW_STATUS.name, matches, || format!("unknown status {value}"))
    }

    pub fn add_status(&self, value: &str) -> Result<Output> {
        let params = Params::new().with("value", value);
        self.client.call(&CREATE_STATUS, params, &[])
    }

    pub fn update_status(&self, id: &str, new_value: &str) -> Result<Output> {
        let params = Params::new()
            .with("id", id_value(id))
            .with("new_value", new_value);
        self.client.call(&UPDATE_STATUS, params, &[])
    }

    pub fn delete_status(&self, id: &str) -> Result<Output> {
        let params = Params::new().with("id", id_value(id));
        self.client.call(&DELETE_STATUS, params, &[])
    }
}
