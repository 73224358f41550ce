// User lookups (`/user/` controller).

use super::{first_record, id_value};
use crate::api::{ApiClient, Params};
use crate::endpoint::LOAD_USERS;
use crate::normalize::Output;
use crate::Result;

pub struct Users<'a> {
    client: &'a ApiClient,
}

impl<'a> Users<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Users { client }
    }

    pub fn get_users(&self) -> Result<Output> {
        self.client.call(&LOAD_USERS, Params::new(), &[])
    }

    /// `loadUsers` filtered server-side by id. Apollo answers with a list;
    /// the single match is returned as a dict.
    pub fn load_user_by_id(&self, user_id: &str) -> Result<Output> {
        let params = Params::new().with("userId", id_value(user_id));
        let users = self.client.call(&LOAD_USERS, params, &[])?.into_list();
        first_record(LOAD_USERS.name, users, || format!("user {user_id} not found"))
    }
}
