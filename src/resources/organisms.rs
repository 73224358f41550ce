// Organism and track management (`/organism/` controller).
//
// Organism data is uploaded as a `.tar.gz` or `.zip` archive holding a
// JBrowse `data/` directory:
//
// ```text
// data/
// data/seq/refSeqs.json
// data/seq/<hashed dirs>/...
// data/tracks/
// data/trackList.json
// data/tracks.conf
// ```
//
// Track archives hold `tracks/<name>/<refseq>/...`. Neither layout is
// checked here; the server unpacks and validates it.

use crate::api::{ApiClient, Params, Upload};
use crate::endpoint::{
    ADD_ORGANISM, ADD_TRACK, DELETE_ORGANISM, DELETE_TRACK, FIND_ALL_ORGANISMS, UPDATE_TRACK,
};
use crate::normalize::{Filter, Output};
use crate::{Error, Result};
use serde_json::Value;
use std::path::Path;

/// Optional fields of [`Organisms::add_organism`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddOrganism {
    pub blatdb: Option<String>,
    pub genus: Option<String>,
    pub species: Option<String>,
    pub public: bool,
    pub non_default_translation_table: Option<u32>,
    /// Arbitrary JSON metadata stored with the organism.
    pub metadata: Option<Value>,
}

pub struct Organisms<'a> {
    client: &'a ApiClient,
}

impl<'a> Organisms<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Organisms { client }
    }

    /// Upload `archive` as a new organism. The service answers with its
    /// whole organism list; only the entries named `common_name` are kept,
    /// which may be none.
    pub fn add_organism(
        &self,
        common_name: &str,
        archive: &Path,
        opts: &AddOrganism,
    ) -> Result<Output> {
        let params = Params::new()
            .with("commonName", common_name)
            .with_opt("blatdb", opts.blatdb.as_deref())
            .with_opt("genus", opts.genus.as_deref())
            .with_opt("species", opts.species.as_deref())
            .with_opt("publicMode", opts.public.then_some(true))
            .with_opt("nonDefaultTranslationTable", opts.non_default_translation_table)
            .with_opt("metadata", opts.metadata.clone());
        let files = [Upload::new("organismData", archive)];
        self.client.call_filtered(
            &ADD_ORGANISM,
            params,
            &files,
            &Filter::field_equals("commonName", common_name),
        )
    }

    /// All organisms visible to the user, or only the one named `common_name`.
    pub fn get_organisms(&self, common_name: Option<&str>) -> Result<Output> {
        let params = Params::new().with_opt("organism", common_name);
        self.client.call(&FIND_ALL_ORGANISMS, params, &[])
    }

    /// Remove an organism and its sequence data.
    pub fn delete_organism(&self, organism_id: &str) -> Result<Output> {
        let params = Params::new().with("organism", organism_id);
        self.client.call(&DELETE_ORGANISM, params, &[])
    }

    /// Upload a track archive to an existing organism, registering it with
    /// `track_config` (a JBrowse track stanza: `label`, `key`, `type`,
    /// `storeClass`, `urlTemplate`, ...).
    pub fn add_track(
        &self,
        organism_id: &str,
        archive: &Path,
        track_config: &Value,
    ) -> Result<Output> {
        let params = track_params(organism_id, track_config)?;
        let files = [Upload::new("trackData", archive)];
        self.client.call(&ADD_TRACK, params, &files)
    }

    /// Replace the configuration of a track already on the organism. The
    /// track's data files are left alone.
    pub fn update_track(&self, organism_id: &str, track_config: &Value) -> Result<Output> {
        let params = track_params(organism_id, track_config)?;
        self.client.call(&UPDATE_TRACK, params, &[])
    }

    pub fn delete_track(&self, organism_id: &str, track_label: &str) -> Result<Output> {
        let params = Params::new()
            .with("organism", organism_id)
            .with("trackLabel", track_label);
        self.client.call(&DELETE_TRACK, params, &[])
    }
}

/// The service expects the track stanza as a JSON string field.
fn track_params(organism_id: &str, track_config: &Value) -> Result<Params> {
    if !track_config.is_object() {
        return Err(Error::InvalidArgument(
            "track config must be a JSON object".into(),
        ));
    }
    Ok(Params::new()
        .with("organism", organism_id)
        .with("trackConfig", track_config.to_string()))
}
