// Annotation editor queries (`/annotationEditor/` controller).
//
// Most annotation calls are scoped to an organism and a reference
// sequence. [`Annotations`] remembers the last pair it was given so
// scripts do not have to repeat them on every call.

use crate::api::{ApiClient, Params};
use crate::endpoint::{GET_FEATURES, GET_GFF3, GET_SEQUENCE_ALTERATIONS};
use crate::normalize::Output;
use crate::Result;
use serde_json::json;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceContext {
    pub organism: Option<String>,
    pub sequence: Option<String>,
}

pub struct Annotations<'a> {
    client: &'a ApiClient,
    context: SequenceContext,
}

impl<'a> Annotations<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self::with_context(client, SequenceContext::default())
    }

    pub fn with_context(client: &'a ApiClient, context: SequenceContext) -> Self {
        Annotations { client, context }
    }

    pub fn context(&self) -> &SequenceContext {
        &self.context
    }

    /// Set the organism and sequence used by subsequent calls. No request
    /// is made.
    pub fn set_sequence(&mut self, organism: &str, sequence: &str) {
        debug!(organism, sequence, "sequence context set");
        self.context = SequenceContext {
            organism: Some(organism.to_string()),
            sequence: Some(sequence.to_string()),
        };
    }

    /// Context parameters for one call. Passing both values replaces the
    /// stored context; a partial pair only fills the gap for this call.
    fn context_params(&mut self, organism: Option<&str>, sequence: Option<&str>) -> Params {
        if let (Some(organism), Some(sequence)) = (organism, sequence) {
            self.set_sequence(organism, sequence);
        }
        Params::new()
            .with_opt("organism", organism.or(self.context.organism.as_deref()))
            .with_opt("sequence", sequence.or(self.context.sequence.as_deref()))
    }

    pub fn get_sequence_alterations(
        &mut self,
        organism: Option<&str>,
        sequence: Option<&str>,
    ) -> Result<Output> {
        let params = self.context_params(organism, sequence);
        self.client.call(&GET_SEQUENCE_ALTERATIONS, params, &[])
    }

    /// Features annotated on the current sequence.
    pub fn get_features(
        &mut self,
        organism: Option<&str>,
        sequence: Option<&str>,
    ) -> Result<Output> {
        let params = self.context_params(organism, sequence);
        self.client.call(&GET_FEATURES, params, &[])
    }

    /// GFF3 export of one feature, as text lines.
    pub fn get_gff3(
        &mut self,
        feature_id: &str,
        organism: Option<&str>,
        sequence: Option<&str>,
    ) -> Result<Output> {
        let params = self
            .context_params(organism, sequence)
            .with("features", json!([{ "uniquename": feature_id }]));
        self.client.call(&GET_GFF3, params, &[])
    }
}
