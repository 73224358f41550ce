// Command surface: one subcommand per resource operation, grouped by
// Apollo controller. Parsing turns flags into the operation's typed
// arguments; `Commands::execute` runs it and hands back the normalized
// result for `ui::print_output`.

use crate::api::ApiClient;
use crate::config::{ConfigFile, Instance, Session};
use crate::normalize::Output;
use crate::resources::AddOrganism;
use crate::{ui, Error, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "arrow", version)]
#[command(about = "Command line access to an Apollo genome annotation server")]
pub struct Cli {
    /// Apollo base URL (e.g., https://apollo.example.org/apollo)
    #[arg(long, env = "APOLLO_URL", global = true)]
    pub url: Option<String>,

    /// Apollo user name (usually an email address)
    #[arg(long, env = "APOLLO_USERNAME", global = true)]
    pub username: Option<String>,

    /// Apollo password
    #[arg(long, env = "APOLLO_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// API key sent as a bearer token instead of username/password
    #[arg(long, env = "APOLLO_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Named instance from the config file
    #[arg(short = 'a', long, env = "ARROW_INSTANCE", global = true)]
    pub instance: Option<String>,

    /// Config file path (default: ~/.apollo-arrow.json)
    #[arg(long, env = "ARROW_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, env = "ARROW_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Log requests (same as --log-level debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "warn", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn effective_log_level(&self) -> String {
        if self.verbose {
            "debug".to_string()
        } else {
            self.log_level.clone()
        }
    }

    fn overrides(&self) -> Instance {
        Instance {
            url: self.url.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            api_key: self.api_key.clone(),
            timeout: self.timeout,
        }
    }

    /// Resolve the session from flags, environment and the config file,
    /// prompting for a missing password on an interactive terminal.
    pub fn session(&self) -> Result<Session> {
        let file = match self.config.clone().or_else(ConfigFile::default_path) {
            Some(path) => ConfigFile::load(&path)?,
            None => ConfigFile::default(),
        };
        let fallback = file.instance(self.instance.as_deref())?.unwrap_or_default();
        let mut merged = self.overrides().merge(fallback);
        if merged.needs_password() && ui::stdin_is_tty() {
            if let Some(username) = merged.username.clone() {
                merged.password = Some(ui::prompt_password(&username)?);
            }
        }
        merged.into_session()
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Organism and track management
    Organisms {
        #[command(subcommand)]
        command: OrganismCommand,
    },
    /// Sequence-scoped annotation queries
    Annotations {
        #[command(subcommand)]
        command: AnnotationCommand,
    },
    /// Canned values for annotation fields
    Cannedvalues {
        #[command(subcommand)]
        command: CannedValueCommand,
    },
    /// Annotation statuses
    Status {
        #[command(subcommand)]
        command: StatusCommand,
    },
    /// User lookups
    Users {
        #[command(subcommand)]
        command: UserCommand,
    },
}

#[derive(Debug, Subcommand)]
#[command(rename_all = "snake_case")]
pub enum OrganismCommand {
    /// Add an organism from a .tar.gz or .zip archive of its data directory
    AddOrganism {
        /// Organism common name
        common_name: String,
        /// Archive containing the data/ directory
        archive: PathBuf,
        /// Server-side path to 2bit index of the genome for Blat
        #[arg(long)]
        blatdb: Option<String>,
        #[arg(long)]
        genus: Option<String>,
        #[arg(long)]
        species: Option<String>,
        /// Make the organism public
        #[arg(long)]
        public: bool,
        /// Translation table number, if different from the server default
        #[arg(long = "non-default-translation-table")]
        non_default_translation_table: Option<u32>,
        /// JSON formatted arbitrary metadata
        #[arg(long)]
        metadata: Option<String>,
    },
    /// List organisms, optionally only the one with a given common name
    GetOrganisms {
        #[arg(long = "common-name")]
        common_name: Option<String>,
    },
    /// Remove an organism completely
    #[command(alias = "deleteOrganism")]
    DeleteOrganism { organism_id: String },
    /// Add a track archive to an existing organism
    AddTrack {
        organism_id: String,
        /// Archive containing the tracks/<name> directory
        archive: PathBuf,
        /// Track configuration as a JSON object
        track_config: String,
    },
    /// Replace a track's configuration
    UpdateTrack {
        organism_id: String,
        /// Track configuration as a JSON object
        track_config: String,
    },
    /// Remove a track from an organism
    DeleteTrack {
        organism_id: String,
        track_label: String,
    },
}

#[derive(Debug, Subcommand)]
#[command(rename_all = "snake_case")]
pub enum AnnotationCommand {
    /// Set the organism and sequence for the following calls of this invocation
    SetSequence { organism: String, sequence: String },
    /// Get all of the sequence's alterations
    GetSequenceAlterations {
        /// Organism common name
        #[arg(long)]
        organism: Option<String>,
        /// Sequence name
        #[arg(long)]
        sequence: Option<String>,
    },
    /// Get the features of a sequence
    GetFeatures {
        #[arg(long)]
        organism: Option<String>,
        #[arg(long)]
        sequence: Option<String>,
    },
    /// Export a feature as GFF3
    GetGff3 {
        feature_id: String,
        #[arg(long)]
        organism: Option<String>,
        #[arg(long)]
        sequence: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
#[command(rename_all = "snake_case")]
pub enum CannedValueCommand {
    /// List all canned values
    #[command(alias = "findAllValues")]
    FindAllValues,
    /// Show the canned value with a given label
    ShowValue { label: String },
    /// Add a canned value
    AddValue {
        value: String,
        #[arg(long)]
        metadata: Option<String>,
    },
    /// Update a canned value
    UpdateValue {
        id_number: String,
        new_value: String,
        #[arg(long)]
        metadata: Option<String>,
    },
    /// Delete a canned value
    DeleteValue { id_number: String },
}

#[derive(Debug, Subcommand)]
#[command(rename_all = "snake_case")]
pub enum StatusCommand {
    /// List all statuses
    GetStatuses,
    /// Show the status with a given value
    ShowStatus { value: String },
    /// Add a status
    #[command(alias = "addStatus")]
    AddStatus { value: String },
    /// Update a status
    #[command(alias = "updateStatus")]
    UpdateStatus { id_number: String, new_value: String },
    /// Delete a status
    #[command(alias = "deleteStatus")]
    DeleteStatus { id_number: String },
}

#[derive(Debug, Subcommand)]
#[command(rename_all = "snake_case")]
pub enum UserCommand {
    /// List all users
    GetUsers,
    /// Load a user by id
    #[command(alias = "loadUserById")]
    LoadUserById { user_id: String },
}

impl Commands {
    pub fn execute(&self, client: &ApiClient) -> Result<Output> {
        match self {
            Commands::Organisms { command } => command.execute(client),
            Commands::Annotations { command } => command.execute(client),
            Commands::Cannedvalues { command } => command.execute(client),
            Commands::Status { command } => command.execute(client),
            Commands::Users { command } => command.execute(client),
        }
    }
}

impl OrganismCommand {
    fn execute(&self, client: &ApiClient) -> Result<Output> {
        let organisms = client.organisms();
        match self {
            OrganismCommand::AddOrganism {
                common_name,
                archive,
                blatdb,
                genus,
                species,
                public,
                non_default_translation_table,
                metadata,
            } => {
                let opts = AddOrganism {
                    blatdb: blatdb.clone(),
                    genus: genus.clone(),
                    species: species.clone(),
                    public: *public,
                    non_default_translation_table: *non_default_translation_table,
                    metadata: parse_metadata(metadata.as_deref())?,
                };
                ui::with_spinner("Uploading organism data...", || {
                    organisms.add_organism(common_name, archive, &opts)
                })
            }
            OrganismCommand::GetOrganisms { common_name } => {
                organisms.get_organisms(common_name.as_deref())
            }
            OrganismCommand::DeleteOrganism { organism_id } => {
                organisms.delete_organism(organism_id)
            }
            OrganismCommand::AddTrack {
                organism_id,
                archive,
                track_config,
            } => {
                let config = parse_json("track_config", track_config)?;
                ui::with_spinner("Uploading track data...", || {
                    organisms.add_track(organism_id, archive, &config)
                })
            }
            OrganismCommand::UpdateTrack {
                organism_id,
                track_config,
            } => organisms.update_track(organism_id, &parse_json("track_config", track_config)?),
            OrganismCommand::DeleteTrack {
                organism_id,
                track_label,
            } => organisms.delete_track(organism_id, track_label),
        }
    }
}

impl AnnotationCommand {
    fn execute(&self, client: &ApiClient) -> Result<Output> {
        let mut annotations = client.annotations();
        match self {
            AnnotationCommand::SetSequence { organism, sequence } => {
                annotations.set_sequence(organism, sequence);
                Ok(Output::None)
            }
            AnnotationCommand::GetSequenceAlterations { organism, sequence } => {
                annotations.get_sequence_alterations(organism.as_deref(), sequence.as_deref())
            }
            AnnotationCommand::GetFeatures { organism, sequence } => {
                annotations.get_features(organism.as_deref(), sequence.as_deref())
            }
            AnnotationCommand::GetGff3 {
                feature_id,
                organism,
                sequence,
            } => annotations.get_gff3(feature_id, organism.as_deref(), sequence.as_deref()),
        }
    }
}

impl CannedValueCommand {
    fn execute(&self, client: &ApiClient) -> Result<Output> {
        let values = client.canned_values();
        match self {
            CannedValueCommand::FindAllValues => values.find_all_values(),
            CannedValueCommand::ShowValue { label } => values.show_value(label),
            CannedValueCommand::AddValue { value, metadata } => {
                let metadata = parse_metadata(metadata.as_deref())?;
                values.add_value(value, metadata.as_ref())
            }
            CannedValueCommand::UpdateValue {
                id_number,
                new_value,
                metadata,
            } => {
                let metadata = parse_metadata(metadata.as_deref())?;
                values.update_value(id_number, new_value, metadata.as_ref())
            }
            CannedValueCommand::DeleteValue { id_number } => values.delete_value(id_number),
        }
    }
}

impl StatusCommand {
    fn execute(&self, client: &ApiClient) -> Result<Output> {
        let statuses = client.statuses();
        match self {
            StatusCommand::GetStatuses => statuses.get_statuses(),
            StatusCommand::ShowStatus { value } => statuses.show_status(value),
            StatusCommand::AddStatus { value } => statuses.add_status(value),
            StatusCommand::UpdateStatus {
                id_number,
                new_value,
            } => statuses.update_status(id_number, new_value),
            StatusCommand::DeleteStatus { id_number } => statuses.delete_status(id_number),
        }
    }
}

impl UserCommand {
    fn execute(&self, client: &ApiClient) -> Result<Output> {
        let users = client.users();
        match self {
            UserCommand::GetUsers => users.get_users(),
            UserCommand::LoadUserById { user_id } => users.load_user_by_id(user_id),
        }
    }
}

fn parse_json(name: &str, text: &str) -> Result<Value> {
    serde_json::from_str(text)
        .map_err(|e| Error::InvalidArgument(format!("{name} is not valid JSON: {e}")))
}

fn parse_metadata(metadata: Option<&str>) -> Result<Option<Value>> {
    metadata.map(|m| parse_json("metadata", m)).transpose()
}
