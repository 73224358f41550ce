// Library root
// -----------
// Client for the web services of an Apollo genome annotation server, plus
// the pieces the `arrow` binary is built from.
//
// Module responsibilities:
// - `config`: session settings (base URL, credentials, timeout) and the
//   `~/.apollo-arrow.json` instance file.
// - `endpoint`: the table of remote actions the client knows about.
// - `api`: the blocking HTTP transport that sends one request per action.
// - `normalize`: turns replies into dict / list / lines results and
//   surfaces errors reported by the service.
// - `resources`: typed operations per Apollo controller (organisms,
//   annotations, canned values, statuses, users).
// - `cli` and `ui`: the command-line surface and terminal output.
pub mod api;
pub mod cli;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod normalize;
pub mod resources;
pub mod ui;

pub use api::{ApiClient, Params, Payload, Upload};
pub use config::{Auth, Session};
pub use error::{Error, RemoteOperationError, Result, TransportError};
pub use normalize::{Filter, Output};
