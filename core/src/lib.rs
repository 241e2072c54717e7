//! Blocking client for the REDCap clinical data capture API.
//!
//! # Overview
//! Every REDCap operation is a single form-encoded POST to the project's API
//! endpoint. This crate assembles those bodies and sends them; it does not
//! parse what REDCap returns. Responses, including REDCap's JSON error
//! envelopes, are handed back as raw bytes with their status code.
//!
//! # Design
//! - `Action` is a static table of per-operation literals (`content`,
//!   `action`, which format parameter applies).
//! - `ActionRequest` pairs an action with the caller's parameters and can be
//!   encoded without touching the network.
//! - `RedcapClient::build` produces an `HttpRequest`; `RedcapClient::call`
//!   sends it through ureq. Typed methods wrap both for each operation.
//! - List parameters keep REDCap's indexed-key layout (`dags[0]=a`), written
//!   back to back; values are percent-encoded.

pub mod action;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod multipart;
pub mod params;
pub mod request;
pub mod transport;
pub mod types;

pub use action::{Action, ActionSpec, FormatParam};
pub use client::RedcapClient;
pub use config::{ClientConfig, ResponseFormat};
pub use error::RedcapError;
pub use http::{ApiResponse, HttpRequest};
pub use params::{encode_indexed, ListKind};
pub use request::ActionRequest;
pub use types::{
    Arm, ArmEventMapping, ArmMapping, Dag, Event, EventForms, FileUpload, LogQuery, NewProject,
    OverwriteBehavior, ProjectXmlOptions, RecordImportOptions, RecordQuery, RecordScope, User,
    UserDagMapping, UserRole,
};
