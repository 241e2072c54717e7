//! REDCap API client.
//!
//! # Design
//! `RedcapClient` holds an immutable `ClientConfig` and a ureq agent; it keeps
//! no other state between calls. Every operation goes through the same two
//! steps: `build` turns an `ActionRequest` into an `HttpRequest` without I/O,
//! and `call` sends it. The typed methods are one-line wrappers so callers
//! never touch the form dialect directly.
//!
//! The client is `Clone + Send + Sync`; concurrent calls share nothing but
//! the agent's connection pool.

use std::fmt;
use std::time::Instant;

use serde::Serialize;
use ureq::Agent;

use crate::config::ClientConfig;
use crate::error::RedcapError;
use crate::http::{ApiResponse, HttpRequest, ACCEPT_JSON};
use crate::request::ActionRequest;
use crate::transport;
use crate::types::{
    Arm, ArmEventMapping, Dag, Event, FileUpload, LogQuery, NewProject, ProjectXmlOptions,
    RecordImportOptions, RecordQuery, RecordScope, User, UserDagMapping, UserRole,
};

/// Blocking client for one REDCap project.
#[derive(Clone)]
pub struct RedcapClient {
    config: ClientConfig,
    agent: Agent,
}

impl RedcapClient {
    pub fn new(config: ClientConfig) -> Self {
        let agent = transport::agent_for(&config);
        Self { config, agent }
    }

    /// See `ClientConfig::from_env`.
    pub fn from_env() -> Result<Self, RedcapError> {
        Ok(Self::new(ClientConfig::from_env()?))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Assemble the POST for `request` without sending it.
    pub fn build(&self, request: &ActionRequest) -> Result<HttpRequest, RedcapError> {
        let encoded = request.encode(self.config.token(), self.config.format())?;
        Ok(HttpRequest {
            url: self.config.base_url().to_string(),
            headers: vec![
                ("Content-Type".to_string(), encoded.content_type),
                ("Accept".to_string(), ACCEPT_JSON.to_string()),
            ],
            body: encoded.bytes,
        })
    }

    /// Send `request` and return REDCap's response as-is.
    pub fn call(&self, request: &ActionRequest) -> Result<ApiResponse, RedcapError> {
        let action = request.action();
        let http = self.build(request)?;
        let started = Instant::now();

        match transport::execute(&self.agent, &http) {
            Ok(response) => {
                tracing::debug!(
                    action = action.name(),
                    content = action.descriptor().content,
                    status = response.status,
                    bytes = response.body.len() as u64,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "REDCap call completed"
                );
                Ok(response)
            }
            Err(err) => {
                tracing::debug!(action = action.name(), error = %err, "REDCap call failed");
                Err(err)
            }
        }
    }

    // --- delete ---

    pub fn delete_arms<S: AsRef<str>>(&self, arms: &[S]) -> Result<ApiResponse, RedcapError> {
        self.call(&ActionRequest::delete_arms(arms))
    }

    pub fn delete_dags<S: AsRef<str>>(&self, dags: &[S]) -> Result<ApiResponse, RedcapError> {
        self.call(&ActionRequest::delete_dags(dags))
    }

    pub fn delete_events<S: AsRef<str>>(&self, events: &[S]) -> Result<ApiResponse, RedcapError> {
        self.call(&ActionRequest::delete_events(events))
    }

    pub fn delete_file(&self, record: &str, field: &str, event: &str) -> Result<ApiResponse, RedcapError> {
        self.call(&ActionRequest::delete_file(record, field, event))
    }

    pub fn delete_records<S: AsRef<str>>(
        &self,
        records: &[S],
        scope: &RecordScope,
    ) -> Result<ApiResponse, RedcapError> {
        self.call(&ActionRequest::delete_records(records, scope))
    }

    pub fn delete_user_roles<S: AsRef<str>>(&self, roles: &[S]) -> Result<ApiResponse, RedcapError> {
        self.call(&ActionRequest::delete_user_roles(roles))
    }

    pub fn delete_users<S: AsRef<str>>(&self, users: &[S]) -> Result<ApiResponse, RedcapError> {
        self.call(&ActionRequest::delete_users(users))
    }

    // --- export ---

    pub fn export_arms<S: AsRef<str>>(&self, arms: &[S]) -> Result<ApiResponse, RedcapError> {
        self.call(&ActionRequest::export_arms(arms))
    }

    pub fn export_dags(&self) -> Result<ApiResponse, RedcapError> {
        self.call(&ActionRequest::export_dags())
    }

    pub fn export_events<S: AsRef<str>>(&self, arms: &[S]) -> Result<ApiResponse, RedcapError> {
        self.call(&ActionRequest::export_events(arms))
    }

    pub fn export_field_names(&self, field: &str) -> Result<ApiResponse, RedcapError> {
        self.call(&ActionRequest::export_field_names(field))
    }

    /// The body holds the raw file bytes; the `Content-Type` header carries
    /// its name.
    pub fn export_file(&self, record: &str, field: &str, event: &str) -> Result<ApiResponse, RedcapError> {
        self.call(&ActionRequest::export_file(record, field, event))
    }

    pub fn export_instrument_event_maps(&self) -> Result<ApiResponse, RedcapError> {
        self.call(&ActionRequest::export_instrument_event_maps())
    }

    pub fn export_instrument_pdf(&self) -> Result<ApiResponse, RedcapError> {
        self.call(&ActionRequest::export_instrument_pdf())
    }

    pub fn export_instruments(&self) -> Result<ApiResponse, RedcapError> {
        self.call(&ActionRequest::export_instruments())
    }

    pub fn export_logging(&self, query: &LogQuery) -> Result<ApiResponse, RedcapError> {
        self.call(&ActionRequest::export_logging(query))
    }

    pub fn export_metadata(&self) -> Result<ApiResponse, RedcapError> {
        self.call(&ActionRequest::export_metadata())
    }

    pub fn export_project_xml(&self, options: ProjectXmlOptions) -> Result<ApiResponse, RedcapError> {
        self.call(&ActionRequest::export_project_xml(options))
    }

    pub fn export_project(&self) -> Result<ApiResponse, RedcapError> {
        self.call(&ActionRequest::export_project())
    }

    pub fn export_records(&self, query: &RecordQuery) -> Result<ApiResponse, RedcapError> {
        self.call(&ActionRequest::export_records(query))
    }

    pub fn export_version(&self) -> Result<ApiResponse, RedcapError> {
        self.call(&ActionRequest::export_version())
    }

    pub fn export_report(&self, report_id: &str) -> Result<ApiResponse, RedcapError> {
        self.call(&ActionRequest::export_report(report_id))
    }

    pub fn export_survey_link(
        &self,
        record: &str,
        instrument: &str,
        event: &str,
    ) -> Result<ApiResponse, RedcapError> {
        self.call(&ActionRequest::export_survey_link(record, instrument, event))
    }

    pub fn export_survey_participants(&self, instrument: &str, event: &str) -> Result<ApiResponse, RedcapError> {
        self.call(&ActionRequest::export_survey_participants(instrument, event))
    }

    pub fn export_survey_queue_link(
        &self,
        record: &str,
        instrument: &str,
        event: &str,
    ) -> Result<ApiResponse, RedcapError> {
        self.call(&ActionRequest::export_survey_queue_link(record, instrument, event))
    }

    pub fn export_survey_return_code(
        &self,
        record: &str,
        instrument: &str,
        event: &str,
    ) -> Result<ApiResponse, RedcapError> {
        self.call(&ActionRequest::export_survey_return_code(record, instrument, event))
    }

    pub fn export_user_dag_maps(&self) -> Result<ApiResponse, RedcapError> {
        self.call(&ActionRequest::export_user_dag_maps())
    }

    pub fn export_user_roles(&self) -> Result<ApiResponse, RedcapError> {
        self.call(&ActionRequest::export_user_roles())
    }

    pub fn export_users(&self) -> Result<ApiResponse, RedcapError> {
        self.call(&ActionRequest::export_users())
    }

    // --- import ---

    pub fn import_arms(&self, arms: &[Arm], override_existing: bool) -> Result<ApiResponse, RedcapError> {
        self.call(&ActionRequest::import_arms(arms, override_existing)?)
    }

    pub fn import_dags(&self, dags: &[Dag]) -> Result<ApiResponse, RedcapError> {
        self.call(&ActionRequest::import_dags(dags)?)
    }

    pub fn import_events(&self, events: &[Event], override_existing: bool) -> Result<ApiResponse, RedcapError> {
        self.call(&ActionRequest::import_events(events, override_existing)?)
    }

    pub fn import_file(&self, upload: FileUpload) -> Result<ApiResponse, RedcapError> {
        self.call(&ActionRequest::import_file(upload))
    }

    pub fn import_instrument_event_maps(&self, mappings: &[ArmEventMapping]) -> Result<ApiResponse, RedcapError> {
        self.call(&ActionRequest::import_instrument_event_maps(mappings)?)
    }

    pub fn import_project(&self, project: &NewProject) -> Result<ApiResponse, RedcapError> {
        self.call(&ActionRequest::import_project(project)?)
    }

    pub fn import_records<T: Serialize>(
        &self,
        rows: &[T],
        options: RecordImportOptions,
    ) -> Result<ApiResponse, RedcapError> {
        self.call(&ActionRequest::import_records(rows, options)?)
    }

    pub fn import_user_dag_maps(&self, mappings: &[UserDagMapping]) -> Result<ApiResponse, RedcapError> {
        self.call(&ActionRequest::import_user_dag_maps(mappings)?)
    }

    pub fn import_user_roles(&self, roles: &[UserRole]) -> Result<ApiResponse, RedcapError> {
        self.call(&ActionRequest::import_user_roles(roles)?)
    }

    pub fn import_users(&self, users: &[User]) -> Result<ApiResponse, RedcapError> {
        self.call(&ActionRequest::import_users(users)?)
    }

    // --- records and DAG session ---

    pub fn rename_record(&self, record: &str, arm: &str, new_record_name: &str) -> Result<ApiResponse, RedcapError> {
        self.call(&ActionRequest::rename_record(record, arm, new_record_name))
    }

    /// REDCap scopes the switch to this token's user, not to this client.
    pub fn switch_dag(&self, dag: &str) -> Result<ApiResponse, RedcapError> {
        self.call(&ActionRequest::switch_dag(dag))
    }
}

impl fmt::Debug for RedcapClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedcapClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
