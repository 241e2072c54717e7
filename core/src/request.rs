//! Per-operation request values.
//!
//! # Design
//! An `ActionRequest` pairs an `Action` (whose descriptor supplies the fixed
//! literals) with the caller's parameters, in the order they go on the wire.
//! Constructors exist for every operation; they do no I/O and never see the
//! token, so the same request can be built once and sent by any client.
//!
//! Body layout:
//! `token=<t>&content=<verb>[&action=<a>][&format=<f>|&returnFormat=<f>]&<params>`

use serde::Serialize;

use crate::action::{Action, FormatParam};
use crate::config::ResponseFormat;
use crate::error::RedcapError;
use crate::multipart;
use crate::params::{FormBody, ListKind};
use crate::types::{
    format_log_time, Arm, ArmEventMapping, Dag, Event, FileUpload, LogQuery, NewProject,
    ProjectXmlOptions, RecordImportOptions, RecordQuery, RecordScope, User, UserDagMapping,
    UserRole,
};

/// A verb-specific parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    Pair(&'static str, String),
    List(ListKind, Vec<String>),
}

/// How the body is encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Form,
    Multipart(FileUpload),
}

/// The encoded body plus the content type it was encoded with.
#[derive(Debug, Clone)]
pub struct EncodedBody {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// One REDCap call, minus the connection details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    action: Action,
    params: Vec<Param>,
    payload: Payload,
}

fn owned<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    values.iter().map(|v| v.as_ref().to_string()).collect()
}

fn json<T: Serialize + ?Sized>(data: &T) -> Result<String, RedcapError> {
    Ok(serde_json::to_string(data)?)
}

fn flag(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

impl ActionRequest {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            params: Vec::new(),
            payload: Payload::Form,
        }
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Append `key=value`.
    pub fn pair(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.params.push(Param::Pair(key, value.into()));
        self
    }

    /// Append `key=value` only when a value is present.
    pub fn optional(self, key: &'static str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.pair(key, v),
            None => self,
        }
    }

    /// Append an indexed list.
    pub fn list<S: AsRef<str>>(mut self, kind: ListKind, values: &[S]) -> Self {
        self.params.push(Param::List(kind, owned(values)));
        self
    }

    fn with_data(self, data: String) -> Self {
        self.pair("data", data)
    }

    /// Encode the request for the given token and response format.
    pub fn encode(&self, token: &str, format: ResponseFormat) -> Result<EncodedBody, RedcapError> {
        match &self.payload {
            Payload::Form => Ok(EncodedBody {
                content_type: crate::http::FORM_CONTENT_TYPE.to_string(),
                bytes: self.form_body(token, format).into_bytes(),
            }),
            Payload::Multipart(upload) => self.multipart_body(token, format, upload),
        }
    }

    fn form_body(&self, token: &str, format: ResponseFormat) -> String {
        let spec = self.action.descriptor();
        let mut body = FormBody::new();
        body.pair("token", token).pair("content", spec.content);
        if let Some(action) = spec.action {
            body.pair("action", action);
        }
        match spec.format {
            FormatParam::Format => {
                body.pair("format", format.as_str());
            }
            FormatParam::ReturnFormat => {
                body.pair("returnFormat", format.as_str());
            }
            FormatParam::Omitted => {}
        }
        for param in &self.params {
            match param {
                Param::Pair(key, value) => {
                    body.pair(key, value);
                }
                Param::List(kind, values) => {
                    body.indexed(*kind, values.as_slice());
                }
            }
        }
        body.finish()
    }

    fn multipart_body(
        &self,
        token: &str,
        format: ResponseFormat,
        upload: &FileUpload,
    ) -> Result<EncodedBody, RedcapError> {
        let spec = self.action.descriptor();
        let mut fields = vec![("token", token), ("content", spec.content)];
        if let Some(action) = spec.action {
            fields.push(("action", action));
        }
        match spec.format {
            FormatParam::Format => fields.push(("format", format.as_str())),
            FormatParam::ReturnFormat => fields.push(("returnFormat", format.as_str())),
            FormatParam::Omitted => {}
        }
        fields.push(("record", upload.record.as_str()));
        fields.push(("field", upload.field.as_str()));
        if let Some(event) = &upload.event {
            fields.push(("event", event.as_str()));
        }
        multipart::encode(&fields, "file", &upload.filename, &upload.contents)
    }
}

// Delete operations.
impl ActionRequest {
    pub fn delete_arms<S: AsRef<str>>(arms: &[S]) -> Self {
        Self::new(Action::DeleteArms).list(ListKind::Arms, arms)
    }

    pub fn delete_dags<S: AsRef<str>>(dags: &[S]) -> Self {
        Self::new(Action::DeleteDags).list(ListKind::Dags, dags)
    }

    pub fn delete_events<S: AsRef<str>>(events: &[S]) -> Self {
        Self::new(Action::DeleteEvents).list(ListKind::Events, events)
    }

    pub fn delete_file(record: &str, field: &str, event: &str) -> Self {
        Self::new(Action::DeleteFile)
            .pair("record", record)
            .pair("field", field)
            .pair("event", event)
    }

    pub fn delete_records<S: AsRef<str>>(records: &[S], scope: &RecordScope) -> Self {
        Self::new(Action::DeleteRecords)
            .list(ListKind::Records, records)
            .optional("arm", scope.arm.as_deref())
            .optional("instrument", scope.instrument.as_deref())
            .optional("event", scope.event.as_deref())
    }

    pub fn delete_user_roles<S: AsRef<str>>(roles: &[S]) -> Self {
        Self::new(Action::DeleteUserRoles).list(ListKind::UserRoles, roles)
    }

    pub fn delete_users<S: AsRef<str>>(users: &[S]) -> Self {
        Self::new(Action::DeleteUsers).list(ListKind::Users, users)
    }
}

// Export operations.
impl ActionRequest {
    /// An empty `arms` exports every arm.
    pub fn export_arms<S: AsRef<str>>(arms: &[S]) -> Self {
        Self::new(Action::ExportArms).list(ListKind::Arms, arms)
    }

    pub fn export_dags() -> Self {
        Self::new(Action::ExportDags)
    }

    /// An empty `arms` exports the events of every arm.
    pub fn export_events<S: AsRef<str>>(arms: &[S]) -> Self {
        Self::new(Action::ExportEvents).list(ListKind::Arms, arms)
    }

    pub fn export_field_names(field: &str) -> Self {
        Self::new(Action::ExportFieldNames).pair("field", field)
    }

    pub fn export_file(record: &str, field: &str, event: &str) -> Self {
        Self::new(Action::ExportFile)
            .pair("record", record)
            .pair("field", field)
            .pair("event", event)
    }

    pub fn export_instrument_event_maps() -> Self {
        Self::new(Action::ExportInstrumentEventMaps)
    }

    pub fn export_instrument_pdf() -> Self {
        Self::new(Action::ExportInstrumentPdf)
    }

    pub fn export_instruments() -> Self {
        Self::new(Action::ExportInstruments)
    }

    pub fn export_logging(query: &LogQuery) -> Self {
        let begin = query.begin_time.as_ref().map(format_log_time);
        let end = query.end_time.as_ref().map(format_log_time);
        Self::new(Action::ExportLogging)
            .optional("logtype", query.log_type.as_deref())
            .optional("user", query.user.as_deref())
            .optional("record", query.record.as_deref())
            .optional("beginTime", begin.as_deref())
            .optional("endTime", end.as_deref())
    }

    pub fn export_metadata() -> Self {
        Self::new(Action::ExportMetadata)
    }

    pub fn export_project_xml(options: ProjectXmlOptions) -> Self {
        Self::new(Action::ExportProjectXml)
            .pair("returnMetadataOnly", flag(options.return_metadata_only))
            .pair("exportSurveyFields", flag(options.export_survey_fields))
            .pair("exportDataAccessGroups", flag(options.export_data_access_groups))
    }

    pub fn export_project() -> Self {
        Self::new(Action::ExportProject)
    }

    pub fn export_records(query: &RecordQuery) -> Self {
        Self::new(Action::ExportRecords)
            .pair("type", "flat")
            .list(ListKind::Records, query.records.as_slice())
            .list(ListKind::Fields, query.fields.as_slice())
            .list(ListKind::Events, query.events.as_slice())
    }

    pub fn export_version() -> Self {
        Self::new(Action::ExportVersion)
    }

    pub fn export_report(report_id: &str) -> Self {
        Self::new(Action::ExportReport).pair("report_id", report_id)
    }

    pub fn export_survey_link(record: &str, instrument: &str, event: &str) -> Self {
        Self::new(Action::ExportSurveyLink)
            .pair("record", record)
            .pair("instrument", instrument)
            .pair("event", event)
    }

    pub fn export_survey_participants(instrument: &str, event: &str) -> Self {
        Self::new(Action::ExportSurveyParticipants)
            .pair("instrument", instrument)
            .pair("event", event)
    }

    pub fn export_survey_queue_link(record: &str, instrument: &str, event: &str) -> Self {
        Self::new(Action::ExportSurveyQueueLink)
            .pair("record", record)
            .pair("instrument", instrument)
            .pair("event", event)
    }

    pub fn export_survey_return_code(record: &str, instrument: &str, event: &str) -> Self {
        Self::new(Action::ExportSurveyReturnCode)
            .pair("record", record)
            .pair("instrument", instrument)
            .pair("event", event)
    }

    pub fn export_user_dag_maps() -> Self {
        Self::new(Action::ExportUserDagMaps)
    }

    pub fn export_user_roles() -> Self {
        Self::new(Action::ExportUserRoles)
    }

    pub fn export_users() -> Self {
        Self::new(Action::ExportUsers)
    }
}

// Import operations. Payloads go in the `data` field as a JSON array.
impl ActionRequest {
    /// With `override_existing`, arms not listed are deleted.
    pub fn import_arms(arms: &[Arm], override_existing: bool) -> Result<Self, RedcapError> {
        Ok(Self::new(Action::ImportArms)
            .pair("override", if override_existing { "1" } else { "0" })
            .with_data(json(arms)?))
    }

    pub fn import_dags(dags: &[Dag]) -> Result<Self, RedcapError> {
        Ok(Self::new(Action::ImportDags).with_data(json(dags)?))
    }

    /// With `override_existing`, events not listed are deleted.
    pub fn import_events(events: &[Event], override_existing: bool) -> Result<Self, RedcapError> {
        Ok(Self::new(Action::ImportEvents)
            .pair("override", if override_existing { "1" } else { "0" })
            .with_data(json(events)?))
    }

    pub fn import_file(upload: FileUpload) -> Self {
        Self {
            action: Action::ImportFile,
            params: Vec::new(),
            payload: Payload::Multipart(upload),
        }
    }

    pub fn import_instrument_event_maps(mappings: &[ArmEventMapping]) -> Result<Self, RedcapError> {
        Ok(Self::new(Action::ImportInstrumentEventMaps).with_data(json(mappings)?))
    }

    /// Creates a project; the client must hold a super API token.
    pub fn import_project(project: &NewProject) -> Result<Self, RedcapError> {
        Ok(Self::new(Action::ImportProject).with_data(json(std::slice::from_ref(project))?))
    }

    /// `rows` are flat records keyed by the project's field names.
    pub fn import_records<T: Serialize>(
        rows: &[T],
        options: RecordImportOptions,
    ) -> Result<Self, RedcapError> {
        Ok(Self::new(Action::ImportRecords)
            .pair("type", "flat")
            .pair("overwriteBehavior", options.overwrite.as_str())
            .with_data(json(rows)?))
    }

    pub fn import_user_dag_maps(mappings: &[UserDagMapping]) -> Result<Self, RedcapError> {
        Ok(Self::new(Action::ImportUserDagMaps).with_data(json(mappings)?))
    }

    pub fn import_user_roles(roles: &[UserRole]) -> Result<Self, RedcapError> {
        Ok(Self::new(Action::ImportUserRoles).with_data(json(roles)?))
    }

    pub fn import_users(users: &[User]) -> Result<Self, RedcapError> {
        Ok(Self::new(Action::ImportUsers).with_data(json(users)?))
    }
}

// Record and DAG session operations.
impl ActionRequest {
    pub fn rename_record(record: &str, arm: &str, new_record_name: &str) -> Self {
        Self::new(Action::RenameRecord)
            .pair("record", record)
            .pair("new_record_name", new_record_name)
            .pair("arm", arm)
    }

    pub fn switch_dag(dag: &str) -> Self {
        Self::new(Action::SwitchDag).pair("dag", dag)
    }
}
