//! Static descriptor table for every REDCap API operation.
//!
//! # Design
//! REDCap operations differ only in the literal `content` verb, the optional
//! `action` literal, and which format parameter (if any) they carry. Those
//! three facts live in one lookup so the request builder has no per-verb
//! branching.

/// Where the configured response format goes in the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatParam {
    /// `format=<fmt>`
    Format,
    /// `returnFormat=<fmt>`, used by operations whose payload is not data.
    ReturnFormat,
    /// No format parameter is sent.
    Omitted,
}

/// Fixed request literals for one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionSpec {
    pub content: &'static str,
    pub action: Option<&'static str>,
    pub format: FormatParam,
}

/// Every operation this client knows how to issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    DeleteArms,
    DeleteDags,
    DeleteEvents,
    DeleteFile,
    DeleteRecords,
    DeleteUserRoles,
    DeleteUsers,
    ExportArms,
    ExportDags,
    ExportEvents,
    ExportFieldNames,
    ExportFile,
    ExportInstrumentEventMaps,
    ExportInstrumentPdf,
    ExportInstruments,
    ExportLogging,
    ExportMetadata,
    ExportProjectXml,
    ExportProject,
    ExportRecords,
    ExportVersion,
    ExportReport,
    ExportSurveyLink,
    ExportSurveyParticipants,
    ExportSurveyQueueLink,
    ExportSurveyReturnCode,
    ExportUserDagMaps,
    ExportUserRoles,
    ExportUsers,
    ImportArms,
    ImportDags,
    ImportEvents,
    ImportFile,
    ImportInstrumentEventMaps,
    ImportProject,
    ImportRecords,
    ImportUserDagMaps,
    ImportUserRoles,
    ImportUsers,
    RenameRecord,
    SwitchDag,
}

const fn entry(content: &'static str, action: Option<&'static str>, format: FormatParam) -> ActionSpec {
    ActionSpec { content, action, format }
}

impl Action {
    pub const ALL: [Action; 41] = [
        Action::DeleteArms,
        Action::DeleteDags,
        Action::DeleteEvents,
        Action::DeleteFile,
        Action::DeleteRecords,
        Action::DeleteUserRoles,
        Action::DeleteUsers,
        Action::ExportArms,
        Action::ExportDags,
        Action::ExportEvents,
        Action::ExportFieldNames,
        Action::ExportFile,
        Action::ExportInstrumentEventMaps,
        Action::ExportInstrumentPdf,
        Action::ExportInstruments,
        Action::ExportLogging,
        Action::ExportMetadata,
        Action::ExportProjectXml,
        Action::ExportProject,
        Action::ExportRecords,
        Action::ExportVersion,
        Action::ExportReport,
        Action::ExportSurveyLink,
        Action::ExportSurveyParticipants,
        Action::ExportSurveyQueueLink,
        Action::ExportSurveyReturnCode,
        Action::ExportUserDagMaps,
        Action::ExportUserRoles,
        Action::ExportUsers,
        Action::ImportArms,
        Action::ImportDags,
        Action::ImportEvents,
        Action::ImportFile,
        Action::ImportInstrumentEventMaps,
        Action::ImportProject,
        Action::ImportRecords,
        Action::ImportUserDagMaps,
        Action::ImportUserRoles,
        Action::ImportUsers,
        Action::RenameRecord,
        Action::SwitchDag,
    ];

    pub fn descriptor(self) -> ActionSpec {
        use FormatParam::*;
        match self {
            Action::DeleteArms => entry("arm", Some("delete"), Format),
            Action::DeleteDags => entry("dag", Some("delete"), Format),
            Action::DeleteEvents => entry("event", Some("delete"), Format),
            Action::DeleteFile => entry("file", Some("delete"), Omitted),
            Action::DeleteRecords => entry("record", Some("delete"), ReturnFormat),
            Action::DeleteUserRoles => entry("userRole", Some("delete"), Format),
            Action::DeleteUsers => entry("user", Some("delete"), Format),
            Action::ExportArms => entry("arm", None, Format),
            Action::ExportDags => entry("dag", None, Format),
            Action::ExportEvents => entry("event", None, Format),
            Action::ExportFieldNames => entry("exportFieldNames", None, Format),
            Action::ExportFile => entry("file", Some("export"), Omitted),
            Action::ExportInstrumentEventMaps => entry("formEventMapping", None, Format),
            Action::ExportInstrumentPdf => entry("pdf", None, Format),
            Action::ExportInstruments => entry("instrument", None, Format),
            Action::ExportLogging => entry("log", None, Format),
            Action::ExportMetadata => entry("metadata", None, Format),
            Action::ExportProjectXml => entry("project_xml", None, ReturnFormat),
            Action::ExportProject => entry("project", None, Format),
            Action::ExportRecords => entry("record", None, Format),
            Action::ExportVersion => entry("version", None, Omitted),
            Action::ExportReport => entry("report", None, Format),
            Action::ExportSurveyLink => entry("surveyLink", None, Format),
            Action::ExportSurveyParticipants => entry("participantList", None, Format),
            Action::ExportSurveyQueueLink => entry("surveyQueueLink", None, Format),
            Action::ExportSurveyReturnCode => entry("surveyReturnCode", None, Format),
            Action::ExportUserDagMaps => entry("userDagMapping", None, Format),
            Action::ExportUserRoles => entry("userRole", None, Format),
            Action::ExportUsers => entry("user", None, Format),
            Action::ImportArms => entry("arm", Some("import"), Format),
            Action::ImportDags => entry("dag", Some("import"), Format),
            Action::ImportEvents => entry("event", Some("import"), Format),
            Action::ImportFile => entry("file", Some("import"), ReturnFormat),
            Action::ImportInstrumentEventMaps => entry("formEventMapping", None, Format),
            Action::ImportProject => entry("project", None, Format),
            Action::ImportRecords => entry("record", None, Format),
            Action::ImportUserDagMaps => entry("userDagMapping", Some("import"), Format),
            Action::ImportUserRoles => entry("userRole", None, Format),
            Action::ImportUsers => entry("user", None, Format),
            Action::RenameRecord => entry("record", Some("rename"), ReturnFormat),
            Action::SwitchDag => entry("dag", Some("switch"), Format),
        }
    }

    /// Stable snake_case name, used in log events.
    pub fn name(self) -> &'static str {
        match self {
            Action::DeleteArms => "delete_arms",
            Action::DeleteDags => "delete_dags",
            Action::DeleteEvents => "delete_events",
            Action::DeleteFile => "delete_file",
            Action::DeleteRecords => "delete_records",
            Action::DeleteUserRoles => "delete_user_roles",
            Action::DeleteUsers => "delete_users",
            Action::ExportArms => "export_arms",
            Action::ExportDags => "export_dags",
            Action::ExportEvents => "export_events",
            Action::ExportFieldNames => "export_field_names",
            Action::ExportFile => "export_file",
            Action::ExportInstrumentEventMaps => "export_instrument_event_maps",
            Action::ExportInstrumentPdf => "export_instrument_pdf",
            Action::ExportInstruments => "export_instruments",
            Action::ExportLogging => "export_logging",
            Action::ExportMetadata => "export_metadata",
            Action::ExportProjectXml => "export_project_xml",
            Action::ExportProject => "export_project",
            Action::ExportRecords => "export_records",
            Action::ExportVersion => "export_version",
            Action::ExportReport => "export_report",
            Action::ExportSurveyLink => "export_survey_link",
            Action::ExportSurveyParticipants => "export_survey_participants",
            Action::ExportSurveyQueueLink => "export_survey_queue_link",
            Action::ExportSurveyReturnCode => "export_survey_return_code",
            Action::ExportUserDagMaps => "export_user_dag_maps",
            Action::ExportUserRoles => "export_user_roles",
            Action::ExportUsers => "export_users",
            Action::ImportArms => "import_arms",
            Action::ImportDags => "import_dags",
            Action::ImportEvents => "import_events",
            Action::ImportFile => "import_file",
            Action::ImportInstrumentEventMaps => "import_instrument_event_maps",
            Action::ImportProject => "import_project",
            Action::ImportRecords => "import_records",
            Action::ImportUserDagMaps => "import_user_dag_maps",
            Action::ImportUserRoles => "import_user_roles",
            Action::ImportUsers => "import_users",
            Action::RenameRecord => "rename_record",
            Action::SwitchDag => "switch_dag",
        }
    }
}
