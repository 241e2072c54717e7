//! Payload records and query options for REDCap operations.
//!
//! # Design
//! Import records carry exactly the fields REDCap's own import examples use.
//! Numeric permission and offset fields are sent as JSON strings, matching
//! what REDCap emits on export, so an exported record can be re-imported
//! unchanged.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Serialize numbers as JSON strings and accept them back.
mod numeric_string {
    use std::fmt::Display;
    use std::str::FromStr;

    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<T: Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }
        let text = match Raw::deserialize(deserializer)? {
            Raw::Text(s) => s,
            Raw::Number(n) => n.to_string(),
        };
        text.parse().map_err(de::Error::custom)
    }
}

/// A study arm (`content=arm`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arm {
    #[serde(with = "numeric_string")]
    pub arm_num: u32,
    pub name: String,
}

/// A data access group (`content=dag`). Leave `unique_group_name` empty to
/// have REDCap generate one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dag {
    pub data_access_group_name: String,
    #[serde(default)]
    pub unique_group_name: String,
}

/// A longitudinal event (`content=event`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub event_name: String,
    #[serde(with = "numeric_string")]
    pub arm_num: u32,
    #[serde(with = "numeric_string")]
    pub day_offset: i32,
    #[serde(with = "numeric_string")]
    pub offset_min: u32,
    #[serde(with = "numeric_string")]
    pub offset_max: u32,
    pub unique_event_name: String,
}

/// Project settings for `content=project` import, which creates a project
/// and requires a super API token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProject {
    pub project_title: String,
    pub purpose: u8,
    #[serde(default)]
    pub purpose_other: String,
    #[serde(default)]
    pub project_note: String,
}

/// Assignment of a user to a DAG (`content=userDagMapping`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDagMapping {
    pub username: String,
    pub redcap_data_access_group: String,
}

/// Instruments enabled for one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventForms {
    pub unique_event_name: String,
    pub form: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmMapping {
    #[serde(with = "numeric_string")]
    pub number: u32,
    pub event: Vec<EventForms>,
}

/// One entry of an instrument-event mapping import (`content=formEventMapping`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmEventMapping {
    pub arm: ArmMapping,
}

/// User rights (`content=user`). Permission levels are REDCap's numeric
/// codes; `0` means no access.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    #[serde(default)]
    pub expiration: String,
    #[serde(default)]
    pub data_access_group: String,
    #[serde(with = "numeric_string")]
    pub data_export: u8,
    #[serde(with = "numeric_string")]
    pub mobile_app: u8,
    #[serde(with = "numeric_string")]
    pub mobile_app_download_data: u8,
    #[serde(with = "numeric_string")]
    pub lock_record_multiform: u8,
    #[serde(with = "numeric_string")]
    pub lock_record: u8,
    #[serde(with = "numeric_string")]
    pub lock_record_customize: u8,
    #[serde(with = "numeric_string")]
    pub record_delete: u8,
    #[serde(with = "numeric_string")]
    pub record_rename: u8,
    #[serde(with = "numeric_string")]
    pub record_create: u8,
    #[serde(with = "numeric_string")]
    pub api_import: u8,
    #[serde(with = "numeric_string")]
    pub api_export: u8,
    #[serde(with = "numeric_string")]
    pub api_modules: u8,
    #[serde(with = "numeric_string")]
    pub data_quality_execute: u8,
    #[serde(with = "numeric_string")]
    pub data_quality_design: u8,
    #[serde(with = "numeric_string")]
    pub file_repository: u8,
    #[serde(with = "numeric_string")]
    pub data_logging: u8,
    #[serde(with = "numeric_string")]
    pub data_comparison_tool: u8,
    #[serde(with = "numeric_string")]
    pub data_import_tool: u8,
    #[serde(with = "numeric_string")]
    pub calendar: u8,
    #[serde(with = "numeric_string")]
    pub graphical: u8,
    #[serde(with = "numeric_string")]
    pub reports: u8,
    #[serde(with = "numeric_string")]
    pub user_rights: u8,
    #[serde(with = "numeric_string")]
    pub design: u8,
}

/// A user role (`content=userRole`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRole {
    #[serde(default)]
    pub unique_role_name: String,
    pub role_label: String,
    #[serde(default)]
    pub data_access_group: String,
    #[serde(with = "numeric_string")]
    pub data_export: u8,
    #[serde(with = "numeric_string")]
    pub mobile_app: u8,
    #[serde(with = "numeric_string")]
    pub mobile_app_download_data: u8,
    #[serde(with = "numeric_string")]
    pub lock_records_all_forms: u8,
    #[serde(with = "numeric_string")]
    pub lock_records: u8,
    #[serde(with = "numeric_string")]
    pub lock_records_customization: u8,
    #[serde(with = "numeric_string")]
    pub record_delete: u8,
    #[serde(with = "numeric_string")]
    pub record_rename: u8,
    #[serde(with = "numeric_string")]
    pub record_create: u8,
    #[serde(with = "numeric_string")]
    pub api_import: u8,
    #[serde(with = "numeric_string")]
    pub api_export: u8,
    #[serde(with = "numeric_string")]
    pub api_modules: u8,
    #[serde(with = "numeric_string")]
    pub data_quality_execute: u8,
    #[serde(with = "numeric_string")]
    pub data_quality_create: u8,
    #[serde(with = "numeric_string")]
    pub file_repository: u8,
    #[serde(with = "numeric_string")]
    pub logging: u8,
    #[serde(with = "numeric_string")]
    pub data_comparison_tool: u8,
    #[serde(with = "numeric_string")]
    pub data_import_tool: u8,
    #[serde(with = "numeric_string")]
    pub calendar: u8,
    #[serde(with = "numeric_string")]
    pub stats_and_charts: u8,
    #[serde(with = "numeric_string")]
    pub reports: u8,
    #[serde(with = "numeric_string")]
    pub user_rights: u8,
    #[serde(with = "numeric_string")]
    pub design: u8,
}

/// A file to attach to a record's upload field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub record: String,
    pub field: String,
    pub event: Option<String>,
    pub filename: String,
    pub contents: Vec<u8>,
}

/// Narrows a record deletion to part of each record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordScope {
    pub arm: Option<String>,
    pub instrument: Option<String>,
    pub event: Option<String>,
}

/// Filters for the project log export. Unset filters are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogQuery {
    pub log_type: Option<String>,
    pub user: Option<String>,
    pub record: Option<String>,
    pub begin_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
}

/// REDCap's logging API takes timestamps as `YYYY-MM-DD HH:MM`.
pub(crate) fn format_log_time(time: &NaiveDateTime) -> String {
    time.format("%Y-%m-%d %H:%M").to_string()
}

/// Switches for the full project XML export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectXmlOptions {
    pub return_metadata_only: bool,
    pub export_survey_fields: bool,
    pub export_data_access_groups: bool,
}

/// Filters for a flat record export. Empty lists export everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordQuery {
    pub records: Vec<String>,
    pub fields: Vec<String>,
    pub events: Vec<String>,
}

/// How imported blank values treat existing data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverwriteBehavior {
    /// Blank values are ignored.
    #[default]
    Normal,
    /// Blank values erase existing data.
    Overwrite,
}

impl OverwriteBehavior {
    pub fn as_str(self) -> &'static str {
        match self {
            OverwriteBehavior::Normal => "normal",
            OverwriteBehavior::Overwrite => "overwrite",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordImportOptions {
    pub overwrite: OverwriteBehavior,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn arm_serializes_number_as_string() {
        let arm = Arm {
            arm_num: 1,
            name: "Arm 1".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&arm).unwrap(),
            r#"{"arm_num":"1","name":"Arm 1"}"#
        );
    }

    #[test]
    fn event_accepts_numbers_or_strings() {
        let event: Event = serde_json::from_str(
            r#"{"event_name":"Event 1","arm_num":1,"day_offset":"-2","offset_min":"0","offset_max":0,"unique_event_name":"event_1_arm_1"}"#,
        )
        .unwrap();
        assert_eq!(event.arm_num, 1);
        assert_eq!(event.day_offset, -2);
    }

    #[test]
    fn numeric_string_rejects_garbage() {
        let result: Result<Arm, _> = serde_json::from_str(r#"{"arm_num":"one","name":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn project_purpose_stays_numeric() {
        let project = NewProject {
            project_title: "New Project via API".to_string(),
            purpose: 0,
            purpose_other: String::new(),
            project_note: "Some notes about the project".to_string(),
        };
        let value = serde_json::to_value(&project).unwrap();
        assert_eq!(value["purpose"], 0);
        assert_eq!(value["purpose_other"], "");
    }

    #[test]
    fn event_mapping_nests_arm_and_forms() {
        let mapping = ArmEventMapping {
            arm: ArmMapping {
                number: 2,
                event: vec![EventForms {
                    unique_event_name: "event_2_arm_1".to_string(),
                    form: vec!["instr_1".to_string()],
                }],
            },
        };
        assert_eq!(
            serde_json::to_string(&mapping).unwrap(),
            r#"{"arm":{"number":"2","event":[{"unique_event_name":"event_2_arm_1","form":["instr_1"]}]}}"#
        );
    }

    #[test]
    fn user_defaults_to_no_access() {
        let user = User {
            username: "test_user_47".to_string(),
            ..Default::default()
        };
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["design"], "0");
        assert_eq!(value["expiration"], "");
    }

    #[test]
    fn log_time_uses_minute_precision() {
        let time = NaiveDate::from_ymd_opt(2020, 10, 6)
            .unwrap()
            .and_hms_opt(17, 37, 59)
            .unwrap();
        assert_eq!(format_log_time(&time), "2020-10-06 17:37");
    }
}
