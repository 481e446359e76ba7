//! Settings backups and report exports as pretty-printed JSON documents.

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use finboard_config::Preferences;
use finboard_core::{CategoryGroup, ReportView};
use finboard_domain::{Transaction, YearMonth};

use crate::errors::TransferError;

pub const SETTINGS_NOTE: &str = "Personal finance settings backup";

/// `finance-backup-YYYY-MM-DD.json`
pub fn settings_file_name(date: NaiveDate) -> String {
    format!("finance-backup-{}.json", date.format("%Y-%m-%d"))
}

/// `finance-report-M-YYYY.json`, month without padding.
pub fn report_file_name(period: YearMonth) -> String {
    format!("finance-report-{}-{}.json", period.month(), period.year())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsDocument {
    #[serde(default)]
    pub export_date: Option<DateTime<Utc>>,
    pub settings: Preferences,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl SettingsDocument {
    pub fn new(settings: Preferences, exported_at: DateTime<Utc>) -> Self {
        Self {
            export_date: Some(exported_at),
            settings,
            note: Some(SETTINGS_NOTE.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDocument {
    pub export_date: DateTime<Utc>,
    /// `M/YYYY`
    pub period: String,
    pub summary: ReportSummary,
    pub expenses_by_category: Vec<CategoryGroup>,
    pub transactions: Vec<Transaction>,
}

impl ReportDocument {
    pub fn new(report: &ReportView, transactions: &[Transaction], exported_at: DateTime<Utc>) -> Self {
        Self {
            export_date: exported_at,
            period: format!("{}/{}", report.period.month(), report.period.year()),
            summary: ReportSummary {
                income: report.totals.income,
                expense: report.totals.expense,
                balance: report.totals.balance,
            },
            expenses_by_category: report.expense_by_category.clone(),
            transactions: transactions.to_vec(),
        }
    }
}

/// Writes `document` next to `path` first, then renames it into place.
pub fn write_document<T: Serialize>(path: &Path, document: &T) -> Result<(), TransferError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string_pretty(document)?;
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn parse_with<T: DeserializeOwned>(data: &str, required: &'static str) -> Result<T, TransferError> {
    let value: Value = serde_json::from_str(data)?;
    match value.get(required) {
        Some(field) if !field.is_null() => Ok(serde_json::from_value(value)?),
        _ => Err(TransferError::MissingField(required)),
    }
}

/// Parses a settings backup. Documents without a `settings` object are rejected.
pub fn parse_settings(data: &str) -> Result<SettingsDocument, TransferError> {
    parse_with(data, "settings")
}

pub fn read_settings(path: &Path) -> Result<SettingsDocument, TransferError> {
    let data = fs::read_to_string(path)?;
    parse_settings(&data)
}

pub fn export_settings(
    dir: &Path,
    settings: &Preferences,
    exported_at: DateTime<Utc>,
) -> Result<PathBuf, TransferError> {
    let path = dir.join(settings_file_name(exported_at.date_naive()));
    write_document(&path, &SettingsDocument::new(settings.clone(), exported_at))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use finboard_config::Theme;
    use tempfile::tempdir;

    #[test]
    fn file_names_follow_export_conventions() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(settings_file_name(date), "finance-backup-2024-03-09.json");
        assert_eq!(
            report_file_name(YearMonth::new(2024, 3).unwrap()),
            "finance-report-3-2024.json"
        );
    }

    #[test]
    fn settings_survive_export_and_import() {
        let dir = tempdir().unwrap();
        let mut settings = Preferences::default();
        settings.display_name = "Ana".into();
        settings.theme = Theme::Dark;
        let exported_at = Utc::now();

        let path = export_settings(dir.path(), &settings, exported_at).unwrap();
        let document = read_settings(&path).unwrap();
        assert_eq!(document.settings, settings);
        assert_eq!(document.note.as_deref(), Some(SETTINGS_NOTE));
    }

    #[test]
    fn document_without_settings_is_rejected() {
        let err = parse_settings(r#"{"exportDate":"2024-03-01T00:00:00Z","note":"x"}"#)
            .unwrap_err();
        assert!(matches!(err, TransferError::MissingField("settings")));
        assert!(err.to_string().starts_with("invalid file"));
    }

    #[test]
    fn garbage_is_rejected_as_malformed() {
        let err = parse_settings("not json").unwrap_err();
        assert!(matches!(err, TransferError::Malformed(_)));
    }

    #[test]
    fn partial_settings_fall_back_to_defaults() {
        let document = parse_settings(r#"{"settings":{"displayName":"Rui"}}"#).unwrap();
        assert_eq!(document.settings.display_name, "Rui");
        assert_eq!(document.settings.currency, Preferences::default().currency);
        assert_eq!(document.export_date, None);
    }
}
