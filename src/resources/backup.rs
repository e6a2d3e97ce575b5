//! Volume backups.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{default_billing_period, family_path};
use crate::adapter::{BaseFields, ResourceKind, require};
use crate::api::RemoteResource;

const BACKUP_TYPES: [&str; 2] = ["Full", "Incremental"];

/// Host state of a backup.
#[derive(Clone, Debug, Deserialize, Serialize, Eq, PartialEq)]
#[serde(default)]
pub struct BackupModel {
    /// Shared attributes.
    #[serde(flatten)]
    pub base: BaseFields,
    /// Owning project.
    pub project_id: String,
    /// Block storage volume being backed up.
    pub volume_uri: String,
    /// `Full` or `Incremental`.
    #[serde(rename = "type")]
    pub backup_type: String,
    /// Days the backup is kept.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retention_days: Option<u32>,
    /// Billing period.
    pub billing_period: String,
}

impl Default for BackupModel {
    fn default() -> Self {
        Self {
            base: BaseFields::default(),
            project_id: String::new(),
            volume_uri: String::new(),
            backup_type: String::from("Full"),
            retention_days: None,
            billing_period: default_billing_period(),
        }
    }
}

/// `arubacloud_backup`.
pub struct Backup;

impl ResourceKind for Backup {
    type Model = BackupModel;

    const NAME: &'static str = "backup";
    const LABEL: &'static str = "Backup";
    const IMPORT_FORMAT: &'static str = "<project_id>/<backup_id>";

    fn base(model: &Self::Model) -> &BaseFields {
        &model.base
    }

    fn base_mut(model: &mut Self::Model) -> &mut BaseFields {
        &mut model.base
    }

    fn collection_path(model: &Self::Model) -> String {
        format!("{}/backups", family_path(&model.project_id, "Storage"))
    }

    fn properties(model: &Self::Model) -> Value {
        json!({
            "type": model.backup_type,
            "origin": { "uri": model.volume_uri },
            "retentionDays": model.retention_days,
            "billingPeriod": model.billing_period,
        })
    }

    fn apply_properties(model: &mut Self::Model, remote: &RemoteResource) {
        if let Some(days) = remote.u32_property("/retentionDays") {
            model.retention_days = Some(days);
        }
        if let Some(origin) = remote.str_property("/origin/uri") {
            model.volume_uri = origin;
        }
    }

    fn from_import_id(parts: &[&str]) -> Option<Self::Model> {
        let [project_id, id] = parts else {
            return None;
        };
        Some(BackupModel {
            base: BaseFields::with_id(id),
            project_id: (*project_id).to_owned(),
            ..BackupModel::default()
        })
    }

    fn validate(model: &Self::Model) -> Result<(), String> {
        require("name", &model.base.name)?;
        require("location", &model.base.location)?;
        require("project_id", &model.project_id)?;
        require("volume_uri", &model.volume_uri)?;
        if !BACKUP_TYPES.contains(&model.backup_type.as_str()) {
            return Err(format!(
                "type must be Full or Incremental, got {:?}",
                model.backup_type
            ));
        }
        Ok(())
    }
}
