//! Restores of a backup onto a volume.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::family_path;
use crate::adapter::{BaseFields, ResourceKind, require};

/// Host state of a restore.
#[derive(Clone, Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
#[serde(default)]
pub struct RestoreModel {
    /// Shared attributes.
    #[serde(flatten)]
    pub base: BaseFields,
    /// Owning project.
    pub project_id: String,
    /// Backup being restored.
    pub backup_id: String,
    /// Volume receiving the data.
    pub target_volume_uri: String,
}

/// `arubacloud_restore`.
pub struct Restore;

impl ResourceKind for Restore {
    type Model = RestoreModel;

    const NAME: &'static str = "restore";
    const LABEL: &'static str = "Restore";
    const IMPORT_FORMAT: &'static str = "<project_id>/<backup_id>/<restore_id>";

    fn base(model: &Self::Model) -> &BaseFields {
        &model.base
    }

    fn base_mut(model: &mut Self::Model) -> &mut BaseFields {
        &mut model.base
    }

    fn collection_path(model: &Self::Model) -> String {
        format!(
            "{}/backups/{}/restores",
            family_path(&model.project_id, "Storage"),
            model.backup_id
        )
    }

    fn properties(model: &Self::Model) -> Value {
        json!({ "target": { "uri": model.target_volume_uri } })
    }

    fn from_import_id(parts: &[&str]) -> Option<Self::Model> {
        let [project_id, backup_id, id] = parts else {
            return None;
        };
        Some(RestoreModel {
            base: BaseFields::with_id(id),
            project_id: (*project_id).to_owned(),
            backup_id: (*backup_id).to_owned(),
            ..RestoreModel::default()
        })
    }

    fn validate(model: &Self::Model) -> Result<(), String> {
        require("name", &model.base.name)?;
        require("project_id", &model.project_id)?;
        require("backup_id", &model.backup_id)?;
        require("target_volume_uri", &model.target_volume_uri)
    }
}
