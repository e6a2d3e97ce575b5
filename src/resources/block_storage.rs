//! Block storage volumes.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{default_billing_period, family_path};
use crate::adapter::{BaseFields, ResourceKind, require};
use crate::api::RemoteResource;

/// Host state of a block storage volume.
#[derive(Clone, Debug, Deserialize, Serialize, Eq, PartialEq)]
#[serde(default)]
pub struct BlockStorageModel {
    /// Shared attributes.
    #[serde(flatten)]
    pub base: BaseFields,
    /// Owning project.
    pub project_id: String,
    /// Size in gigabytes.
    pub size_gb: u32,
    /// Billing period.
    pub billing_period: String,
    /// Availability zone inside the region.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    /// `Standard` or `Performance`.
    #[serde(rename = "type")]
    pub storage_type: String,
    /// Whether the volume can boot a server.
    pub bootable: bool,
    /// Image written to the volume when it is bootable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Default for BlockStorageModel {
    fn default() -> Self {
        Self {
            base: BaseFields::default(),
            project_id: String::new(),
            size_gb: 0,
            billing_period: default_billing_period(),
            zone: None,
            storage_type: String::from("Standard"),
            bootable: false,
            image: None,
        }
    }
}

/// `arubacloud_block_storage`.
pub struct BlockStorage;

impl ResourceKind for BlockStorage {
    type Model = BlockStorageModel;

    const NAME: &'static str = "block_storage";
    const LABEL: &'static str = "Block Storage";
    const IMPORT_FORMAT: &'static str = "<project_id>/<block_storage_id>";

    fn base(model: &Self::Model) -> &BaseFields {
        &model.base
    }

    fn base_mut(model: &mut Self::Model) -> &mut BaseFields {
        &mut model.base
    }

    fn collection_path(model: &Self::Model) -> String {
        format!("{}/blockStorages", family_path(&model.project_id, "Storage"))
    }

    fn properties(model: &Self::Model) -> Value {
        json!({
            "sizeGb": model.size_gb,
            "billingPeriod": model.billing_period,
            "zone": model.zone,
            "type": model.storage_type,
            "bootable": model.bootable,
            "image": model.image,
        })
    }

    fn apply_properties(model: &mut Self::Model, remote: &RemoteResource) {
        if let Some(size) = remote.u32_property("/sizeGb") {
            model.size_gb = size;
        }
        if let Some(kind) = remote.str_property("/type") {
            model.storage_type = kind;
        }
        if let Some(bootable) = remote.bool_property("/bootable") {
            model.bootable = bootable;
        }
        if let Some(zone) = remote.str_property("/zone") {
            model.zone = Some(zone);
        }
    }

    fn from_import_id(parts: &[&str]) -> Option<Self::Model> {
        let [project_id, id] = parts else {
            return None;
        };
        Some(BlockStorageModel {
            base: BaseFields::with_id(id),
            project_id: (*project_id).to_owned(),
            ..BlockStorageModel::default()
        })
    }

    fn validate(model: &Self::Model) -> Result<(), String> {
        require("name", &model.base.name)?;
        require("location", &model.base.location)?;
        require("project_id", &model.project_id)?;
        if model.size_gb == 0 {
            return Err(String::from("size_gb must be greater than zero"));
        }
        if model.bootable && model.image.is_none() {
            return Err(String::from("image is required for bootable volumes"));
        }
        Ok(())
    }
}
