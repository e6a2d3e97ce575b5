//! Virtual private clouds.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::family_path;
use crate::adapter::{BaseFields, ResourceKind, require};
use crate::api::RemoteResource;

/// Host state of a VPC.
#[derive(Clone, Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
#[serde(default)]
pub struct VpcModel {
    /// Shared attributes.
    #[serde(flatten)]
    pub base: BaseFields,
    /// Owning project.
    pub project_id: String,
    /// Whether this is the project's default VPC.
    pub default: bool,
    /// Whether the API should create a default subnet and security group.
    pub preset: bool,
}

/// `arubacloud_vpc`.
pub struct Vpc;

impl ResourceKind for Vpc {
    type Model = VpcModel;

    const NAME: &'static str = "vpc";
    const LABEL: &'static str = "VPC";
    const IMPORT_FORMAT: &'static str = "<project_id>/<vpc_id>";

    fn base(model: &Self::Model) -> &BaseFields {
        &model.base
    }

    fn base_mut(model: &mut Self::Model) -> &mut BaseFields {
        &mut model.base
    }

    fn collection_path(model: &Self::Model) -> String {
        format!("{}/vpcs", family_path(&model.project_id, "Network"))
    }

    fn properties(model: &Self::Model) -> Value {
        json!({
            "properties": {
                "default": model.default,
                "preset": model.preset,
            }
        })
    }

    fn apply_properties(model: &mut Self::Model, remote: &RemoteResource) {
        if let Some(default) = remote.bool_property("/default") {
            model.default = default;
        }
    }

    fn from_import_id(parts: &[&str]) -> Option<Self::Model> {
        let [project_id, id] = parts else {
            return None;
        };
        Some(VpcModel {
            base: BaseFields::with_id(id),
            project_id: (*project_id).to_owned(),
            ..VpcModel::default()
        })
    }

    fn validate(model: &Self::Model) -> Result<(), String> {
        require("name", &model.base.name)?;
        require("location", &model.base.location)?;
        require("project_id", &model.project_id)
    }
}
