//! Security groups attached to a VPC.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::family_path;
use crate::adapter::{BaseFields, ResourceKind, require};

/// Host state of a security group.
#[derive(Clone, Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
#[serde(default)]
pub struct SecurityGroupModel {
    /// Shared attributes.
    #[serde(flatten)]
    pub base: BaseFields,
    /// Owning project.
    pub project_id: String,
    /// Parent VPC.
    pub vpc_id: String,
    /// Whether this is the VPC's default group.
    pub default: bool,
}

/// `arubacloud_security_group`.
pub struct SecurityGroup;

impl ResourceKind for SecurityGroup {
    type Model = SecurityGroupModel;

    const NAME: &'static str = "security_group";
    const LABEL: &'static str = "Security Group";
    const IMPORT_FORMAT: &'static str = "<project_id>/<vpc_id>/<security_group_id>";

    fn base(model: &Self::Model) -> &BaseFields {
        &model.base
    }

    fn base_mut(model: &mut Self::Model) -> &mut BaseFields {
        &mut model.base
    }

    fn collection_path(model: &Self::Model) -> String {
        format!(
            "{}/vpcs/{}/securityGroups",
            family_path(&model.project_id, "Network"),
            model.vpc_id
        )
    }

    fn properties(model: &Self::Model) -> Value {
        json!({ "default": model.default })
    }

    fn from_import_id(parts: &[&str]) -> Option<Self::Model> {
        let [project_id, vpc_id, id] = parts else {
            return None;
        };
        Some(SecurityGroupModel {
            base: BaseFields::with_id(id),
            project_id: (*project_id).to_owned(),
            vpc_id: (*vpc_id).to_owned(),
            ..SecurityGroupModel::default()
        })
    }

    fn validate(model: &Self::Model) -> Result<(), String> {
        require("name", &model.base.name)?;
        require("project_id", &model.project_id)?;
        require("vpc_id", &model.vpc_id)
    }
}
