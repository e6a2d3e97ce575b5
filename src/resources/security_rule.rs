//! Ingress and egress rules of a security group.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::family_path;
use crate::adapter::{BaseFields, ResourceKind, require};
use crate::api::RemoteResource;

const DIRECTIONS: [&str; 2] = ["Ingress", "Egress"];
const TARGET_KINDS: [&str; 2] = ["Ip", "SecurityGroup"];

/// Host state of a security rule.
#[derive(Clone, Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
#[serde(default)]
pub struct SecurityRuleModel {
    /// Shared attributes.
    #[serde(flatten)]
    pub base: BaseFields,
    /// Owning project.
    pub project_id: String,
    /// VPC of the parent group.
    pub vpc_id: String,
    /// Parent security group.
    pub security_group_id: String,
    /// `Ingress` or `Egress`.
    pub direction: String,
    /// Protocol such as `TCP`, `UDP`, `ICMP` or `ANY`.
    pub protocol: String,
    /// Port or port range, for example `22` or `8000-8080`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    /// `Ip` or `SecurityGroup`.
    pub target_kind: String,
    /// CIDR block or security group URI matching `target_kind`.
    pub target_value: String,
}

/// `arubacloud_security_rule`.
pub struct SecurityRule;

impl ResourceKind for SecurityRule {
    type Model = SecurityRuleModel;

    const NAME: &'static str = "security_rule";
    const LABEL: &'static str = "Security Rule";
    const IMPORT_FORMAT: &'static str =
        "<project_id>/<vpc_id>/<security_group_id>/<security_rule_id>";

    fn base(model: &Self::Model) -> &BaseFields {
        &model.base
    }

    fn base_mut(model: &mut Self::Model) -> &mut BaseFields {
        &mut model.base
    }

    fn collection_path(model: &Self::Model) -> String {
        format!(
            "{}/vpcs/{}/securityGroups/{}/securityRules",
            family_path(&model.project_id, "Network"),
            model.vpc_id,
            model.security_group_id
        )
    }

    fn properties(model: &Self::Model) -> Value {
        json!({
            "direction": model.direction,
            "protocol": model.protocol,
            "port": model.port,
            "target": {
                "kind": model.target_kind,
                "value": model.target_value,
            },
        })
    }

    fn apply_properties(model: &mut Self::Model, remote: &RemoteResource) {
        if let Some(direction) = remote.str_property("/direction") {
            model.direction = direction;
        }
        if let Some(protocol) = remote.str_property("/protocol") {
            model.protocol = protocol;
        }
        if let Some(port) = remote.str_property("/port") {
            model.port = Some(port);
        }
        if let Some(kind) = remote.str_property("/target/kind") {
            model.target_kind = kind;
        }
        if let Some(value) = remote.str_property("/target/value") {
            model.target_value = value;
        }
    }

    fn from_import_id(parts: &[&str]) -> Option<Self::Model> {
        let [project_id, vpc_id, security_group_id, id] = parts else {
            return None;
        };
        Some(SecurityRuleModel {
            base: BaseFields::with_id(id),
            project_id: (*project_id).to_owned(),
            vpc_id: (*vpc_id).to_owned(),
            security_group_id: (*security_group_id).to_owned(),
            ..SecurityRuleModel::default()
        })
    }

    fn validate(model: &Self::Model) -> Result<(), String> {
        require("name", &model.base.name)?;
        require("project_id", &model.project_id)?;
        require("vpc_id", &model.vpc_id)?;
        require("security_group_id", &model.security_group_id)?;
        require("protocol", &model.protocol)?;
        require("target_value", &model.target_value)?;
        if !DIRECTIONS.contains(&model.direction.as_str()) {
            return Err(format!(
                "direction must be Ingress or Egress, got {:?}",
                model.direction
            ));
        }
        if !TARGET_KINDS.contains(&model.target_kind.as_str()) {
            return Err(format!(
                "target_kind must be Ip or SecurityGroup, got {:?}",
                model.target_kind
            ));
        }
        Ok(())
    }
}
