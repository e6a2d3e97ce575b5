//! Subnets inside a VPC.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::family_path;
use crate::adapter::{BaseFields, ResourceKind, require};
use crate::api::RemoteResource;

const SUBNET_TYPES: [&str; 2] = ["Basic", "Advanced"];

/// Host state of a subnet.
#[derive(Clone, Debug, Deserialize, Serialize, Eq, PartialEq)]
#[serde(default)]
pub struct SubnetModel {
    /// Shared attributes.
    #[serde(flatten)]
    pub base: BaseFields,
    /// Owning project.
    pub project_id: String,
    /// Parent VPC.
    pub vpc_id: String,
    /// `Basic` or `Advanced`.
    #[serde(rename = "type")]
    pub subnet_type: String,
    /// Whether this is the VPC's default subnet.
    pub default: bool,
    /// Address range, required for `Advanced` subnets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cidr: Option<String>,
    /// Whether the subnet serves DHCP.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dhcp_enabled: Option<bool>,
}

impl Default for SubnetModel {
    fn default() -> Self {
        Self {
            base: BaseFields::default(),
            project_id: String::new(),
            vpc_id: String::new(),
            subnet_type: String::from("Basic"),
            default: false,
            cidr: None,
            dhcp_enabled: None,
        }
    }
}

/// `arubacloud_subnet`.
pub struct Subnet;

impl ResourceKind for Subnet {
    type Model = SubnetModel;

    const NAME: &'static str = "subnet";
    const LABEL: &'static str = "Subnet";
    const IMPORT_FORMAT: &'static str = "<project_id>/<vpc_id>/<subnet_id>";

    fn base(model: &Self::Model) -> &BaseFields {
        &model.base
    }

    fn base_mut(model: &mut Self::Model) -> &mut BaseFields {
        &mut model.base
    }

    fn collection_path(model: &Self::Model) -> String {
        format!(
            "{}/vpcs/{}/subnets",
            family_path(&model.project_id, "Network"),
            model.vpc_id
        )
    }

    fn properties(model: &Self::Model) -> Value {
        let mut properties = Map::new();
        properties.insert(String::from("type"), json!(model.subnet_type));
        properties.insert(String::from("default"), json!(model.default));
        if let Some(cidr) = &model.cidr {
            properties.insert(String::from("network"), json!({ "address": cidr }));
        }
        if let Some(enabled) = model.dhcp_enabled {
            properties.insert(String::from("dhcp"), json!({ "enabled": enabled }));
        }
        Value::Object(properties)
    }

    fn apply_properties(model: &mut Self::Model, remote: &RemoteResource) {
        if let Some(kind) = remote.str_property("/type") {
            model.subnet_type = kind;
        }
        if let Some(cidr) = remote.str_property("/network/address") {
            model.cidr = Some(cidr);
        }
        if let Some(enabled) = remote.bool_property("/dhcp/enabled") {
            model.dhcp_enabled = Some(enabled);
        }
    }

    fn from_import_id(parts: &[&str]) -> Option<Self::Model> {
        let [project_id, vpc_id, id] = parts else {
            return None;
        };
        Some(SubnetModel {
            base: BaseFields::with_id(id),
            project_id: (*project_id).to_owned(),
            vpc_id: (*vpc_id).to_owned(),
            ..SubnetModel::default()
        })
    }

    fn validate(model: &Self::Model) -> Result<(), String> {
        require("name", &model.base.name)?;
        require("project_id", &model.project_id)?;
        require("vpc_id", &model.vpc_id)?;
        if !SUBNET_TYPES.contains(&model.subnet_type.as_str()) {
            return Err(format!(
                "type must be one of {}, got {:?}",
                SUBNET_TYPES.join(", "),
                model.subnet_type
            ));
        }
        if model.subnet_type == "Advanced" && model.cidr.is_none() {
            return Err(String::from("cidr is required for Advanced subnets"));
        }
        Ok(())
    }
}
