//! Cloud servers (virtual machines).

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{family_path, uri_ref};
use crate::adapter::{BaseFields, ResourceKind, require};
use crate::api::RemoteResource;

/// Host state of a cloud server.
///
/// Network and storage attachments are referenced by URI, as reported in the
/// `uri` attribute of the referenced resources.
#[derive(Clone, Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
#[serde(default)]
pub struct CloudServerModel {
    /// Shared attributes.
    #[serde(flatten)]
    pub base: BaseFields,
    /// Owning project.
    pub project_id: String,
    /// Availability zone inside the region.
    pub zone: String,
    /// Flavor such as `CSO4A8`.
    pub flavor_name: String,
    /// VPC the server joins.
    pub vpc_uri: String,
    /// Bootable block storage volume.
    pub boot_volume_uri: String,
    /// SSH key pair installed at boot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_pair_uri: Option<String>,
    /// Elastic IP bound to the primary interface.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elastic_ip_uri: Option<String>,
    /// Subnets the server is attached to.
    pub subnet_uris: Vec<String>,
    /// Security groups applied to the server.
    pub security_group_uris: Vec<String>,
}

/// `arubacloud_cloud_server`.
pub struct CloudServer;

fn uri_list(uris: &[String]) -> Value {
    Value::Array(uris.iter().map(|uri| json!({ "uri": uri })).collect())
}

impl ResourceKind for CloudServer {
    type Model = CloudServerModel;

    const NAME: &'static str = "cloud_server";
    const LABEL: &'static str = "Cloud Server";
    const IMPORT_FORMAT: &'static str = "<project_id>/<cloud_server_id>";

    fn base(model: &Self::Model) -> &BaseFields {
        &model.base
    }

    fn base_mut(model: &mut Self::Model) -> &mut BaseFields {
        &mut model.base
    }

    fn collection_path(model: &Self::Model) -> String {
        format!("{}/cloudServers", family_path(&model.project_id, "Compute"))
    }

    fn properties(model: &Self::Model) -> Value {
        json!({
            "zone": model.zone,
            "flavorName": model.flavor_name,
            "vpc": { "uri": model.vpc_uri },
            "bootVolume": { "uri": model.boot_volume_uri },
            "keyPair": uri_ref(model.key_pair_uri.as_deref()),
            "elasticIp": uri_ref(model.elastic_ip_uri.as_deref()),
            "subnets": uri_list(&model.subnet_uris),
            "securityGroups": uri_list(&model.security_group_uris),
        })
    }

    fn apply_properties(model: &mut Self::Model, remote: &RemoteResource) {
        if let Some(flavor) = remote.str_property("/flavor/name") {
            model.flavor_name = flavor;
        }
        if let Some(zone) = remote.str_property("/zone") {
            model.zone = zone;
        }
    }

    fn from_import_id(parts: &[&str]) -> Option<Self::Model> {
        let [project_id, id] = parts else {
            return None;
        };
        Some(CloudServerModel {
            base: BaseFields::with_id(id),
            project_id: (*project_id).to_owned(),
            ..CloudServerModel::default()
        })
    }

    fn validate(model: &Self::Model) -> Result<(), String> {
        require("name", &model.base.name)?;
        require("location", &model.base.location)?;
        require("project_id", &model.project_id)?;
        require("zone", &model.zone)?;
        require("flavor_name", &model.flavor_name)?;
        require("vpc_uri", &model.vpc_uri)?;
        require("boot_volume_uri", &model.boot_volume_uri)?;
        if model.subnet_uris.is_empty() {
            return Err(String::from("subnet_uris must list at least one subnet"));
        }
        Ok(())
    }
}
