//! Managed Kubernetes clusters.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{default_billing_period, family_path};
use crate::adapter::{BaseFields, ResourceKind, require};
use crate::api::RemoteResource;

/// One worker pool of a cluster.
#[derive(Clone, Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
#[serde(default)]
pub struct NodePool {
    /// Pool name, unique within the cluster.
    pub name: String,
    /// Number of worker nodes.
    pub nodes: u32,
    /// Flavor of each node.
    pub instance: String,
    /// Availability zone.
    pub zone: String,
}

/// Host state of a cluster.
#[derive(Clone, Debug, Deserialize, Serialize, Eq, PartialEq)]
#[serde(default)]
pub struct KaasModel {
    /// Shared attributes.
    #[serde(flatten)]
    pub base: BaseFields,
    /// Owning project.
    pub project_id: String,
    /// VPC hosting the cluster.
    pub vpc_uri: String,
    /// Subnet hosting the nodes.
    pub subnet_uri: String,
    /// Address range assigned to nodes.
    pub node_cidr: String,
    /// Kubernetes version, for example `1.30`.
    pub kubernetes_version: String,
    /// Worker pools.
    pub node_pools: Vec<NodePool>,
    /// Whether the control plane is highly available.
    pub ha: bool,
    /// Billing period.
    pub billing_period: String,
}

impl Default for KaasModel {
    fn default() -> Self {
        Self {
            base: BaseFields::default(),
            project_id: String::new(),
            vpc_uri: String::new(),
            subnet_uri: String::new(),
            node_cidr: String::new(),
            kubernetes_version: String::new(),
            node_pools: Vec::new(),
            ha: false,
            billing_period: default_billing_period(),
        }
    }
}

/// `arubacloud_kaas`.
pub struct Kaas;

impl ResourceKind for Kaas {
    type Model = KaasModel;

    const NAME: &'static str = "kaas";
    const LABEL: &'static str = "KaaS";
    const IMPORT_FORMAT: &'static str = "<project_id>/<kaas_id>";

    fn base(model: &Self::Model) -> &BaseFields {
        &model.base
    }

    fn base_mut(model: &mut Self::Model) -> &mut BaseFields {
        &mut model.base
    }

    fn collection_path(model: &Self::Model) -> String {
        format!("{}/kaas", family_path(&model.project_id, "Container"))
    }

    fn properties(model: &Self::Model) -> Value {
        let pools: Vec<Value> = model
            .node_pools
            .iter()
            .map(|pool| {
                json!({
                    "name": pool.name,
                    "nodes": pool.nodes,
                    "instance": pool.instance,
                    "dataCenter": pool.zone,
                })
            })
            .collect();
        json!({
            "vpc": { "uri": model.vpc_uri },
            "subnet": { "uri": model.subnet_uri },
            "nodeCidr": { "address": model.node_cidr },
            "kubernetesVersion": { "value": model.kubernetes_version },
            "nodePools": pools,
            "ha": model.ha,
            "billingPlan": { "billingPeriod": model.billing_period },
        })
    }

    fn apply_properties(model: &mut Self::Model, remote: &RemoteResource) {
        if let Some(version) = remote.str_property("/kubernetesVersion/value") {
            model.kubernetes_version = version;
        }
        if let Some(ha) = remote.bool_property("/ha") {
            model.ha = ha;
        }
    }

    fn from_import_id(parts: &[&str]) -> Option<Self::Model> {
        let [project_id, id] = parts else {
            return None;
        };
        Some(KaasModel {
            base: BaseFields::with_id(id),
            project_id: (*project_id).to_owned(),
            ..KaasModel::default()
        })
    }

    fn validate(model: &Self::Model) -> Result<(), String> {
        require("name", &model.base.name)?;
        require("location", &model.base.location)?;
        require("project_id", &model.project_id)?;
        require("vpc_uri", &model.vpc_uri)?;
        require("subnet_uri", &model.subnet_uri)?;
        require("node_cidr", &model.node_cidr)?;
        require("kubernetes_version", &model.kubernetes_version)?;
        if model.node_pools.is_empty() {
            return Err(String::from("node_pools must define at least one pool"));
        }
        for pool in &model.node_pools {
            require("node_pools.name", &pool.name)?;
            require("node_pools.instance", &pool.instance)?;
            if pool.nodes == 0 {
                return Err(format!("node pool {} must have at least one node", pool.name));
            }
        }
        Ok(())
    }
}
