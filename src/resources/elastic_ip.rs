//! Public elastic IP addresses.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{default_billing_period, family_path};
use crate::adapter::{BaseFields, ResourceKind, require};
use crate::api::RemoteResource;

/// Host state of an elastic IP.
#[derive(Clone, Debug, Deserialize, Serialize, Eq, PartialEq)]
#[serde(default)]
pub struct ElasticIpModel {
    /// Shared attributes.
    #[serde(flatten)]
    pub base: BaseFields,
    /// Owning project.
    pub project_id: String,
    /// Billing period, for example `Hour` or `Month`.
    pub billing_period: String,
    /// Allocated address; computed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Default for ElasticIpModel {
    fn default() -> Self {
        Self {
            base: BaseFields::default(),
            project_id: String::new(),
            billing_period: default_billing_period(),
            address: None,
        }
    }
}

/// `arubacloud_elastic_ip`.
pub struct ElasticIp;

impl ResourceKind for ElasticIp {
    type Model = ElasticIpModel;

    const NAME: &'static str = "elastic_ip";
    const LABEL: &'static str = "Elastic IP";
    const IMPORT_FORMAT: &'static str = "<project_id>/<elastic_ip_id>";

    fn base(model: &Self::Model) -> &BaseFields {
        &model.base
    }

    fn base_mut(model: &mut Self::Model) -> &mut BaseFields {
        &mut model.base
    }

    fn collection_path(model: &Self::Model) -> String {
        format!("{}/elasticIps", family_path(&model.project_id, "Network"))
    }

    fn properties(model: &Self::Model) -> Value {
        json!({ "billingPlan": { "billingPeriod": model.billing_period } })
    }

    fn apply_properties(model: &mut Self::Model, remote: &RemoteResource) {
        if let Some(address) = remote.str_property("/address") {
            model.address = Some(address);
        }
        if let Some(period) = remote.str_property("/billingPlan/billingPeriod") {
            model.billing_period = period;
        }
    }

    fn from_import_id(parts: &[&str]) -> Option<Self::Model> {
        let [project_id, id] = parts else {
            return None;
        };
        Some(ElasticIpModel {
            base: BaseFields::with_id(id),
            project_id: (*project_id).to_owned(),
            ..ElasticIpModel::default()
        })
    }

    fn validate(model: &Self::Model) -> Result<(), String> {
        require("name", &model.base.name)?;
        require("location", &model.base.location)?;
        require("project_id", &model.project_id)
    }
}
