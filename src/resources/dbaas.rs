//! Managed database instances.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{default_billing_period, family_path, uri_ref};
use crate::adapter::{BaseFields, ResourceKind, require};
use crate::api::RemoteResource;

/// Host state of a database instance.
#[derive(Clone, Debug, Deserialize, Serialize, Eq, PartialEq)]
#[serde(default)]
pub struct DbaasModel {
    /// Shared attributes.
    #[serde(flatten)]
    pub base: BaseFields,
    /// Owning project.
    pub project_id: String,
    /// Engine identifier, for example `mysql-8.0`.
    pub engine_id: String,
    /// Flavor such as `DBO2A4`.
    pub flavor: String,
    /// Storage size in gigabytes.
    pub storage_size_gb: u32,
    /// VPC the instance joins.
    pub vpc_uri: String,
    /// Subnet the instance joins.
    pub subnet_uri: String,
    /// Security group applied to the instance.
    pub security_group_uri: String,
    /// Optional public address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elastic_ip_uri: Option<String>,
    /// Billing period.
    pub billing_period: String,
}

impl Default for DbaasModel {
    fn default() -> Self {
        Self {
            base: BaseFields::default(),
            project_id: String::new(),
            engine_id: String::new(),
            flavor: String::new(),
            storage_size_gb: 0,
            vpc_uri: String::new(),
            subnet_uri: String::new(),
            security_group_uri: String::new(),
            elastic_ip_uri: None,
            billing_period: default_billing_period(),
        }
    }
}

/// `arubacloud_dbaas`.
pub struct Dbaas;

impl ResourceKind for Dbaas {
    type Model = DbaasModel;

    const NAME: &'static str = "dbaas";
    const LABEL: &'static str = "DBaaS";
    const IMPORT_FORMAT: &'static str = "<project_id>/<dbaas_id>";

    fn base(model: &Self::Model) -> &BaseFields {
        &model.base
    }

    fn base_mut(model: &mut Self::Model) -> &mut BaseFields {
        &mut model.base
    }

    fn collection_path(model: &Self::Model) -> String {
        format!("{}/dbaas", family_path(&model.project_id, "Database"))
    }

    fn properties(model: &Self::Model) -> Value {
        json!({
            "engine": { "id": model.engine_id },
            "flavor": { "name": model.flavor },
            "storage": { "sizeGb": model.storage_size_gb },
            "networking": {
                "vpc": { "uri": model.vpc_uri },
                "subnet": { "uri": model.subnet_uri },
                "securityGroup": { "uri": model.security_group_uri },
                "elasticIp": uri_ref(model.elastic_ip_uri.as_deref()),
            },
            "billingPlan": { "billingPeriod": model.billing_period },
        })
    }

    fn apply_properties(model: &mut Self::Model, remote: &RemoteResource) {
        if let Some(engine) = remote.str_property("/engine/id") {
            model.engine_id = engine;
        }
        if let Some(flavor) = remote.str_property("/flavor/name") {
            model.flavor = flavor;
        }
        if let Some(size) = remote.u32_property("/storage/sizeGb") {
            model.storage_size_gb = size;
        }
    }

    fn from_import_id(parts: &[&str]) -> Option<Self::Model> {
        let [project_id, id] = parts else {
            return None;
        };
        Some(DbaasModel {
            base: BaseFields::with_id(id),
            project_id: (*project_id).to_owned(),
            ..DbaasModel::default()
        })
    }

    fn validate(model: &Self::Model) -> Result<(), String> {
        require("name", &model.base.name)?;
        require("location", &model.base.location)?;
        require("project_id", &model.project_id)?;
        require("engine_id", &model.engine_id)?;
        require("flavor", &model.flavor)?;
        require("vpc_uri", &model.vpc_uri)?;
        require("subnet_uri", &model.subnet_uri)?;
        require("security_group_uri", &model.security_group_uri)?;
        if model.storage_size_gb == 0 {
            return Err(String::from("storage_size_gb must be greater than zero"));
        }
        Ok(())
    }
}
