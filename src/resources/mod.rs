//! Resource kinds managed by the provider.
//!
//! Each kind maps one Aruba Cloud collection onto a typed model; the generic
//! adapter in [`crate::adapter`] does the rest.

mod backup;
mod block_storage;
mod cloud_server;
mod dbaas;
mod elastic_ip;
mod kaas;
mod keypair;
mod kms_key;
mod project;
mod restore;
mod security_group;
mod security_rule;
mod subnet;
mod vpc;

use serde_json::{Value, json};

pub use backup::{Backup, BackupModel};
pub use block_storage::{BlockStorage, BlockStorageModel};
pub use cloud_server::{CloudServer, CloudServerModel};
pub use dbaas::{Dbaas, DbaasModel};
pub use elastic_ip::{ElasticIp, ElasticIpModel};
pub use kaas::{Kaas, KaasModel, NodePool};
pub use keypair::{KeyPair, KeyPairModel};
pub use kms_key::{KmsKey, KmsKeyModel};
pub use project::{Project, ProjectModel};
pub use restore::{Restore, RestoreModel};
pub use security_group::{SecurityGroup, SecurityGroupModel};
pub use security_rule::{SecurityRule, SecurityRuleModel};
pub use subnet::{Subnet, SubnetModel};
pub use vpc::{Vpc, VpcModel};

/// Billing period used when none is configured.
pub const DEFAULT_BILLING_PERIOD: &str = "Hour";

fn default_billing_period() -> String {
    DEFAULT_BILLING_PERIOD.to_owned()
}

/// Path of a provider family inside a project, for example
/// `/projects/p1/providers/Aruba.Network`.
fn family_path(project_id: &str, family: &str) -> String {
    format!("/projects/{project_id}/providers/Aruba.{family}")
}

/// `{"uri": ...}` reference, or `null` when unset.
fn uri_ref(uri: Option<&str>) -> Value {
    uri.map_or(Value::Null, |value| json!({ "uri": value }))
}
