//! Key management service keys.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{default_billing_period, family_path};
use crate::adapter::{BaseFields, ResourceKind, require};

/// Host state of a KMS key.
#[derive(Clone, Debug, Deserialize, Serialize, Eq, PartialEq)]
#[serde(default)]
pub struct KmsKeyModel {
    /// Shared attributes.
    #[serde(flatten)]
    pub base: BaseFields,
    /// Owning project.
    pub project_id: String,
    /// Billing period.
    pub billing_period: String,
}

impl Default for KmsKeyModel {
    fn default() -> Self {
        Self {
            base: BaseFields::default(),
            project_id: String::new(),
            billing_period: default_billing_period(),
        }
    }
}

/// `arubacloud_kms_key`.
pub struct KmsKey;

impl ResourceKind for KmsKey {
    type Model = KmsKeyModel;

    const NAME: &'static str = "kms_key";
    const LABEL: &'static str = "KMS Key";
    const IMPORT_FORMAT: &'static str = "<project_id>/<kms_key_id>";

    fn base(model: &Self::Model) -> &BaseFields {
        &model.base
    }

    fn base_mut(model: &mut Self::Model) -> &mut BaseFields {
        &mut model.base
    }

    fn collection_path(model: &Self::Model) -> String {
        format!("{}/kms", family_path(&model.project_id, "Security"))
    }

    fn properties(model: &Self::Model) -> Value {
        json!({ "billingPeriod": model.billing_period })
    }

    fn from_import_id(parts: &[&str]) -> Option<Self::Model> {
        let [project_id, id] = parts else {
            return None;
        };
        Some(KmsKeyModel {
            base: BaseFields::with_id(id),
            project_id: (*project_id).to_owned(),
            ..KmsKeyModel::default()
        })
    }

    fn validate(model: &Self::Model) -> Result<(), String> {
        require("name", &model.base.name)?;
        require("location", &model.base.location)?;
        require("project_id", &model.project_id)
    }
}
