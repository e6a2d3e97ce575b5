//! SSH key pairs.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::family_path;
use crate::adapter::{BaseFields, ResourceKind, require};

/// Host state of a key pair.
#[derive(Clone, Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
#[serde(default)]
pub struct KeyPairModel {
    /// Shared attributes.
    #[serde(flatten)]
    pub base: BaseFields,
    /// Owning project.
    pub project_id: String,
    /// OpenSSH-formatted public key.
    pub public_key: String,
}

/// `arubacloud_keypair`.
pub struct KeyPair;

impl ResourceKind for KeyPair {
    type Model = KeyPairModel;

    const NAME: &'static str = "keypair";
    const LABEL: &'static str = "Key Pair";
    const IMPORT_FORMAT: &'static str = "<project_id>/<keypair_id>";

    fn base(model: &Self::Model) -> &BaseFields {
        &model.base
    }

    fn base_mut(model: &mut Self::Model) -> &mut BaseFields {
        &mut model.base
    }

    fn collection_path(model: &Self::Model) -> String {
        format!("{}/keyPairs", family_path(&model.project_id, "Compute"))
    }

    fn properties(model: &Self::Model) -> Value {
        json!({ "value": model.public_key })
    }

    fn from_import_id(parts: &[&str]) -> Option<Self::Model> {
        let [project_id, id] = parts else {
            return None;
        };
        Some(KeyPairModel {
            base: BaseFields::with_id(id),
            project_id: (*project_id).to_owned(),
            ..KeyPairModel::default()
        })
    }

    fn validate(model: &Self::Model) -> Result<(), String> {
        require("name", &model.base.name)?;
        require("project_id", &model.project_id)?;
        require("public_key", &model.public_key)?;
        if !model.public_key.trim_start().starts_with("ssh-")
            && !model.public_key.trim_start().starts_with("ecdsa-")
        {
            return Err(String::from("public_key must be an OpenSSH public key"));
        }
        Ok(())
    }
}
