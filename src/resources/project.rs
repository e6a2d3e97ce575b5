//! Projects: the top-level container every other resource lives in.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::adapter::{BaseFields, ResourceKind};
use crate::api::RemoteResource;

/// Host state of a project.
#[derive(Clone, Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
#[serde(default)]
pub struct ProjectModel {
    /// Shared attributes.
    #[serde(flatten)]
    pub base: BaseFields,
    /// Free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether this is the account's default project.
    pub default: bool,
}

/// `arubacloud_project`.
pub struct Project;

impl ResourceKind for Project {
    type Model = ProjectModel;

    const NAME: &'static str = "project";
    const LABEL: &'static str = "Project";
    const IMPORT_FORMAT: &'static str = "<project_id>";

    fn base(model: &Self::Model) -> &BaseFields {
        &model.base
    }

    fn base_mut(model: &mut Self::Model) -> &mut BaseFields {
        &mut model.base
    }

    fn collection_path(_model: &Self::Model) -> String {
        String::from("/projects")
    }

    fn properties(model: &Self::Model) -> Value {
        json!({
            "description": model.description,
            "default": model.default,
        })
    }

    fn apply_properties(model: &mut Self::Model, remote: &RemoteResource) {
        if let Some(description) = remote.str_property("/description") {
            model.description = Some(description);
        }
        if let Some(default) = remote.bool_property("/default") {
            model.default = default;
        }
    }

    fn from_import_id(parts: &[&str]) -> Option<Self::Model> {
        match parts {
            [id] => Some(ProjectModel {
                base: BaseFields::with_id(id),
                ..ProjectModel::default()
            }),
            _ => None,
        }
    }
}
