//! Per-resource field mapping used by the generic REST adapter.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::api::RemoteResource;

/// Attributes shared by every managed resource.
///
/// Flattened into each resource model so host state stays a single object.
#[derive(Clone, Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
#[serde(default)]
pub struct BaseFields {
    /// Identifier issued by the API; computed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name.
    pub name: String,
    /// Region, for example `ITBG-Bergamo`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub location: String,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Canonical URI other resources use to reference this one; computed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Last reported lifecycle state; computed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl BaseFields {
    /// Creates fields carrying only an identifier.
    #[must_use]
    pub fn with_id(id: &str) -> Self {
        Self {
            id: Some(id.to_owned()),
            ..Self::default()
        }
    }

    /// Copies identity, naming and state from a remote resource.
    ///
    /// Absent remote values leave the current ones untouched.
    pub fn absorb(&mut self, remote: &RemoteResource) {
        let metadata = &remote.metadata;
        if let Some(id) = metadata.id.as_ref().filter(|id| !id.is_empty()) {
            self.id = Some(id.clone());
        }
        if let Some(name) = &metadata.name {
            self.name.clone_from(name);
        }
        if let Some(location) = &metadata.location {
            self.location.clone_from(&location.value);
        }
        if !metadata.tags.is_empty() {
            self.tags.clone_from(&metadata.tags);
        }
        if metadata.uri.is_some() {
            self.uri.clone_from(&metadata.uri);
        }
        self.state = Some(remote.state().to_owned());
    }
}

/// Builds the `{metadata, properties}` request envelope.
#[must_use]
pub fn envelope(base: &BaseFields, properties: Value) -> Value {
    let mut metadata = Map::new();
    metadata.insert(String::from("name"), Value::String(base.name.clone()));
    if !base.location.is_empty() {
        metadata.insert(String::from("location"), json!({ "value": base.location }));
    }
    metadata.insert(String::from("tags"), json!(base.tags));
    json!({ "metadata": metadata, "properties": properties })
}

/// Fails with `"<field> is required"` when `value` is blank.
///
/// # Errors
///
/// Returns the message when `value` is empty or whitespace.
pub fn require(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} is required"));
    }
    Ok(())
}

/// Mapping between host state and the remote API for one resource type.
pub trait ResourceKind: 'static {
    /// Typed host state.
    type Model: Clone + Default + DeserializeOwned + Serialize + Send + Sync;

    /// Resource suffix of the registered type name, for example `vpc`.
    const NAME: &'static str;
    /// Label used in logs and errors, for example `VPC`.
    const LABEL: &'static str;
    /// Shape of the import identifier, for example `<project_id>/<vpc_id>`.
    const IMPORT_FORMAT: &'static str;

    /// Shared attributes of a model.
    fn base(model: &Self::Model) -> &BaseFields;

    /// Mutable access to the shared attributes.
    fn base_mut(model: &mut Self::Model) -> &mut BaseFields;

    /// Path of the collection the resource lives in.
    fn collection_path(model: &Self::Model) -> String;

    /// Resource-specific `properties` of the request body.
    fn properties(model: &Self::Model) -> Value;

    /// Copies computed properties from a remote resource.
    fn apply_properties(_model: &mut Self::Model, _remote: &RemoteResource) {}

    /// Builds a model from the `/`-separated parts of an import identifier.
    fn from_import_id(parts: &[&str]) -> Option<Self::Model>;

    /// Checks planned state before any request is sent.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first offending attribute.
    fn validate(model: &Self::Model) -> Result<(), String> {
        require("name", &Self::base(model).name)
    }

    /// Remote identifier, when known.
    fn id(model: &Self::Model) -> Option<&str> {
        Self::base(model)
            .id
            .as_deref()
            .filter(|id| !id.is_empty())
    }

    /// Path of one resource.
    fn item_path(model: &Self::Model, id: &str) -> String {
        format!("{}/{id}", Self::collection_path(model))
    }

    /// Full request body.
    fn request_body(model: &Self::Model) -> Value {
        envelope(Self::base(model), Self::properties(model))
    }

    /// Copies everything the API reports back into the model.
    fn apply_remote(model: &mut Self::Model, remote: &RemoteResource) {
        Self::base_mut(model).absorb(remote);
        Self::apply_properties(model, remote);
    }
}
