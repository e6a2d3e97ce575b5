//! Provider registration: type names, factories, and configuration.

use std::sync::Arc;

use tracing::info;

use crate::adapter::{DataSource, ResourceAdapter, ResourceKind, RestAdapter, RestDataSource};
use crate::api::ArubaClient;
pub use crate::api::ClientHandle;
use crate::config::{Diagnostic, Diagnostics, ProviderConfig};
use crate::reconcile::Reconciler;
use crate::resources::{
    Backup, BlockStorage, CloudServer, Dbaas, ElasticIp, Kaas, KeyPair, KmsKey, Project, Restore,
    SecurityGroup, SecurityRule, Subnet, Vpc,
};

/// Prefix of every registered type name.
pub const PROVIDER_PREFIX: &str = "arubacloud";

/// Builds `<prefix>_<resource>`.
#[must_use]
pub fn type_name(resource: &str) -> String {
    format!("{PROVIDER_PREFIX}_{resource}")
}

/// Constructor for one managed resource type.
#[derive(Clone, Debug)]
pub struct ResourceFactory {
    /// Registered type name.
    pub type_name: String,
    /// Builds an adapter bound to a client.
    pub build: fn(ClientHandle, Reconciler) -> Box<dyn ResourceAdapter>,
}

/// Constructor for one data source type.
#[derive(Clone, Debug)]
pub struct DataSourceFactory {
    /// Registered type name.
    pub type_name: String,
    /// Builds a data source bound to a client.
    pub build: fn(ClientHandle) -> Box<dyn DataSource>,
}

fn build_adapter<K: ResourceKind>(
    client: ClientHandle,
    reconciler: Reconciler,
) -> Box<dyn ResourceAdapter> {
    Box::new(RestAdapter::<K>::new(client, reconciler))
}

fn build_data_source<K: ResourceKind>(client: ClientHandle) -> Box<dyn DataSource> {
    Box::new(RestDataSource::<K>::new(client))
}

fn resource<K: ResourceKind>() -> ResourceFactory {
    ResourceFactory {
        type_name: type_name(K::NAME),
        build: build_adapter::<K>,
    }
}

fn data_source<K: ResourceKind>() -> DataSourceFactory {
    DataSourceFactory {
        type_name: type_name(K::NAME),
        build: build_data_source::<K>,
    }
}

/// Entry point the host runtime talks to.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Provider {
    reconciler: Reconciler,
}

impl Provider {
    /// Creates a provider with default polling and backoff.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a provider whose adapters use `reconciler`.
    #[must_use]
    pub const fn with_reconciler(reconciler: Reconciler) -> Self {
        Self { reconciler }
    }

    /// Managed resource types.
    #[must_use]
    pub fn resources() -> Vec<ResourceFactory> {
        vec![
            resource::<Project>(),
            resource::<Vpc>(),
            resource::<Subnet>(),
            resource::<SecurityGroup>(),
            resource::<SecurityRule>(),
            resource::<ElasticIp>(),
            resource::<BlockStorage>(),
            resource::<CloudServer>(),
            resource::<KeyPair>(),
            resource::<Kaas>(),
            resource::<Dbaas>(),
            resource::<KmsKey>(),
            resource::<Backup>(),
            resource::<Restore>(),
        ]
    }

    /// Read-only data source types.
    #[must_use]
    pub fn data_sources() -> Vec<DataSourceFactory> {
        vec![
            data_source::<Project>(),
            data_source::<Vpc>(),
            data_source::<Subnet>(),
            data_source::<SecurityGroup>(),
            data_source::<SecurityRule>(),
            data_source::<ElasticIp>(),
            data_source::<BlockStorage>(),
            data_source::<CloudServer>(),
            data_source::<KeyPair>(),
            data_source::<Kaas>(),
            data_source::<Dbaas>(),
            data_source::<KmsKey>(),
            data_source::<Backup>(),
            data_source::<Restore>(),
        ]
    }

    /// Builds the adapter registered under `type_name`.
    #[must_use]
    pub fn resource(
        &self,
        type_name: &str,
        client: ClientHandle,
    ) -> Option<Box<dyn ResourceAdapter>> {
        Self::resources()
            .into_iter()
            .find(|factory| factory.type_name == type_name)
            .map(|factory| (factory.build)(client, self.reconciler))
    }

    /// Builds the data source registered under `type_name`.
    #[must_use]
    pub fn data_source(
        &self,
        type_name: &str,
        client: ClientHandle,
    ) -> Option<Box<dyn DataSource>> {
        Self::data_sources()
            .into_iter()
            .find(|factory| factory.type_name == type_name)
            .map(|factory| (factory.build)(client))
    }

    /// Validates configuration and builds the shared client.
    ///
    /// # Errors
    ///
    /// Returns [`Diagnostics`] when credentials are missing, the timeout is
    /// invalid, or the HTTP client cannot be constructed.
    pub fn configure(
        config: &ProviderConfig,
        env: &impl Fn(&str) -> Option<String>,
    ) -> Result<ClientHandle, Diagnostics> {
        let settings = config.client_settings(env)?;
        let base_url = settings.base_url.clone();
        let client = ArubaClient::new(settings).map_err(|err| {
            Diagnostics(vec![Diagnostic::error(
                "Unable to create API client",
                err.to_string(),
                "",
            )])
        })?;
        info!(%base_url, "provider configured");
        Ok(Arc::new(client))
    }
}
