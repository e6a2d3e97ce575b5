//! Generic adapter and data source for resources exposed as REST collections.

use std::future::Future;
use std::marker::PhantomData;
use std::time::Duration;

use serde_json::Value;
use tokio::time::Instant;
use tracing::{error, info};

use crate::api::{ApiResponse, ArubaClient, ClientHandle, RemoteResource, TransportError};
use crate::provider::type_name;
use crate::reconcile::{Introspect, Reconciler, ReconcileError, ResourceRef, describe_response};

use super::kind::ResourceKind;
use super::{AdapterFuture, DataSource, OperationContext, ReadOutcome, ResourceAdapter};

/// [`ResourceAdapter`] implemented once for any [`ResourceKind`].
pub struct RestAdapter<K> {
    client: ClientHandle,
    reconciler: Reconciler,
    kind: PhantomData<fn() -> K>,
}

impl<K: ResourceKind> RestAdapter<K> {
    /// Creates an adapter using `client` for requests and `reconciler` for
    /// readiness and deletion.
    #[must_use]
    pub const fn new(client: ClientHandle, reconciler: Reconciler) -> Self {
        Self {
            client,
            reconciler,
            kind: PhantomData,
        }
    }

    async fn create_resource(
        &self,
        ctx: &OperationContext,
        planned: Value,
    ) -> Result<Value, ReconcileError> {
        let mut model = decode_state::<K>(planned)?;
        K::validate(&model).map_err(invalid_state::<K>)?;

        let path = K::collection_path(&model);
        let body = K::request_body(&model);
        info!(
            resource_type = K::LABEL,
            operation_id = %ctx.operation_id,
            %path,
            "creating resource"
        );
        // No identifier exists yet; cancellation reports the planned name.
        let pending = K::base(&model).name.as_str();
        let response =
            cancellable::<K, _>(ctx, "create", pending, self.client.post(&path, &body)).await?;
        ensure_success::<K>(ctx, "create", &response)?;

        let created = decode_remote::<K>(response.body)?;
        let id = created
            .metadata
            .id
            .clone()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ReconcileError::MissingIdentifier {
                label: K::LABEL.to_owned(),
            })?;
        K::apply_remote(&mut model, &created);

        let item = K::item_path(&model, &id);
        self.await_ready(ctx, &item, &id, ctx.timeouts.create).await?;
        let refreshed = fetch::<K>(&self.client, ctx, "create", &item, &id)
            .await?
            .ok_or_else(|| not_found::<K>(&id))?;
        K::apply_remote(&mut model, &refreshed);
        info!(
            resource_type = K::LABEL,
            resource_id = %id,
            operation_id = %ctx.operation_id,
            "resource created"
        );
        encode_state::<K>(&model)
    }

    async fn read_resource(
        &self,
        ctx: &OperationContext,
        current: Value,
    ) -> Result<ReadOutcome, ReconcileError> {
        let mut model = decode_state::<K>(current)?;
        let id = require_id::<K>(&model)?;
        let path = K::item_path(&model, &id);

        if let Some(remote) = fetch::<K>(&self.client, ctx, "read", &path, &id).await? {
            K::apply_remote(&mut model, &remote);
            return encode_state::<K>(&model).map(ReadOutcome::Present);
        }
        info!(
            resource_type = K::LABEL,
            resource_id = %id,
            operation_id = %ctx.operation_id,
            "resource no longer exists"
        );
        Ok(ReadOutcome::Gone)
    }

    async fn update_resource(
        &self,
        ctx: &OperationContext,
        prior: Value,
        planned: Value,
    ) -> Result<Value, ReconcileError> {
        let previous = decode_state::<K>(prior)?;
        let id = require_id::<K>(&previous)?;
        let mut model = decode_state::<K>(planned)?;
        K::base_mut(&mut model).id = Some(id.clone());
        K::validate(&model).map_err(invalid_state::<K>)?;

        let path = K::item_path(&model, &id);
        let body = K::request_body(&model);
        info!(
            resource_type = K::LABEL,
            resource_id = %id,
            operation_id = %ctx.operation_id,
            "updating resource"
        );
        let response = cancellable::<K, _>(ctx, "update", &id, self.client.put(&path, &body)).await?;
        ensure_success::<K>(ctx, "update", &response)?;

        self.await_ready(ctx, &path, &id, ctx.timeouts.update).await?;
        let refreshed = fetch::<K>(&self.client, ctx, "update", &path, &id)
            .await?
            .ok_or_else(|| not_found::<K>(&id))?;
        K::apply_remote(&mut model, &refreshed);
        encode_state::<K>(&model)
    }

    async fn delete_resource(
        &self,
        ctx: &OperationContext,
        current: Value,
    ) -> Result<(), ReconcileError> {
        let model = decode_state::<K>(current)?;
        let id = require_id::<K>(&model)?;
        let path = K::item_path(&model, &id);

        let client: &ArubaClient = &self.client;
        let target = path.as_str();
        let report = self
            .reconciler
            .deleter
            .delete(
                move || client.delete(target),
                ResourceRef::new(K::LABEL, &id),
                ctx.timeouts.delete,
                &ctx.cancel,
            )
            .await?;
        info!(
            resource_type = K::LABEL,
            resource_id = %id,
            operation_id = %ctx.operation_id,
            attempts = report.attempts,
            already_gone = report.gone,
            "resource deleted"
        );
        Ok(())
    }

    async fn import_resource(
        &self,
        ctx: &OperationContext,
        import_id: &str,
    ) -> Result<Value, ReconcileError> {
        let parts: Vec<&str> = import_id.split('/').map(str::trim).collect();
        let parsed = if parts.iter().any(|part| part.is_empty()) {
            None
        } else {
            K::from_import_id(&parts)
        };
        let mut model = parsed.ok_or_else(|| ReconcileError::InvalidImportId {
            label: K::LABEL.to_owned(),
            import_id: import_id.to_owned(),
            expected: K::IMPORT_FORMAT.to_owned(),
        })?;
        let id = require_id::<K>(&model)?;
        let path = K::item_path(&model, &id);

        let remote = fetch::<K>(&self.client, ctx, "import", &path, &id)
            .await?
            .ok_or_else(|| not_found::<K>(&id))?;
        K::apply_remote(&mut model, &remote);
        encode_state::<K>(&model)
    }

    async fn await_ready(
        &self,
        ctx: &OperationContext,
        path: &str,
        id: &str,
        timeout: Duration,
    ) -> Result<String, ReconcileError> {
        let client: &ArubaClient = &self.client;
        self.reconciler
            .poller
            .wait_until_ready(
                move || async move {
                    let response = client.get(path).await.map_err(|err| err.to_string())?;
                    if response.is_error() {
                        return Err(describe_response(&response));
                    }
                    let remote = decode_remote::<K>(response.body).map_err(|err| err.to_string())?;
                    Ok(remote.state().to_owned())
                },
                ResourceRef::new(K::LABEL, id),
                timeout,
                &ctx.cancel,
            )
            .await
    }
}

impl<K: ResourceKind> ResourceAdapter for RestAdapter<K> {
    fn type_name(&self) -> String {
        type_name(K::NAME)
    }

    fn create<'a>(&'a self, ctx: &'a OperationContext, planned: Value) -> AdapterFuture<'a, Value> {
        Box::pin(self.create_resource(ctx, planned))
    }

    fn read<'a>(
        &'a self,
        ctx: &'a OperationContext,
        current: Value,
    ) -> AdapterFuture<'a, ReadOutcome> {
        Box::pin(self.read_resource(ctx, current))
    }

    fn update<'a>(
        &'a self,
        ctx: &'a OperationContext,
        prior: Value,
        planned: Value,
    ) -> AdapterFuture<'a, Value> {
        Box::pin(self.update_resource(ctx, prior, planned))
    }

    fn delete<'a>(&'a self, ctx: &'a OperationContext, current: Value) -> AdapterFuture<'a, ()> {
        Box::pin(self.delete_resource(ctx, current))
    }

    fn import<'a>(
        &'a self,
        ctx: &'a OperationContext,
        import_id: &'a str,
    ) -> AdapterFuture<'a, Value> {
        Box::pin(self.import_resource(ctx, import_id))
    }
}

/// [`DataSource`] implemented once for any [`ResourceKind`].
pub struct RestDataSource<K> {
    client: ClientHandle,
    kind: PhantomData<fn() -> K>,
}

impl<K: ResourceKind> RestDataSource<K> {
    /// Creates a data source using `client` for requests.
    #[must_use]
    pub const fn new(client: ClientHandle) -> Self {
        Self {
            client,
            kind: PhantomData,
        }
    }

    async fn read_existing(
        &self,
        ctx: &OperationContext,
        config: Value,
    ) -> Result<Value, ReconcileError> {
        let mut model = decode_state::<K>(config)?;
        let id = require_id::<K>(&model)?;
        let path = K::item_path(&model, &id);
        let remote = fetch::<K>(&self.client, ctx, "read", &path, &id)
            .await?
            .ok_or_else(|| not_found::<K>(&id))?;
        K::apply_remote(&mut model, &remote);
        encode_state::<K>(&model)
    }
}

impl<K: ResourceKind> DataSource for RestDataSource<K> {
    fn type_name(&self) -> String {
        type_name(K::NAME)
    }

    fn read<'a>(&'a self, ctx: &'a OperationContext, config: Value) -> AdapterFuture<'a, Value> {
        Box::pin(self.read_existing(ctx, config))
    }
}

/// GETs one resource; `None` means the API answered 404.
async fn fetch<K: ResourceKind>(
    client: &ArubaClient,
    ctx: &OperationContext,
    operation: &str,
    path: &str,
    id: &str,
) -> Result<Option<RemoteResource>, ReconcileError> {
    let response = cancellable::<K, _>(ctx, operation, id, client.get(path)).await?;
    if response.is_not_found() {
        return Ok(None);
    }
    ensure_success::<K>(ctx, operation, &response)?;
    decode_remote::<K>(response.body).map(Some)
}

/// Races a single remote call against the context's cancellation.
async fn cancellable<K: ResourceKind, T>(
    ctx: &OperationContext,
    operation: &str,
    id: &str,
    call: impl Future<Output = Result<T, TransportError>>,
) -> Result<T, ReconcileError> {
    let started = Instant::now();
    tokio::select! {
        biased;
        () = ctx.cancel.cancelled() => Err(ReconcileError::Cancelled {
            operation: operation.to_owned(),
            label: K::LABEL.to_owned(),
            id: id.to_owned(),
            elapsed: started.elapsed(),
        }),
        result = call => result.map_err(ReconcileError::from),
    }
}

fn ensure_success<K: ResourceKind>(
    ctx: &OperationContext,
    operation: &str,
    response: &ApiResponse,
) -> Result<(), ReconcileError> {
    if !response.is_error() {
        return Ok(());
    }
    if let Some(payload) = response.error_payload() {
        error!(
            resource_type = K::LABEL,
            operation,
            operation_id = %ctx.operation_id,
            status = response.status_code,
            payload = %payload,
            "API request failed"
        );
    }
    Err(ReconcileError::Api {
        status: response.status_code,
        message: format!(
            "failed to {operation} {}: {}",
            K::LABEL,
            describe_response(response)
        ),
    })
}

fn decode_state<K: ResourceKind>(state: Value) -> Result<K::Model, ReconcileError> {
    serde_json::from_value(state).map_err(|err| invalid_state::<K>(err.to_string()))
}

fn encode_state<K: ResourceKind>(model: &K::Model) -> Result<Value, ReconcileError> {
    serde_json::to_value(model).map_err(|err| ReconcileError::Decode {
        label: K::LABEL.to_owned(),
        message: err.to_string(),
    })
}

fn decode_remote<K: ResourceKind>(body: Option<Value>) -> Result<RemoteResource, ReconcileError> {
    let Some(value) = body else {
        return Ok(RemoteResource::default());
    };
    serde_json::from_value(value).map_err(|err| ReconcileError::Decode {
        label: K::LABEL.to_owned(),
        message: err.to_string(),
    })
}

fn require_id<K: ResourceKind>(model: &K::Model) -> Result<String, ReconcileError> {
    K::id(model)
        .map(str::to_owned)
        .ok_or_else(|| invalid_state::<K>(String::from("id is required")))
}

fn invalid_state<K: ResourceKind>(message: String) -> ReconcileError {
    ReconcileError::InvalidState {
        label: K::LABEL.to_owned(),
        message,
    }
}

fn not_found<K: ResourceKind>(id: &str) -> ReconcileError {
    ReconcileError::NotFound {
        label: K::LABEL.to_owned(),
        id: id.to_owned(),
    }
}
