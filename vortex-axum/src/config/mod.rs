//! Process-wide gateway configuration.
//!
//! Hosts either hand over a ready [`VortexConfig`] at startup
//! ([`GatewayState::eager`]) or an async loader that is run on the first
//! request ([`GatewayState::lazy`]). The resolved [`Gateway`] is memoized in a
//! `tokio::sync::OnceCell`: concurrent first requests share a single
//! initialization, and a failed load is retried by the next request instead
//! of being cached.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use tokio::sync::OnceCell;
use vortex_core::client::{HttpVortexClient, VortexClient, VortexSettings};
use vortex_core::types::Identity;

use crate::authz::{AccessPolicy, Operation, Resource};
use crate::error::AppError;
use crate::middleware::RequestContext;

/// Host-supplied authentication seam: map an inbound request to the
/// authenticated principal, or `None` when there is none. A `None` is not an
/// error by itself; the access gate decides what it means.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve(&self, request: &RequestContext) -> Option<Identity>;
}

struct FnResolver<F>(F);

#[async_trait]
impl<F, Fut> IdentityResolver for FnResolver<F>
where
    F: Fn(RequestContext) -> Fut + Send + Sync,
    Fut: Future<Output = Option<Identity>> + Send,
{
    async fn resolve(&self, request: &RequestContext) -> Option<Identity> {
        (self.0)(request.clone()).await
    }
}

/// Wrap a plain async closure into an `Arc<dyn IdentityResolver>`.
pub fn identity_resolver<F, Fut>(f: F) -> Arc<dyn IdentityResolver>
where
    F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Option<Identity>> + Send + 'static,
{
    Arc::new(FnResolver(f))
}

/// Everything the gateway needs, assembled by the host once.
#[derive(Default)]
pub struct VortexConfig {
    pub settings: Option<VortexSettings>,
    pub identity: Option<Arc<dyn IdentityResolver>>,
    pub access: AccessPolicy,
    pub client: Option<Arc<dyn VortexClient>>,
}

impl VortexConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connection settings for the default HTTP client. Ignored when a client
    /// override is injected; when neither is given, settings come from the
    /// environment at initialization time.
    pub fn with_settings(mut self, settings: VortexSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn with_identity_resolver(mut self, resolver: Arc<dyn IdentityResolver>) -> Self {
        self.identity = Some(resolver);
        self
    }

    pub fn with_access_policy(mut self, access: AccessPolicy) -> Self {
        self.access = access;
        self
    }

    /// Substitute the delegate implementation, e.g. a mock in tests.
    pub fn with_client(mut self, client: Arc<dyn VortexClient>) -> Self {
        self.client = Some(client);
        self
    }
}

/// The resolved, immutable runtime: read-mostly and shared across requests.
pub struct Gateway {
    client: Arc<dyn VortexClient>,
    identity: Option<Arc<dyn IdentityResolver>>,
    access: AccessPolicy,
}

impl Gateway {
    fn from_config(config: VortexConfig) -> Result<Self, AppError> {
        let client = match config.client {
            Some(client) => client,
            None => {
                let settings = match config.settings {
                    Some(settings) => settings,
                    None => VortexSettings::from_env().map_err(AppError::Config)?,
                };
                let client =
                    HttpVortexClient::new(settings).map_err(|e| AppError::Config(e.into()))?;
                Arc::new(client) as Arc<dyn VortexClient>
            }
        };

        Ok(Self {
            client,
            identity: config.identity,
            access: config.access,
        })
    }

    pub fn client(&self) -> &dyn VortexClient {
        self.client.as_ref()
    }

    pub fn identity_resolver(&self) -> Option<&Arc<dyn IdentityResolver>> {
        self.identity.as_ref()
    }

    pub async fn resolve_identity(&self, request: &RequestContext) -> Option<Identity> {
        match &self.identity {
            Some(resolver) => resolver.resolve(request).await,
            None => None,
        }
    }

    /// The shared pipeline prefix: resolve the identity, then evaluate the
    /// access gate for `operation` against `resource`. Returns the identity
    /// for handlers that need it after the gate.
    pub async fn authorize(
        &self,
        operation: Operation,
        request: &RequestContext,
        resource: &Resource,
    ) -> Result<Option<Identity>, AppError> {
        let identity = self.resolve_identity(request).await;
        self.access
            .authorize(operation, request, identity.as_ref(), resource)
            .await?;
        Ok(identity)
    }
}

type ConfigLoader = Arc<dyn Fn() -> BoxFuture<'static, anyhow::Result<VortexConfig>> + Send + Sync>;

/// Axum state handle: cheap to clone, resolves the gateway on first use.
#[derive(Clone)]
pub struct GatewayState {
    loader: ConfigLoader,
    gateway: Arc<OnceCell<Gateway>>,
}

impl GatewayState {
    /// Resolve configuration on the first request through `loader`, exactly
    /// once for concurrent first callers.
    pub fn lazy<F, Fut>(loader: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<VortexConfig>> + Send + 'static,
    {
        Self {
            loader: Arc::new(move || Box::pin(loader())),
            gateway: Arc::new(OnceCell::new()),
        }
    }

    /// Resolve configuration now, failing fast at startup.
    pub fn eager(config: VortexConfig) -> Result<Self, AppError> {
        let gateway = Gateway::from_config(config)?;
        Ok(Self {
            loader: Arc::new(|| {
                Box::pin(async { anyhow::bail!("configuration already resolved") })
            }),
            gateway: Arc::new(OnceCell::new_with(Some(gateway))),
        })
    }

    pub async fn gateway(&self) -> Result<&Gateway, AppError> {
        self.gateway
            .get_or_try_init(|| async {
                let config = (self.loader)().await.map_err(AppError::Config)?;
                Gateway::from_config(config)
            })
            .await
    }
}
