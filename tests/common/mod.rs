#![allow(dead_code)]

use axum::extract::ConnectInfo;
use link_registry::application::services::RegistryService;
use link_registry::domain::repositories::UrlRepository;
use link_registry::infrastructure::persistence::{MemoryUrlRepository, RedisUrlRepository};
use link_registry::state::AppState;
use link_registry::utils::code_generator::CodeGenerator;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::Layer;

pub const TEST_BASE_URL: &str = "http://s.example.com";

/// Registry over a fresh in-memory repository.
pub fn memory_registry() -> Arc<RegistryService> {
    registry_over(Arc::new(MemoryUrlRepository::new()))
}

pub fn registry_over(repository: Arc<dyn UrlRepository>) -> Arc<RegistryService> {
    Arc::new(RegistryService::new(repository, CodeGenerator::default()))
}

pub fn create_test_state() -> AppState {
    AppState::new(memory_registry(), TEST_BASE_URL)
}

/// Connects to the Redis instance named by `REDIS_URL`, or returns `None`
/// so the calling test can skip when no server is available.
pub async fn redis_repository() -> Option<RedisUrlRepository> {
    let url = std::env::var("REDIS_URL").ok()?;
    let prefix = format!("test:{:016x}:", rand::random::<u64>());

    match RedisUrlRepository::connect(&url, prefix).await {
        Ok(repo) => Some(repo),
        Err(e) => panic!("REDIS_URL is set but Redis is unreachable: {}", e),
    }
}

/// Injects a fixed peer address, standing in for `into_make_service_with_connect_info`.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
