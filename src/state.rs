//! Shared application state handed to every handler

use crate::backend::Backends;
use crate::cascade::CascadeQueues;
use crate::config::Config;
use crate::service::{CategoryService, CommentService, PostService, UserService};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub backends: Backends,
    pub cascade: Arc<CascadeQueues>,
    pub post_service: Arc<PostService>,
    pub comment_service: Arc<CommentService>,
    pub category_service: Arc<CategoryService>,
    pub user_service: Arc<UserService>,
    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    /// Wire services over the given backends. Cascade workers are not started here.
    pub fn new(
        config: Config,
        backends: Backends,
        prometheus_handle: Option<PrometheusHandle>,
    ) -> Self {
        let cascade = Arc::new(CascadeQueues::new(&config.cascade));

        Self {
            config: Arc::new(config),
            post_service: Arc::new(PostService::new(backends.clone(), cascade.clone())),
            comment_service: Arc::new(CommentService::new(backends.clone())),
            category_service: Arc::new(CategoryService::new(backends.clone())),
            user_service: Arc::new(UserService::new(backends.clone())),
            backends,
            cascade,
            prometheus_handle,
        }
    }
}
