//! Task-local request context and the process-level span.
//!
//! The HTTP metrics layer scopes each request's id and matched route here;
//! handlers and the core read them back when logging.

use std::future::Future;
use std::sync::Arc;

use tracing::span::EnteredSpan;

use crate::init::build_sha;

/// Keeps the `app` span entered until dropped.
pub struct GlobalContextGuard {
    _span: EnteredSpan,
}

impl GlobalContextGuard {
    /// Enter a span tagging every event with `service` and the build SHA.
    #[must_use]
    pub fn new(service: impl Into<String>) -> Self {
        let service = service.into();
        Self {
            _span: tracing::info_span!("app", service = %service, build_sha = %build_sha())
                .entered(),
        }
    }
}

#[derive(Clone)]
struct RequestContext {
    request_id: Arc<str>,
    route: Arc<str>,
}

tokio::task_local! {
    static REQUEST: RequestContext;
}

fn current(read: impl FnOnce(&RequestContext) -> &str) -> Option<String> {
    REQUEST.try_with(|ctx| read(ctx).to_string()).ok()
}

/// Id of the request being served on this task, if any.
#[must_use]
pub fn current_request_id() -> Option<String> {
    current(|ctx| &*ctx.request_id)
}

/// Route template of the request being served on this task, if any.
#[must_use]
pub fn current_route() -> Option<String> {
    current(|ctx| &*ctx.route)
}

/// Run `fut` with `request_id` and `route` visible to [`current_request_id`]
/// and [`current_route`].
pub async fn with_request_context<Fut, T>(
    request_id: impl Into<String>,
    route: impl Into<String>,
    fut: Fut,
) -> T
where
    Fut: Future<Output = T>,
{
    let context = RequestContext {
        request_id: Arc::from(request_id.into()),
        route: Arc::from(route.into()),
    };
    REQUEST.scope(context, fut).await
}
