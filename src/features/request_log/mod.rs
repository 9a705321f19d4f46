use crate::database::RequestLogRepository;
use crate::domain::LogEntry;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

// records "METHOD /path" for every request; a failed write never changes the response
pub async fn request_logger(
    State(log_repo): State<Arc<dyn RequestLogRepository>>,
    req: Request,
    next: Next,
) -> Response {
    let entry = LogEntry::for_request(req.method(), req.uri().path());

    if let Err(e) = log_repo.append(&entry).await {
        tracing::warn!(error = %e, request = %entry.log, "failed to record request");
    }

    next.run(req).await
}
