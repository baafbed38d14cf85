mod handlers;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::store::DocumentStore;

pub fn create_router(store: DocumentStore) -> Router {
    let api = Router::new()
        // Document
        .route("/doc", get(handlers::get_doc).put(handlers::put_doc))
        .route("/doc/effective", get(handlers::get_effective_dates))
        .route("/doc/timeline", get(handlers::get_timeline))
        .route("/doc/outline", get(handlers::get_outline))
        // Tasks
        .route("/tasks", post(handlers::create_task))
        .route("/tasks/inprogress", get(handlers::list_in_progress))
        .route("/tasks/sort", post(handlers::sort_children))
        .route("/tasks/{id}", delete(handlers::delete_task))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api", api)
        .fallback(handlers::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(store)
}
