mod admin;
mod auth;
mod middleware;
mod public;

use std::sync::Arc;

use axum::{
    Router,
    http::StatusCode,
    middleware as axum_middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use crate::{
    application::{auth::SessionGate, error::ErrorReport, posts::PostService},
    presentation::views::BrandView,
};

use self::middleware::{log_responses, set_request_context};

pub const SESSION_COOKIE: &str = "jotter_admin_session";
pub const LOGIN_REQUIRED_LOCATION: &str = "/login?notice=required";

#[derive(Clone)]
pub struct HttpState {
    pub posts: Arc<PostService>,
    pub gate: Arc<SessionGate>,
    pub site_title: Arc<str>,
    pub cookie_secure: bool,
}

impl HttpState {
    pub fn new(
        posts: Arc<PostService>,
        gate: Arc<SessionGate>,
        site_title: impl Into<Arc<str>>,
        cookie_secure: bool,
    ) -> Self {
        Self {
            posts,
            gate,
            site_title: site_title.into(),
            cookie_secure,
        }
    }

    fn brand(&self) -> BrandView {
        BrandView::new(self.site_title.as_ref())
    }
}

pub fn build_router(state: HttpState) -> Router {
    let admin_routes = Router::new()
        .route("/admin", get(admin::admin_panel))
        .route("/admin/new", post(admin::admin_create))
        .route("/admin/delete/{id}", get(admin::admin_delete))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            admin::require_admin,
        ));

    Router::new()
        .route("/", get(public::index))
        .route("/login", get(auth::login_form).post(auth::login_submit))
        .route("/logout", get(auth::logout))
        .route("/_health/db", get(public::db_health))
        .merge(admin_routes)
        .fallback(public::not_found)
        .with_state(state)
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
}

fn db_health_response<E: std::error::Error>(result: Result<(), E>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
            ErrorReport::from_error(
                "infra::http::db_health",
                StatusCode::SERVICE_UNAVAILABLE,
                &err,
            )
            .attach(&mut response);
            response
        }
    }
}
