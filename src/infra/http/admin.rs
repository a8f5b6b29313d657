use axum::{
    Form,
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use metrics::counter;
use serde::Deserialize;
use tracing::debug;

use crate::{
    application::{auth::Guarded, error::HttpError},
    domain::posts::NewPost,
    infra::telemetry::{POSTS_CREATED_TOTAL, POSTS_DELETED_TOTAL},
    presentation::views::{AdminTemplate, LayoutContext, post_cards, render_template_response},
};

use super::{HttpState, LOGIN_REQUIRED_LOCATION, auth::session_token};

const ADMIN_LOCATION: &str = "/admin";

#[derive(Default, Deserialize)]
#[serde(default)]
pub(super) struct NewPostForm {
    title: String,
    content: String,
}

/// Let the request through only with a live admin session.
pub(super) async fn require_admin(
    State(state): State<HttpState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let token = session_token(&jar);
    match state
        .gate
        .require_authenticated(token.as_ref(), || next.run(request))
        .await
    {
        Guarded::Allowed(response) => response,
        Guarded::Denied => Redirect::to(LOGIN_REQUIRED_LOCATION).into_response(),
    }
}

pub(super) async fn admin_panel(State(state): State<HttpState>) -> Response {
    match state.posts.list_all().await {
        Ok(posts) => {
            let view = LayoutContext::new(state.brand(), post_cards(posts));
            render_template_response(AdminTemplate { view }, StatusCode::OK)
        }
        Err(err) => HttpError::from(err).into_response(),
    }
}

pub(super) async fn admin_create(
    State(state): State<HttpState>,
    Form(form): Form<NewPostForm>,
) -> Response {
    let post = match NewPost::parse(&form.title, &form.content) {
        Ok(post) => post,
        Err(err) => {
            debug!(target = "jotter::http::admin", error = %err, "post form rejected");
            return Redirect::to(ADMIN_LOCATION).into_response();
        }
    };

    match state.posts.create(post).await {
        Ok(_) => {
            counter!(POSTS_CREATED_TOTAL).increment(1);
            Redirect::to(ADMIN_LOCATION).into_response()
        }
        Err(err) => HttpError::from(err).into_response(),
    }
}

pub(super) async fn admin_delete(State(state): State<HttpState>, Path(id): Path<i64>) -> Response {
    match state.posts.delete(id).await {
        Ok(removed) => {
            if removed {
                counter!(POSTS_DELETED_TOTAL).increment(1);
            }
            Redirect::to(ADMIN_LOCATION).into_response()
        }
        Err(err) => HttpError::from(err).into_response(),
    }
}
