use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    application::error::HttpError,
    presentation::views::{
        IndexTemplate, LayoutContext, post_cards, render_not_found_response,
        render_template_response,
    },
};

use super::{HttpState, db_health_response};

pub(super) async fn index(State(state): State<HttpState>) -> Response {
    match state.posts.list_all().await {
        Ok(posts) => {
            let view = LayoutContext::new(state.brand(), post_cards(posts));
            render_template_response(IndexTemplate { view }, StatusCode::OK)
        }
        Err(err) => HttpError::from(err).into_response(),
    }
}

pub(super) async fn db_health(State(state): State<HttpState>) -> Response {
    db_health_response(state.posts.health_check().await)
}

pub(super) async fn not_found(State(state): State<HttpState>) -> Response {
    render_not_found_response(state.brand())
}
