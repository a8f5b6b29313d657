use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use metrics::counter;
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    application::{auth::SessionToken, error::HttpError},
    infra::telemetry::ADMIN_LOGIN_TOTAL,
    presentation::views::{LayoutContext, LoginTemplate, LoginView, render_template_response},
};

use super::{HttpState, SESSION_COOKIE};

const LOGIN_REQUIRED_NOTICE: &str = "Please log in to access the admin panel.";
const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct LoginQuery {
    notice: Option<String>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
pub(super) struct LoginForm {
    password: String,
}

pub(super) fn session_token(jar: &CookieJar) -> Option<SessionToken> {
    jar.get(SESSION_COOKIE)
        .map(|cookie| SessionToken::new(cookie.value()))
}

pub(super) async fn login_form(
    State(state): State<HttpState>,
    jar: CookieJar,
    Query(query): Query<LoginQuery>,
) -> Response {
    if state.gate.is_authenticated(session_token(&jar).as_ref()) {
        return Redirect::to("/admin").into_response();
    }

    let notice = match query.notice.as_deref() {
        Some("required") => Some(LOGIN_REQUIRED_NOTICE),
        _ => None,
    };
    render_login(&state, LoginView {
        notice,
        error: None,
    })
}

pub(super) async fn login_submit(
    State(state): State<HttpState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let token = match state.gate.login(&form.password).await {
        Ok(Some(token)) => token,
        Ok(None) => {
            counter!(ADMIN_LOGIN_TOTAL, "outcome" => "failure").increment(1);
            warn!(target = "jotter::http::auth", "admin login rejected");
            return render_login(&state, LoginView {
                notice: None,
                error: Some(INVALID_CREDENTIALS),
            });
        }
        Err(err) => return HttpError::from(err).into_response(),
    };

    counter!(ADMIN_LOGIN_TOTAL, "outcome" => "success").increment(1);
    info!(target = "jotter::http::auth", "admin logged in");

    let cookie = Cookie::build((SESSION_COOKIE, token.as_str().to_owned()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(state.cookie_secure)
        .max_age(state.gate.session_ttl());

    (jar.add(cookie), Redirect::to("/admin")).into_response()
}

pub(super) async fn logout(State(state): State<HttpState>, jar: CookieJar) -> Response {
    if let Some(token) = session_token(&jar) {
        state.gate.logout(&token);
    }
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, Redirect::to("/")).into_response()
}

fn render_login(state: &HttpState, login: LoginView) -> Response {
    let view = LayoutContext::new(state.brand(), login);
    render_template_response(LoginTemplate { view }, StatusCode::OK)
}
