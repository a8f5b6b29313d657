use std::sync::Once;

use metrics::{Unit, describe_counter};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

pub const POSTS_CREATED_TOTAL: &str = "jotter_posts_created_total";
pub const POSTS_DELETED_TOTAL: &str = "jotter_posts_deleted_total";
pub const ADMIN_LOGIN_TOTAL: &str = "jotter_admin_login_total";

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            POSTS_CREATED_TOTAL,
            Unit::Count,
            "Total number of posts created through the admin panel."
        );
        describe_counter!(
            POSTS_DELETED_TOTAL,
            Unit::Count,
            "Total number of posts removed through the admin panel."
        );
        describe_counter!(
            ADMIN_LOGIN_TOTAL,
            Unit::Count,
            "Admin login attempts, labelled by outcome (success|failure)."
        );
    });
}
