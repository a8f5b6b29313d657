mod common;

use axum::http::StatusCode;
use jotter::application::repos::PostsRepo;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};

use common::TestApp;

type Counter = (String, Vec<(String, String)>, u64);

fn counter_value(counters: &[Counter], name: &str, label: Option<(&str, &str)>) -> u64 {
    counters
        .iter()
        .filter(|(counter, _, _)| counter == name)
        .filter(|(_, labels, _)| match label {
            Some((key, value)) => labels.iter().any(|(k, v)| k == key && v == value),
            None => true,
        })
        .map(|(_, _, count)| count)
        .sum()
}

#[tokio::test]
async fn admin_actions_emit_counters() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");

    let app = TestApp::spawn().await;

    let response = app.post_form("/login", "password=nope", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let session = app.login().await;

    app.post_form("/admin/new", "title=One&content=1", Some(&session))
        .await;
    app.post_form("/admin/new", "title=&content=skipped", Some(&session))
        .await;
    let post = app.repo.list_all().await.unwrap().remove(0);
    app.get(&format!("/admin/delete/{}", post.id), Some(&session))
        .await;
    app.get(&format!("/admin/delete/{}", post.id), Some(&session))
        .await;

    let snapshot: Vec<Counter> = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .filter_map(|(key, _, _, value)| match value {
            DebugValue::Counter(count) => Some((
                key.key().name().to_string(),
                key.key()
                    .labels()
                    .map(|label| (label.key().to_string(), label.value().to_string()))
                    .collect(),
                count,
            )),
            _ => None,
        })
        .collect();
    assert_eq!(
        counter_value(&snapshot, "jotter_admin_login_total", Some(("outcome", "failure"))),
        1
    );
    assert_eq!(
        counter_value(&snapshot, "jotter_admin_login_total", Some(("outcome", "success"))),
        1
    );
    assert_eq!(counter_value(&snapshot, "jotter_posts_created_total", None), 1);
    assert_eq!(counter_value(&snapshot, "jotter_posts_deleted_total", None), 1);
}
