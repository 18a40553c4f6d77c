//! Request accounting under concurrent submission: the counter must be
//! exact, with no lost increments.

mod common;

use common::InMemoryAutomoviles;

#[tokio::test]
async fn request_count_is_exact_under_concurrent_submission() {
    let app = common::test_app(InMemoryAutomoviles::new());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = reqwest::Client::new();
    let submissions = 64u64;

    let mut handles = Vec::new();
    for _ in 0..submissions {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            let response = client
                .get(format!("http://{addr}/automoviles"))
                .send()
                .await
                .expect("service reachable");
            // Empty store: every listing reads as not-found, but still counts.
            assert_eq!(response.status(), 404);
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let body: serde_json::Value = client
        .get(format!("http://{addr}/status"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // The status request itself is the one extra.
    assert_eq!(
        body["numberOfReceivedRequests"].as_u64(),
        Some(submissions + 1)
    );
    assert!(body["upTime"].as_f64().unwrap() >= 0.0);
}
