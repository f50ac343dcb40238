use std::time::Duration;

use gembot::http::HttpBuilder;
use gembot::model::channel::Attachment;
use serde_json::json;
use tokio::net::TcpListener;

/// Accepts connections and holds them open without ever answering.
async fn silent_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn download_from_a_silent_server_times_out() {
    let base = silent_server().await;
    let attachment: Attachment = serde_json::from_value(json!({
        "id": "1",
        "filename": "cat.png",
        "url": format!("{base}/attachments/1/2/cat.png"),
        "content_type": "image/png",
    }))
    .unwrap();

    let http = HttpBuilder::new().timeout(Duration::from_millis(200)).build().unwrap();
    let result = tokio::time::timeout(Duration::from_secs(10), http.download_attachment(&attachment))
        .await
        .expect("the request bound should fire first");
    assert!(result.is_err());
}

#[tokio::test]
async fn timeout_applies_to_a_supplied_client() {
    let base = silent_server().await;
    let attachment: Attachment = serde_json::from_value(json!({
        "id": "1",
        "filename": "cat.png",
        "url": format!("{base}/cat.png"),
    }))
    .unwrap();

    let http = HttpBuilder::new()
        .client(reqwest::Client::new())
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();
    let result = tokio::time::timeout(Duration::from_secs(10), http.download_attachment(&attachment))
        .await
        .expect("the request bound should fire first");
    assert!(result.is_err());
}
