use nordicflight_advisor::{AdvisorConfig, AdvisorError, GeminiClient, RiskAdvisor};
use nordicflight_core::{EMPTY_SUMMARY, FALLBACK_SUMMARY, Fixtures, RiskSnapshot};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

// Serves exactly one canned HTTP response and hands back the raw request.
async fn one_shot_upstream(
    status: &'static str,
    body: &'static str,
) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];

        loop {
            let read = socket.read(&mut buf).await.unwrap();
            if read == 0 {
                break;
            }
            request.extend_from_slice(&buf[..read]);
            if request_complete(&request) {
                break;
            }
        }

        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\n\
             content-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        String::from_utf8_lossy(&request).into_owned()
    });

    (format!("http://{addr}/v1beta"), handle)
}

fn request_complete(raw: &[u8]) -> bool {
    let text = String::from_utf8_lossy(raw);
    let Some(header_end) = text.find("\r\n\r\n") else {
        return false;
    };
    let content_length = text[..header_end]
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);
    raw.len() >= header_end + 4 + content_length
}

fn config_for(base_url: String) -> AdvisorConfig {
    AdvisorConfig::default()
        .with_base_url(base_url)
        .with_api_key("test-key")
}

#[tokio::test]
async fn decodes_generated_summary() {
    let (base_url, upstream) = one_shot_upstream(
        "200 OK",
        r#"{"candidates":[{"content":{"parts":[{"text":"- RTB EAGLE-03 immediately."}]}}]}"#,
    )
    .await;

    let fixtures = Fixtures::load_default().unwrap();
    let snapshot = RiskSnapshot::new(&fixtures.drones, &fixtures.weather, &fixtures.alerts);
    let summary = RiskAdvisor::new(config_for(base_url)).summarize(&snapshot).await;
    assert_eq!(summary, "- RTB EAGLE-03 immediately.");

    let request = upstream.await.unwrap();
    assert!(request.starts_with("POST /v1beta/models/gemini-2.5-flash:generateContent"));
    assert!(request.to_ascii_lowercase().contains("x-goog-api-key: test-key"));
    assert!(request.contains("BATTERY CELL IMBALANCE"));
}

#[tokio::test]
async fn empty_candidates_use_empty_summary() {
    let (base_url, upstream) = one_shot_upstream("200 OK", r#"{"candidates":[]}"#).await;

    let fixtures = Fixtures::load_default().unwrap();
    let snapshot = RiskSnapshot::new(&fixtures.drones, &fixtures.weather, &fixtures.alerts);
    let summary = RiskAdvisor::new(config_for(base_url)).summarize(&snapshot).await;
    assert_eq!(summary, EMPTY_SUMMARY);
    upstream.await.unwrap();
}

#[tokio::test]
async fn upstream_error_keeps_status_and_message() {
    let (base_url, upstream) = one_shot_upstream(
        "429 Too Many Requests",
        r#"{"error":{"code":429,"message":"quota exhausted"}}"#,
    )
    .await;

    let client = GeminiClient::new(config_for(base_url)).unwrap();
    match client.generate("status?").await {
        Err(AdvisorError::Upstream { status, message }) => {
            assert_eq!(status.as_u16(), 429);
            assert_eq!(message, "quota exhausted");
        }
        other => panic!("unexpected result: {other:?}"),
    }
    upstream.await.unwrap();
}

#[tokio::test]
async fn unreachable_upstream_falls_back() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let fixtures = Fixtures::load_default().unwrap();
    let snapshot = RiskSnapshot::new(&fixtures.drones, &fixtures.weather, &fixtures.alerts);
    let advisor = RiskAdvisor::new(config_for(format!("http://{addr}/v1beta")));
    assert_eq!(advisor.summarize(&snapshot).await, FALLBACK_SUMMARY);
}

#[tokio::test]
async fn missing_key_falls_back_without_network() {
    let fixtures = Fixtures::load_default().unwrap();
    let snapshot = RiskSnapshot::new(&fixtures.drones, &fixtures.weather, &fixtures.alerts);
    let advisor = RiskAdvisor::new(AdvisorConfig::default().with_base_url("http://127.0.0.1:9"));
    assert_eq!(advisor.summarize(&snapshot).await, FALLBACK_SUMMARY);
}
