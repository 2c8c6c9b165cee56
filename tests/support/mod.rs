//! Mock Slack helpers shared by the integration tests.

// Each test binary uses a different subset.
#![allow(dead_code)]

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Path the fake listing endpoint is mounted at.
pub const LISTING_PATH: &str = "/api/emoji.list";

/// Mounts `body` as the listing response.
pub async fn mount_listing(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
        .mount(server)
        .await;
}

/// Mounts an image at `image_path`, expecting exactly `expected_hits` requests.
pub async fn mount_image(server: &MockServer, image_path: &str, bytes: &[u8], expected_hits: u64) {
    Mock::given(method("GET"))
        .and(path(image_path.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes.to_vec()))
        .expect(expected_hits)
        .mount(server)
        .await;
}

/// Listing endpoint URL on the mock server.
pub fn listing_url(server: &MockServer) -> String {
    format!("{}{LISTING_PATH}", server.uri())
}
