//! Content negotiation acceptance tests.
//!
//! # Acceptance Criteria
//!
//! - No preference, text/plain or text/*: 200 with the text line
//! - application/json or application/*: 200 with the single-quoted JSON line
//! - Ranges refused with q=0 are never served
//! - Anything else: 406 with a fixed message
//! - Every response carries `Cache-Control: max-age=60`
//! - Bodies never exceed the configured chunk size

use super::common::{timer_config, TestNode};

fn fallback_node(seconds: u64, chunk_size: usize) -> TestNode {
    let node = TestNode::start(false, &timer_config(100, 999), chunk_size);
    node.wall.set(seconds);
    node
}

#[tokio::test]
async fn test_negotiation_table() {
    let node = fallback_node(90_061, 64);
    let text = "1 d 1 h 1 m 1 s (90061/90061 s)\n";
    let json = "{'uptime':'1 d 1 h 1 m 1 s'}";
    let rejected = "Supporting content-types text/plain and application/json";

    let cases: [(Option<&str>, u16, Option<&str>, &str); 12] = [
        (None, 200, Some("text/plain; charset=utf-8"), text),
        (Some("*/*"), 200, Some("text/plain; charset=utf-8"), text),
        (Some("text/plain"), 200, Some("text/plain; charset=utf-8"), text),
        (Some("application/json"), 200, Some("application/json"), json),
        (Some("application/xml, application/json"), 200, Some("application/json"), json),
        (Some("text/*"), 200, Some("text/plain; charset=utf-8"), text),
        (Some("application/*"), 200, Some("application/json"), json),
        (Some("text/plain;q=0, application/json"), 200, Some("application/json"), json),
        (Some("application/json;q=0"), 406, None, rejected),
        (Some("text/plain;q=0, */*"), 200, Some("application/json"), json),
        (Some("application/xml"), 406, None, rejected),
        (Some("image/png"), 406, None, rejected),
    ];

    for (accept, status, content_type, body) in cases {
        let reply = node.get(accept).await;
        assert_eq!(reply.status, status, "accept: {accept:?}");
        assert_eq!(reply.content_type(), content_type, "accept: {accept:?}");
        assert_eq!(reply.body, body, "accept: {accept:?}");
        assert_eq!(reply.cache_control(), Some("max-age=60"), "accept: {accept:?}");
    }
}

#[tokio::test]
async fn test_body_bounded_by_chunk_size() {
    let node = fallback_node(u64::MAX, 16);

    let reply = node.get(None).await;
    assert_eq!(reply.status, 200);
    assert_eq!(reply.body.len(), 16);
    assert!("213503982334601 d 7 h 0 m 15 s".starts_with(&reply.body));

    let reply = node.get(Some("application/json")).await;
    assert_eq!(reply.body, "{'uptime':'21350");
}
