//! Uptime accumulation acceptance tests.
//!
//! # Acceptance Criteria
//!
//! - Tick samples are converted into whole seconds served by the resource
//! - Wraparound is followed, losing one tick per revolution
//! - The counter never decreases between requests
//! - Fallback mode serves the wall clock and starts no sampling

use super::common::{timer_config, TestNode};
use uptime_common::time::TimeSourceMode;

#[tokio::test]
async fn test_tick_based_uptime_served() {
    // A register wide enough that it never wraps in this test
    let node = TestNode::start(true, &timer_config(1_000, u32::MAX), 64);
    node.wall.set(90_100);

    node.sample(90_061_000).await;

    let reply = node.get(None).await;
    assert_eq!(reply.status, 200);
    assert_eq!(reply.body, "1 d 1 h 1 m 1 s (90061/90100 s)\n");
    assert_eq!(node.clock.mode(), TimeSourceMode::TickBased);
}

#[tokio::test]
async fn test_wraparound_drift_is_reproduced() {
    // 1000-tick register at 100 ticks/s wraps every 10 seconds
    let node = TestNode::start(true, &timer_config(100, 999), 64);

    for _ in 0..20 {
        for raw in [250, 500, 750, 0] {
            node.sample(raw).await;
        }
    }

    // 20 revolutions are 200 s of real time; each wrap loses one tick
    assert_eq!(node.clock.uptime_seconds(), 199);
    let reply = node.get(Some("application/json")).await;
    assert_eq!(reply.body, "{'uptime':'0 d 0 h 3 m 19 s'}");
}

#[tokio::test]
async fn test_uptime_monotonic_across_requests() {
    let node = TestNode::start(true, &timer_config(100, 999), 64);

    let mut previous = 0;
    let mut raw = 0u32;
    for _ in 0..200 {
        raw = (raw + 377) % 1_000;
        node.sample(raw).await;

        let uptime = node.clock.uptime_seconds();
        assert!(uptime >= previous, "uptime went backwards: {previous} -> {uptime}");
        previous = uptime;
    }
    assert!(previous > 0);
}

#[tokio::test]
async fn test_wall_clock_fallback_mode() {
    let node = TestNode::start(false, &timer_config(100, 999), 64);
    assert_eq!(node.clock.mode(), TimeSourceMode::WallClockFallback);

    node.wall.set(3_661);
    // Ticks are ignored without a sampling task
    node.sample(900).await;

    let reply = node.get(Some("text/plain")).await;
    assert_eq!(reply.status, 200);
    assert_eq!(reply.body, "0 d 1 h 1 m 1 s (3661/3661 s)\n");
}
