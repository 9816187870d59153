//! Rate limiting tests
//!
//! Drives whole pipelines configured with delay-then-throttle on a paused
//! clock and checks which terms reach the fetcher.

mod utils;

use typeahead_lib::PipelineState;
use utils::helpers::{build_pipeline, ms, throttled_config, url_for, TestPipeline};

#[tokio::test(start_paused = true)]
async fn test_first_term_waits_for_the_delay() {
    let TestPipeline {
        pipeline, fetcher, ..
    } = build_pipeline(throttled_config(ms(50), ms(300)), false);

    pipeline.push("a");
    tokio::time::sleep(ms(40)).await;
    assert!(fetcher.calls().is_empty());
    assert_eq!(pipeline.state(), PipelineState::AwaitingSettle);

    tokio::time::sleep(ms(20)).await;
    assert_eq!(fetcher.calls(), vec![url_for("a")]);
}

#[tokio::test(start_paused = true)]
async fn test_throttle_drops_terms_inside_the_interval() {
    let TestPipeline {
        pipeline,
        fetcher,
        recorder,
    } = build_pipeline(throttled_config(ms(50), ms(300)), false);

    pipeline.push("a");
    tokio::time::sleep(ms(100)).await;
    pipeline.push("b");
    tokio::time::sleep(ms(100)).await;
    pipeline.push("c");
    tokio::time::sleep(ms(300)).await;
    pipeline.push("d");
    tokio::time::sleep(ms(400)).await;

    assert_eq!(fetcher.calls(), vec![url_for("a"), url_for("d")]);
    assert_eq!(recorder.response_urls(), vec![url_for("a"), url_for("d")]);
    assert_eq!(pipeline.state(), PipelineState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_terms_spaced_beyond_the_interval_all_pass() {
    let TestPipeline {
        pipeline, fetcher, ..
    } = build_pipeline(throttled_config(ms(50), ms(300)), false);

    for term in ["one", "two", "three"] {
        pipeline.push(term);
        tokio::time::sleep(ms(400)).await;
    }

    assert_eq!(
        fetcher.calls(),
        vec![url_for("one"), url_for("two"), url_for("three")]
    );
}

#[tokio::test(start_paused = true)]
async fn test_throttled_lookup_supersedes_slow_predecessor() {
    let TestPipeline {
        pipeline,
        fetcher,
        recorder,
    } = build_pipeline(throttled_config(ms(50), ms(300)), false);
    fetcher.respond_after(&url_for("slow"), ms(2_000), 200, "{}");

    pipeline.push("slow");
    tokio::time::sleep(ms(400)).await;
    assert_eq!(pipeline.state(), PipelineState::InFlight);

    pipeline.push("quick");
    tokio::time::sleep(ms(3_000)).await;

    assert_eq!(recorder.response_urls(), vec![url_for("quick")]);
}
