#[path = "common/mod.rs"]
mod common;

use cetl::{CommentHarvester, FetchError, RateLimiter, VideoStatus};
use common::*;
use std::collections::HashSet;
use std::time::Duration;

fn harvester(source: &mut ScriptedSource, cap: usize) -> CommentHarvester<'_> {
    CommentHarvester::new(source)
        .comment_limit(cap)
        .rate_limiter(RateLimiter::new(Duration::ZERO))
}

/// 250 threads, cap well above: exactly ceil(250/100) = 3 page fetches and
/// 250 top-level records; cursors are passed back verbatim.
#[test]
fn pagination_terminates_after_ceil_pages() {
    let mut src = ScriptedSource::new().with_video("v", threads("v", 250));
    let (records, outcome) = harvester(&mut src, 5000).harvest_video("v");

    assert_eq!(records.len(), 250);
    assert!(records.iter().all(|r| !r.is_reply()));
    assert_eq!(outcome.pages_fetched, 3);
    assert_eq!(outcome.status, VideoStatus::Exhausted);
    let cursors: Vec<Option<String>> = src.thread_calls.iter().map(|(_, c)| c.clone()).collect();
    assert_eq!(cursors, vec![None, Some("100".into()), Some("200".into())]);
}

/// Cap lands in the middle of a page: remaining threads are discarded and no
/// further page is requested.
#[test]
fn cap_stops_mid_page() {
    let mut src = ScriptedSource::new().with_video("v", threads("v", 250));
    let (records, outcome) = harvester(&mut src, 130).harvest_video("v");

    assert_eq!(records.len(), 130);
    assert_eq!(outcome.status, VideoStatus::CapReached);
    assert_eq!(src.thread_calls_for("v"), 2);
}

/// Cap lands inside a reply expansion: replies past the cap are dropped and the
/// next thread is never emitted.
#[test]
fn cap_enforced_across_reply_boundary() {
    let mut src = ScriptedSource::new()
        .with_video("v", vec![thread("t1", "first", 0), thread("t2", "second", 5), thread("t3", "third", 0)])
        .with_replies("t2", (0..5).map(|i| reply(&format!("r{i}"), "t2", "re")).collect());

    let (records, outcome) = harvester(&mut src, 4).harvest_video("v");
    let ids: Vec<&str> = records.iter().map(|r| r.comment_id.as_str()).collect();
    assert_eq!(ids, vec!["t1", "t2", "r0", "r1"]);
    assert_eq!(outcome.status, VideoStatus::CapReached);
}

/// For every cap, a single video never yields more than `cap` records.
#[test]
fn cap_is_never_exceeded() {
    let mut items = threads("v", 150);
    for t in items.iter_mut().step_by(7) {
        t.reply_count = 3;
    }
    let mut base = ScriptedSource::new();
    for t in items.iter().filter(|t| t.reply_count > 0) {
        base = base.with_replies(&t.id, (0..3).map(|i| reply(&format!("{}-r{i}", t.id), &t.id, "r")).collect());
    }
    let base = base.with_video("v", items);
    let full = {
        let mut src = ScriptedSource { videos: base.videos.clone(), replies: base.replies.clone(), ..Default::default() };
        harvester(&mut src, usize::MAX).harvest_video("v").0.len()
    };
    for cap in [0, 1, 2, 3, 4, 99, 100, 101, 102, 103, full - 1, full, full + 10] {
        let mut src = ScriptedSource { videos: base.videos.clone(), replies: base.replies.clone(), ..Default::default() };
        let (records, _) = harvester(&mut src, cap).harvest_video("v");
        assert_eq!(records.len(), cap.min(full), "cap {cap}");
    }
}

#[test]
fn zero_cap_fetches_nothing() {
    let mut src = ScriptedSource::new().with_video("v", threads("v", 10));
    let (records, outcome) = harvester(&mut src, 0).harvest_video("v");
    assert!(records.is_empty());
    assert_eq!(outcome.pages_fetched, 0);
    assert!(src.thread_calls.is_empty());
}

#[test]
fn zero_reply_count_never_expands() {
    let mut src = ScriptedSource::new()
        .with_video("v", vec![thread("t1", "a", 0), thread("t2", "b", 0)])
        // replies exist on the platform but the thread says zero
        .with_replies("t1", vec![reply("r1", "t1", "hidden")]);
    let (records, outcome) = harvester(&mut src, 100).harvest_video("v");
    assert_eq!(records.len(), 2);
    assert!(src.reply_calls.is_empty());
    assert_eq!(outcome.reply_expansions, 0);
}

/// Replies follow their parent immediately and always point at it.
#[test]
fn replies_follow_parent_and_are_never_orphans() {
    let mut src = ScriptedSource::new()
        .with_video("v", vec![thread("t1", "a", 2), thread("t2", "b", 0), thread("t3", "c", 1)])
        .with_replies("t1", vec![reply("r1", "t1", "x"), reply("r2", "t1", "y")])
        .with_replies("t3", vec![reply("r3", "t3", "z")]);
    let (records, _) = harvester(&mut src, 100).harvest_video("v");

    let ids: Vec<&str> = records.iter().map(|r| r.comment_id.as_str()).collect();
    assert_eq!(ids, vec!["t1", "r1", "r2", "t2", "t3", "r3"]);

    let top: HashSet<&str> = records.iter().filter(|r| !r.is_reply()).map(|r| r.comment_id.as_str()).collect();
    for r in records.iter().filter(|r| r.is_reply()) {
        assert!(top.contains(r.parent_id.as_deref().unwrap()));
    }
}

#[test]
fn reply_with_foreign_parent_aborts_video() {
    let mut src = ScriptedSource::new()
        .with_video("v", vec![thread("t1", "a", 1), thread("t2", "b", 0)])
        .with_replies("t1", vec![reply("r1", "elsewhere", "x")]);
    let (records, outcome) = harvester(&mut src, 100).harvest_video("v");
    assert_eq!(records.len(), 1);
    assert!(matches!(outcome.status, VideoStatus::Aborted(FetchError::Malformed(_))));
}

/// A failing reply expansion aborts the video but keeps what was emitted.
#[test]
fn reply_failure_keeps_earlier_records() {
    let mut src = ScriptedSource::new()
        .with_video("v", vec![thread("t1", "a", 0), thread("t2", "b", 2), thread("t3", "c", 0)])
        .fail_replies_for("t2", FetchError::Network("reset".into()));
    let (records, outcome) = harvester(&mut src, 100).harvest_video("v");
    let ids: Vec<&str> = records.iter().map(|r| r.comment_id.as_str()).collect();
    assert_eq!(ids, vec!["t1", "t2"]);
    assert!(outcome.is_aborted());
}

/// Video B fails on its second page; A and C are complete, B keeps page one only.
#[test]
fn failure_on_one_video_does_not_stop_the_run() {
    let mut src = ScriptedSource::new()
        .with_video("A", threads("A", 120))
        .with_video("B", threads("B", 250))
        .with_video("C", threads("C", 30))
        .fail_page("B", 1, FetchError::Quota("daily limit".into()));

    let mut h = harvester(&mut src, 5000);
    let report = h.harvest_all(&["A", "B", "C"]);
    assert_eq!(h.limiter().pauses(), 2);

    assert_eq!(report.records.len(), 120 + 100 + 30);
    let count = |v: &str| report.records.iter().filter(|r| r.video_id == v).count();
    assert_eq!((count("A"), count("B"), count("C")), (120, 100, 30));

    // request order is preserved across videos
    let order: Vec<&str> = report.records.iter().map(|r| r.video_id.as_str()).collect();
    let first_b = order.iter().position(|v| *v == "B").unwrap();
    let first_c = order.iter().position(|v| *v == "C").unwrap();
    assert!(order[..first_b].iter().all(|v| *v == "A"));
    assert!(order[first_b..first_c].iter().all(|v| *v == "B"));

    let aborted: Vec<&str> = report.aborted_videos().map(|v| v.video_id.as_str()).collect();
    assert_eq!(aborted, vec!["B"]);
    match &report.videos[1].status {
        VideoStatus::Aborted(e) => assert!(!e.is_retryable()),
        other => panic!("expected abort, got {other:?}"),
    }
}

/// A thread repeated on the next page (new comments shifted the listing) is
/// emitted once and does not use up the cap.
#[test]
fn repeated_thread_across_pages_is_emitted_once() {
    let mut items = threads("v", 100);
    items.push(items[99].clone());
    items.push(thread("v-late", "late", 0));
    let mut src = ScriptedSource::new().with_video("v", items);
    let (records, outcome) = harvester(&mut src, 101).harvest_video("v");

    assert_eq!(records.len(), 101);
    let ids: HashSet<&str> = records.iter().map(|r| r.comment_id.as_str()).collect();
    assert_eq!(ids.len(), records.len());
    assert_eq!(records.last().unwrap().comment_id, "v-late");
    assert_eq!(outcome.repeats_skipped, 1);
    assert_eq!(outcome.pages_fetched, 2);
    assert_eq!(outcome.status, VideoStatus::CapReached);
}

#[test]
fn reply_reusing_a_thread_id_is_skipped() {
    let mut src = ScriptedSource::new()
        .with_video("v", vec![thread("t1", "a", 2), thread("t2", "b", 1)])
        .with_replies("t1", vec![reply("r1", "t1", "x"), reply("t1", "t1", "echo")])
        .with_replies("t2", vec![reply("r1", "t2", "dup id")]);
    let (records, outcome) = harvester(&mut src, 100).harvest_video("v");

    let ids: Vec<&str> = records.iter().map(|r| r.comment_id.as_str()).collect();
    assert_eq!(ids, vec!["t1", "r1", "t2"]);
    assert_eq!(outcome.repeats_skipped, 2);
    assert_eq!(outcome.status, VideoStatus::Exhausted);
}

#[test]
fn fetch_error_retry_classification() {
    assert!(FetchError::Network("x".into()).is_retryable());
    assert!(FetchError::Http { status: 503, message: String::new() }.is_retryable());
    assert!(FetchError::Http { status: 429, message: String::new() }.is_retryable());
    assert!(!FetchError::Http { status: 404, message: String::new() }.is_retryable());
    assert!(!FetchError::Quota("q".into()).is_retryable());
    assert!(!FetchError::Malformed("m".into()).is_retryable());
}
