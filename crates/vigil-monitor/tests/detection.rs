//! End-to-end detection pipeline tests against a fake store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use vigil_alerts::{AlertError, AlertSink, ErrorEvent, SinkOutcome};
use vigil_monitor::{Detector, Scheduler};
use vigil_store::{
    IndexPattern, LogDocument, LogSearch, MatchStrategy, QueryBuilder, SearchResult, StoreError,
    TimeWindow,
};

/// A store scripted per signature. Also records the windows and indices it
/// was queried with so tests can assert on the query side.
#[derive(Debug, Default)]
struct ScriptedStore {
    results: HashMap<String, SearchResult>,
    failures: Vec<String>,
    queries: Mutex<Vec<(String, serde_json::Value, usize)>>,
}

impl ScriptedStore {
    fn matching(mut self, signature: &str, total: u64, ids: &[&str]) -> Self {
        let hits = ids.iter().map(|id| LogDocument::new(*id)).collect();
        self.results
            .insert(signature.to_string(), SearchResult { total, hits });
        self
    }

    fn failing(mut self, signature: &str) -> Self {
        self.failures.push(signature.to_string());
        self
    }

    fn recorded_queries(&self) -> Vec<(String, serde_json::Value, usize)> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LogSearch for ScriptedStore {
    async fn search(
        &self,
        index: &str,
        query: &serde_json::Value,
        limit: usize,
    ) -> vigil_store::Result<SearchResult> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push((index.to_string(), query.clone(), limit));
        }

        let signature = query["bool"]["should"][0]["match_phrase"]["message"]
            .as_str()
            .unwrap_or_default()
            .to_string();

        if self.failures.contains(&signature) {
            return Err(StoreError::Status { status: 503 });
        }

        let mut result = self
            .results
            .get(&signature)
            .cloned()
            .unwrap_or(SearchResult {
                total: 0,
                hits: Vec::new(),
            });
        result.hits.truncate(limit);
        Ok(result)
    }
}

/// Records every event it receives.
#[derive(Debug, Default)]
struct RecordingSink {
    name: String,
    events: Mutex<Vec<ErrorEvent>>,
}

impl RecordingSink {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            events: Mutex::new(Vec::new()),
        }
    }

    fn events(&self) -> Vec<ErrorEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl AlertSink for RecordingSink {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(&self, event: &ErrorEvent) -> vigil_alerts::Result<SinkOutcome> {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
        Ok(SinkOutcome::success(self.name()))
    }
}

/// Fails every delivery but counts attempts.
#[derive(Debug, Default)]
struct BrokenSink {
    attempts: AtomicUsize,
}

#[async_trait]
impl AlertSink for BrokenSink {
    fn name(&self) -> &str {
        "broken"
    }

    async fn send(&self, _event: &ErrorEvent) -> vigil_alerts::Result<SinkOutcome> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(AlertError::Delivery {
            reason: "channel rejected".to_string(),
        })
    }
}

fn detector_over(
    store: Arc<ScriptedStore>,
    sinks: Vec<Arc<dyn AlertSink>>,
    max_hits: usize,
) -> Detector {
    Detector::new(
        store,
        sinks,
        QueryBuilder::new("@timestamp", MatchStrategy::phrase("message")),
        IndexPattern::new("app-logs-%Y.%m.%d"),
        chrono::Duration::minutes(1),
        max_hits,
    )
}

#[tokio::test]
async fn positive_match_reaches_every_sink_once() {
    // Reference scenario: lookback 1m, signature "10404", total 3,
    // ids d1..d3, N registered sinks, N sends total.
    let store = Arc::new(ScriptedStore::default().matching("10404", 3, &["d1", "d2", "d3"]));
    let first = Arc::new(RecordingSink::named("first"));
    let second = Arc::new(RecordingSink::named("second"));
    let detector = detector_over(
        Arc::clone(&store),
        vec![Arc::clone(&first) as _, Arc::clone(&second) as _],
        500,
    );

    let summary = detector
        .detect("10404", Utc::now())
        .await
        .expect("search succeeds")
        .expect("event dispatched");

    assert_eq!(summary.delivered, 2);
    assert_eq!(summary.failed, 0);

    for sink in [&first, &second] {
        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].signature, "10404");
        assert_eq!(events[0].total_matches, 3);
        assert_eq!(events[0].matched_ids, ["d1", "d2", "d3"]);
    }
}

#[tokio::test]
async fn zero_matches_invoke_no_sinks() {
    let store = Arc::new(ScriptedStore::default().matching("quiet", 0, &[]));
    let sink = Arc::new(RecordingSink::named("only"));
    let detector = detector_over(Arc::clone(&store), vec![Arc::clone(&sink) as _], 500);

    let outcome = detector
        .detect("quiet", Utc::now())
        .await
        .expect("search succeeds");

    assert!(outcome.is_none());
    assert!(sink.events().is_empty());
}

#[tokio::test]
async fn capped_hits_keep_authoritative_total() {
    let store = Arc::new(ScriptedStore::default().matching("flood", 1200, &["d1", "d2", "d3"]));
    let sink = Arc::new(RecordingSink::named("only"));
    let detector = detector_over(Arc::clone(&store), vec![Arc::clone(&sink) as _], 2);

    detector
        .detect("flood", Utc::now())
        .await
        .expect("search succeeds")
        .expect("event dispatched");

    let events = sink.events();
    assert_eq!(events[0].total_matches, 1200);
    assert_eq!(events[0].matched_ids, ["d1", "d2"]);
    assert_eq!(events[0].documents.len(), 2);

    let queries = store.recorded_queries();
    assert_eq!(queries[0].2, 2, "the configured cap is passed to the store");
}

#[tokio::test]
async fn sink_failure_does_not_block_other_sinks() {
    let store = Arc::new(ScriptedStore::default().matching("10404", 1, &["d1"]));
    let broken = Arc::new(BrokenSink::default());
    let healthy = Arc::new(RecordingSink::named("healthy"));
    let detector = detector_over(
        Arc::clone(&store),
        vec![Arc::clone(&broken) as _, Arc::clone(&healthy) as _],
        500,
    );

    let summary = detector
        .detect("10404", Utc::now())
        .await
        .expect("search succeeds")
        .expect("event dispatched");

    assert_eq!(summary.delivered, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(broken.attempts.load(Ordering::SeqCst), 1);
    assert_eq!(healthy.events().len(), 1);
}

#[tokio::test]
async fn store_failure_is_isolated_within_a_cycle() {
    let store = Arc::new(
        ScriptedStore::default()
            .failing("broken")
            .matching("10404", 2, &["d1", "d2"]),
    );
    let sink = Arc::new(RecordingSink::named("only"));
    let detector = Arc::new(detector_over(
        Arc::clone(&store),
        vec![Arc::clone(&sink) as _],
        500,
    ));

    let scheduler = Scheduler::new(
        detector,
        vec!["broken".to_string(), "10404".to_string()],
        Duration::from_secs(60),
    );
    let summary = scheduler.run_cycle(Utc::now()).await;

    assert_eq!(summary.search_failures, 1);
    assert_eq!(summary.detections, 1);
    assert_eq!(summary.delivered, 1);

    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].signature, "10404");
}

#[tokio::test]
async fn query_window_is_anchored_at_cycle_time() {
    let store = Arc::new(ScriptedStore::default());
    let detector = detector_over(Arc::clone(&store), Vec::new(), 500);

    let now = Utc::now();
    detector.detect("10404", now).await.expect("search succeeds");

    let queries = store.recorded_queries();
    assert_eq!(queries.len(), 1);

    let expected = TimeWindow::lookback(now, chrono::Duration::minutes(1));
    let range = &queries[0].1["bool"]["filter"][0]["range"]["@timestamp"];
    assert_eq!(range["gte"], serde_json::json!(expected.start().to_rfc3339()));
    assert_eq!(range["lte"], serde_json::json!(expected.end().to_rfc3339()));

    // The index is resolved against the same cycle instant.
    assert_eq!(queries[0].0, format!("app-logs-{}", now.format("%Y.%m.%d")));
}

#[tokio::test]
async fn consecutive_cycles_use_fresh_windows() {
    let store = Arc::new(ScriptedStore::default());
    let detector = detector_over(Arc::clone(&store), Vec::new(), 500);

    let first = Utc::now();
    let second = first + chrono::Duration::seconds(60);
    detector.detect("x", first).await.expect("search succeeds");
    detector.detect("x", second).await.expect("search succeeds");

    let queries = store.recorded_queries();
    let first_range = queries[0].1["bool"]["filter"][0]["range"]["@timestamp"].clone();
    let second_range = queries[1].1["bool"]["filter"][0]["range"]["@timestamp"].clone();
    assert_ne!(first_range, second_range);
}
