//! Benchmarks for request validation
//!
//! This benchmark measures:
//! - Validating minimal and fully populated run requests
//! - Collecting issues from an invalid request
//! - Parsing run responses by status and family

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::{json, Value};

use utopian_labs::types::{RunRequest, RunResponse};

fn minimal_request() -> Value {
    json!({ "agent": "r1", "lead": { "company": { "website": "acme.com" } } })
}

fn full_request(events: usize) -> Value {
    let events: Vec<Value> = (0..events)
        .map(|i| json!({ "description": format!("visited pricing page #{i}"), "timestamp_ms": 1_700_000_000_000u64 + i as u64 }))
        .collect();
    json!({
        "agent": "r1-copywriting",
        "lead": {
            "company": { "website": "https://acme.com", "name": "Acme", "description": "Anvils and more" },
            "person": {
                "full_name": "Sam Doe",
                "email": "sam@acme.com",
                "linkedin_url": "linkedin.com/in/samdoe",
                "job_title": "Head of Sales"
            }
        },
        "user": { "company": { "website": "seller.io" } },
        "events": events,
        "context": "Met at a trade show",
        "min_research_steps": 2,
        "max_research_steps": 10,
        "callback_url": "https://integrations.utopianlabs.ai/hooks/42",
        "use_memory": true,
        "language": "nl",
        "sequence_length": 3,
        "metadata": { "crm_id": 42 }
    })
}

fn invalid_request() -> Value {
    json!({
        "agent": "r1-classification",
        "lead": { "company": { "website": "" }, "person": { "full_name": "", "email": "nope" } },
        "events": [{ "description": 5 }],
        "min_research_steps": -1,
        "callback_url": "http://localhost/hook",
        "options": [{ "name": "" }]
    })
}

fn bench_request_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("request_validation");

    let minimal = minimal_request();
    group.bench_function("minimal", |b| {
        b.iter(|| RunRequest::from_value(black_box(&minimal)))
    });

    for events in [0usize, 10, 100] {
        let full = full_request(events);
        group.throughput(Throughput::Elements(events.max(1) as u64));
        group.bench_with_input(BenchmarkId::new("full", events), &full, |b, full| {
            b.iter(|| RunRequest::from_value(black_box(full)))
        });
    }

    let invalid = invalid_request();
    group.bench_function("invalid_collects_issues", |b| {
        b.iter(|| RunRequest::from_value(black_box(&invalid)).unwrap_err().len())
    });

    group.finish();
}

fn bench_response_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("response_parsing");

    let completed = json!({
        "id": "run_1",
        "agent": "r1-copywriting",
        "status": "completed",
        "created_at": 1_700_000_000_000u64,
        "result": {
            "research": { "steps": [{ "action": "read homepage", "outcome": "B2B tooling" }] },
            "message": { "subject": "Hi", "body": { "markdown": "**Hi**", "html": "<b>Hi</b>" } },
            "sequence": [{ "subject": "Follow up", "body": null }]
        },
        "_status": 200
    });
    group.bench_function("completed_copywriting", |b| {
        b.iter(|| RunResponse::from_value(black_box(&completed)))
    });

    group.finish();
}

criterion_group!(benches, bench_request_validation, bench_response_parsing);
criterion_main!(benches);
