use opentelemetry::{
    global,
    metrics::{Counter, Histogram, Meter},
};
use std::sync::LazyLock;

pub static METER: LazyLock<Meter> = LazyLock::new(|| global::meter("market-scout"));

// --- LLM Gateway Metrics ---

pub static GEN_AI_TOKEN_USAGE: LazyLock<Histogram<f64>> = LazyLock::new(|| {
    METER
        .f64_histogram("gen_ai.client.token.usage")
        .with_description("Number of tokens used per LLM call")
        .with_unit("{token}")
        .build()
});

pub static GEN_AI_OPERATION_DURATION: LazyLock<Histogram<f64>> = LazyLock::new(|| {
    METER
        .f64_histogram("gen_ai.client.operation.duration")
        .with_description("Duration of LLM operations in seconds")
        .with_unit("s")
        .build()
});

pub static GEN_AI_RETRY_COUNT: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("gen_ai.client.retry.count")
        .with_description("Number of LLM call retries")
        .with_unit("{retry}")
        .build()
});

pub static GEN_AI_FALLBACK_COUNT: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("gen_ai.client.fallback.count")
        .with_description("Number of LLM fallback activations")
        .with_unit("{fallback}")
        .build()
});

pub static GEN_AI_ERROR_COUNT: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("gen_ai.client.error.count")
        .with_description("Number of LLM call errors")
        .with_unit("{error}")
        .build()
});

// --- Domain Metrics ---

pub static REPORTS_REQUESTED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("report.requested.count")
        .with_description("Number of report generation requests accepted")
        .with_unit("{report}")
        .build()
});

pub static REPORTS_COMPLETED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("report.completed.count")
        .with_description("Number of reports that reached completed status")
        .with_unit("{report}")
        .build()
});

pub static REPORTS_FAILED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("report.failed.count")
        .with_description("Number of reports that reached failed status")
        .with_unit("{report}")
        .build()
});

pub static REPORT_GENERATION_DURATION: LazyLock<Histogram<f64>> = LazyLock::new(|| {
    METER
        .f64_histogram("report.generation.duration")
        .with_description("Total report generation duration in seconds")
        .with_unit("s")
        .build()
});

pub static REPORT_SECTIONS: LazyLock<Histogram<f64>> = LazyLock::new(|| {
    METER
        .f64_histogram("report.sections")
        .with_description("Number of sections generated per report")
        .with_unit("{section}")
        .build()
});

pub static COMPETITORS_ANALYZED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("competitor.analyzed.count")
        .with_description("Number of competitor threat analyses persisted")
        .with_unit("{analysis}")
        .build()
});

pub static THREAT_SCORE: LazyLock<Histogram<f64>> = LazyLock::new(|| {
    METER
        .f64_histogram("competitor.threat.score")
        .with_description("Distribution of computed competitor threat scores")
        .with_unit("{score}")
        .build()
});

// --- Job Queue Metrics ---

pub static JOBS_ENQUEUED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("jobs.enqueued.count")
        .with_description("Number of jobs enqueued")
        .with_unit("{job}")
        .build()
});

pub static JOBS_COMPLETED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("jobs.completed.count")
        .with_description("Number of jobs completed")
        .with_unit("{job}")
        .build()
});

pub static JOBS_FAILED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("jobs.failed.count")
        .with_description("Number of job failures")
        .with_unit("{job}")
        .build()
});

// --- HTTP Metrics ---

pub static HTTP_REQUESTS_TOTAL: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("http.requests.total")
        .with_description("Total number of HTTP requests")
        .with_unit("{request}")
        .build()
});

pub static HTTP_REQUEST_DURATION: LazyLock<Histogram<f64>> = LazyLock::new(|| {
    METER
        .f64_histogram("http.request.duration")
        .with_description("HTTP request duration in milliseconds")
        .with_unit("ms")
        .with_boundaries(vec![
            1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0,
        ])
        .build()
});
