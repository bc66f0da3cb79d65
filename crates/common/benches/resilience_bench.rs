//! Retry executor benchmarks
//!
//! Covers the executor fast paths (immediate success, non-retryable failure)
//! and backoff delay computation.
//!
//! Run with: `cargo bench --bench resilience_bench -p namewizard-common
//! --features runtime`

use std::fmt::{Display, Formatter};
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use namewizard_common::observability::noop_logger;
use namewizard_common::resilience::{
    BackoffSchedule, FailureStatus, NeverRetry, RetryExecutor, RetryPolicy,
};
use tokio::runtime::Builder as RuntimeBuilder;

#[derive(Debug)]
struct BenchError(u16);

impl Display for BenchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "status {}", self.0)
    }
}

impl FailureStatus for BenchError {
    fn status_code(&self) -> Option<u16> {
        Some(self.0)
    }
}

fn build_runtime() -> tokio::runtime::Runtime {
    RuntimeBuilder::new_current_thread()
        .enable_time()
        .build()
        .expect("benchmark runtime should build")
}

fn bench_policy() -> RetryPolicy {
    RetryPolicy::builder()
        .max_retries(3)
        .initial_delay(Duration::from_millis(100))
        .build()
        .expect("benchmark policy should build")
}

fn bench_retry_executor_outcomes(c: &mut Criterion) {
    let mut group = c.benchmark_group("retry_executor_outcomes");
    let runtime = build_runtime();

    group.bench_function("immediate_success", |b| {
        let executor = RetryExecutor::new(bench_policy()).with_logger(noop_logger());
        b.to_async(&runtime).iter(|| async {
            let result = executor.execute(|| async { Ok::<_, BenchError>(()) }).await;
            if let Err(err) = result {
                panic!("retry immediate success failed: {err}");
            }
        });
    });

    group.bench_function("non_retryable_status", |b| {
        let executor = RetryExecutor::new(bench_policy()).with_logger(noop_logger());
        b.to_async(&runtime).iter(|| async {
            let result = executor.execute(|| async { Err::<(), _>(BenchError(400)) }).await;
            black_box(result.is_err());
        });
    });

    group.bench_function("never_retry_predicate", |b| {
        let executor =
            RetryExecutor::with_predicate(bench_policy(), NeverRetry).with_logger(noop_logger());
        b.to_async(&runtime).iter(|| async {
            let result = executor.execute(|| async { Err::<(), _>(BenchError(503)) }).await;
            black_box(result.is_err());
        });
    });

    group.finish();
}

fn bench_backoff_calculations(c: &mut Criterion) {
    let mut group = c.benchmark_group("retry_backoff_calculations");
    let schedule = BackoffSchedule::from_policy(&RetryPolicy::default());

    for retries in [4u32, 16, 64] {
        group.bench_with_input(BenchmarkId::new("base_delay", retries), &retries, |b, &retries| {
            b.iter(|| {
                for index in 0..retries {
                    black_box(schedule.base_delay(black_box(index)));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("jittered_delay", retries), &retries, |b, &retries| {
            b.iter(|| {
                for index in 0..retries {
                    black_box(schedule.delay_for(black_box(index)));
                }
            });
        });
    }

    group.finish();
}

criterion_group!(resilience, bench_retry_executor_outcomes, bench_backoff_calculations);
criterion_main!(resilience);
