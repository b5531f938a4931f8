/// EventBus Performance Benchmarks using Criterion
///
/// Run with: cargo bench --bench event_bus_benchmark
///
/// Benchmarks cover:
/// - Publish fan-out to a growing number of handlers
/// - Publish with no subscribers
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use console_core::{Event, EventBus, EventKind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Benchmark: one publish delivered to N handlers
fn bench_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("eventbus_fan_out");

    for handler_count in [1usize, 10, 100].iter() {
        let bus = EventBus::new();
        let delivered = Arc::new(AtomicU64::new(0));
        for _ in 0..*handler_count {
            let delivered = Arc::clone(&delivered);
            bus.subscribe(EventKind::UpdateFailed, move |event: &Event| {
                black_box(event);
                delivered.fetch_add(1, Ordering::Relaxed);
            });
        }

        group.throughput(Throughput::Elements(*handler_count as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(handler_count),
            handler_count,
            |b, _| {
                b.iter(|| bus.publish(Event::update_failed("Could not obtain recent activity")));
            },
        );
    }
    group.finish();
}

/// Benchmark: publish with nobody listening
fn bench_no_subscribers(c: &mut Criterion) {
    let bus = EventBus::new();
    c.bench_function("eventbus_no_subscribers", |b| {
        b.iter(|| black_box(bus.publish(Event::Update)));
    });
}

criterion_group!(benches, bench_fan_out, bench_no_subscribers);
criterion_main!(benches);
