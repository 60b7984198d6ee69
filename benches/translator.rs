//! Translator Benchmarks
//!
//! Measures the notification hot path (update storms and add/remove churn)
//! at typical surface contact counts.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lamco_tuio_gateway::protocol::{Notification, SessionId};
use lamco_tuio_gateway::tracking::{CursorRegistry, EventSink, EventTranslator, Viewport};
use std::sync::Arc;

fn core() -> (EventTranslator, Arc<EventSink>) {
    let registry = Arc::new(CursorRegistry::new());
    let sink = Arc::new(EventSink::unbounded());
    let translator = EventTranslator::new(registry, sink.clone(), Viewport::new(1920, 1080));
    (translator, sink)
}

/// One tracker frame updating every active contact
fn bench_update_round(c: &mut Criterion) {
    let mut group = c.benchmark_group("update_round");

    for contacts in [1usize, 10, 50, 200] {
        group.throughput(Throughput::Elements(contacts as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(contacts),
            &contacts,
            |b, &contacts| {
                let (mut translator, sink) = core();
                for i in 0..contacts {
                    translator
                        .handle(Notification::CursorAdd {
                            session: SessionId(i as i64),
                            x: 0.5,
                            y: 0.5,
                        })
                        .unwrap();
                }
                sink.drain();

                b.iter(|| {
                    for i in 0..contacts {
                        translator
                            .handle(black_box(Notification::CursorUpdate {
                                session: SessionId(i as i64),
                                x: 0.25,
                                y: 0.75,
                            }))
                            .unwrap();
                    }
                    sink.drain()
                });
            },
        );
    }

    group.finish();
}

/// Full touch lifecycles per iteration (bind, project, unbind)
fn bench_contact_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("contact_churn");

    for contacts in [10usize, 100] {
        group.throughput(Throughput::Elements(contacts as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(contacts),
            &contacts,
            |b, &contacts| {
                let (mut translator, sink) = core();

                b.iter(|| {
                    for i in 0..contacts {
                        let session = SessionId(i as i64);
                        translator
                            .handle(Notification::CursorAdd {
                                session,
                                x: 0.1,
                                y: 0.9,
                            })
                            .unwrap();
                        translator
                            .handle(Notification::CursorRemove {
                                session,
                                x: 0.1,
                                y: 0.9,
                            })
                            .unwrap();
                    }
                    sink.drain()
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_update_round, bench_contact_churn);
criterion_main!(benches);
