use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::Utc;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tenantrelay_core::{TenantId, UserId};
use tenantrelay_events::event::Join;
use tenantrelay_events::payload::{Member, User};
use tenantrelay_events::{EventRelay, InMemoryEventSource, Listener, RawEvent};
use tenantrelay_observability::{LatencyProfiler, NoopProfiler, Profiler};

fn join(tenant_id: TenantId) -> RawEvent {
    RawEvent::Join(Member {
        tenant_id,
        user: User {
            id: UserId::new(),
            name: "bench".to_string(),
            bot: false,
        },
        nickname: None,
        joined_at: Utc::now(),
    })
}

/// Relay with `tenants` tenants, each holding `per_tenant` listeners, plus one "any" listener.
fn relay_with<P>(
    profiler: P,
    tenants: usize,
    per_tenant: usize,
) -> (Arc<InMemoryEventSource>, EventRelay, Vec<TenantId>)
where
    P: Profiler + 'static,
{
    let source = Arc::new(InMemoryEventSource::new());
    let relay = EventRelay::new(Arc::clone(&source), profiler);
    let sink = Arc::new(AtomicU64::new(0));

    let tenant_ids: Vec<TenantId> = (0..tenants).map(|_| TenantId::new()).collect();
    for tenant in &tenant_ids {
        for _ in 0..per_tenant {
            let sink = Arc::clone(&sink);
            relay.on_tenant_event(
                *tenant,
                &Listener::<Join>::new(move |_| {
                    sink.fetch_add(1, Ordering::Relaxed);
                }),
            );
        }
    }
    let any_sink = Arc::clone(&sink);
    relay.on_any_event(&Listener::<Join>::new(move |_| {
        any_sink.fetch_add(1, Ordering::Relaxed);
    }));

    (source, relay, tenant_ids)
}

fn bench_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch_fan_out");

    for per_tenant in [1usize, 8, 64] {
        let (source, _relay, tenants) = relay_with(NoopProfiler, 100, per_tenant);
        let event = join(tenants[42]);

        group.throughput(Throughput::Elements(per_tenant as u64 + 1));
        group.bench_with_input(
            BenchmarkId::new("noop_profiler", per_tenant),
            &event,
            |b, event| b.iter(|| source.emit(black_box(event.clone())).unwrap()),
        );
    }

    for per_tenant in [1usize, 8, 64] {
        let (source, _relay, tenants) = relay_with(LatencyProfiler::new(), 100, per_tenant);
        let event = join(tenants[42]);

        group.throughput(Throughput::Elements(per_tenant as u64 + 1));
        group.bench_with_input(
            BenchmarkId::new("latency_profiler", per_tenant),
            &event,
            |b, event| b.iter(|| source.emit(black_box(event.clone())).unwrap()),
        );
    }

    group.finish();
}

fn bench_unresolved_tenant(c: &mut Criterion) {
    let (source, _relay, _) = relay_with(NoopProfiler, 1_000, 4);
    let stranger = join(TenantId::new());

    c.bench_function("dispatch_unknown_tenant", |b| {
        b.iter(|| source.emit(black_box(stranger.clone())).unwrap());
    });
}

criterion_group!(benches, bench_fan_out, bench_unresolved_tenant);
criterion_main!(benches);
