//! Benchmarks for logger lookup and record dispatch.

use std::sync::Arc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use loghive::{ConfigBuilder, Level, LoggerConfigBuilder, NullHandler, Registry};

fn populated_registry() -> Registry {
    let registry = Registry::new();
    for service in ["api", "db", "cache", "queue"] {
        for part in ["client", "server", "pool"] {
            registry.get_logger(&format!("app.{service}.{part}"));
        }
    }
    registry
}

fn dispatch_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");

    let registry = populated_registry();
    group.bench_function("get_logger_existing", |b| {
        b.iter(|| black_box(registry.get_logger(black_box("app.db.pool"))));
    });

    let disabled = registry.get_logger("app.api.client");
    group.bench_function("log_below_threshold", |b| {
        b.iter(|| black_box(disabled.debug(black_box("skipped"))));
    });

    registry.root().add_handler(Arc::new(NullHandler));
    registry.root().set_level(Level::DEBUG).expect("valid level");
    let deep = registry.get_logger("app.cache.server");
    group.bench_function("log_three_level_walk", |b| {
        b.iter(|| black_box(deep.info(black_box("delivered"))));
    });

    group.bench_function("config_build_and_init", |b| {
        let config = ConfigBuilder::new()
            .with_handler("null", loghive::NullHandlerBuilder::new())
            .with_root_logger(
                LoggerConfigBuilder::new()
                    .with_level("INFO")
                    .with_handlers(["null"]),
            );
        b.iter(|| {
            let registry = Registry::new();
            config.build_and_init(&registry).expect("valid configuration");
            black_box(registry)
        });
    });

    group.finish();
}

criterion_group!(benches, dispatch_benchmarks);
criterion_main!(benches);
