use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use std::sync::Arc;
use std::thread;
use tenant_clients_core::{
    BoxError, ClientBuilder, CloudConfig, ConfigError, ConfigLoader, EndpointOpts, GlobalConfig,
    ObjectMeta, TenantClientCache,
};

struct Client {
    _endpoint: String,
}

struct Builder;

impl ClientBuilder for Builder {
    type Provider = String;
    type Client = Client;

    fn authenticate(&self, global: &GlobalConfig, _: &str) -> Result<String, BoxError> {
        Ok(global.auth_url.clone())
    }

    fn compute(&self, p: &String, _: &EndpointOpts) -> Result<Client, BoxError> {
        Ok(Client {
            _endpoint: p.clone(),
        })
    }

    fn network(&self, p: &String, o: &EndpointOpts) -> Result<Client, BoxError> {
        self.compute(p, o)
    }

    fn load_balancer(&self, p: &String, o: &EndpointOpts) -> Result<Client, BoxError> {
        self.compute(p, o)
    }

    fn key_manager(&self, p: &String, o: &EndpointOpts) -> Result<Client, BoxError> {
        self.compute(p, o)
    }
}

fn loader(alias: &str) -> Result<CloudConfig, ConfigError> {
    Ok(CloudConfig {
        global: GlobalConfig::new(format!("https://{alias}.example.com/v3")),
    })
}

fn new_cache() -> TenantClientCache<Builder> {
    let loader: Arc<dyn ConfigLoader> = Arc::new(loader);
    TenantClientCache::new(
        "compute",
        Arc::new(Client {
            _endpoint: "default".to_string(),
        }),
        Arc::new(Builder),
        loader,
    )
}

fn tenants(count: usize) -> Vec<ObjectMeta> {
    (0..count)
        .map(|i| ObjectMeta::new("resource").with_project_alias(format!("tenant-{i}")))
        .collect()
}

fn bench_default_path(c: &mut Criterion) {
    let cache = new_cache();
    let meta = ObjectMeta::new("resource").with_label("app", "web");

    c.bench_function("default_client", |b| {
        b.iter(|| black_box(cache.get(black_box(&meta))));
    });
}

fn bench_hit_sequential(c: &mut Criterion) {
    let mut group = c.benchmark_group("hit_sequential");

    for size in [10, 100, 1000].iter() {
        let cache = new_cache();
        let metas = tenants(*size);
        for meta in &metas {
            cache.get(meta);
        }

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                for meta in &metas {
                    black_box(cache.get(meta));
                }
            });
        });
    }

    group.finish();
}

fn bench_concurrent_hits(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_hits");

    for num_threads in [2, 4, 8, 16].iter() {
        let cache = Arc::new(new_cache());
        let metas = Arc::new(tenants(64));
        for meta in metas.iter() {
            cache.get(meta);
        }

        group.bench_with_input(
            BenchmarkId::from_parameter(num_threads),
            num_threads,
            |b, &num_threads| {
                b.iter(|| {
                    let handles: Vec<_> = (0..num_threads)
                        .map(|_| {
                            let cache = Arc::clone(&cache);
                            let metas = Arc::clone(&metas);
                            thread::spawn(move || {
                                for meta in metas.iter() {
                                    black_box(cache.get(meta));
                                }
                            })
                        })
                        .collect();

                    for handle in handles {
                        handle.join().unwrap();
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_cold_construction(c: &mut Criterion) {
    let metas = tenants(100);

    c.bench_function("cold_construction_100", |b| {
        b.iter(|| {
            let cache = new_cache();
            for meta in &metas {
                black_box(cache.get(meta));
            }
        });
    });
}

criterion_group!(
    benches,
    bench_default_path,
    bench_hit_sequential,
    bench_concurrent_hits,
    bench_cold_construction
);
criterion_main!(benches);
