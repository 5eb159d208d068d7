//! Benchmark suite for the rate aggregation path.
//!
//! Measures one `get_rates` call over in-memory collaborators:
//! - cold cache (every courier hits the price table adapter)
//! - warm cache (every courier served from the rate cache)
//! - growing courier fan-out
//!
//! Run with: `cargo bench --bench rate_aggregation`

#![allow(clippy::unwrap_used, reason = "Benchmark setup uses known-good fixtures")]
#![allow(missing_docs, reason = "Benchmark functions are self-documenting")]

use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rust_decimal::Decimal;
use shipping_rates::application::dto::ShippingRateRequest;
use shipping_rates::application::{AggregationConfig, ShippingRateService};
use shipping_rates::domain::entities::{
    Channel, CourierCoverageCode, CourierIdentity, CourierServiceCandidate,
};
use shipping_rates::domain::value_objects::{
    AddressToken, ChannelId, CourierCode, CourierId, CourierServiceId, PackageAttributes,
    ShippingCode,
};
use shipping_rates::infrastructure::cache::{InMemoryRateCache, RateCache};
use shipping_rates::infrastructure::persistence::in_memory::InMemoryCatalog;
use shipping_rates::infrastructure::providers::{
    PriceTableAdapter, PriceTableRow, ProviderRegistry,
};
use tokio::runtime::Runtime;

/// Builds a channel with `couriers` couriers, each offering two services,
/// all priced by the internal price table.
async fn setup(
    couriers: usize,
    cache: Arc<dyn RateCache>,
) -> (ShippingRateService, ShippingRateRequest) {
    let catalog = InMemoryCatalog::new();
    let channel_id = ChannelId::new_v4();
    catalog.channels.save(Channel::new(channel_id, "bench")).await;

    let mut registry = ProviderRegistry::new();
    let adapter = Arc::new(PriceTableAdapter::new(catalog.price_table.clone()));
    let mut service_ids = Vec::new();

    for n in 0..couriers {
        let code = format!("courier{n}");
        let courier = CourierIdentity::new(CourierId::new_v4(), &code, code.to_uppercase());
        for (postal, area) in [("12190", "JKT"), ("40111", "BDG")] {
            catalog
                .coverage
                .save(CourierCoverageCode {
                    courier_id: courier.id,
                    country_code: "id".to_string(),
                    postal_code: Some(postal.to_string()),
                    subdistrict_code: None,
                    area_code: area.to_string(),
                })
                .await;
        }

        let offered = [("reg", "regular", 9000), ("yes", "express", 18000)];
        for (shipping, shipping_type, price) in offered {
            let id = CourierServiceId::new_v4();
            let candidate = CourierServiceCandidate::builder(id, courier.clone())
                .shipping(shipping, shipping.to_uppercase())
                .shipping_type(shipping_type, shipping_type)
                .etd(1, 3)
                .build();
            catalog.courier_services.save(candidate).await;
            catalog.price_table.insert(PriceTableRow {
                courier_code: CourierCode::new(&code),
                shipping_code: ShippingCode::new(shipping),
                origin_area: "JKT".to_string(),
                destination_area: "BDG".to_string(),
                unit_price: Decimal::new(price, 0),
                min_day: 1,
                max_day: 3,
                insurance_fee: Decimal::ZERO,
            });
            service_ids.push(id);
        }
        registry.register(code.as_str(), adapter.clone());
    }
    catalog
        .courier_services
        .assign(channel_id, service_ids.iter().copied())
        .await;

    let service = ShippingRateService::new(
        Arc::new(catalog.channels.clone()),
        Arc::new(catalog.courier_services.clone()),
        Arc::new(catalog.coverage.clone()),
        cache,
        Arc::new(registry),
        AggregationConfig::default(),
    );
    let request = ShippingRateRequest::new(
        channel_id,
        service_ids,
        PackageAttributes::new(
            Decimal::new(25, 1),
            Decimal::new(30, 0),
            Decimal::new(20, 0),
            Decimal::TEN,
        ),
        AddressToken::new("id").with_postal_code("12190"),
        AddressToken::new("id").with_postal_code("40111"),
    );

    (service, request)
}

/// Benchmark with an always-empty cache.
fn bench_cold_cache(c: &mut Criterion) {
    let runtime = Runtime::new().unwrap();
    let mut group = c.benchmark_group("get_rates_cold");

    for couriers in [1, 4, 16] {
        group.bench_with_input(BenchmarkId::new("couriers", couriers), &couriers, |b, &n| {
            b.to_async(&runtime).iter(|| async move {
                let cache = Arc::new(InMemoryRateCache::new());
                let (service, request) = setup(n, cache).await;
                black_box(service.get_rates(&request).await.unwrap())
            });
        });
    }

    group.finish();
}

/// Benchmark with every bundle already cached.
fn bench_warm_cache(c: &mut Criterion) {
    let runtime = Runtime::new().unwrap();
    let (service, request) = runtime.block_on(async {
        let cache = Arc::new(InMemoryRateCache::new());
        let (service, request) = setup(16, cache).await;
        service.get_rates(&request).await.unwrap();
        (service, request)
    });

    c.bench_function("get_rates_warm_16_couriers", |b| {
        b.to_async(&runtime)
            .iter(|| async { black_box(service.get_rates(black_box(&request)).await.unwrap()) });
    });
}

criterion_group!(benches, bench_cold_cache, bench_warm_cache);
criterion_main!(benches);
