//! Tests for the series registry boundary.

use super::*;
use crate::provider::{InMemoryConfig, PrometheusConfig};

#[test]
fn test_noop_registry_accepts_writes() {
    let registry = NoOpSeriesRegistry;
    let name = SeriesName::new("commandBus.allTimer").unwrap();

    registry
        .timer(&name, &Tags::none(), &TimerOptions::default())
        .record(Duration::from_secs(1));
    registry.counter(&name, &Tags::none()).increment();
    registry.counter(&name, &Tags::none()).increment_by(10);
    registry.gauge(&name, &Tags::none()).set(1.5);
}

#[test]
fn test_factory_creates_in_memory_registry() {
    let registry =
        SeriesRegistryFactory::create(BackendConfig::InMemory(InMemoryConfig::default())).unwrap();

    let name = SeriesName::new("commandBus.allTimer").unwrap();
    registry
        .timer(&name, &Tags::of("payloadType", "OrderPlaced"), &TimerOptions::default())
        .record(Duration::from_millis(10));
}

#[test]
fn test_factory_creates_prometheus_registry() {
    let registry =
        SeriesRegistryFactory::create(BackendConfig::Prometheus(PrometheusConfig::default()))
            .unwrap();

    let name = SeriesName::new("commandBus.allTimer").unwrap();
    registry.counter(&name, &Tags::none()).increment();
}

#[test]
fn test_factory_rejects_invalid_configuration() {
    let result =
        SeriesRegistryFactory::create(BackendConfig::InMemory(InMemoryConfig { max_series: 0 }));

    let error = result.err().unwrap();
    assert!(error.is_configuration());
}

#[test]
fn test_test_registry_is_queryable() {
    let registry = SeriesRegistryFactory::create_test_registry();
    let name = SeriesName::new("eventBus.ingestedCounter").unwrap();

    registry.counter(&name, &Tags::none()).increment();

    assert_eq!(registry.counter_value(&name, &Tags::none()), Some(1));
}
