//! Tests for backend configuration.

use super::*;

#[test]
fn test_backend_type_names() {
    assert_eq!(BackendType::InMemory.name(), "in-memory");
    assert_eq!(BackendType::Prometheus.name(), "prometheus");
}

#[test]
fn test_backend_export_capability() {
    assert!(!BackendType::InMemory.is_exporting());
    assert!(BackendType::Prometheus.is_exporting());
}

#[test]
fn test_backend_config_type_selection() {
    let in_memory = BackendConfig::InMemory(InMemoryConfig::default());
    assert_eq!(in_memory.backend_type(), BackendType::InMemory);

    let prometheus = BackendConfig::Prometheus(PrometheusConfig::default());
    assert_eq!(prometheus.backend_type(), BackendType::Prometheus);

    assert_eq!(
        BackendConfig::default().backend_type(),
        BackendType::InMemory
    );
}

#[test]
fn test_in_memory_config_validation() {
    assert!(InMemoryConfig::default().validate().is_ok());

    let zero_cap = InMemoryConfig { max_series: 0 };
    assert!(zero_cap.validate().is_err());
}

#[test]
fn test_prometheus_config_validation() {
    assert!(PrometheusConfig::default().validate().is_ok());

    let named = PrometheusConfig {
        namespace: Some("billing".to_string()),
        ..PrometheusConfig::default()
    };
    assert!(named.validate().is_ok());

    let empty_namespace = PrometheusConfig {
        namespace: Some(String::new()),
        ..PrometheusConfig::default()
    };
    assert!(empty_namespace.validate().is_err());

    let no_buckets = PrometheusConfig {
        default_buckets: Vec::new(),
        ..PrometheusConfig::default()
    };
    assert!(no_buckets.validate().is_err());

    let unsorted_buckets = PrometheusConfig {
        default_buckets: vec![1.0, 0.5, 2.0],
        ..PrometheusConfig::default()
    };
    assert!(unsorted_buckets.validate().is_err());
}

#[test]
fn test_backend_config_serialization() {
    let config = BackendConfig::Prometheus(PrometheusConfig {
        namespace: Some("messaging".to_string()),
        default_buckets: vec![0.1, 1.0],
    });

    let json = serde_json::to_string(&config).unwrap();
    let restored: BackendConfig = serde_json::from_str(&json).unwrap();

    assert_eq!(restored.backend_type(), BackendType::Prometheus);
    match restored {
        BackendConfig::Prometheus(prometheus) => {
            assert_eq!(prometheus.namespace.as_deref(), Some("messaging"));
            assert_eq!(prometheus.default_buckets, vec![0.1, 1.0]);
        }
        BackendConfig::InMemory(_) => panic!("expected prometheus configuration"),
    }
}
