//! Prometheus metric backend.
//!
//! Bridges the series registry onto a dedicated `prometheus::Registry`.
//! Logical dotted series names are sanitized to the character set
//! Prometheus accepts (`commandBus.allTimer` exports as
//! `commandBus_allTimer`), and tag keys become label names.
//!
//! Prometheus fixes the label name set of a metric family at creation.
//! The first lookup of a name decides its label keys and creation options;
//! later lookups with a different key set are logged and handed a detached
//! series instead of failing the caller.

use crate::error::MeterError;
use crate::provider::{BackendType, PrometheusConfig};
use crate::registry::{
    CounterSeries, GaugeSeries, NoOpCounter, NoOpGauge, NoOpTimer, SeriesRegistry, TimerSeries,
};
use crate::series::{SeriesName, Tags, TimerOptions};
use prometheus::{
    Encoder, Gauge, GaugeVec, Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec,
    Opts, Registry, TextEncoder,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::warn;

/// Rewrite a logical series name into the Prometheus name grammar
///
/// Characters outside `[a-zA-Z0-9_]` become underscores and a leading
/// digit gets an underscore prefix. Distinct logical names can collide
/// after sanitization; the first one registered wins the exported name.
fn sanitize_name(name: &str) -> String {
    let mut sanitized: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();

    if sanitized.starts_with(|c: char| c.is_ascii_digit()) {
        sanitized.insert(0, '_');
    }

    sanitized
}

struct HistogramFamily {
    vec: HistogramVec,
    label_names: Vec<String>,
}

struct CounterFamily {
    vec: IntCounterVec,
    label_names: Vec<String>,
}

struct GaugeFamily {
    vec: GaugeVec,
    label_names: Vec<String>,
}

#[derive(Default)]
struct Families {
    timers: HashMap<String, HistogramFamily>,
    counters: HashMap<String, CounterFamily>,
    gauges: HashMap<String, GaugeFamily>,
}

/// Timer series writing into a Prometheus histogram child
struct PrometheusTimer {
    histogram: Histogram,
}

impl TimerSeries for PrometheusTimer {
    fn record(&self, elapsed: Duration) {
        self.histogram.observe(elapsed.as_secs_f64());
    }
}

/// Counter series writing into a Prometheus counter child
struct PrometheusCounter {
    counter: IntCounter,
}

impl CounterSeries for PrometheusCounter {
    fn increment(&self) {
        self.counter.inc();
    }

    fn increment_by(&self, amount: u64) {
        self.counter.inc_by(amount);
    }
}

/// Gauge series writing into a Prometheus gauge child
struct PrometheusGauge {
    gauge: Gauge,
}

impl GaugeSeries for PrometheusGauge {
    fn set(&self, value: f64) {
        self.gauge.set(value);
    }
}

/// Prometheus-backed series registry
///
/// Owns its own `prometheus::Registry` rather than the process-global
/// default, so multiple registries can coexist in one process and tests
/// never bleed series into each other.
pub struct PrometheusRegistry {
    registry: Registry,
    default_buckets: Vec<f64>,
    families: RwLock<Families>,
}

impl PrometheusRegistry {
    /// Create Prometheus registry from configuration
    pub fn new(config: PrometheusConfig) -> Result<Self, MeterError> {
        config.validate()?;

        let registry = match &config.namespace {
            Some(namespace) => Registry::new_custom(Some(namespace.clone()), None).map_err(
                |error| MeterError::Backend {
                    backend: BackendType::Prometheus.name().to_string(),
                    message: error.to_string(),
                },
            )?,
            None => Registry::new(),
        };

        Ok(Self {
            registry,
            default_buckets: config.default_buckets,
            families: RwLock::new(Families::default()),
        })
    }

    /// Access the underlying Prometheus registry, for mounting a scrape
    /// endpoint or combining with other collectors
    pub fn prometheus_registry(&self) -> &Registry {
        &self.registry
    }

    /// Gather all exported metric families
    pub fn gather(&self) -> Vec<prometheus::proto::MetricFamily> {
        self.registry.gather()
    }

    /// Render all series in the Prometheus text exposition format
    pub fn export_text(&self) -> Result<String, MeterError> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|error| MeterError::Backend {
                backend: BackendType::Prometheus.name().to_string(),
                message: error.to_string(),
            })?;

        String::from_utf8(buffer).map_err(|error| MeterError::Backend {
            backend: BackendType::Prometheus.name().to_string(),
            message: error.to_string(),
        })
    }

    fn create_timer_family(
        &self,
        metric_name: &str,
        name: &SeriesName,
        label_names: &[String],
        options: &TimerOptions,
    ) -> Result<HistogramFamily, prometheus::Error> {
        let help = options
            .description
            .clone()
            .unwrap_or_else(|| format!("Latency distribution for {}", name));
        let buckets = options
            .buckets
            .clone()
            .unwrap_or_else(|| self.default_buckets.clone());

        let opts = HistogramOpts::new(metric_name.to_string(), help).buckets(buckets);
        let label_refs: Vec<&str> = label_names.iter().map(String::as_str).collect();
        let vec = HistogramVec::new(opts, &label_refs)?;
        self.registry.register(Box::new(vec.clone()))?;

        Ok(HistogramFamily {
            vec,
            label_names: label_names.to_vec(),
        })
    }

    fn create_counter_family(
        &self,
        metric_name: &str,
        name: &SeriesName,
        label_names: &[String],
    ) -> Result<CounterFamily, prometheus::Error> {
        let opts = Opts::new(metric_name.to_string(), format!("Event count for {}", name));
        let label_refs: Vec<&str> = label_names.iter().map(String::as_str).collect();
        let vec = IntCounterVec::new(opts, &label_refs)?;
        self.registry.register(Box::new(vec.clone()))?;

        Ok(CounterFamily {
            vec,
            label_names: label_names.to_vec(),
        })
    }

    fn create_gauge_family(
        &self,
        metric_name: &str,
        name: &SeriesName,
        label_names: &[String],
    ) -> Result<GaugeFamily, prometheus::Error> {
        let opts = Opts::new(
            metric_name.to_string(),
            format!("Current value of {}", name),
        );
        let label_refs: Vec<&str> = label_names.iter().map(String::as_str).collect();
        let vec = GaugeVec::new(opts, &label_refs)?;
        self.registry.register(Box::new(vec.clone()))?;

        Ok(GaugeFamily {
            vec,
            label_names: label_names.to_vec(),
        })
    }
}

// The wrapped prometheus types carry no Debug of their own.
impl fmt::Debug for PrometheusRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrometheusRegistry")
            .field("default_buckets", &self.default_buckets)
            .finish_non_exhaustive()
    }
}

fn timer_child(
    family: &HistogramFamily,
    name: &SeriesName,
    label_names: &[String],
    label_values: &[&str],
) -> Arc<dyn TimerSeries> {
    if family.label_names != label_names {
        warn!(
            series = %name,
            expected = ?family.label_names,
            requested = ?label_names,
            "Label keys differ from first registration, returning detached timer"
        );
        return Arc::new(NoOpTimer);
    }

    match family.vec.get_metric_with_label_values(label_values) {
        Ok(histogram) => Arc::new(PrometheusTimer { histogram }),
        Err(error) => {
            warn!(
                series = %name,
                error = %error,
                "Failed to resolve timer child, returning detached timer"
            );
            Arc::new(NoOpTimer)
        }
    }
}

fn counter_child(
    family: &CounterFamily,
    name: &SeriesName,
    label_names: &[String],
    label_values: &[&str],
) -> Arc<dyn CounterSeries> {
    if family.label_names != label_names {
        warn!(
            series = %name,
            expected = ?family.label_names,
            requested = ?label_names,
            "Label keys differ from first registration, returning detached counter"
        );
        return Arc::new(NoOpCounter);
    }

    match family.vec.get_metric_with_label_values(label_values) {
        Ok(counter) => Arc::new(PrometheusCounter { counter }),
        Err(error) => {
            warn!(
                series = %name,
                error = %error,
                "Failed to resolve counter child, returning detached counter"
            );
            Arc::new(NoOpCounter)
        }
    }
}

fn gauge_child(
    family: &GaugeFamily,
    name: &SeriesName,
    label_names: &[String],
    label_values: &[&str],
) -> Arc<dyn GaugeSeries> {
    if family.label_names != label_names {
        warn!(
            series = %name,
            expected = ?family.label_names,
            requested = ?label_names,
            "Label keys differ from first registration, returning detached gauge"
        );
        return Arc::new(NoOpGauge);
    }

    match family.vec.get_metric_with_label_values(label_values) {
        Ok(gauge) => Arc::new(PrometheusGauge { gauge }),
        Err(error) => {
            warn!(
                series = %name,
                error = %error,
                "Failed to resolve gauge child, returning detached gauge"
            );
            Arc::new(NoOpGauge)
        }
    }
}

impl SeriesRegistry for PrometheusRegistry {
    fn timer(
        &self,
        name: &SeriesName,
        tags: &Tags,
        options: &TimerOptions,
    ) -> Arc<dyn TimerSeries> {
        let metric_name = sanitize_name(name.as_str());
        let label_names: Vec<String> = tags.keys().map(sanitize_name).collect();
        let label_values: Vec<&str> = tags.values().collect();

        {
            let families = self.families.read().unwrap();
            if let Some(family) = families.timers.get(&metric_name) {
                return timer_child(family, name, &label_names, &label_values);
            }
        } // Lock released here

        let mut families = self.families.write().unwrap();
        if !families.timers.contains_key(&metric_name) {
            match self.create_timer_family(&metric_name, name, &label_names, options) {
                Ok(family) => {
                    families.timers.insert(metric_name.clone(), family);
                }
                Err(error) => {
                    warn!(
                        series = %name,
                        error = %error,
                        "Prometheus rejected timer series, returning detached timer"
                    );
                    return Arc::new(NoOpTimer);
                }
            }
        }

        timer_child(
            &families.timers[&metric_name],
            name,
            &label_names,
            &label_values,
        )
    }

    fn counter(&self, name: &SeriesName, tags: &Tags) -> Arc<dyn CounterSeries> {
        let metric_name = sanitize_name(name.as_str());
        let label_names: Vec<String> = tags.keys().map(sanitize_name).collect();
        let label_values: Vec<&str> = tags.values().collect();

        {
            let families = self.families.read().unwrap();
            if let Some(family) = families.counters.get(&metric_name) {
                return counter_child(family, name, &label_names, &label_values);
            }
        } // Lock released here

        let mut families = self.families.write().unwrap();
        if !families.counters.contains_key(&metric_name) {
            match self.create_counter_family(&metric_name, name, &label_names) {
                Ok(family) => {
                    families.counters.insert(metric_name.clone(), family);
                }
                Err(error) => {
                    warn!(
                        series = %name,
                        error = %error,
                        "Prometheus rejected counter series, returning detached counter"
                    );
                    return Arc::new(NoOpCounter);
                }
            }
        }

        counter_child(
            &families.counters[&metric_name],
            name,
            &label_names,
            &label_values,
        )
    }

    fn gauge(&self, name: &SeriesName, tags: &Tags) -> Arc<dyn GaugeSeries> {
        let metric_name = sanitize_name(name.as_str());
        let label_names: Vec<String> = tags.keys().map(sanitize_name).collect();
        let label_values: Vec<&str> = tags.values().collect();

        {
            let families = self.families.read().unwrap();
            if let Some(family) = families.gauges.get(&metric_name) {
                return gauge_child(family, name, &label_names, &label_values);
            }
        } // Lock released here

        let mut families = self.families.write().unwrap();
        if !families.gauges.contains_key(&metric_name) {
            match self.create_gauge_family(&metric_name, name, &label_names) {
                Ok(family) => {
                    families.gauges.insert(metric_name.clone(), family);
                }
                Err(error) => {
                    warn!(
                        series = %name,
                        error = %error,
                        "Prometheus rejected gauge series, returning detached gauge"
                    );
                    return Arc::new(NoOpGauge);
                }
            }
        }

        gauge_child(
            &families.gauges[&metric_name],
            name,
            &label_names,
            &label_values,
        )
    }
}

#[cfg(test)]
#[path = "prometheus_tests.rs"]
mod tests;
