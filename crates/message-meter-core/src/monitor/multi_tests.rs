//! Tests for the fan-out monitor.

use super::*;
use crate::error::MonitorConfigError;
use crate::message::GenericMessage;
use crate::monitor::{MessageCountingMonitor, MessageTimerMonitor};
use crate::tags::MetadataTagger;
use meter_runtime::{InMemoryRegistry, ManualClock, SeriesName, SeriesRegistryFactory, Tags};
use std::time::Duration;

fn timer(
    registry: Arc<InMemoryRegistry>,
    clock: Arc<ManualClock>,
    prefix: &str,
) -> Result<MessageTimerMonitor<GenericMessage>, MonitorConfigError> {
    MessageTimerMonitor::builder()
        .meter_name_prefix(prefix)?
        .registry(registry)
        .clock(clock)
        .build()
}

fn timer_count(registry: &InMemoryRegistry, name: &str) -> u64 {
    registry
        .timer_snapshot(&SeriesName::new(name).unwrap(), &Tags::none())
        .map(|snapshot| snapshot.count)
        .unwrap_or(0)
}

#[test]
fn test_outcome_reaches_every_delegate_once() {
    let registry = SeriesRegistryFactory::create_test_registry();
    let clock = Arc::new(ManualClock::starting_now());

    let timer_monitor = timer(registry.clone(), clock.clone(), "commandBus").unwrap();
    let counting_monitor = MessageCountingMonitor::builder()
        .meter_name_prefix("commandBus")
        .unwrap()
        .registry(registry.clone())
        .build()
        .unwrap();

    let monitor = MultiMessageMonitor::new(vec![
        Arc::new(timer_monitor) as Arc<dyn MessageMonitor<GenericMessage>>,
        Arc::new(counting_monitor),
    ]);
    assert_eq!(monitor.delegate_count(), 2);

    let handle = monitor
        .on_message_ingested(&GenericMessage::new("OrderPlaced"))
        .unwrap();
    clock.advance(chrono::Duration::seconds(1));
    handle.report_success();

    let all = registry
        .timer_snapshot(
            &SeriesName::new("commandBus.allTimer").unwrap(),
            &Tags::none(),
        )
        .unwrap();
    assert_eq!(all.count, 1);
    assert_eq!(all.total, Duration::from_secs(1));

    let success = registry
        .counter_value(
            &SeriesName::new("commandBus.successCounter").unwrap(),
            &Tags::none(),
        )
        .unwrap();
    assert_eq!(success, 1);
}

#[test]
fn test_handles_stay_aligned_per_message() {
    let registry = SeriesRegistryFactory::create_test_registry();
    let clock = Arc::new(ManualClock::starting_now());

    let first = timer(registry.clone(), clock.clone(), "commandBus").unwrap();
    let second = timer(registry.clone(), clock.clone(), "eventBus").unwrap();
    let monitor = MultiMessageMonitor::new(vec![
        Arc::new(first) as Arc<dyn MessageMonitor<GenericMessage>>,
        Arc::new(second),
    ]);

    let batch = vec![
        GenericMessage::new("OrderPlaced"),
        GenericMessage::new("OrderPlaced"),
    ];
    let mut handles = monitor.on_messages_ingested(&batch).unwrap();
    assert_eq!(handles.len(), 2);

    clock.advance(chrono::Duration::seconds(1));
    handles.pop().unwrap().report_failure(None);
    handles.pop().unwrap().report_success();

    // Both delegates saw one success and one failure
    for prefix in ["commandBus", "eventBus"] {
        assert_eq!(timer_count(&registry, &format!("{prefix}.allTimer")), 2);
        assert_eq!(timer_count(&registry, &format!("{prefix}.successTimer")), 1);
        assert_eq!(timer_count(&registry, &format!("{prefix}.failureTimer")), 1);
    }
}

#[test]
fn test_empty_delegate_list_is_a_no_op() {
    let monitor: MultiMessageMonitor<GenericMessage> = MultiMessageMonitor::new(Vec::new());
    assert_eq!(monitor.delegate_count(), 0);

    let batch = vec![GenericMessage::new("OrderPlaced")];
    let handles = monitor.on_messages_ingested(&batch).unwrap();
    assert_eq!(handles.len(), 1);

    for handle in handles {
        handle.report_success();
    }
}

#[test]
fn test_delegate_extraction_failure_aborts_ingestion() {
    let registry = SeriesRegistryFactory::create_test_registry();
    let clock = Arc::new(ManualClock::starting_now());

    let plain = timer(registry.clone(), clock.clone(), "commandBus").unwrap();
    let tagged = MessageTimerMonitor::builder()
        .meter_name_prefix("eventBus")
        .unwrap()
        .registry(registry.clone())
        .clock(clock.clone())
        .tag_extractor(MetadataTagger::new("tenant"))
        .build()
        .unwrap();

    let monitor = MultiMessageMonitor::new(vec![
        Arc::new(plain) as Arc<dyn MessageMonitor<GenericMessage>>,
        Arc::new(tagged),
    ]);

    // The second delegate requires metadata the message does not carry
    let result = monitor.on_messages_ingested(&[GenericMessage::new("OrderPlaced")]);
    assert!(result.is_err());

    // The first delegate's handles were dropped unresolved
    assert_eq!(timer_count(&registry, "commandBus.allTimer"), 0);
}
