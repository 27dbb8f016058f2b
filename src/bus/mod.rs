//! In-process publish/subscribe hub.
//!
//! Handlers are invoked synchronously in registration order. A handler that
//! returns an error or panics is reported through `tracing` and the remaining
//! handlers still receive the event.

use crate::domain::{AppState, LogEntry};
use std::any::Any;
use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Topic {
    StateChanged,
    LogAdded,
    Tick,
    EngineInitialized,
}

impl Topic {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StateChanged => "STATE:CHANGED",
            Self::LogAdded => "LOG:NEW",
            Self::Tick => "TICK",
            Self::EngineInitialized => "CORE:INIT",
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub enum Event {
    StateChanged(Arc<AppState>),
    LogAdded(LogEntry),
    Tick,
    EngineInitialized,
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Self::StateChanged(_) => Topic::StateChanged,
            Self::LogAdded(_) => Topic::LogAdded,
            Self::Tick => Topic::Tick,
            Self::EngineInitialized => Topic::EngineInitialized,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

pub type HandlerResult = Result<(), String>;

type Handler = Arc<dyn Fn(&Event) -> HandlerResult + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Delivery {
    pub delivered: usize,
    pub failed: usize,
}

#[derive(Default)]
pub struct EventBus {
    next_id: AtomicU64,
    handlers: Mutex<BTreeMap<Topic, Vec<(SubscriptionId, Handler)>>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let handlers = self.handlers.lock().unwrap_or_else(PoisonError::into_inner);
        let counts = handlers
            .iter()
            .map(|(topic, list)| (*topic, list.len()))
            .collect::<BTreeMap<_, _>>();
        f.debug_struct("EventBus").field("handlers", &counts).finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, topic: Topic, handler: F) -> SubscriptionId
    where
        F: Fn(&Event) -> HandlerResult + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(topic)
            .or_default()
            .push((id, Arc::new(handler)));
        id
    }

    /// Forwards every event on `topic` into a channel. Once the receiver is
    /// dropped each delivery counts as a handler failure until unsubscribed.
    pub fn subscribe_channel(&self, topic: Topic) -> (SubscriptionId, Receiver<Event>) {
        let (tx, rx) = mpsc::channel();
        let id = self.subscribe(topic, move |event| {
            tx.send(event.clone())
                .map_err(|_| "subscriber channel closed".to_string())
        });
        (id, rx)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.lock().unwrap_or_else(PoisonError::into_inner);
        for list in handlers.values_mut() {
            if let Some(position) = list.iter().position(|(existing, _)| *existing == id) {
                list.remove(position);
                return true;
            }
        }
        false
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&topic)
            .map(Vec::len)
            .unwrap_or(0)
    }

    pub fn has_subscribers(&self, topic: Topic) -> bool {
        self.subscriber_count(topic) > 0
    }

    pub fn publish(&self, event: Event) -> Delivery {
        let topic = event.topic();
        // Handlers run outside the registry lock so they may subscribe or unsubscribe.
        let targets = self
            .handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&topic)
            .cloned()
            .unwrap_or_default();

        let mut delivery = Delivery::default();
        for (id, handler) in targets {
            match catch_unwind(AssertUnwindSafe(|| handler(&event))) {
                Ok(Ok(())) => delivery.delivered += 1,
                Ok(Err(message)) => {
                    delivery.failed += 1;
                    tracing::warn!(%topic, subscription = id.0, error = %message, "event handler failed");
                }
                Err(payload) => {
                    delivery.failed += 1;
                    tracing::error!(
                        %topic,
                        subscription = id.0,
                        panic = %panic_message(payload.as_ref()),
                        "event handler panicked"
                    );
                }
            }
        }
        delivery
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return (*message).to_string();
    }
    if let Some(message) = payload.downcast_ref::<String>() {
        return message.clone();
    }
    "non-string panic payload".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    type Seen = Arc<Mutex<Vec<&'static str>>>;

    fn record(bus: &EventBus, seen: &Seen, label: &'static str) -> SubscriptionId {
        let sink = Arc::clone(seen);
        bus.subscribe(Topic::Tick, move |_| {
            sink.lock().expect("lock").push(label);
            Ok(())
        })
    }

    #[test]
    fn handlers_run_in_registration_order() {
        let bus = EventBus::new();
        let seen = Seen::default();
        record(&bus, &seen, "first");
        record(&bus, &seen, "second");
        record(&bus, &seen, "third");

        let delivery = bus.publish(Event::Tick);

        assert_eq!(delivery.delivered, 3);
        assert_eq!(*seen.lock().expect("lock"), vec!["first", "second", "third"]);
    }

    #[test]
    fn unsubscribe_removes_exactly_one_handler() {
        let bus = EventBus::new();
        let seen = Seen::default();
        let first = record(&bus, &seen, "a");
        record(&bus, &seen, "b");

        assert!(bus.unsubscribe(first));
        assert!(!bus.unsubscribe(first));
        bus.publish(Event::Tick);

        assert_eq!(*seen.lock().expect("lock"), vec!["b"]);
        assert_eq!(bus.subscriber_count(Topic::Tick), 1);
    }

    #[test]
    fn failing_and_panicking_handlers_do_not_block_later_ones() {
        let bus = EventBus::new();
        let seen = Seen::default();
        bus.subscribe(Topic::Tick, |_| Err("boom".to_string()));
        bus.subscribe(Topic::Tick, |_| panic!("handler exploded"));
        record(&bus, &seen, "survivor");

        let delivery = bus.publish(Event::Tick);

        assert_eq!(
            delivery,
            Delivery {
                delivered: 1,
                failed: 2
            }
        );
        assert_eq!(*seen.lock().expect("lock"), vec!["survivor"]);
    }

    #[test]
    fn events_only_reach_their_topic() {
        let bus = EventBus::new();
        let (_, ticks) = bus.subscribe_channel(Topic::Tick);
        let (_, inits) = bus.subscribe_channel(Topic::EngineInitialized);

        bus.publish(Event::Tick);

        assert!(matches!(ticks.try_recv(), Ok(Event::Tick)));
        assert!(inits.try_recv().is_err());
    }

    #[test]
    fn dropped_channel_receiver_counts_as_failure() {
        let bus = EventBus::new();
        let (_, rx) = bus.subscribe_channel(Topic::Tick);
        drop(rx);
        assert_eq!(bus.publish(Event::Tick).failed, 1);
    }

    #[test]
    fn late_subscribers_do_not_receive_earlier_events() {
        let bus = EventBus::new();
        assert_eq!(bus.publish(Event::Tick), Delivery::default());
        let (_, rx) = bus.subscribe_channel(Topic::Tick);
        assert!(rx.try_recv().is_err());
    }
}
