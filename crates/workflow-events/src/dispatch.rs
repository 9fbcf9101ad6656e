//! Observer registration and event delivery
//!
//! The [`Dispatcher`] is the in-process delivery mechanism for workflow
//! events. Observers register an [`EventHandler`], optionally restricted to
//! some kinds, and receive events either immediately ([`Dispatcher::send_event`])
//! or when the posted queue is drained ([`Dispatcher::process_events`]).
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use workflow_events::{Dispatcher, NodeId, WorkflowEvent, WorkflowEventKind};
//!
//! let dispatcher = Dispatcher::default();
//! dispatcher.subscribe_kinds(
//!     [WorkflowEventKind::NodeAdded],
//!     Arc::new(|event: &WorkflowEvent| event.pos() == Some(0)),
//! );
//!
//! assert!(dispatcher.send_event(&WorkflowEvent::node_added(NodeId::new("a"), 0)));
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::{EventError, Result};
use crate::event::WorkflowEvent;
use crate::kind::{KindCategory, WorkflowEventKind};
use crate::sink::EventSink;

/// Receiver of dispatched events
pub trait EventHandler: Send + Sync {
    /// Handle an event, returning whether it was accepted
    fn event(&self, event: &WorkflowEvent) -> bool;
}

impl<F> EventHandler for F
where
    F: Fn(&WorkflowEvent) -> bool + Send + Sync,
{
    fn event(&self, event: &WorkflowEvent) -> bool {
        self(event)
    }
}

/// Identifier returned by [`Dispatcher::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Which events a subscription receives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KindFilter {
    All,
    Kinds(Vec<WorkflowEventKind>),
    Category(KindCategory),
}

impl KindFilter {
    pub fn matches(&self, kind: WorkflowEventKind) -> bool {
        match self {
            Self::All => true,
            Self::Kinds(kinds) => kinds.contains(&kind),
            Self::Category(category) => kind.category() == *category,
        }
    }
}

/// Dispatcher behaviour
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DispatcherConfig {
    /// Stop delivering an event once a handler accepts it
    pub stop_on_accept: bool,
    /// Maximum number of posted events waiting for delivery
    pub max_queued: Option<usize>,
}

impl DispatcherConfig {
    /// Parse a configuration from JSON, missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

struct Subscription {
    id: SubscriptionId,
    filter: KindFilter,
    handler: Arc<dyn EventHandler>,
}

/// In-process event dispatcher
#[derive(Default)]
pub struct Dispatcher {
    config: DispatcherConfig,
    subscriptions: Mutex<Vec<Subscription>>,
    next_id: AtomicU64,
    queue: Mutex<VecDeque<WorkflowEvent>>,
}

impl Dispatcher {
    pub fn new(config: DispatcherConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Register a handler for every event kind
    pub fn subscribe(&self, handler: Arc<dyn EventHandler>) -> SubscriptionId {
        self.subscribe_filtered(KindFilter::All, handler)
    }

    /// Register a handler for a fixed set of kinds
    pub fn subscribe_kinds(
        &self,
        kinds: impl IntoIterator<Item = WorkflowEventKind>,
        handler: Arc<dyn EventHandler>,
    ) -> SubscriptionId {
        self.subscribe_filtered(KindFilter::Kinds(kinds.into_iter().collect()), handler)
    }

    pub fn subscribe_filtered(
        &self,
        filter: KindFilter,
        handler: Arc<dyn EventHandler>,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        self.subscriptions.lock().push(Subscription {
            id,
            filter,
            handler,
        });
        id
    }

    /// Remove a handler, returning whether it was registered
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscriptions = self.subscriptions.lock();
        let before = subscriptions.len();
        subscriptions.retain(|s| s.id != id);
        subscriptions.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscriptions.lock().len()
    }

    /// Deliver an event synchronously
    ///
    /// Handlers are called in subscription order. Returns whether any
    /// handler accepted the event.
    pub fn send_event(&self, event: &WorkflowEvent) -> bool {
        let kind = event.kind();
        // Handlers run without the lock held so they may subscribe or post
        let handlers: Vec<Arc<dyn EventHandler>> = self
            .subscriptions
            .lock()
            .iter()
            .filter(|s| s.filter.matches(kind))
            .map(|s| Arc::clone(&s.handler))
            .collect();

        log::debug!("Dispatching {} event to {} handler(s)", kind, handlers.len());

        let mut accepted = false;
        for handler in handlers {
            if handler.event(event) {
                accepted = true;
                if self.config.stop_on_accept {
                    break;
                }
            }
        }
        accepted
    }

    /// Queue an event for delivery by [`process_events`](Self::process_events)
    pub fn post_event(&self, event: WorkflowEvent) -> Result<()> {
        let mut queue = self.queue.lock();
        if let Some(capacity) = self.config.max_queued {
            if queue.len() >= capacity {
                log::warn!("Event queue full, rejecting {} event", event.kind());
                return Err(EventError::QueueFull { capacity });
            }
        }
        queue.push_back(event);
        Ok(())
    }

    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }

    /// Deliver queued events in FIFO order
    ///
    /// Events posted by handlers while draining are delivered in the same
    /// call. Returns the number of events delivered.
    pub fn process_events(&self) -> usize {
        let mut delivered = 0;
        loop {
            let next = self.queue.lock().pop_front();
            let Some(event) = next else {
                break;
            };
            self.send_event(&event);
            delivered += 1;
        }
        delivered
    }
}

impl EventSink for Dispatcher {
    fn send(&self, event: WorkflowEvent) -> Result<()> {
        self.post_event(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::VecEventSink;
    use crate::types::{AnnotationId, LinkId, NodeId};

    /// Handler recording events into a sink
    struct Recorder {
        sink: VecEventSink,
        accept: bool,
    }

    impl Recorder {
        fn new(accept: bool) -> Arc<Self> {
            Arc::new(Self {
                sink: VecEventSink::new(),
                accept,
            })
        }
    }

    impl EventHandler for Recorder {
        fn event(&self, event: &WorkflowEvent) -> bool {
            self.sink.send(event.clone()).is_ok() && self.accept
        }
    }

    #[test]
    fn test_send_event_reaches_all_handlers() {
        let _ = env_logger::builder().is_test(true).try_init();

        let dispatcher = Dispatcher::default();
        let first = Recorder::new(true);
        let second = Recorder::new(false);
        dispatcher.subscribe(first.clone());
        dispatcher.subscribe(second.clone());

        let accepted = dispatcher.send_event(&WorkflowEvent::node_added(NodeId::new("a"), 0));

        assert!(accepted);
        assert_eq!(first.sink.len(), 1);
        assert_eq!(second.sink.len(), 1);
    }

    #[test]
    fn test_stop_on_accept() {
        let dispatcher = Dispatcher::new(DispatcherConfig {
            stop_on_accept: true,
            max_queued: None,
        });
        let first = Recorder::new(true);
        let second = Recorder::new(true);
        dispatcher.subscribe(first.clone());
        dispatcher.subscribe(second.clone());

        assert!(dispatcher.send_event(&WorkflowEvent::link_added(LinkId::new("l"), 0)));
        assert_eq!(first.sink.len(), 1);
        assert!(second.sink.is_empty());
    }

    #[test]
    fn test_unaccepted_event() {
        let dispatcher = Dispatcher::default();
        let ignoring = Recorder::new(false);
        dispatcher.subscribe(ignoring.clone());

        assert!(!dispatcher.send_event(&WorkflowEvent::workflow(WorkflowEventKind::WorkflowClose)));
        assert_eq!(ignoring.sink.len(), 1);
    }

    #[test]
    fn test_kind_filters() {
        let dispatcher = Dispatcher::default();
        let nodes = Recorder::new(true);
        let structure = Recorder::new(true);
        dispatcher.subscribe_kinds(
            [WorkflowEventKind::NodeAdded, WorkflowEventKind::NodeRemoved],
            nodes.clone(),
        );
        dispatcher.subscribe_filtered(KindFilter::Category(KindCategory::Structure), structure.clone());

        dispatcher.send_event(&WorkflowEvent::node_removed(NodeId::new("a"), 1));
        dispatcher.send_event(&WorkflowEvent::annotation_added(AnnotationId::new("t"), 0));
        dispatcher.send_event(&WorkflowEvent::env_changed("workdir", "/b", "/a"));

        assert_eq!(nodes.sink.len(), 1);
        assert_eq!(structure.sink.len(), 2);
    }

    #[test]
    fn test_unsubscribe() {
        let dispatcher = Dispatcher::default();
        let recorder = Recorder::new(true);
        let id = dispatcher.subscribe(recorder.clone());
        assert_eq!(dispatcher.subscriber_count(), 1);

        assert!(dispatcher.unsubscribe(id));
        assert!(!dispatcher.unsubscribe(id));

        assert!(!dispatcher.send_event(&WorkflowEvent::node_added(NodeId::new("a"), 0)));
        assert!(recorder.sink.is_empty());
    }

    #[test]
    fn test_closure_handler() {
        let dispatcher = Dispatcher::default();
        dispatcher.subscribe(Arc::new(|event: &WorkflowEvent| {
            matches!(event, WorkflowEvent::EnvChanged(ev) if ev.name() == "workdir")
        }));

        assert!(dispatcher.send_event(&WorkflowEvent::env_changed("workdir", "/b", "/a")));
        assert!(!dispatcher.send_event(&WorkflowEvent::env_changed("threads", 2, 1)));
    }

    #[test]
    fn test_posted_events_are_fifo() {
        let dispatcher = Dispatcher::default();
        let recorder = Recorder::new(true);
        dispatcher.subscribe(recorder.clone());

        dispatcher
            .post_event(WorkflowEvent::node_added(NodeId::new("a"), 0))
            .unwrap();
        dispatcher
            .send(WorkflowEvent::node_added(NodeId::new("b"), 1))
            .unwrap();
        assert!(recorder.sink.is_empty());
        assert_eq!(dispatcher.pending(), 2);

        assert_eq!(dispatcher.process_events(), 2);
        assert_eq!(dispatcher.pending(), 0);

        let positions: Vec<_> = recorder.sink.events().iter().map(|e| e.pos()).collect();
        assert_eq!(positions, vec![Some(0), Some(1)]);
    }

    #[test]
    fn test_queue_limit() {
        let dispatcher = Dispatcher::new(DispatcherConfig {
            stop_on_accept: false,
            max_queued: Some(1),
        });

        dispatcher
            .post_event(WorkflowEvent::workflow(WorkflowEventKind::RuntimeStateChange))
            .unwrap();
        let result =
            dispatcher.post_event(WorkflowEvent::workflow(WorkflowEventKind::RuntimeStateChange));
        assert!(matches!(result, Err(EventError::QueueFull { capacity: 1 })));

        dispatcher.process_events();
        assert!(dispatcher
            .post_event(WorkflowEvent::workflow(WorkflowEventKind::WorkflowClose))
            .is_ok());
    }

    #[test]
    fn test_handler_posting_during_processing() {
        let dispatcher = Arc::new(Dispatcher::default());
        let recorder = Recorder::new(true);
        dispatcher.subscribe(recorder.clone());

        let inner = Arc::downgrade(&dispatcher);
        dispatcher.subscribe_kinds(
            [WorkflowEventKind::WorkflowAboutToClose],
            Arc::new(move |_: &WorkflowEvent| {
                inner.upgrade().is_some_and(|d| {
                    d.post_event(WorkflowEvent::workflow(WorkflowEventKind::WorkflowClose))
                        .is_ok()
                })
            }),
        );

        dispatcher
            .post_event(WorkflowEvent::workflow(WorkflowEventKind::WorkflowAboutToClose))
            .unwrap();
        assert_eq!(dispatcher.process_events(), 2);

        let kinds: Vec<_> = recorder.sink.events().iter().map(|e| e.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                WorkflowEventKind::WorkflowAboutToClose,
                WorkflowEventKind::WorkflowClose
            ]
        );

        let weak = Arc::downgrade(&dispatcher);
        drop(dispatcher);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_subscription_ids_are_unique() {
        let dispatcher = Dispatcher::default();
        let recorder = Recorder::new(true);
        let first = dispatcher.subscribe(recorder.clone());
        let second = dispatcher.subscribe(recorder.clone());
        assert_ne!(first, second);

        assert!(dispatcher.unsubscribe(first));
        assert_eq!(dispatcher.subscriber_count(), 1);
        assert!(dispatcher.unsubscribe(second));
    }

    #[test]
    fn test_config_from_json() {
        let config = DispatcherConfig::from_json(r#"{"stopOnAccept": true}"#).unwrap();
        assert!(config.stop_on_accept);
        assert_eq!(config.max_queued, None);

        let config = DispatcherConfig::from_json("{}").unwrap();
        assert_eq!(config, DispatcherConfig::default());

        assert!(matches!(
            DispatcherConfig::from_json("not json"),
            Err(EventError::Config(_))
        ));
    }
}
