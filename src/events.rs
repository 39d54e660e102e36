//! Publish/subscribe registry for game notifications.
//!
//! Listeners are invoked in registration order. Dispatch snapshots the
//! listener list before invoking, and unsubscription requested from inside a
//! handler is deferred until the dispatch completes, so every listener present
//! at emit time sees the event exactly once.

use crate::session::GameSpeed;

/// Notification emitted by the game session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Gold balance changed by `delta` to reach `total`.
    GoldChanged { total: u64, delta: i64 },
    /// One settle step cleared `pieces` pieces (cascade index starts at 0).
    MatchesCleared { pieces: usize, cascade: usize },
    /// A level was cleared.
    LevelCompleted { level: u32 },
    /// The game speed setting changed.
    SpeedChanged { speed: GameSpeed },
    /// A cutscene played for the first time.
    CutscenePlayed { id: u32 },
}

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Context handed to handlers during dispatch. Removal requests made here are
/// applied after the current dispatch finishes.
pub struct Dispatch {
    removals: Vec<ListenerId>,
}

impl Dispatch {
    /// Request removal of a listener once the current dispatch completes
    pub fn unsubscribe(&mut self, id: ListenerId) {
        self.removals.push(id);
    }
}

type Handler = Box<dyn FnMut(&GameEvent, &mut Dispatch)>;

/// Multicast event registry with registration-order delivery.
pub struct EventBus {
    next_id: u64,
    listeners: Vec<(ListenerId, Handler)>,
}

impl EventBus {
    pub fn new() -> Self {
        EventBus {
            next_id: 0,
            listeners: Vec::new(),
        }
    }

    /// Register a handler; handlers run in the order they were registered
    pub fn subscribe<F>(&mut self, handler: F) -> ListenerId
    where
        F: FnMut(&GameEvent, &mut Dispatch) + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(handler)));
        id
    }

    /// Remove a handler. Returns false if the id is unknown (already removed).
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Deliver an event to every listener registered at the time of the call
    pub fn emit(&mut self, event: &GameEvent) {
        let snapshot: Vec<ListenerId> = self.listeners.iter().map(|(id, _)| *id).collect();
        let mut dispatch = Dispatch {
            removals: Vec::new(),
        };
        for id in snapshot {
            if let Some((_, handler)) = self.listeners.iter_mut().find(|(lid, _)| *lid == id) {
                handler(event, &mut dispatch);
            }
        }
        for id in dispatch.removals {
            self.unsubscribe(id);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn gold(total: u64, delta: i64) -> GameEvent {
        GameEvent::GoldChanged { total, delta }
    }

    #[test]
    fn test_delivery_in_registration_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();

        for tag in ["first", "second", "third"] {
            let order = Rc::clone(&order);
            bus.subscribe(move |_, _| order.borrow_mut().push(tag));
        }

        bus.emit(&gold(10, 10));
        assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let count = Rc::new(RefCell::new(0));
        let mut bus = EventBus::new();

        let counter = Rc::clone(&count);
        let id = bus.subscribe(move |_, _| *counter.borrow_mut() += 1);

        bus.emit(&gold(1, 1));
        assert!(bus.unsubscribe(id));
        bus.emit(&gold(2, 1));

        assert_eq!(*count.borrow(), 1);
        assert!(!bus.unsubscribe(id), "second removal reports unknown id");
    }

    #[test]
    fn test_removal_during_dispatch_is_deferred() {
        // A handler that unsubscribes itself still runs for the current
        // event, and later handlers in the snapshot still run too.
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();

        let self_id = Rc::new(RefCell::new(None));
        {
            let log = Rc::clone(&log);
            let own_id = Rc::clone(&self_id);
            let id = bus.subscribe(move |_, dispatch| {
                log.borrow_mut().push("remover");
                dispatch.unsubscribe(own_id.borrow().unwrap());
            });
            *self_id.borrow_mut() = Some(id);
        }
        {
            let log = Rc::clone(&log);
            bus.subscribe(move |_, _| log.borrow_mut().push("survivor"));
        }

        bus.emit(&gold(1, 1));
        assert_eq!(*log.borrow(), vec!["remover", "survivor"]);
        assert_eq!(bus.listener_count(), 1);

        bus.emit(&gold(2, 1));
        assert_eq!(*log.borrow(), vec!["remover", "survivor", "survivor"]);
    }

    #[test]
    fn test_handler_can_remove_later_listener_in_snapshot() {
        // Deferred removal means a listener removed by an earlier handler
        // still receives the event being dispatched.
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();

        let victim_id = Rc::new(RefCell::new(None));
        {
            let victim_id = Rc::clone(&victim_id);
            bus.subscribe(move |_, dispatch| {
                dispatch.unsubscribe(victim_id.borrow().unwrap());
            });
        }
        {
            let log = Rc::clone(&log);
            let id = bus.subscribe(move |_, _| log.borrow_mut().push("victim"));
            *victim_id.borrow_mut() = Some(id);
        }

        bus.emit(&gold(1, 1));
        assert_eq!(*log.borrow(), vec!["victim"], "snapshot sees the event");

        bus.emit(&gold(2, 1));
        assert_eq!(*log.borrow(), vec!["victim"], "removed before second emit");
    }

    #[test]
    fn test_event_payload_reaches_handlers() {
        let seen = Rc::new(RefCell::new(None));
        let mut bus = EventBus::new();
        let sink = Rc::clone(&seen);
        bus.subscribe(move |event, _| *sink.borrow_mut() = Some(*event));

        bus.emit(&GameEvent::LevelCompleted { level: 4 });
        assert_eq!(*seen.borrow(), Some(GameEvent::LevelCompleted { level: 4 }));
    }
}
