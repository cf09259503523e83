use std::collections::HashMap;
use std::rc::Rc;

use crate::input::Direction;

/// Data carried alongside a named event.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum EventPayload {
    #[default]
    Empty,
    Direction(Direction),
}

/// What a listener receives: the event plus the entity it was registered on.
pub struct Event<'a, T> {
    pub name: &'a str,
    pub payload: &'a EventPayload,
    pub target: &'a mut T,
}

/// Listener callback. `Fn` so a listener may re-trigger its own event;
/// state changes go through `Event::target`.
pub type Callback<T> = Rc<dyn Fn(Event<'_, T>)>;

/// Disposer returned by [`Listeners::register`].
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct ListenerHandle {
    name: String,
    id: u64,
}

impl ListenerHandle {
    #[must_use]
    pub fn event_name(&self) -> &str {
        &self.name
    }
}

struct Entry<T> {
    id: u64,
    callback: Callback<T>,
}

/// Per-entity registry of event name to callbacks, kept in insertion order.
pub struct Listeners<T> {
    next_id: u64,
    by_name: HashMap<String, Vec<Entry<T>>>,
}

impl<T> Default for Listeners<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            by_name: HashMap::new(),
        }
    }
}

impl<T> std::fmt::Debug for Listeners<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: HashMap<&str, usize> = self
            .by_name
            .iter()
            .map(|(name, entries)| (name.as_str(), entries.len()))
            .collect();
        f.debug_struct("Listeners").field("counts", &counts).finish()
    }
}

impl<T> Listeners<T> {
    /// Appends `callback` to the listeners of `name`.
    pub fn register<F>(&mut self, name: &str, callback: F) -> ListenerHandle
    where
        F: Fn(Event<'_, T>) + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;

        self.by_name.entry(name.to_owned()).or_default().push(Entry {
            id,
            callback: Rc::new(callback),
        });

        ListenerHandle {
            name: name.to_owned(),
            id,
        }
    }

    /// Removes the listener behind `handle`. Returns false if it was already gone.
    pub fn unregister(&mut self, handle: &ListenerHandle) -> bool {
        let Some(entries) = self.by_name.get_mut(&handle.name) else {
            return false;
        };
        let Some(index) = entries.iter().position(|entry| entry.id == handle.id) else {
            return false;
        };

        entries.remove(index);
        if entries.is_empty() {
            self.by_name.remove(&handle.name);
        }
        true
    }

    /// Number of listeners registered for `name`.
    #[must_use]
    pub fn count(&self, name: &str) -> usize {
        self.by_name.get(name).map_or(0, Vec::len)
    }

    fn snapshot(&self, name: &str) -> Vec<(u64, Callback<T>)> {
        self.by_name.get(name).map_or_else(Vec::new, |entries| {
            entries
                .iter()
                .map(|entry| (entry.id, Rc::clone(&entry.callback)))
                .collect()
        })
    }

    fn is_registered(&self, name: &str, id: u64) -> bool {
        self.by_name
            .get(name)
            .is_some_and(|entries| entries.iter().any(|entry| entry.id == id))
    }
}

/// Entity that owns a listener registry and acts as the event target.
pub trait HasListeners: Sized {
    fn listeners_mut(&mut self) -> &mut Listeners<Self>;
}

/// Capability of receiving bus events.
pub trait EventListenable {
    /// Invokes every listener for `name`; returns how many ran.
    fn handle_event(&mut self, name: &str, payload: &EventPayload) -> usize;
}

impl<T: HasListeners> EventListenable for T {
    fn handle_event(&mut self, name: &str, payload: &EventPayload) -> usize {
        dispatch(self, name, payload)
    }
}

/// Runs the listeners `target` registered for `name`, in registration order.
///
/// The listener set is fixed when dispatch starts: listeners added meanwhile
/// run from the next dispatch, listeners removed meanwhile are skipped.
/// A listener may dispatch again on its target, including the same name;
/// the nested dispatch runs to completion before the outer one continues.
pub fn dispatch<T: HasListeners>(target: &mut T, name: &str, payload: &EventPayload) -> usize {
    let snapshot = target.listeners_mut().snapshot(name);

    let mut invoked = 0;
    for (id, callback) in snapshot {
        if !target.listeners_mut().is_registered(name, id) {
            continue;
        }
        callback(Event {
            name,
            payload,
            target: &mut *target,
        });
        invoked += 1;
    }
    invoked
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::{EventListenable, EventPayload, HasListeners, ListenerHandle, Listeners, dispatch};

    #[derive(Default)]
    struct Probe {
        seen: Vec<String>,
        listeners: Listeners<Probe>,
        self_handle: Option<ListenerHandle>,
    }

    impl HasListeners for Probe {
        fn listeners_mut(&mut self) -> &mut Listeners<Self> {
            &mut self.listeners
        }
    }

    #[test]
    fn listeners_run_in_registration_order() {
        let mut probe = Probe::default();
        probe
            .listeners
            .register("PING", |event| event.target.seen.push("first".to_owned()));
        probe
            .listeners
            .register("PING", |event| event.target.seen.push("second".to_owned()));

        let invoked = probe.handle_event("PING", &EventPayload::Empty);

        assert_eq!(invoked, 2);
        assert_eq!(probe.seen, ["first", "second"]);
    }

    #[test]
    fn unknown_event_invokes_nothing() {
        let mut probe = Probe::default();
        assert_eq!(probe.handle_event("NOTHING", &EventPayload::Empty), 0);
    }

    #[test]
    fn disposer_removes_only_its_listener() {
        let mut probe = Probe::default();
        let handle = probe
            .listeners
            .register("PING", |event| event.target.seen.push("gone".to_owned()));
        probe
            .listeners
            .register("PING", |event| event.target.seen.push("kept".to_owned()));

        assert!(probe.listeners.unregister(&handle));
        assert!(!probe.listeners.unregister(&handle));
        probe.handle_event("PING", &EventPayload::Empty);

        assert_eq!(probe.seen, ["kept"]);
        assert_eq!(probe.listeners.count("PING"), 1);
    }

    #[test]
    fn listener_can_unregister_itself_while_dispatching() {
        let mut probe = Probe::default();
        let handle = probe.listeners.register("ONCE", |event| {
            event.target.seen.push(event.name.to_owned());
            if let Some(handle) = event.target.self_handle.take() {
                assert!(event.target.listeners.unregister(&handle));
            }
        });
        probe.self_handle = Some(handle);

        probe.handle_event("ONCE", &EventPayload::Empty);
        probe.handle_event("ONCE", &EventPayload::Empty);

        assert_eq!(probe.seen, ["ONCE"]);
        assert_eq!(probe.listeners.count("ONCE"), 0);
    }

    #[test]
    fn listener_registered_during_dispatch_runs_next_time() {
        let mut probe = Probe::default();
        probe.listeners.register("GROW", |event| {
            event.target.seen.push("outer".to_owned());
            event
                .target
                .listeners
                .register("GROW", |inner| inner.target.seen.push("inner".to_owned()));
        });

        assert_eq!(probe.handle_event("GROW", &EventPayload::Empty), 1);
        assert_eq!(probe.handle_event("GROW", &EventPayload::Empty), 2);
        assert_eq!(probe.seen, ["outer", "outer", "inner"]);
    }

    #[derive(Default)]
    struct Echo {
        depth: u32,
        hits: u32,
        trace: Vec<String>,
        listeners: Listeners<Echo>,
    }

    impl HasListeners for Echo {
        fn listeners_mut(&mut self) -> &mut Listeners<Self> {
            &mut self.listeners
        }
    }

    #[test]
    fn listener_can_retrigger_its_own_event() {
        let mut echo = Echo::default();
        echo.listeners.register("E", |event| {
            event.target.hits += 1;
            if event.target.depth < 2 {
                event.target.depth += 1;
                let nested = dispatch(&mut *event.target, "E", event.payload);
                assert_eq!(nested, 1);
            }
        });

        let invoked = echo.handle_event("E", &EventPayload::Empty);

        assert_eq!(invoked, 1);
        assert_eq!(echo.hits, 3);
    }

    #[test]
    fn nested_event_runs_to_completion_before_outer_continues() {
        let mut echo = Echo::default();
        echo.listeners.register("OUTER", |event| {
            event.target.trace.push("outer-1".to_owned());
            let nested = dispatch(&mut *event.target, "INNER", &EventPayload::Empty);
            event.target.trace.push(format!("inner ran {nested}"));
        });
        echo.listeners
            .register("OUTER", |event| event.target.trace.push("outer-2".to_owned()));
        echo.listeners
            .register("INNER", |event| event.target.trace.push("inner-1".to_owned()));
        echo.listeners
            .register("INNER", |event| event.target.trace.push("inner-2".to_owned()));

        assert_eq!(echo.handle_event("OUTER", &EventPayload::Empty), 2);
        assert_eq!(
            echo.trace,
            ["outer-1", "inner-1", "inner-2", "inner ran 2", "outer-2"]
        );
    }

    #[test]
    fn listener_removed_by_an_earlier_one_is_skipped() {
        let mut probe = Probe::default();
        probe.listeners.register("PING", |event| {
            event.target.seen.push("first".to_owned());
            if let Some(handle) = event.target.self_handle.take() {
                event.target.listeners.unregister(&handle);
            }
        });
        let second = probe
            .listeners
            .register("PING", |event| event.target.seen.push("second".to_owned()));
        probe.self_handle = Some(second);

        assert_eq!(probe.handle_event("PING", &EventPayload::Empty), 1);
        assert_eq!(probe.seen, ["first"]);
    }

    #[test]
    fn payload_reaches_the_listener() {
        let received = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&received);
        let mut probe = Probe::default();
        probe.listeners.register("MOVE", move |event| {
            *sink.borrow_mut() = Some(*event.payload);
        });

        let payload = EventPayload::Direction(crate::input::Direction::Left);
        probe.handle_event("MOVE", &payload);

        assert_eq!(*received.borrow(), Some(payload));
    }
}
