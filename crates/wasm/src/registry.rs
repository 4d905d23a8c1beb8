use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use vantage_core::Subscription;

/// Subscriptions handed out to JavaScript, keyed by a numeric id.
///
/// An id is reserved before the observer runs the listener's initial
/// delivery. If that listener unsubscribes or disposes, the reservation is
/// gone by the time the subscription arrives and it is dropped instead of
/// being stored.
pub(crate) struct SubscriptionTable {
    entries: RefCell<HashMap<u32, Option<Subscription>>>,
    next_id: Cell<u32>,
}

impl Default for SubscriptionTable {
    fn default() -> Self {
        Self {
            entries: RefCell::new(HashMap::new()),
            next_id: Cell::new(1),
        }
    }
}

impl SubscriptionTable {
    pub(crate) fn reserve(&self) -> u32 {
        let id = self.next_id.get();
        self.next_id.set(id.wrapping_add(1));
        self.entries.borrow_mut().insert(id, None);
        id
    }

    /// Store `subscription` under a reserved id. Returns `false`, dropping
    /// the subscription, if the id was released in the meantime.
    pub(crate) fn fill(&self, id: u32, subscription: Subscription) -> bool {
        let stale = {
            let mut entries = self.entries.borrow_mut();
            match entries.get_mut(&id) {
                Some(slot) => {
                    *slot = Some(subscription);
                    None
                }
                None => Some(subscription),
            }
        };
        match stale {
            Some(subscription) => {
                subscription.unsubscribe();
                false
            }
            None => true,
        }
    }

    pub(crate) fn remove(&self, id: u32) -> bool {
        let removed = self.entries.borrow_mut().remove(&id);
        match removed {
            Some(Some(subscription)) => {
                subscription.unsubscribe();
                true
            }
            Some(None) => true,
            None => false,
        }
    }

    pub(crate) fn clear(&self) {
        let entries = std::mem::take(&mut *self.entries.borrow_mut());
        drop(entries);
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use vantage_core::{
        ClassifierConfig, DeviceObserver, ManualEvents, ManualProvider, ManualScheduler,
    };
    use vantage_protocol::Measurement;

    use super::*;

    fn observer() -> DeviceObserver {
        DeviceObserver::new(
            ManualProvider::new(Measurement::new(1280, 800)),
            ManualEvents::new(),
            Rc::new(ManualScheduler::new()),
            ClassifierConfig::default(),
        )
    }

    #[test]
    fn stores_and_removes() {
        let observer = observer();
        let table = SubscriptionTable::default();
        let id = table.reserve();
        assert!(table.fill(id, observer.subscribe(|_| {})));
        assert_eq!(observer.listener_count(), 1);

        assert!(table.remove(id));
        assert!(!table.remove(id));
        assert_eq!(observer.listener_count(), 0);
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn dispose_during_initial_delivery_leaves_no_entry() {
        let observer = observer();
        let table = Rc::new(SubscriptionTable::default());

        let id = table.reserve();
        let handle = observer.clone();
        let entries = table.clone();
        let subscription = observer.subscribe(move |_| {
            handle.dispose();
            entries.clear();
        });
        assert!(!table.fill(id, subscription));

        assert_eq!(table.len(), 0);
        assert!(!table.remove(id));
        assert_eq!(observer.listener_count(), 0);
    }

    #[test]
    fn unsubscribe_during_initial_delivery_drops_the_listener() {
        let observer = observer();
        let table = Rc::new(SubscriptionTable::default());

        let id = table.reserve();
        let entries = table.clone();
        let subscription = observer.subscribe(move |_| {
            entries.remove(id);
        });
        assert!(!table.fill(id, subscription));
        assert_eq!(observer.listener_count(), 0);
        assert_eq!(table.len(), 0);
    }
}
