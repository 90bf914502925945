// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Topic-based message bus.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

/// Handle returned by [`MessageBus::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u32);

type Subscriber = Box<dyn FnMut(&dyn Any)>;

/// Delivers untyped payloads to subscribers of a named topic.
///
/// Subscribers receive payloads as `&dyn Any` and downcast to the type they
/// expect. Delivery is synchronous and in subscription order.
#[derive(Default)]
pub struct MessageBus {
    next_id: u32,
    topics: BTreeMap<String, Vec<(SubscriptionId, Subscriber)>>,
}

impl fmt::Debug for MessageBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageBus")
            .field("topics", &self.topics.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl MessageBus {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes `f` to `topic`.
    pub fn subscribe(&mut self, topic: &str, f: impl FnMut(&dyn Any) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.topics
            .entry(String::from(topic))
            .or_default()
            .push((id, Box::new(f)));
        id
    }

    /// Removes a subscription. Returns whether it existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let mut found = false;
        self.topics.retain(|_, subs| {
            let before = subs.len();
            subs.retain(|(sid, _)| *sid != id);
            found |= subs.len() != before;
            !subs.is_empty()
        });
        found
    }

    /// Delivers `payload` to every subscriber of `topic`. Returns the number of
    /// subscribers reached.
    pub fn publish(&mut self, topic: &str, payload: &dyn Any) -> usize {
        let Some(subs) = self.topics.get_mut(topic) else {
            return 0;
        };
        for (_, f) in subs.iter_mut() {
            f(payload);
        }
        subs.len()
    }

    /// Number of subscribers to `topic`.
    #[must_use]
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.topics.get(topic).map_or(0, Vec::len)
    }
}
