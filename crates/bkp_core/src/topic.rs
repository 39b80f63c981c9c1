use std::sync::{Arc, Mutex, MutexGuard, Weak};

type Callback<T> = Arc<dyn Fn(&Arc<T>) + Send + Sync>;

struct TopicState<T> {
    next_id: u64,
    current: Option<Arc<T>>,
    subscribers: Vec<(u64, Callback<T>)>,
}

fn lock<T>(state: &Mutex<TopicState<T>>) -> MutexGuard<'_, TopicState<T>> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

/// A live value replaced wholesale on every publish. Subscribers receive the
/// current value when they subscribe and every value published afterwards.
pub struct Topic<T> {
    state: Arc<Mutex<TopicState<T>>>,
}

impl<T> Clone for Topic<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T: Send + Sync + 'static> Default for Topic<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + Sync + 'static> Topic<T> {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(TopicState {
                next_id: 0,
                current: None,
                subscribers: vec![],
            })),
        }
    }

    pub fn current(&self) -> Option<Arc<T>> {
        lock(&self.state).current.clone()
    }

    #[cfg(test)]
    pub(crate) fn subscriber_count(&self) -> usize {
        lock(&self.state).subscribers.len()
    }

    pub fn publish(&self, value: T) {
        let value = Arc::new(value);
        let callbacks = {
            let mut state = lock(&self.state);
            state.current = Some(Arc::clone(&value));
            state
                .subscribers
                .iter()
                .map(|(_, cb)| Arc::clone(cb))
                .collect::<Vec<_>>()
        };
        for callback in callbacks {
            callback(&value);
        }
    }

    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Arc<T>) + Send + Sync + 'static,
    {
        let callback: Callback<T> = Arc::new(callback);
        let (id, current) = {
            let mut state = lock(&self.state);
            let id = state.next_id;
            state.next_id += 1;
            state.subscribers.push((id, Arc::clone(&callback)));
            (id, state.current.clone())
        };

        if let Some(current) = current {
            callback(&current);
        }

        let state: Weak<Mutex<TopicState<T>>> = Arc::downgrade(&self.state);
        Subscription {
            unsubscribe: Some(Box::new(move || {
                if let Some(state) = state.upgrade() {
                    lock(&state).subscribers.retain(|(sid, _)| *sid != id);
                }
            })),
        }
    }
}

/// Handle of a registered callback. The callback is removed when the handle
/// is dropped.
#[must_use = "dropping a subscription unsubscribes it"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}
