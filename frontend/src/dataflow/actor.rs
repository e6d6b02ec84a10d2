//! Single-value state container with sequential mutation.

use std::future::Future;
use std::sync::Arc;

use zoon::{Mutable, Signal, Task, TaskHandle};

/// Reactive state whose mutations all happen inside one processor future.
///
/// The processor consumes relay streams and updates the state handle it is
/// given, one event at a time, so no mutation can interleave with another.
/// Consumers bind to [`Actor::signal`]; [`Actor::peek`] exists for event
/// handlers that need the current value synchronously.
#[derive(Clone, Debug)]
pub struct Actor<T>
where
    T: Clone + Send + Sync + 'static,
{
    state: Mutable<T>,
    _task: Arc<TaskHandle>,
}

impl<T> Actor<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new<F, Fut>(initial: T, processor: F) -> Self
    where
        F: FnOnce(Mutable<T>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let state = Mutable::new(initial);
        let _task = Arc::new(Task::start_droppable(processor(state.clone())));
        Self { state, _task }
    }

    #[allow(dead_code)] // primitive API, exercised by the dataflow tests
    pub fn signal(&self) -> impl Signal<Item = T> {
        self.state.signal_cloned()
    }

    pub fn signal_ref<U>(
        &self,
        f: impl Fn(&T) -> U + Send + Sync + 'static,
    ) -> impl Signal<Item = U>
    where
        U: PartialEq + Send + Sync + 'static,
    {
        self.state.signal_ref(f)
    }

    /// Current value, cloned. For event handlers where waiting on a signal
    /// is impractical; prefer signals everywhere else.
    pub fn peek(&self) -> T {
        self.state.get_cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataflow::relay;
    use futures::StreamExt;
    use zoon::{MutableExt, SignalExt};

    #[tokio::test]
    async fn processor_owns_all_mutations() {
        let (added_relay, mut added_stream) = relay::<u32>();

        let total = Actor::new(0u32, async move |state| {
            while let Some(amount) = added_stream.next().await {
                state.update_mut(|current| *current += amount);
            }
        });

        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
        added_relay.send(4);
        added_relay.send(3);
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

        assert_eq!(total.signal().to_stream().next().await, Some(7));
        assert_eq!(total.peek(), 7);
    }

    #[tokio::test]
    async fn signal_ref_projects_without_cloning_the_state() {
        let (pushed_relay, mut pushed_stream) = relay::<String>();

        let names = Actor::new(Vec::<String>::new(), async move |state| {
            while let Some(name) = pushed_stream.next().await {
                state.update_mut(|names| names.push(name));
            }
        });

        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
        pushed_relay.send("clk".to_owned());
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

        let len = names.signal_ref(|names| names.len());
        assert_eq!(len.to_stream().next().await, Some(1));
    }
}
