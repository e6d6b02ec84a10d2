//! Collection counterpart of [`Actor`](crate::dataflow::Actor).

use std::future::Future;
use std::sync::Arc;

use zoon::{MutableVec, SignalVec, Task, TaskHandle};

/// A vector whose mutations happen only inside its processor future.
///
/// Used for ordered collections the UI renders incrementally, like the
/// active toast stack. Consumers bind through [`ActorVec::signal_vec`].
#[derive(Clone, Debug)]
pub struct ActorVec<T>
where
    T: Clone + Send + Sync + 'static,
{
    items: MutableVec<T>,
    _task: Arc<TaskHandle>,
}

impl<T> ActorVec<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new<F, Fut>(initial: Vec<T>, processor: F) -> Self
    where
        F: FnOnce(MutableVec<T>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let items = MutableVec::new_with_values(initial);
        let _task = Arc::new(Task::start_droppable(processor(items.clone())));
        Self { items, _task }
    }

    pub fn signal_vec(&self) -> impl SignalVec<Item = T> {
        self.items.signal_vec_cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataflow::relay;
    use futures::StreamExt;
    use zoon::{SignalExt, SignalVecExt};

    #[tokio::test]
    async fn items_pushed_by_the_processor_become_visible() {
        let (pushed_relay, mut pushed_stream) = relay::<u32>();

        let items = ActorVec::new(vec![1], async move |items| {
            while let Some(item) = pushed_stream.next().await {
                items.lock_mut().push_cloned(item);
            }
        });

        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
        pushed_relay.send(2);
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

        let snapshot = items
            .signal_vec()
            .to_signal_cloned()
            .to_stream()
            .next()
            .await;
        assert_eq!(snapshot, Some(vec![1, 2]));
    }
}
