//! Event streaming between UI handlers and actors.

use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};

/// Sender half of an event stream.
///
/// UI code emits events through a relay; the owning actor consumes the
/// paired receiver. Sending never blocks, and events emitted after the
/// receiver is gone are silently dropped, the same way a DOM event with no
/// listener disappears.
///
/// Relay fields follow the `{source}_{event}_relay` naming convention.
#[derive(Clone, Debug)]
pub struct Relay<T>
where
    T: Clone + Send + Sync + 'static,
{
    sender: UnboundedSender<T>,
}

impl<T> Relay<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> (Self, UnboundedReceiver<T>) {
        let (sender, receiver) = unbounded();
        (Self { sender }, receiver)
    }

    pub fn send(&self, event: T) {
        let _ = self.sender.unbounded_send(event);
    }
}

impl<T> Default for Relay<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// A disconnected relay that drops every event.
    fn default() -> Self {
        let (relay, _receiver) = Self::new();
        relay
    }
}

/// Create a relay together with its event stream.
pub fn relay<T>() -> (Relay<T>, UnboundedReceiver<T>)
where
    T: Clone + Send + Sync + 'static,
{
    Relay::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn events_arrive_in_send_order() {
        let (relay, mut stream) = relay::<u32>();

        relay.send(1);
        relay.send(2);

        assert_eq!(stream.next().await, Some(1));
        assert_eq!(stream.next().await, Some(2));
    }

    #[tokio::test]
    async fn disconnected_relay_drops_events_silently() {
        let (relay, stream) = relay::<&'static str>();
        drop(stream);

        relay.send("nobody is listening");
    }
}
