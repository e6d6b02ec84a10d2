//! Plain reactive cell for local UI state.

use zoon::{Mutable, Signal};

/// Local UI state that never leaves the view that created it: the focused
/// filter policy button, the raw threshold text. Domain state belongs in
/// actors, not here.
#[derive(Clone, Debug)]
pub struct Atom<T>
where
    T: Clone + Send + Sync + 'static,
{
    value: Mutable<T>,
}

impl<T> Atom<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(initial: T) -> Self {
        Self {
            value: Mutable::new(initial),
        }
    }

    pub fn set(&self, value: T) {
        self.value.set(value);
    }

    pub fn signal(&self) -> impl Signal<Item = T> {
        self.value.signal_cloned()
    }

    /// Current value, for event handlers.
    pub fn get_cloned(&self) -> T {
        self.value.get_cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_replaces_the_value() {
        let text = Atom::new(String::new());
        text.set("42".to_owned());
        assert_eq!(text.get_cloned(), "42");
    }
}
