//! Tap events and their bubbling route.
//!
//! egui hands a click to a single widget. When a tap on a nested control must
//! also reach the handlers of the regions around it, the host builds a
//! [`TapRoute`] from the innermost target outwards and dispatches the event
//! along it. A listener that calls [`TapEvent::stop_propagation`] ends the
//! walk.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapTarget {
    Header,
    UserMenuTrigger,
    Search,
    Notifications,
}

#[derive(Debug)]
pub struct TapEvent {
    target: TapTarget,
    propagation_stopped: bool,
}

impl TapEvent {
    pub fn new(target: TapTarget) -> Self {
        Self {
            target,
            propagation_stopped: false,
        }
    }

    pub fn target(&self) -> TapTarget {
        self.target
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

type Listener<'a> = Box<dyn FnMut(&mut TapEvent) + 'a>;

#[derive(Default)]
pub struct TapRoute<'a> {
    listeners: Vec<(TapTarget, Listener<'a>)>,
}

impl<'a> TapRoute<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the listener of the next enclosing region.
    pub fn on(mut self, region: TapTarget, listener: impl FnMut(&mut TapEvent) + 'a) -> Self {
        self.listeners.push((region, Box::new(listener)));
        self
    }

    /// Walks the route until a listener stops propagation. Returns the
    /// regions whose listeners ran, innermost first.
    pub fn dispatch(mut self, event: &mut TapEvent) -> Vec<TapTarget> {
        let mut reached = Vec::new();
        for (region, listener) in &mut self.listeners {
            reached.push(*region);
            listener(event);
            if event.is_propagation_stopped() {
                log::trace!("Tap on {:?} stopped at {:?}", event.target(), region);
                break;
            }
        }
        reached
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_bubbles_to_ancestors() {
        let mut header_fired = false;
        let mut event = TapEvent::new(TapTarget::Search);

        let reached = TapRoute::new()
            .on(TapTarget::Search, |_| {})
            .on(TapTarget::Header, |_| header_fired = true)
            .dispatch(&mut event);

        assert!(header_fired);
        assert_eq!(reached, vec![TapTarget::Search, TapTarget::Header]);
    }

    #[test]
    fn test_stop_propagation_shields_ancestors() {
        let mut header_fired = false;
        let mut event = TapEvent::new(TapTarget::UserMenuTrigger);

        let reached = TapRoute::new()
            .on(TapTarget::UserMenuTrigger, |event| event.stop_propagation())
            .on(TapTarget::Header, |_| header_fired = true)
            .dispatch(&mut event);

        assert!(!header_fired);
        assert!(event.is_propagation_stopped());
        assert_eq!(reached, vec![TapTarget::UserMenuTrigger]);
    }
}
