//! Mounted relationship diagram that redraws itself on resize.

use crate::layout::Layout;
use crate::model::Relationship;
use crate::render::{DiagramRenderer, DrawingSurface};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

type Listener = Box<dyn FnMut(CanvasSize)>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
    // Ids dropped while their listener was out of the registry for dispatch.
    removed_during_dispatch: Vec<u64>,
    dispatching: bool,
}

/// Single-threaded source of resize notifications, e.g. a window.
#[derive(Clone, Default)]
pub struct ResizeEvents {
    registry: Rc<RefCell<Registry>>,
}

impl ResizeEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. It stays registered until the returned guard is dropped.
    #[must_use = "dropping the subscription unregisters the listener"]
    pub fn subscribe(&self, listener: impl FnMut(CanvasSize) + 'static) -> ResizeSubscription {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, Box::new(listener)));
        ResizeSubscription {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Notify every listener registered before this call.
    pub fn emit(&self, size: CanvasSize) {
        let mut current = {
            let mut registry = self.registry.borrow_mut();
            if registry.dispatching {
                tracing::warn!("nested resize emit ignored");
                return;
            }
            registry.dispatching = true;
            std::mem::take(&mut registry.listeners)
        };

        for (_, listener) in current.iter_mut() {
            listener(size);
        }

        let removed = std::mem::take(&mut self.registry.borrow_mut().removed_during_dispatch);
        let (kept, dropped): (Vec<_>, Vec<_>) =
            current.drain(..).partition(|(id, _)| !removed.contains(id));

        {
            let mut registry = self.registry.borrow_mut();
            // Listeners added during dispatch go after the existing ones.
            let added = std::mem::replace(&mut registry.listeners, kept);
            registry.listeners.extend(added);
            registry.dispatching = false;
        }
        // Released outside the borrow: a listener may own subscriptions of its own.
        drop(dropped);
    }

    pub fn listener_count(&self) -> usize {
        self.registry.borrow().listeners.len()
    }
}

/// Guard for a registered resize listener.
pub struct ResizeSubscription {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl Drop for ResizeSubscription {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let listener = {
            let mut registry = registry.borrow_mut();
            match registry.listeners.iter().position(|(id, _)| *id == self.id) {
                Some(pos) => Some(registry.listeners.remove(pos)),
                None => {
                    if registry.dispatching {
                        registry.removed_during_dispatch.push(self.id);
                    }
                    None
                }
            }
        };
        drop(listener);
    }
}

struct DiagramState {
    relationships: Vec<Relationship>,
    renderer: DiagramRenderer,
    layout: Layout,
}

/// A relationship diagram bound to a surface and a resize source.
///
/// Dropping the view unregisters its resize listener.
pub struct DiagramView<S: DrawingSurface + 'static> {
    surface: Rc<RefCell<S>>,
    state: Rc<RefCell<DiagramState>>,
    _resize: ResizeSubscription,
}

impl<S: DrawingSurface + 'static> DiagramView<S> {
    pub fn mount(
        surface: Rc<RefCell<S>>,
        events: &ResizeEvents,
        relationships: Vec<Relationship>,
        renderer: DiagramRenderer,
    ) -> Self {
        let layout = renderer.draw(&mut *surface.borrow_mut(), &relationships);
        let state = Rc::new(RefCell::new(DiagramState {
            relationships,
            renderer,
            layout,
        }));

        let weak_surface = Rc::downgrade(&surface);
        let weak_state = Rc::downgrade(&state);
        let subscription = events.subscribe(move |size| {
            let (Some(surface), Some(state)) = (weak_surface.upgrade(), weak_state.upgrade()) else {
                return;
            };
            let mut surface = surface.borrow_mut();
            let mut state = state.borrow_mut();
            surface.resize(size.width, size.height);
            let layout = state.renderer.draw(&mut *surface, &state.relationships);
            state.layout = layout;
        });

        Self {
            surface,
            state,
            _resize: subscription,
        }
    }

    /// Layout used by the most recent draw.
    pub fn layout(&self) -> Layout {
        self.state.borrow().layout.clone()
    }

    pub fn surface(&self) -> &Rc<RefCell<S>> {
        &self.surface
    }

    /// Tear the view down explicitly; equivalent to dropping it.
    pub fn unmount(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{RecordingSurface, SurfaceOp, relationship};
    use std::cell::Cell;

    fn sample() -> Vec<Relationship> {
        vec![relationship("orders", "users"), relationship("order_items", "orders")]
    }

    #[test]
    fn test_mount_draws_immediately() {
        let events = ResizeEvents::new();
        let surface = Rc::new(RefCell::new(RecordingSurface::new(800.0, 600.0)));
        let view = DiagramView::mount(surface.clone(), &events, sample(), DiagramRenderer::default());

        assert_eq!(view.layout().len(), 3);
        assert_eq!(events.listener_count(), 1);
        assert!(surface.borrow().count(|op| matches!(op, SurfaceOp::Circle { .. })) == 3);
    }

    #[test]
    fn test_resize_triggers_full_relayout() {
        let events = ResizeEvents::new();
        let surface = Rc::new(RefCell::new(RecordingSurface::new(800.0, 600.0)));
        let view = DiagramView::mount(surface.clone(), &events, sample(), DiagramRenderer::default());
        let before = view.layout();

        events.emit(CanvasSize { width: 400.0, height: 300.0 });

        let after = view.layout();
        assert_eq!(after.width, 400.0);
        assert!((after.radius() - 0.7 * 150.0).abs() < 1e-9);
        assert_ne!(before.positions, after.positions);
        assert_eq!(surface.borrow().size(), (400.0, 300.0));
        assert_eq!(surface.borrow().clears, 2);
        // Only the latest frame remains on the surface.
        assert_eq!(surface.borrow().count(|op| matches!(op, SurfaceOp::Circle { .. })), 3);
    }

    #[test]
    fn test_drop_unregisters_listener() {
        let events = ResizeEvents::new();
        let surface = Rc::new(RefCell::new(RecordingSurface::new(800.0, 600.0)));
        let view = DiagramView::mount(surface.clone(), &events, sample(), DiagramRenderer::default());
        drop(view);

        assert_eq!(events.listener_count(), 0);
        events.emit(CanvasSize { width: 10.0, height: 10.0 });
        assert_eq!(surface.borrow().size(), (800.0, 600.0));
    }

    #[test]
    fn test_repeated_mount_unmount_does_not_leak() {
        let events = ResizeEvents::new();
        let surface = Rc::new(RefCell::new(RecordingSurface::new(800.0, 600.0)));
        for _ in 0..10 {
            let view = DiagramView::mount(surface.clone(), &events, sample(), DiagramRenderer::default());
            assert_eq!(events.listener_count(), 1);
            view.unmount();
        }
        assert_eq!(events.listener_count(), 0);
    }

    #[test]
    fn test_subscription_dropped_during_dispatch() {
        let events = ResizeEvents::new();
        let slot: Rc<RefCell<Option<ResizeSubscription>>> = Rc::new(RefCell::new(None));
        let calls = Rc::new(Cell::new(0));

        let slot_in = slot.clone();
        let calls_in = calls.clone();
        let sub = events.subscribe(move |_| {
            calls_in.set(calls_in.get() + 1);
            slot_in.borrow_mut().take();
        });
        *slot.borrow_mut() = Some(sub);

        events.emit(CanvasSize { width: 1.0, height: 1.0 });
        events.emit(CanvasSize { width: 2.0, height: 2.0 });

        assert_eq!(calls.get(), 1);
        assert_eq!(events.listener_count(), 0);
    }

    #[test]
    fn test_subscription_outlives_events() {
        let events = ResizeEvents::new();
        let sub = events.subscribe(|_| {});
        drop(events);
        drop(sub);
    }
}
