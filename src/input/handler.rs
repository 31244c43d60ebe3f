use crate::{
    core::{config::InteractionConfig, geo::Point, viewport::Viewport},
    input::events::{InputEvent, MapEvent},
    prelude::{HashMap, VecDeque},
};

/// Transform change requested by an input event or a programmatic call
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Translate by a screen-space delta
    Pan { delta: Point },
    /// One wheel tick anchored at a screen point
    Wheel { delta_y: f64, anchor: Point },
    /// Multiply the scale around a screen point
    Pinch { factor: f64, anchor: Point },
    /// Center the world point under a screen position at `scale`
    ZoomToScreenPoint { position: Point, scale: f64 },
    /// Center a world point at `scale`
    ZoomToPoint { point: Point, scale: f64 },
    /// Adopt a new screen size
    Resize { viewport: Viewport },
}

/// Event listener callback type
pub type EventCallback = Box<dyn Fn(&MapEvent) + Send + Sync>;

/// Subscriber list for [`MapEvent`]s.
///
/// Events are queued while a commit runs and delivered afterwards, so a
/// listener always sees the finished frame.
#[derive(Default)]
pub struct EventManager {
    /// Event listeners by event type
    listeners: HashMap<String, Vec<EventCallback>>,
    /// Listeners for every event
    catch_all: Vec<EventCallback>,
    /// Event queue for processing
    event_queue: VecDeque<MapEvent>,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event listener for one event type, see
    /// [`MapEvent::event_type`]
    pub fn on<F>(&mut self, event_type: &str, callback: F)
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.listeners
            .entry(event_type.to_string())
            .or_default()
            .push(Box::new(callback));
    }

    /// Register a listener for every event
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.catch_all.push(Box::new(callback));
    }

    /// Emit an event to the queue
    pub fn emit(&mut self, event: MapEvent) {
        self.event_queue.push_back(event);
    }

    /// Deliver all queued events in emission order
    pub fn process_events(&mut self) -> Vec<MapEvent> {
        let events: Vec<_> = self.event_queue.drain(..).collect();

        for event in &events {
            if let Some(callbacks) = self.listeners.get(event.event_type()) {
                for callback in callbacks {
                    callback(event);
                }
            }
            for callback in &self.catch_all {
                callback(event);
            }
        }

        events
    }

    /// Get number of pending events
    pub fn pending_events(&self) -> usize {
        self.event_queue.len()
    }
}

/// Maps raw input events to [`Action`]s, honouring which interactions are
/// enabled
#[derive(Debug, Clone)]
pub struct InputHandler {
    pub enabled: bool,
    pub pan_on_drag: bool,
    pub zoom_on_wheel: bool,
    pub zoom_on_double_click: bool,
    pub zoom_on_pinch: bool,
    pub double_click_scale: f64,
    dragging: bool,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    pub fn new() -> Self {
        Self::from_config(&InteractionConfig::default())
    }

    pub fn from_config(config: &InteractionConfig) -> Self {
        Self {
            enabled: true,
            pan_on_drag: config.dragging,
            zoom_on_wheel: config.scroll_wheel_zoom,
            zoom_on_double_click: config.double_click_zoom,
            zoom_on_pinch: config.pinch_zoom,
            double_click_scale: config.double_click_scale,
            dragging: false,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Handle one input event.
    ///
    /// Resizes always go through: the zoom extents must track the real
    /// screen even while interaction is switched off.
    pub fn handle_event(&mut self, event: InputEvent) -> Vec<Action> {
        if let InputEvent::Resize { size } = event {
            return vec![Action::Resize {
                viewport: Viewport::new(size.x, size.y),
            }];
        }
        if !self.enabled {
            return vec![];
        }

        let mut actions = vec![];

        match event {
            InputEvent::DragStart { .. } => {
                if self.pan_on_drag {
                    self.dragging = true;
                }
            }
            InputEvent::Drag { delta } => {
                if self.dragging {
                    actions.push(Action::Pan { delta });
                }
            }
            InputEvent::DragEnd => {
                self.dragging = false;
            }
            InputEvent::Scroll { delta_y, position } => {
                if self.zoom_on_wheel && delta_y != 0.0 {
                    actions.push(Action::Wheel {
                        delta_y,
                        anchor: position,
                    });
                }
            }
            InputEvent::DoubleClick { position } => {
                if self.zoom_on_double_click {
                    actions.push(Action::ZoomToScreenPoint {
                        position,
                        scale: self.double_click_scale,
                    });
                }
            }
            InputEvent::Pinch { center, scale } => {
                if self.zoom_on_pinch {
                    actions.push(Action::Pinch {
                        factor: scale,
                        anchor: center,
                    });
                }
            }
            InputEvent::Resize { .. } => {}
        }

        actions
    }
}
