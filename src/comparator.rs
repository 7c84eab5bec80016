//! Before/after comparison slider. The "after" image is stacked on top of the
//! "before" image and clipped at the slider position.

pub const DEFAULT_POSITION: f64 = 50.0;

/// Horizontal extent of the comparator container in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerBounds {
    pub left: f64,
    pub width: f64,
}

impl ContainerBounds {
    pub fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }
}

/// Whether the host should cancel the browser/default handling of the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Ignored,
    Tracked { prevent_default: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparatorSlider {
    position: f64,
    dragging: bool,
    listening: bool,
}

impl ComparatorSlider {
    /// Creates a mounted slider with its window-level listeners attached.
    pub fn mount() -> Self {
        Self {
            position: DEFAULT_POSITION,
            dragging: false,
            listening: true,
        }
    }

    /// Detaches the window-level listeners; later events are ignored.
    pub fn unmount(&mut self) {
        self.listening = false;
        self.dragging = false;
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Mouse press inside the container.
    pub fn pointer_down(&mut self) {
        self.dragging = true;
    }

    pub fn touch_start(&mut self) {
        self.dragging = true;
    }

    /// Window-level mouse move; tracked even outside the container.
    pub fn pointer_move(&mut self, client_x: f64, bounds: ContainerBounds) -> MoveOutcome {
        if !self.track(client_x, bounds) {
            return MoveOutcome::Ignored;
        }
        MoveOutcome::Tracked {
            prevent_default: true,
        }
    }

    /// Window-level touch move. Always cancels scrolling while dragging.
    pub fn touch_move(&mut self, client_x: f64, bounds: ContainerBounds) -> MoveOutcome {
        if !self.listening || !self.dragging {
            return MoveOutcome::Ignored;
        }
        self.track(client_x, bounds);
        MoveOutcome::Tracked {
            prevent_default: true,
        }
    }

    pub fn pointer_up(&mut self) {
        self.dragging = false;
    }

    pub fn touch_end(&mut self) {
        self.dragging = false;
    }

    fn track(&mut self, client_x: f64, bounds: ContainerBounds) -> bool {
        if !self.listening || !self.dragging {
            return false;
        }
        if !(bounds.width > 0.0) || !client_x.is_finite() {
            return false;
        }
        let x = (client_x - bounds.left).clamp(0.0, bounds.width);
        self.position = x / bounds.width * 100.0;
        true
    }

    /// CSS clip for the "after" layer.
    pub fn clip_path(&self) -> String {
        format!("inset(0 {}% 0 0)", format_percent(100.0 - self.position))
    }

    /// CSS `left` of the divider handle.
    pub fn handle_left(&self) -> String {
        format!("calc({}% - 2px)", format_percent(self.position))
    }
}

impl Default for ComparatorSlider {
    fn default() -> Self {
        Self::mount()
    }
}

fn format_percent(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{}", rounded)
    }
}
