// Contact events (touch-style) and a mouse → contact adapter.
// Visual: pressing, dragging and releasing the left button becomes
// start / move / end, exactly like a single finger on a touch screen.

/// Which phase of a contact the event reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    Start,
    Move,
    End,
}

/// One finger (or the mouse) in device/window coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactPoint {
    pub client_x: f32,
    pub client_y: f32,
}

impl ContactPoint {
    pub const fn new(client_x: f32, client_y: f32) -> Self {
        Self { client_x, client_y }
    }
}

/// A contact event plus its "suppress the platform gesture" flag.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactEvent {
    pub kind: ContactKind,
    /// Active contacts, in the order the platform reported them.
    pub contacts: Vec<ContactPoint>,
    default_prevented: bool,
}

impl ContactEvent {
    pub fn new(kind: ContactKind, contacts: Vec<ContactPoint>) -> Self {
        Self { kind, contacts, default_prevented: false }
    }

    pub fn start(x: f32, y: f32) -> Self {
        Self::new(ContactKind::Start, vec![ContactPoint::new(x, y)])
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self::new(ContactKind::Move, vec![ContactPoint::new(x, y)])
    }

    /// Lifting the last finger leaves no active contacts.
    pub fn end() -> Self {
        Self::new(ContactKind::End, Vec::new())
    }

    /// Keep the platform from scrolling/zooming on this event.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Turns polled mouse state into contact events.
#[derive(Debug, Default)]
pub struct PointerTracker {
    was_down: bool,
    last: Option<(f32, f32)>,
}

impl PointerTracker {
    /// Feed this frame's button state and cursor position.
    /// Returns at most one event per frame.
    pub fn poll(&mut self, down: bool, pos: Option<(f32, f32)>) -> Option<ContactEvent> {
        let event = match (self.was_down, down, pos) {
            (false, true, Some((x, y))) => Some(ContactEvent::start(x, y)),
            // Button went down off-window: wait until we know where.
            (false, true, None) => return None,
            (true, true, Some((x, y))) if self.last != Some((x, y)) => {
                Some(ContactEvent::moved(x, y))
            }
            (true, false, _) => Some(ContactEvent::end()),
            _ => None,
        };
        self.was_down = down;
        self.last = pos;
        event
    }

    #[cfg(test)]
    pub fn is_down(&self) -> bool {
        self.was_down
    }
}
