// Stroke renderer: contact points in, line segments on the canvas out.
// Visual: the black line follows your finger/mouse while you hold it down.

use crate::input::{ContactEvent, ContactKind, ContactPoint};
use crate::surface::Surface;
use crate::types::Point;

/// Pen state for the stroke in progress.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PenState {
    /// Not touching; the next contact starts a new stroke.
    #[default]
    Idle,
    /// Touching; `last` is where the previous segment ended (surface-local).
    Drawing { last: Point },
}

impl PenState {
    pub fn is_drawing(&self) -> bool {
        matches!(self, PenState::Drawing { .. })
    }
}

/// What the caller has to do after feeding an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrokeStep {
    /// Pen moved (or was placed); keep going.
    Continue(PenState),
    /// Contact lifted: the stroke is finished and should be committed.
    /// Carries the pen after `end`.
    Finished(PenState),
    /// Event carried nothing we could use.
    Ignored(PenState),
}

/// Map a device coordinate onto the surface using where it sits right now.
pub fn to_surface_local<S: Surface + ?Sized>(surface: &S, contact: ContactPoint) -> Point {
    let rect = surface.bounding_rect();
    Point::new(contact.client_x - rect.left, contact.client_y - rect.top)
}

/// Start or continue a stroke at `point` (surface-local).
/// The first point only places the pen; later points paint a segment.
pub fn begin_or_continue<S: Surface + ?Sized>(pen: PenState, point: Point, surface: &mut S) -> PenState {
    if let PenState::Drawing { last } = pen {
        surface.draw_line(last, point);
    }
    PenState::Drawing { last: point }
}

/// Lift the pen. The returned state is always `Idle`.
pub fn end(pen: PenState) -> PenState {
    if !pen.is_drawing() {
        tracing::trace!("contact end without an active stroke");
    }
    PenState::Idle
}

/// Feed one contact event through the pen.
///
/// Only the first reported contact drives the pen; any extra fingers are
/// ignored. Start/move events that are consumed get their platform default
/// suppressed.
pub fn handle_contact<S: Surface + ?Sized>(
    pen: PenState,
    event: &mut ContactEvent,
    surface: &mut S,
) -> StrokeStep {
    match event.kind {
        ContactKind::Start | ContactKind::Move => {
            let Some(&contact) = event.contacts.first() else {
                return StrokeStep::Ignored(pen);
            };
            event.prevent_default();
            let point = to_surface_local(surface, contact);
            StrokeStep::Continue(begin_or_continue(pen, point, surface))
        }
        ContactKind::End => StrokeStep::Finished(end(pen)),
    }
}
