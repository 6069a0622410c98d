//! Drag-to-decide state machine for a single card.
//!
//! Knows nothing about scoring or time. The async driver in [`crate::card`]
//! owns the clock and calls [`SwipeGesture::finish_animation`] when the exit
//! transition is over.

use serde::{Deserialize, Serialize};

use crate::domain::SwipeDirection;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureParams {
    /// Horizontal distance that must be exceeded to commit.
    pub threshold: f64,
    /// Degrees of rotation per unit of horizontal offset.
    pub rotation_factor: f64,
    /// Horizontal distance at which the card is fully transparent.
    pub fade_distance: f64,
}

impl Default for GestureParams {
    fn default() -> Self {
        Self {
            threshold: 100.0,
            rotation_factor: 0.1,
            fade_distance: 500.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Visual state of the card for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardTransform {
    pub offset_x: f64,
    pub offset_y: f64,
    pub rotation_deg: f64,
    pub opacity: f64,
}

impl CardTransform {
    pub const CENTER: CardTransform = CardTransform {
        offset_x: 0.0,
        offset_y: 0.0,
        rotation_deg: 0.0,
        opacity: 1.0,
    };
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GesturePhase {
    Idle,
    Dragging { start: Point, current: Point },
    Animating { direction: SwipeDirection },
}

/// Result of releasing the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Release {
    /// The card leaves the screen; the handler fires once the animation ends.
    Commit(SwipeDirection),
    /// The card snaps back to the center without a decision.
    Cancel,
}

#[derive(Debug, Clone)]
pub struct SwipeGesture {
    params: GestureParams,
    phase: GesturePhase,
    transform: CardTransform,
}

impl SwipeGesture {
    pub fn new(params: GestureParams) -> Self {
        Self {
            params,
            phase: GesturePhase::Idle,
            transform: CardTransform::CENTER,
        }
    }

    pub fn params(&self) -> &GestureParams {
        &self.params
    }

    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    pub fn transform(&self) -> CardTransform {
        self.transform
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.phase, GesturePhase::Animating { .. })
    }

    /// Returns `false` when the event was ignored.
    pub fn pointer_down(&mut self, at: Point) -> bool {
        match self.phase {
            GesturePhase::Idle => {
                self.phase = GesturePhase::Dragging { start: at, current: at };
                self.transform = CardTransform::CENTER;
                true
            }
            // A second pointer-down while dragging or animating is noise.
            _ => false,
        }
    }

    pub fn pointer_move(&mut self, at: Point) -> Option<CardTransform> {
        let GesturePhase::Dragging { start, .. } = self.phase else {
            return None;
        };
        self.phase = GesturePhase::Dragging { start, current: at };
        self.transform = self.drag_transform(at.x - start.x, at.y - start.y);
        Some(self.transform)
    }

    pub fn pointer_up(&mut self) -> Option<Release> {
        let GesturePhase::Dragging { start, current } = self.phase else {
            return None;
        };
        let dx = current.x - start.x;
        if dx.abs() > self.params.threshold {
            let direction = SwipeDirection::from_offset(dx);
            self.phase = GesturePhase::Animating { direction };
            Some(Release::Commit(direction))
        } else {
            self.phase = GesturePhase::Idle;
            self.transform = CardTransform::CENTER;
            Some(Release::Cancel)
        }
    }

    /// Programmatic swipe (buttons, keyboard). Starts the exit animation
    /// from any non-animating phase.
    pub fn trigger(&mut self, direction: SwipeDirection) -> bool {
        if self.is_animating() {
            return false;
        }
        self.phase = GesturePhase::Animating { direction };
        true
    }

    /// Transform of the card once fully off-screen in `direction`.
    pub fn exit_transform(&self, direction: SwipeDirection, surface_width: f64) -> CardTransform {
        let offset_x = direction.sign() * (surface_width + self.params.threshold);
        CardTransform {
            offset_x,
            offset_y: self.transform.offset_y,
            rotation_deg: offset_x * self.params.rotation_factor,
            opacity: 0.0,
        }
    }

    /// Ends the exit animation and returns to `Idle`. Returns the committed
    /// direction, or `None` if nothing was animating.
    pub fn finish_animation(&mut self) -> Option<SwipeDirection> {
        let GesturePhase::Animating { direction } = self.phase else {
            return None;
        };
        self.phase = GesturePhase::Idle;
        self.transform = CardTransform::CENTER;
        Some(direction)
    }

    fn drag_transform(&self, dx: f64, dy: f64) -> CardTransform {
        let opacity = if self.params.fade_distance > 0.0 {
            (1.0 - dx.abs() / self.params.fade_distance).max(0.0)
        } else {
            1.0
        };
        CardTransform {
            offset_x: dx,
            offset_y: dy,
            rotation_deg: dx * self.params.rotation_factor,
            opacity,
        }
    }
}
