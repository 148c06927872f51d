//! Press-drag-release gesture that loads the trampoline.

use glam::Vec2;

/// Tracks how far the pointer has been pulled from where it was pressed.
///
/// Releasing leaves a one-shot bounce behind that the next frame consumes.
#[derive(Debug, Default)]
pub struct DragGesture {
    active: bool,
    anchor: Vec2,
    displacement: f32,
    pending_bounce: Option<f32>,
}

impl DragGesture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Pointer distance from the anchor (pixels)
    pub fn displacement(&self) -> f32 {
        self.displacement
    }

    pub fn begin(&mut self, x: f32, y: f32) {
        self.active = true;
        self.anchor = Vec2::new(x, y);
        self.displacement = 0.0;
    }

    /// Ignored unless a drag is in progress
    pub fn update(&mut self, x: f32, y: f32) {
        if self.active {
            self.displacement = Vec2::new(x, y).distance(self.anchor);
        }
    }

    /// Finish the drag and arm the bounce.
    ///
    /// Returns the drag length, or `None` if no drag was in progress.
    pub fn end(&mut self) -> Option<f32> {
        if !self.active {
            return None;
        }
        self.active = false;
        let length = self.displacement.abs();
        self.pending_bounce = Some(length);
        Some(length)
    }

    /// Drop an in-progress drag without arming a bounce
    pub fn cancel(&mut self) {
        self.active = false;
        self.displacement = 0.0;
    }

    /// Consume the armed bounce, if any
    pub fn take_bounce(&mut self) -> Option<f32> {
        self.pending_bounce.take()
    }
}
