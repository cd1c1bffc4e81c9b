//! Drawing instruction replay protocol
//!
//! A [`DrawingContextWalker`] receives one call per recorded instruction.
//! Draw calls default to no-ops. Push calls default to recording a
//! placeholder so every push leaves exactly one entry on the walker's
//! stack, and [`DrawingContextWalker::pop`] can close it without being told
//! what kind of push it is closing.

use std::sync::Arc;

use prism_core::{Brush, Matrix, Pen, Point, Rect};
use prism_geometry::Geometry;
use smallvec::SmallVec;

use crate::resources::{BitmapEffect, BitmapEffectInput, GlyphRun, GuidelineSet, ImageSource, MediaPlayer};

/// Kind of scope opened by a push instruction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PushKind {
    Transform,
    Clip,
    Opacity,
    OpacityMask,
    GuidelineSet,
    GuidelineY1,
    GuidelineY2,
    Effect,
}

/// Visitor over a recorded drawing
pub trait DrawingContextWalker {
    fn draw_line(&mut self, _pen: Option<&Pen>, _point0: Point, _point1: Point) {}

    fn draw_rectangle(&mut self, _brush: Option<&Brush>, _pen: Option<&Pen>, _rect: Rect) {}

    fn draw_rounded_rectangle(
        &mut self,
        _brush: Option<&Brush>,
        _pen: Option<&Pen>,
        _rect: Rect,
        _radius_x: f64,
        _radius_y: f64,
    ) {
    }

    fn draw_ellipse(
        &mut self,
        _brush: Option<&Brush>,
        _pen: Option<&Pen>,
        _center: Point,
        _radius_x: f64,
        _radius_y: f64,
    ) {
    }

    fn draw_geometry(&mut self, _brush: Option<&Brush>, _pen: Option<&Pen>, _geometry: Option<&Arc<Geometry>>) {}

    fn draw_image(&mut self, _image: Option<&ImageSource>, _rect: Rect) {}

    fn draw_glyph_run(&mut self, _brush: Option<&Brush>, _glyph_run: Option<&GlyphRun>) {}

    fn draw_video(&mut self, _player: Option<&MediaPlayer>, _rect: Rect) {}

    // ─────────────────────────────────────────────────────────────────────────
    // Scopes
    // ─────────────────────────────────────────────────────────────────────────

    fn push_transform(&mut self, _transform: Option<&Matrix>) {
        self.push_placeholder(PushKind::Transform);
    }

    fn push_clip(&mut self, _clip: Option<&Arc<Geometry>>) {
        self.push_placeholder(PushKind::Clip);
    }

    fn push_opacity(&mut self, _opacity: f64) {
        self.push_placeholder(PushKind::Opacity);
    }

    fn push_opacity_mask(&mut self, _brush: Option<&Brush>) {
        self.push_placeholder(PushKind::OpacityMask);
    }

    fn push_guideline_set(&mut self, _guidelines: Option<&GuidelineSet>) {
        self.push_placeholder(PushKind::GuidelineSet);
    }

    fn push_guideline_y1(&mut self, _coordinate: f64) {
        self.push_placeholder(PushKind::GuidelineY1);
    }

    fn push_guideline_y2(&mut self, _leading_coordinate: f64, _offset_to_driven_coordinate: f64) {
        self.push_placeholder(PushKind::GuidelineY2);
    }

    fn push_effect(&mut self, _effect: Option<&BitmapEffect>, _input: Option<&BitmapEffectInput>) {
        self.push_placeholder(PushKind::Effect);
    }

    /// Record a scope that has no effect on this walker
    fn push_placeholder(&mut self, kind: PushKind);

    /// Close the innermost open scope
    fn pop(&mut self);

    /// Checked by the replay driver before each instruction
    fn should_stop_walking(&self) -> bool {
        false
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Modifier stack
// ─────────────────────────────────────────────────────────────────────────────

/// Saved state for one open scope
#[derive(Clone, Debug, PartialEq)]
pub enum Modifier<T, C> {
    /// Transform in effect before the push
    Transform(T),
    /// Clip in effect before the push
    Clip(C),
    Placeholder(PushKind),
}

impl<T, C> Modifier<T, C> {
    pub fn kind(&self) -> PushKind {
        match self {
            Modifier::Transform(_) => PushKind::Transform,
            Modifier::Clip(_) => PushKind::Clip,
            Modifier::Placeholder(kind) => *kind,
        }
    }
}

/// One entry per open scope, popped in LIFO order
#[derive(Clone, Debug)]
pub struct ModifierStack<T, C> {
    entries: SmallVec<[Modifier<T, C>; 8]>,
}

impl<T, C> Default for ModifierStack<T, C> {
    fn default() -> Self {
        Self {
            entries: SmallVec::new(),
        }
    }
}

impl<T, C> ModifierStack<T, C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_transform(&mut self, previous: T) {
        self.entries.push(Modifier::Transform(previous));
    }

    pub fn push_clip(&mut self, previous: C) {
        self.entries.push(Modifier::Clip(previous));
    }

    pub fn push_placeholder(&mut self, kind: PushKind) {
        self.entries.push(Modifier::Placeholder(kind));
    }

    /// Remove the innermost entry
    ///
    /// Popping an empty stack is a replay bug; it asserts in debug builds
    /// and returns `None` otherwise.
    pub fn pop(&mut self) -> Option<Modifier<T, C>> {
        let entry = self.entries.pop();
        debug_assert!(entry.is_some(), "pop without a matching push");
        entry
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingWalker {
        stack: ModifierStack<(), ()>,
        max_depth: usize,
        draws: usize,
    }

    impl DrawingContextWalker for CountingWalker {
        fn draw_rectangle(&mut self, _brush: Option<&Brush>, _pen: Option<&Pen>, _rect: Rect) {
            self.draws += 1;
        }

        fn push_placeholder(&mut self, kind: PushKind) {
            self.stack.push_placeholder(kind);
            self.max_depth = self.max_depth.max(self.stack.depth());
        }

        fn pop(&mut self) {
            self.stack.pop();
        }
    }

    #[test]
    fn test_default_pushes_balance() {
        let mut walker = CountingWalker::default();
        walker.push_transform(Some(&Matrix::scale(2.0, 2.0)));
        walker.push_clip(None);
        walker.push_opacity(0.5);
        walker.push_opacity_mask(None);
        walker.push_guideline_set(None);
        walker.push_guideline_y1(1.0);
        walker.push_guideline_y2(1.0, 2.0);
        walker.push_effect(None, None);
        assert_eq!(walker.stack.depth(), 8);

        for _ in 0..8 {
            walker.pop();
        }
        assert!(walker.stack.is_empty());
        assert_eq!(walker.max_depth, 8);
    }

    #[test]
    fn test_default_draws_are_no_ops() {
        let mut walker = CountingWalker::default();
        walker.draw_line(None, Point::ZERO, Point::ZERO);
        walker.draw_ellipse(None, None, Point::ZERO, 1.0, 1.0);
        walker.draw_rectangle(None, None, Rect::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(walker.draws, 1);
        assert!(!walker.should_stop_walking());
    }

    #[test]
    fn test_modifier_stack_is_lifo() {
        let mut stack: ModifierStack<u32, &str> = ModifierStack::new();
        stack.push_transform(1);
        stack.push_clip("clip");
        stack.push_placeholder(PushKind::Opacity);

        assert_eq!(stack.pop().map(|m| m.kind()), Some(PushKind::Opacity));
        assert_eq!(stack.pop(), Some(Modifier::Clip("clip")));
        assert_eq!(stack.pop(), Some(Modifier::Transform(1)));
        assert!(stack.is_empty());
    }
}
