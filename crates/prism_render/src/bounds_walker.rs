//! World-space bounds of a recorded drawing

use std::sync::Arc;

use prism_core::{Brush, Matrix, Pen, Point, Rect, Tolerance};
use prism_geometry::{EllipseGeometry, Geometry, LineGeometry, RectangleGeometry};

use crate::resources::{GlyphRun, ImageSource, MediaPlayer};
use crate::walker::{DrawingContextWalker, Modifier, ModifierStack, PushKind};

/// Accumulates the axis-aligned bounds of everything a drawing paints
///
/// Each primitive's bounds are taken in world space under the current
/// transform, clipped to the current clip rectangle and unioned into
/// [`bounds`](Self::bounds).
#[derive(Clone, Debug)]
pub struct BoundsDrawingContextWalker {
    bounds: Rect,
    transform: Matrix,
    /// World-space clip; `None` means unclipped
    clip: Option<Rect>,
    stack: ModifierStack<Matrix, Option<Rect>>,
    tolerance: Tolerance,
}

impl Default for BoundsDrawingContextWalker {
    fn default() -> Self {
        Self::with_tolerance(Tolerance::default())
    }
}

impl BoundsDrawingContextWalker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tolerance(tolerance: Tolerance) -> Self {
        Self {
            bounds: Rect::EMPTY,
            transform: Matrix::IDENTITY,
            clip: None,
            stack: ModifierStack::new(),
            tolerance,
        }
    }

    /// Bounds accumulated so far, [`Rect::EMPTY`] before anything is drawn
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Reset for another walk, keeping allocations and tolerance
    pub fn clear_state(&mut self) {
        self.bounds = Rect::EMPTY;
        self.transform = Matrix::IDENTITY;
        self.clip = None;
        self.stack.clear();
    }

    /// Transform local bounds into world space and add them
    fn add_local_bounds(&mut self, bounds: Rect) {
        let world = if bounds.has_nan() {
            bounds
        } else {
            bounds.transform(&self.transform)
        };
        self.add_transformed_bounds(world);
    }

    /// Add world-space bounds, clipped
    ///
    /// NaN anywhere in the bounds widens them to the whole plane.
    fn add_transformed_bounds(&mut self, bounds: Rect) {
        let mut bounds = if bounds.has_nan() { Rect::INFINITE } else { bounds };

        if let Some(clip) = &self.clip {
            bounds = bounds.intersect(clip);
        }

        self.bounds = self.bounds.union(&bounds);
    }

    fn paints(brush: Option<&Brush>, pen: Option<&Pen>) -> bool {
        brush.is_some() || Pen::contributes_to_bounds(pen)
    }
}

impl DrawingContextWalker for BoundsDrawingContextWalker {
    fn draw_line(&mut self, pen: Option<&Pen>, point0: Point, point1: Point) {
        if !Pen::contributes_to_bounds(pen) {
            return;
        }

        let bounds = LineGeometry::get_bounds_helper(
            pen,
            &self.transform,
            point0,
            point1,
            &Matrix::IDENTITY,
            self.tolerance.value,
            self.tolerance.kind,
        );
        self.add_transformed_bounds(bounds);
    }

    fn draw_rectangle(&mut self, brush: Option<&Brush>, pen: Option<&Pen>, rect: Rect) {
        self.draw_rounded_rectangle(brush, pen, rect, 0.0, 0.0);
    }

    fn draw_rounded_rectangle(
        &mut self,
        brush: Option<&Brush>,
        pen: Option<&Pen>,
        rect: Rect,
        radius_x: f64,
        radius_y: f64,
    ) {
        if !Self::paints(brush, pen) {
            return;
        }

        let bounds = RectangleGeometry::get_bounds_helper(
            pen,
            &self.transform,
            &rect,
            radius_x,
            radius_y,
            &Matrix::IDENTITY,
            self.tolerance.value,
            self.tolerance.kind,
        );
        self.add_transformed_bounds(bounds);
    }

    fn draw_ellipse(
        &mut self,
        brush: Option<&Brush>,
        pen: Option<&Pen>,
        center: Point,
        radius_x: f64,
        radius_y: f64,
    ) {
        if !Self::paints(brush, pen) {
            return;
        }

        let bounds = EllipseGeometry::get_bounds_helper(
            pen,
            &self.transform,
            center,
            radius_x,
            radius_y,
            &Matrix::IDENTITY,
            self.tolerance.value,
            self.tolerance.kind,
        );
        self.add_transformed_bounds(bounds);
    }

    fn draw_geometry(&mut self, brush: Option<&Brush>, pen: Option<&Pen>, geometry: Option<&Arc<Geometry>>) {
        let Some(geometry) = geometry else {
            return;
        };
        if !Self::paints(brush, pen) {
            return;
        }

        let bounds = geometry.get_bounds_internal(pen, &self.transform, self.tolerance);
        self.add_transformed_bounds(bounds);
    }

    fn draw_image(&mut self, image: Option<&ImageSource>, rect: Rect) {
        if image.is_some() && !rect.is_empty() {
            self.add_local_bounds(rect);
        }
    }

    fn draw_glyph_run(&mut self, _brush: Option<&Brush>, glyph_run: Option<&GlyphRun>) {
        let Some(glyph_run) = glyph_run else {
            return;
        };

        let ink = glyph_run.compute_ink_bounding_box();
        if !ink.is_empty() {
            self.add_local_bounds(ink.offset(glyph_run.baseline_origin.to_vector()));
        }
    }

    fn draw_video(&mut self, player: Option<&MediaPlayer>, rect: Rect) {
        if player.is_some() && !rect.is_empty() {
            self.add_local_bounds(rect);
        }
    }

    fn push_transform(&mut self, transform: Option<&Matrix>) {
        self.stack.push_transform(self.transform);

        if let Some(matrix) = transform.filter(|m| !m.is_identity()) {
            self.transform = *matrix * self.transform;
        }
    }

    fn push_clip(&mut self, clip: Option<&Arc<Geometry>>) {
        self.stack.push_clip(self.clip);

        let Some(clip) = clip else {
            return;
        };

        let mut clip_bounds = clip.get_bounds_internal(None, &self.transform, self.tolerance);
        if clip_bounds.has_nan() {
            clip_bounds = Rect::INFINITE;
        }

        self.clip = Some(match &self.clip {
            Some(current) => current.intersect(&clip_bounds),
            None => clip_bounds,
        });
    }

    fn push_placeholder(&mut self, kind: PushKind) {
        self.stack.push_placeholder(kind);
    }

    fn pop(&mut self) {
        match self.stack.pop() {
            Some(Modifier::Transform(previous)) => self.transform = previous,
            Some(Modifier::Clip(previous)) => self.clip = previous,
            Some(Modifier::Placeholder(_)) | None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::GlyphRun;
    use prism_core::{Color, PenLineCap};

    fn rect_geometry(x: f64, y: f64, w: f64, h: f64) -> Arc<Geometry> {
        Arc::new(RectangleGeometry::new(Rect::new(x, y, w, h)).into())
    }

    #[test]
    fn test_translated_rectangle() {
        let mut walker = BoundsDrawingContextWalker::new();
        walker.push_transform(Some(&Matrix::translation(10.0, 10.0)));
        walker.draw_rectangle(Some(&Brush::BLACK), None, Rect::new(0.0, 0.0, 5.0, 5.0));
        walker.pop();

        assert_eq!(walker.bounds(), Rect::new(10.0, 10.0, 5.0, 5.0));
    }

    #[test]
    fn test_invisible_primitives_are_skipped() {
        let mut walker = BoundsDrawingContextWalker::new();
        walker.draw_rectangle(None, None, Rect::new(0.0, 0.0, 5.0, 5.0));
        walker.draw_line(None, Point::ZERO, Point::new(5.0, 5.0));
        walker.draw_line(Some(&Pen::new(Color::BLACK, 0.0)), Point::ZERO, Point::new(5.0, 5.0));
        walker.draw_geometry(Some(&Brush::BLACK), None, None);

        assert!(walker.bounds().is_empty());
    }

    #[test]
    fn test_stroked_rectangle_inflates() {
        let mut walker = BoundsDrawingContextWalker::new();
        let pen = Pen::new(Color::BLACK, 2.0);
        walker.draw_rectangle(None, Some(&pen), Rect::new(0.0, 0.0, 10.0, 10.0));

        assert_eq!(walker.bounds(), Rect::new(-1.0, -1.0, 12.0, 12.0));
    }

    #[test]
    fn test_horizontal_line_with_flat_caps() {
        let mut walker = BoundsDrawingContextWalker::new();
        let pen = Pen::new(Color::BLACK, 2.0).with_caps(PenLineCap::Flat);
        walker.draw_line(Some(&pen), Point::new(0.0, 5.0), Point::new(10.0, 5.0));

        let bounds = walker.bounds();
        assert!((bounds.x - 0.0).abs() < 1e-9);
        assert!((bounds.y - 4.0).abs() < 1e-9);
        assert!((bounds.width - 10.0).abs() < 1e-9);
        assert!((bounds.height - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_ellipse_under_scale() {
        let mut walker = BoundsDrawingContextWalker::new();
        walker.push_transform(Some(&Matrix::scale(2.0, 3.0)));
        walker.draw_ellipse(Some(&Brush::BLACK), None, Point::new(5.0, 5.0), 1.0, 1.0);
        walker.pop();

        let bounds = walker.bounds();
        assert!((bounds.x - 8.0).abs() < 1e-6);
        assert!((bounds.y - 12.0).abs() < 1e-6);
        assert!((bounds.width - 4.0).abs() < 1e-6);
        assert!((bounds.height - 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_clip_limits_bounds() {
        let mut walker = BoundsDrawingContextWalker::new();
        walker.push_clip(Some(&rect_geometry(0.0, 0.0, 4.0, 4.0)));
        walker.draw_rectangle(Some(&Brush::BLACK), None, Rect::new(2.0, 2.0, 10.0, 10.0));
        walker.pop();
        walker.draw_rectangle(Some(&Brush::BLACK), None, Rect::new(20.0, 20.0, 1.0, 1.0));

        assert_eq!(walker.bounds(), Rect::new(2.0, 2.0, 19.0, 19.0));
    }

    #[test]
    fn test_nested_clips_intersect() {
        let mut walker = BoundsDrawingContextWalker::new();
        walker.push_clip(Some(&rect_geometry(0.0, 0.0, 10.0, 10.0)));
        walker.push_clip(Some(&rect_geometry(5.0, 5.0, 10.0, 10.0)));
        walker.draw_rectangle(Some(&Brush::BLACK), None, Rect::new(0.0, 0.0, 20.0, 20.0));
        walker.pop();
        walker.pop();

        assert_eq!(walker.bounds(), Rect::new(5.0, 5.0, 5.0, 5.0));
    }

    #[test]
    fn test_clip_follows_transform() {
        let mut walker = BoundsDrawingContextWalker::new();
        walker.push_transform(Some(&Matrix::translation(100.0, 0.0)));
        walker.push_clip(Some(&rect_geometry(0.0, 0.0, 4.0, 4.0)));
        walker.pop();
        walker.pop();
        walker.draw_rectangle(Some(&Brush::BLACK), None, Rect::new(0.0, 0.0, 10.0, 10.0));

        assert_eq!(walker.bounds(), Rect::new(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_nan_bounds_become_infinite() {
        let mut walker = BoundsDrawingContextWalker::new();
        walker.draw_rectangle(Some(&Brush::BLACK), None, Rect::new(f64::NAN, 0.0, 1.0, 1.0));

        assert_eq!(walker.bounds(), Rect::INFINITE);
    }

    #[test]
    fn test_glyph_run_offset_by_baseline() {
        let mut walker = BoundsDrawingContextWalker::new();
        let run = GlyphRun::new(Point::new(10.0, 20.0), 10.0, vec![1, 2, 3], vec![5.0, 5.0, 6.0]);
        walker.draw_glyph_run(Some(&Brush::BLACK), Some(&run));

        assert_eq!(walker.bounds(), Rect::new(10.0, 12.0, 16.0, 10.0));
    }

    #[test]
    fn test_image_and_video_use_destination_rect() {
        let mut walker = BoundsDrawingContextWalker::new();
        walker.push_transform(Some(&Matrix::translation(1.0, 1.0)));
        walker.draw_image(Some(&ImageSource::default()), Rect::new(0.0, 0.0, 2.0, 2.0));
        walker.draw_video(Some(&MediaPlayer::default()), Rect::new(4.0, 4.0, 2.0, 2.0));
        walker.draw_image(None, Rect::new(100.0, 100.0, 2.0, 2.0));
        walker.pop();

        assert_eq!(walker.bounds(), Rect::new(1.0, 1.0, 6.0, 6.0));
    }

    #[test]
    fn test_clear_state() {
        let mut walker = BoundsDrawingContextWalker::new();
        walker.push_transform(Some(&Matrix::translation(3.0, 3.0)));
        walker.draw_rectangle(Some(&Brush::BLACK), None, Rect::new(0.0, 0.0, 1.0, 1.0));

        walker.clear_state();
        walker.draw_rectangle(Some(&Brush::BLACK), None, Rect::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(walker.bounds(), Rect::new(0.0, 0.0, 1.0, 1.0));
    }
}
