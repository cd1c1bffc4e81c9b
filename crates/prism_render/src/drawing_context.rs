//! Recording drawing context
//!
//! [`RenderDataDrawingContext`] turns drawing calls into [`RenderData`]
//! records. Calls that could not paint anything are dropped at record time;
//! pushes are always recorded so the pops written later stay matched.

use std::sync::Arc;

use prism_core::{Brush, Matrix, Pen, Point, Rect};
use prism_geometry::Geometry;
use tracing::trace;

use crate::error::{RenderError, Result};
use crate::records::*;
use crate::render_data::{DependentResource, RenderData};
use crate::resources::{BitmapEffect, BitmapEffectInput, GlyphRun, GuidelineSet, ImageSource, MediaPlayer};

/// Immediate-mode drawing surface
pub trait DrawingContext {
    // ─────────────────────────────────────────────────────────────────────────
    // Primitives
    // ─────────────────────────────────────────────────────────────────────────

    fn draw_line(&mut self, pen: Option<&Pen>, point0: Point, point1: Point);

    fn draw_rectangle(&mut self, brush: Option<&Brush>, pen: Option<&Pen>, rect: Rect);

    fn draw_rounded_rectangle(
        &mut self,
        brush: Option<&Brush>,
        pen: Option<&Pen>,
        rect: Rect,
        radius_x: f64,
        radius_y: f64,
    );

    fn draw_ellipse(
        &mut self,
        brush: Option<&Brush>,
        pen: Option<&Pen>,
        center: Point,
        radius_x: f64,
        radius_y: f64,
    );

    fn draw_geometry(&mut self, brush: Option<&Brush>, pen: Option<&Pen>, geometry: Option<&Arc<Geometry>>);

    fn draw_image(&mut self, image: Option<&ImageSource>, rect: Rect);

    fn draw_glyph_run(&mut self, brush: Option<&Brush>, glyph_run: Option<&GlyphRun>);

    fn draw_video(&mut self, player: Option<&MediaPlayer>, rect: Rect);

    // ─────────────────────────────────────────────────────────────────────────
    // Scopes
    // ─────────────────────────────────────────────────────────────────────────

    fn push_transform(&mut self, transform: Option<&Matrix>);

    fn push_clip(&mut self, clip: Option<&Arc<Geometry>>);

    fn push_opacity(&mut self, opacity: f64);

    fn push_opacity_mask(&mut self, brush: Option<&Brush>);

    fn push_guideline_set(&mut self, guidelines: Option<&GuidelineSet>);

    fn push_guideline_y1(&mut self, coordinate: f64);

    fn push_guideline_y2(&mut self, leading_coordinate: f64, offset_to_driven_coordinate: f64);

    fn push_effect(&mut self, effect: Option<&BitmapEffect>, input: Option<&BitmapEffectInput>);

    /// Close the innermost push
    ///
    /// # Errors
    ///
    /// [`RenderError::TooManyPops`] when no push is open.
    fn pop(&mut self) -> Result<()>;
}

/// Drawing context that records into a [`RenderData`]
#[derive(Debug, Default)]
pub struct RenderDataDrawingContext {
    render_data: RenderData,
    depth: usize,
}

impl RenderDataDrawingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pushes not yet popped
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn render_data(&self) -> &RenderData {
        &self.render_data
    }

    /// Pop every open scope and hand back the finished drawing
    pub fn close(mut self) -> RenderData {
        if self.depth > 0 {
            trace!(open = self.depth, "closing open scopes");
        }
        while self.depth > 0 {
            self.render_data.write_pop();
            self.depth -= 1;
        }
        self.render_data
    }

    fn add<T: Clone>(&mut self, value: Option<&T>, wrap: fn(Arc<T>) -> DependentResource) -> u32 {
        match value {
            Some(value) => self.render_data.add_resource(wrap(Arc::new(value.clone()))),
            None => 0,
        }
    }

    fn add_geometry(&mut self, geometry: Option<&Arc<Geometry>>) -> u32 {
        match geometry {
            Some(geometry) => self
                .render_data
                .add_resource(DependentResource::Geometry(Arc::clone(geometry))),
            None => 0,
        }
    }

    fn push_record<R: Record>(&mut self, record: &R) {
        self.render_data.write_record(record);
        self.depth += 1;
    }
}

impl DrawingContext for RenderDataDrawingContext {
    fn draw_line(&mut self, pen: Option<&Pen>, point0: Point, point1: Point) {
        if pen.is_none() {
            return;
        }

        let pen = self.add(pen, DependentResource::Pen);
        self.render_data.write_record(&DrawLineRecord {
            pen,
            point0: point_to_raw(point0),
            point1: point_to_raw(point1),
            ..Default::default()
        });
    }

    fn draw_rectangle(&mut self, brush: Option<&Brush>, pen: Option<&Pen>, rect: Rect) {
        if brush.is_none() && pen.is_none() {
            return;
        }

        let brush = self.add(brush, DependentResource::Brush);
        let pen = self.add(pen, DependentResource::Pen);
        self.render_data.write_record(&DrawRectangleRecord {
            brush,
            pen,
            rect: rect_to_raw(rect),
        });
    }

    fn draw_rounded_rectangle(
        &mut self,
        brush: Option<&Brush>,
        pen: Option<&Pen>,
        rect: Rect,
        radius_x: f64,
        radius_y: f64,
    ) {
        if brush.is_none() && pen.is_none() {
            return;
        }

        let brush = self.add(brush, DependentResource::Brush);
        let pen = self.add(pen, DependentResource::Pen);
        self.render_data.write_record(&DrawRoundedRectangleRecord {
            brush,
            pen,
            rect: rect_to_raw(rect),
            radius_x,
            radius_y,
        });
    }

    fn draw_ellipse(
        &mut self,
        brush: Option<&Brush>,
        pen: Option<&Pen>,
        center: Point,
        radius_x: f64,
        radius_y: f64,
    ) {
        if brush.is_none() && pen.is_none() {
            return;
        }

        let brush = self.add(brush, DependentResource::Brush);
        let pen = self.add(pen, DependentResource::Pen);
        self.render_data.write_record(&DrawEllipseRecord {
            brush,
            pen,
            center: point_to_raw(center),
            radius_x,
            radius_y,
        });
    }

    fn draw_geometry(&mut self, brush: Option<&Brush>, pen: Option<&Pen>, geometry: Option<&Arc<Geometry>>) {
        if (brush.is_none() && pen.is_none()) || geometry.is_none() {
            return;
        }

        let brush = self.add(brush, DependentResource::Brush);
        let pen = self.add(pen, DependentResource::Pen);
        let geometry = self.add_geometry(geometry);
        self.render_data.write_record(&DrawGeometryRecord {
            brush,
            pen,
            geometry,
            ..Default::default()
        });
    }

    fn draw_image(&mut self, image: Option<&ImageSource>, rect: Rect) {
        if image.is_none() {
            return;
        }

        let image = self.add(image, DependentResource::Image);
        self.render_data.write_record(&DrawImageRecord {
            image,
            rect: rect_to_raw(rect),
            ..Default::default()
        });
    }

    fn draw_glyph_run(&mut self, brush: Option<&Brush>, glyph_run: Option<&GlyphRun>) {
        if brush.is_none() || glyph_run.is_none() {
            return;
        }

        let brush = self.add(brush, DependentResource::Brush);
        let glyph_run = self.add(glyph_run, DependentResource::GlyphRun);
        self.render_data
            .write_record(&DrawGlyphRunRecord { brush, glyph_run });
    }

    fn draw_video(&mut self, player: Option<&MediaPlayer>, rect: Rect) {
        if player.is_none() {
            return;
        }

        let player = self.add(player, DependentResource::Media);
        self.render_data.write_record(&DrawVideoRecord {
            player,
            rect: rect_to_raw(rect),
            ..Default::default()
        });
    }

    fn push_transform(&mut self, transform: Option<&Matrix>) {
        let record = match transform {
            Some(matrix) => PushTransformRecord {
                has_matrix: 1,
                matrix: matrix_to_raw(matrix),
                ..Default::default()
            },
            None => PushTransformRecord::default(),
        };
        self.push_record(&record);
    }

    fn push_clip(&mut self, clip: Option<&Arc<Geometry>>) {
        let geometry = self.add_geometry(clip);
        self.push_record(&PushClipRecord {
            geometry,
            ..Default::default()
        });
    }

    fn push_opacity(&mut self, opacity: f64) {
        self.push_record(&PushOpacityRecord { opacity });
    }

    fn push_opacity_mask(&mut self, brush: Option<&Brush>) {
        let brush = self.add(brush, DependentResource::Brush);
        self.push_record(&PushOpacityMaskRecord {
            brush,
            ..Default::default()
        });
    }

    fn push_guideline_set(&mut self, guidelines: Option<&GuidelineSet>) {
        let guidelines = self.add(guidelines, DependentResource::GuidelineSet);
        self.push_record(&PushGuidelineSetRecord {
            guidelines,
            ..Default::default()
        });
    }

    fn push_guideline_y1(&mut self, coordinate: f64) {
        self.push_record(&PushGuidelineY1Record { coordinate });
    }

    fn push_guideline_y2(&mut self, leading_coordinate: f64, offset_to_driven_coordinate: f64) {
        self.push_record(&PushGuidelineY2Record {
            leading_coordinate,
            offset_to_driven_coordinate,
        });
    }

    fn push_effect(&mut self, effect: Option<&BitmapEffect>, input: Option<&BitmapEffectInput>) {
        let effect = self.add(effect, DependentResource::Effect);
        let effect_input = self.add(input, DependentResource::EffectInput);
        self.push_record(&PushEffectRecord {
            effect,
            effect_input,
        });
    }

    fn pop(&mut self) -> Result<()> {
        if self.depth == 0 {
            return Err(RenderError::TooManyPops);
        }

        self.render_data.write_pop();
        self.depth -= 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::Color;
    use prism_geometry::RectangleGeometry;

    #[test]
    fn test_invisible_draws_are_dropped() {
        let mut ctx = RenderDataDrawingContext::new();
        ctx.draw_line(None, Point::ZERO, Point::new(1.0, 1.0));
        ctx.draw_rectangle(None, None, Rect::new(0.0, 0.0, 1.0, 1.0));
        ctx.draw_rounded_rectangle(None, None, Rect::new(0.0, 0.0, 1.0, 1.0), 1.0, 1.0);
        ctx.draw_ellipse(None, None, Point::ZERO, 1.0, 1.0);
        ctx.draw_geometry(Some(&Brush::BLACK), None, None);
        ctx.draw_image(None, Rect::new(0.0, 0.0, 1.0, 1.0));
        ctx.draw_glyph_run(None, Some(&GlyphRun::default()));
        ctx.draw_video(None, Rect::new(0.0, 0.0, 1.0, 1.0));

        let data = ctx.close();
        assert_eq!(data.instruction_count(), 0);
        assert!(data.resources().is_empty());
    }

    #[test]
    fn test_visible_draws_are_recorded() {
        let pen = Pen::new(Color::BLACK, 1.0);
        let geometry = Arc::new(Geometry::from(RectangleGeometry::new(Rect::new(0.0, 0.0, 1.0, 1.0))));

        let mut ctx = RenderDataDrawingContext::new();
        ctx.draw_line(Some(&pen), Point::ZERO, Point::new(1.0, 1.0));
        ctx.draw_rectangle(Some(&Brush::BLACK), None, Rect::new(0.0, 0.0, 1.0, 1.0));
        ctx.draw_geometry(None, Some(&pen), Some(&geometry));

        let data = ctx.close();
        assert_eq!(data.instruction_count(), 3);
        assert_eq!(data.resources().len(), 4);
        assert!(data.geometry(4).is_some_and(|g| Arc::ptr_eq(g, &geometry)));
    }

    #[test]
    fn test_pop_without_push() {
        let mut ctx = RenderDataDrawingContext::new();
        assert_eq!(ctx.pop(), Err(RenderError::TooManyPops));

        ctx.push_opacity(0.5);
        assert_eq!(ctx.pop(), Ok(()));
        assert_eq!(ctx.pop(), Err(RenderError::TooManyPops));
    }

    #[test]
    fn test_close_balances_pushes() {
        let mut ctx = RenderDataDrawingContext::new();
        ctx.push_transform(Some(&Matrix::translation(1.0, 1.0)));
        ctx.push_clip(None);
        ctx.push_guideline_y1(2.0);
        assert_eq!(ctx.depth(), 3);

        let data = ctx.close();
        assert_eq!(data.instruction_count(), 6);
    }
}
