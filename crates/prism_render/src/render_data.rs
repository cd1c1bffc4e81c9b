//! Recorded drawing instructions
//!
//! [`RenderData`] is an append-only byte buffer of instruction records plus a
//! side table of shared resources the records refer to by index. It is
//! filled once through a [`RenderDataDrawingContext`] and then replayed any
//! number of times through [`RenderData::walk_content`].
//!
//! [`RenderDataDrawingContext`]: crate::RenderDataDrawingContext

use std::mem::size_of;
use std::sync::Arc;

use bytemuck::Pod;
use prism_core::{Brush, IntersectionDetail, Pen, Point, Rect, Tolerance};
use prism_geometry::Geometry;
use tracing::{debug, trace, warn};

use crate::bounds_walker::BoundsDrawingContextWalker;
use crate::hit_test::{HitTestWithGeometryDrawingContextWalker, HitTestWithPointDrawingContextWalker};
use crate::records::*;
use crate::resources::{BitmapEffect, BitmapEffectInput, GlyphRun, GuidelineSet, ImageSource, MediaPlayer};
use crate::walker::DrawingContextWalker;

/// Smallest buffer allocated on the first write
const MIN_CAPACITY: usize = 128;

/// Shared object referenced by an instruction
#[derive(Clone, Debug)]
pub enum DependentResource {
    Brush(Arc<Brush>),
    Pen(Arc<Pen>),
    Geometry(Arc<Geometry>),
    Image(Arc<ImageSource>),
    GlyphRun(Arc<GlyphRun>),
    Media(Arc<MediaPlayer>),
    GuidelineSet(Arc<GuidelineSet>),
    Effect(Arc<BitmapEffect>),
    EffectInput(Arc<BitmapEffectInput>),
}

/// Frozen, replayable drawing
///
/// Replay only reads, so a `RenderData` can be walked from several threads
/// at once by independent walkers.
#[derive(Clone, Debug, Default)]
pub struct RenderData {
    buffer: Vec<u8>,
    resources: Vec<DependentResource>,
    instruction_count: usize,
}

macro_rules! resource_lookup {
    ($($(#[$doc:meta])* $name:ident => $variant:ident: $ty:ty;)*) => {
        $(
            $(#[$doc])*
            pub fn $name(&self, index: u32) -> Option<&$ty> {
                match self.resource(index)? {
                    DependentResource::$variant(value) => Some(value),
                    _ => None,
                }
            }
        )*
    };
}

impl RenderData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records written
    pub fn instruction_count(&self) -> usize {
        self.instruction_count
    }

    /// Size of the instruction buffer in bytes
    pub fn byte_len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn resources(&self) -> &[DependentResource] {
        &self.resources
    }

    /// Drop every record and resource, keeping the allocation
    pub fn clear(&mut self) {
        debug!(
            instructions = self.instruction_count,
            resources = self.resources.len(),
            "clearing render data"
        );
        self.buffer.clear();
        self.resources.clear();
        self.instruction_count = 0;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Recording
    // ─────────────────────────────────────────────────────────────────────────

    pub(crate) fn write_record<R: Record>(&mut self, record: &R) {
        self.write_raw(R::ID, bytemuck::bytes_of(record));
    }

    pub(crate) fn write_pop(&mut self) {
        self.write_raw(InstructionId::Pop, &[]);
    }

    fn write_raw(&mut self, id: InstructionId, payload: &[u8]) {
        let size = HEADER_SIZE + payload.len();
        debug_assert_eq!(size % RECORD_ALIGN, 0, "record size must keep 8-byte alignment");

        self.reserve(size);
        let header = RecordHeader {
            size: size as u32,
            id: id as u32,
        };
        self.buffer.extend_from_slice(bytemuck::bytes_of(&header));
        self.buffer.extend_from_slice(payload);
        self.instruction_count += 1;
    }

    /// Grow by half again, never below what the next record needs
    fn reserve(&mut self, additional: usize) {
        let required = self.buffer.len() + additional;
        let capacity = self.buffer.capacity();
        if required <= capacity {
            return;
        }

        let grown = (capacity + capacity / 2).max(required).max(MIN_CAPACITY);
        debug!(from = capacity, to = grown, "growing render data buffer");
        self.buffer.reserve_exact(grown - self.buffer.len());
    }

    /// Store a resource and return its 1-based index
    pub(crate) fn add_resource(&mut self, resource: DependentResource) -> u32 {
        self.resources.push(resource);
        self.resources.len() as u32
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Resource lookup
    // ─────────────────────────────────────────────────────────────────────────

    /// Resource at a 1-based index; 0 is always `None`
    pub fn resource(&self, index: u32) -> Option<&DependentResource> {
        let slot = (index as usize).checked_sub(1)?;
        self.resources.get(slot)
    }

    resource_lookup! {
        brush => Brush: Brush;
        pen => Pen: Pen;
        /// Geometries stay shared so walkers can keep them without copying
        geometry => Geometry: Arc<Geometry>;
        image => Image: ImageSource;
        glyph_run => GlyphRun: GlyphRun;
        media => Media: MediaPlayer;
        guideline_set => GuidelineSet: GuidelineSet;
        effect => Effect: BitmapEffect;
        effect_input => EffectInput: BitmapEffectInput;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Replay
    // ─────────────────────────────────────────────────────────────────────────

    /// Replay every record in order into `walker`
    ///
    /// The walker's stop flag is checked before each record. A record with
    /// an unknown id is skipped; a record whose size is inconsistent with
    /// the buffer ends the replay.
    pub fn walk_content<W: DrawingContextWalker + ?Sized>(&self, walker: &mut W) {
        let mut offset = 0;

        while offset < self.buffer.len() {
            if walker.should_stop_walking() {
                trace!(offset, "walker requested stop");
                break;
            }

            let Some(header) = read::<RecordHeader>(&self.buffer[offset..]) else {
                warn!(offset, "truncated record header, stopping replay");
                break;
            };

            let size = header.size as usize;
            if size < HEADER_SIZE || size % RECORD_ALIGN != 0 || offset + size > self.buffer.len() {
                warn!(offset, size, "malformed record size, stopping replay");
                break;
            }

            let payload = &self.buffer[offset + HEADER_SIZE..offset + size];
            match InstructionId::try_from(header.id) {
                Ok(id) => {
                    trace!(?id, offset, "replaying instruction");
                    if self.dispatch(id, payload, walker).is_none() {
                        warn!(?id, offset, size, "record payload too short, skipping");
                    }
                }
                Err(id) => warn!(id, offset, "unknown instruction id, skipping"),
            }

            offset += size;
        }
    }

    fn dispatch<W: DrawingContextWalker + ?Sized>(
        &self,
        id: InstructionId,
        payload: &[u8],
        walker: &mut W,
    ) -> Option<()> {
        match id {
            InstructionId::DrawLine => {
                let r = read::<DrawLineRecord>(payload)?;
                walker.draw_line(self.pen(r.pen), point_from_raw(r.point0), point_from_raw(r.point1));
            }
            InstructionId::DrawRectangle => {
                let r = read::<DrawRectangleRecord>(payload)?;
                walker.draw_rectangle(self.brush(r.brush), self.pen(r.pen), rect_from_raw(r.rect));
            }
            InstructionId::DrawRoundedRectangle => {
                let r = read::<DrawRoundedRectangleRecord>(payload)?;
                walker.draw_rounded_rectangle(
                    self.brush(r.brush),
                    self.pen(r.pen),
                    rect_from_raw(r.rect),
                    r.radius_x,
                    r.radius_y,
                );
            }
            InstructionId::DrawEllipse => {
                let r = read::<DrawEllipseRecord>(payload)?;
                walker.draw_ellipse(
                    self.brush(r.brush),
                    self.pen(r.pen),
                    point_from_raw(r.center),
                    r.radius_x,
                    r.radius_y,
                );
            }
            InstructionId::DrawGeometry => {
                let r = read::<DrawGeometryRecord>(payload)?;
                walker.draw_geometry(self.brush(r.brush), self.pen(r.pen), self.geometry(r.geometry));
            }
            InstructionId::DrawImage => {
                let r = read::<DrawImageRecord>(payload)?;
                walker.draw_image(self.image(r.image), rect_from_raw(r.rect));
            }
            InstructionId::DrawGlyphRun => {
                let r = read::<DrawGlyphRunRecord>(payload)?;
                walker.draw_glyph_run(self.brush(r.brush), self.glyph_run(r.glyph_run));
            }
            InstructionId::DrawVideo => {
                let r = read::<DrawVideoRecord>(payload)?;
                walker.draw_video(self.media(r.player), rect_from_raw(r.rect));
            }
            InstructionId::PushClip => {
                let r = read::<PushClipRecord>(payload)?;
                walker.push_clip(self.geometry(r.geometry));
            }
            InstructionId::PushOpacityMask => {
                let r = read::<PushOpacityMaskRecord>(payload)?;
                walker.push_opacity_mask(self.brush(r.brush));
            }
            InstructionId::PushOpacity => {
                let r = read::<PushOpacityRecord>(payload)?;
                walker.push_opacity(r.opacity);
            }
            InstructionId::PushTransform => {
                let r = read::<PushTransformRecord>(payload)?;
                if r.has_matrix != 0 {
                    walker.push_transform(Some(&matrix_from_raw(r.matrix)));
                } else {
                    walker.push_transform(None);
                }
            }
            InstructionId::PushGuidelineSet => {
                let r = read::<PushGuidelineSetRecord>(payload)?;
                walker.push_guideline_set(self.guideline_set(r.guidelines));
            }
            InstructionId::PushGuidelineY1 => {
                let r = read::<PushGuidelineY1Record>(payload)?;
                walker.push_guideline_y1(r.coordinate);
            }
            InstructionId::PushGuidelineY2 => {
                let r = read::<PushGuidelineY2Record>(payload)?;
                walker.push_guideline_y2(r.leading_coordinate, r.offset_to_driven_coordinate);
            }
            InstructionId::PushEffect => {
                let r = read::<PushEffectRecord>(payload)?;
                walker.push_effect(self.effect(r.effect), self.effect_input(r.effect_input));
            }
            InstructionId::Pop => walker.pop(),
        }
        Some(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// World-space bounds of everything drawn, using a caller-owned walker
    ///
    /// The walker is reset first so it can be reused between drawings.
    pub fn get_content_bounds(&self, walker: &mut BoundsDrawingContextWalker) -> Rect {
        walker.clear_state();
        self.walk_content(walker);
        walker.bounds()
    }

    /// World-space bounds with the standard flattening tolerance
    pub fn content_bounds(&self) -> Rect {
        self.get_content_bounds(&mut BoundsDrawingContextWalker::new())
    }

    /// Whether anything drawn covers `point`
    pub fn hit_test_point(&self, point: Point) -> bool {
        let mut walker = HitTestWithPointDrawingContextWalker::new(point);
        self.walk_content(&mut walker);
        walker.is_hit()
    }

    /// How `query` relates to the drawn content
    ///
    /// A drawing that tested no primitive reports `Empty`.
    pub fn hit_test_geometry(&self, query: &Geometry) -> IntersectionDetail {
        self.hit_test_geometry_with_tolerance(query, Tolerance::default())
    }

    /// [`hit_test_geometry`](Self::hit_test_geometry) at an explicit flattening tolerance
    pub fn hit_test_geometry_with_tolerance(
        &self,
        query: &Geometry,
        tolerance: Tolerance,
    ) -> IntersectionDetail {
        let mut walker = HitTestWithGeometryDrawingContextWalker::with_tolerance(query, tolerance);
        self.walk_content(&mut walker);
        match walker.intersection_detail() {
            IntersectionDetail::NotCalculated => IntersectionDetail::Empty,
            detail => detail,
        }
    }
}

/// Copy a `T` from the front of `bytes`; the buffer carries no alignment
/// guarantee in memory
fn read<T: Pod>(bytes: &[u8]) -> Option<T> {
    bytes.get(..size_of::<T>()).map(bytemuck::pod_read_unaligned)
}
