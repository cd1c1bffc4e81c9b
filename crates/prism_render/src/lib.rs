//! Prism Render
//!
//! Recorded drawings and the walkers that replay them:
//!
//! - **Recording**: `RenderDataDrawingContext` writes drawing calls into a
//!   `RenderData` instruction buffer with a shared resource table
//! - **Replay**: the `DrawingContextWalker` visitor protocol, driven by
//!   `RenderData::walk_content`
//! - **Bounds**: `BoundsDrawingContextWalker` accumulates world-space bounds
//!   under the transform and clip stacks
//! - **Hit testing**: geometry and point walkers producing
//!   `IntersectionDetail` results
//!
//! # Example
//!
//! ```rust
//! use prism_core::{Brush, Matrix, Rect};
//! use prism_render::{DrawingContext, RenderDataDrawingContext};
//!
//! let mut ctx = RenderDataDrawingContext::new();
//! ctx.push_transform(Some(&Matrix::translation(10.0, 10.0)));
//! ctx.draw_rectangle(Some(&Brush::BLACK), None, Rect::new(0.0, 0.0, 5.0, 5.0));
//! ctx.pop().unwrap();
//!
//! let data = ctx.close();
//! assert_eq!(data.content_bounds(), Rect::new(10.0, 10.0, 5.0, 5.0));
//! ```

pub mod bounds_walker;
pub mod drawing_context;
pub mod error;
pub mod records;
pub mod render_data;
pub mod resources;
pub mod walker;

pub use bounds_walker::BoundsDrawingContextWalker;
pub use drawing_context::{DrawingContext, RenderDataDrawingContext};
pub use error::{RenderError, Result};
pub use hit_test::{HitTestWithGeometryDrawingContextWalker, HitTestWithPointDrawingContextWalker};
pub use records::InstructionId;
pub use render_data::{DependentResource, RenderData};
pub use resources::{
    BitmapEffect, BitmapEffectInput, FontMetrics, GlyphRun, GuidelineSet, ImageSource, MediaPlayer,
};
pub use walker::{DrawingContextWalker, Modifier, ModifierStack, PushKind};
