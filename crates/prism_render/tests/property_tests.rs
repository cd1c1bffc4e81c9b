//! Property-based tests for the replay walkers.
//!
//! These tests use proptest to generate random drawings and verify the
//! bounds and hit-test invariants.

use std::sync::Arc;

use prism_core::{Brush, IntersectionDetail, Matrix, Rect};
use prism_geometry::{Geometry, RectangleGeometry};
use prism_render::{
    BoundsDrawingContextWalker, DrawingContext, DrawingContextWalker,
    HitTestWithGeometryDrawingContextWalker, RenderDataDrawingContext,
};
use proptest::prelude::*;

// Integer-valued coordinates keep unions exact, so results can be compared
// with `==` regardless of evaluation order.
fn rect_strategy() -> impl Strategy<Value = Rect> {
    (0i32..100, 0i32..100, 1i32..50, 1i32..50)
        .prop_map(|(x, y, w, h)| Rect::new(x as f64, y as f64, w as f64, h as f64))
}

fn transform_strategy() -> impl Strategy<Value = Matrix> {
    (1i32..5, 1i32..5, -50i32..50, -50i32..50).prop_map(|(sx, sy, tx, ty)| {
        Matrix::scale(sx as f64, sy as f64) * Matrix::translation(tx as f64, ty as f64)
    })
}

fn bounds_of(rects: &[Rect]) -> Rect {
    let mut walker = BoundsDrawingContextWalker::new();
    for rect in rects {
        walker.draw_rectangle(Some(&Brush::BLACK), None, *rect);
    }
    walker.bounds()
}

fn clip_geometry(rect: Rect) -> Arc<Geometry> {
    Arc::new(RectangleGeometry::new(rect).into())
}

fn approx_eq(a: &Rect, b: &Rect) -> bool {
    (a.x - b.x).abs() < 1e-6
        && (a.y - b.y).abs() < 1e-6
        && (a.width - b.width).abs() < 1e-6
        && (a.height - b.height).abs() < 1e-6
}

// ============================================================================
// Bounds Property Tests
// ============================================================================

// Property: drawing more never shrinks the bounds
proptest! {
    #[test]
    fn prop_bounds_monotonic(rects in prop::collection::vec(rect_strategy(), 1..20)) {
        let mut walker = BoundsDrawingContextWalker::new();
        let mut previous = Rect::EMPTY;

        for rect in &rects {
            walker.draw_rectangle(Some(&Brush::BLACK), None, *rect);
            let current = walker.bounds();
            prop_assert_eq!(current.union(&previous), current);
            prop_assert_eq!(current.union(rect), current);
            previous = current;
        }
    }
}

// Property: without clips, draw order does not affect the bounds
proptest! {
    #[test]
    fn prop_bounds_order_independent(rects in prop::collection::vec(rect_strategy(), 1..20)) {
        let forward = bounds_of(&rects);
        let reversed: Vec<Rect> = rects.iter().rev().copied().collect();
        prop_assert_eq!(forward, bounds_of(&reversed));
    }
}

// Property: nested pushes compose inner-first
proptest! {
    #[test]
    fn prop_transform_composition(
        rect in rect_strategy(),
        outer in transform_strategy(),
        inner in transform_strategy(),
    ) {
        let mut walker = BoundsDrawingContextWalker::new();
        walker.push_transform(Some(&outer));
        walker.push_transform(Some(&inner));
        walker.draw_rectangle(Some(&Brush::BLACK), None, rect);
        walker.pop();
        walker.pop();

        let expected = rect.transform(&(inner * outer));
        prop_assert!(approx_eq(&walker.bounds(), &expected), "{:?} vs {:?}", walker.bounds(), expected);
    }
}

// Property: state after a matching pop equals the state before the push
proptest! {
    #[test]
    fn prop_push_pop_round_trip(
        rect in rect_strategy(),
        transform in transform_strategy(),
        clip in rect_strategy(),
    ) {
        let mut walker = BoundsDrawingContextWalker::new();
        walker.push_transform(Some(&transform));
        walker.push_clip(Some(&clip_geometry(clip)));
        walker.push_opacity(0.5);
        walker.pop();
        walker.pop();
        walker.pop();
        walker.draw_rectangle(Some(&Brush::BLACK), None, rect);

        prop_assert_eq!(walker.bounds(), rect);
    }
}

// Property: clip ∩ clip == clip
proptest! {
    #[test]
    fn prop_clip_idempotent(rect in rect_strategy(), clip in rect_strategy()) {
        let clip = clip_geometry(clip);

        let mut once = BoundsDrawingContextWalker::new();
        once.push_clip(Some(&clip));
        once.draw_rectangle(Some(&Brush::BLACK), None, rect);
        once.pop();

        let mut twice = BoundsDrawingContextWalker::new();
        twice.push_clip(Some(&clip));
        twice.push_clip(Some(&clip));
        twice.draw_rectangle(Some(&Brush::BLACK), None, rect);
        twice.pop();
        twice.pop();

        prop_assert_eq!(once.bounds(), twice.bounds());
    }
}

// Property: replaying a recording matches driving the walker directly
proptest! {
    #[test]
    fn prop_recorded_bounds_match_direct(
        rects in prop::collection::vec(rect_strategy(), 1..10),
        transform in transform_strategy(),
    ) {
        let mut ctx = RenderDataDrawingContext::new();
        let mut direct = BoundsDrawingContextWalker::new();

        ctx.push_transform(Some(&transform));
        direct.push_transform(Some(&transform));
        for rect in &rects {
            ctx.draw_rectangle(Some(&Brush::BLACK), None, *rect);
            direct.draw_rectangle(Some(&Brush::BLACK), None, *rect);
        }
        ctx.pop().unwrap();
        direct.pop();

        let data = ctx.close();
        prop_assert_eq!(data.content_bounds(), direct.bounds());
    }
}

// ============================================================================
// Hit Test Property Tests
// ============================================================================

// Property: once a primitive contains the query, later primitives are ignored
proptest! {
    #[test]
    fn prop_containment_is_terminal(others in prop::collection::vec(rect_strategy(), 0..8)) {
        let mut ctx = RenderDataDrawingContext::new();
        ctx.draw_rectangle(Some(&Brush::BLACK), None, Rect::new(-1000.0, -1000.0, 2000.0, 2000.0));
        for rect in &others {
            ctx.draw_rectangle(Some(&Brush::BLACK), None, rect.offset(prism_core::Vector::new(500.0, 500.0)));
        }
        let data = ctx.close();

        let query: Geometry = RectangleGeometry::new(Rect::new(10.0, 10.0, 5.0, 5.0)).into();
        prop_assert_eq!(data.hit_test_geometry(&query), IntersectionDetail::FullyContains);
    }
}

// Property: a push and its matching pop leave hit testing unchanged
proptest! {
    #[test]
    fn prop_hit_test_push_pop_round_trip(
        rect in rect_strategy(),
        query in rect_strategy(),
        transform in transform_strategy(),
        clip in rect_strategy(),
    ) {
        let query: Geometry = RectangleGeometry::new(query).into();

        let mut direct = HitTestWithGeometryDrawingContextWalker::new(&query);
        direct.draw_rectangle(Some(&Brush::BLACK), None, rect);

        let mut scoped = HitTestWithGeometryDrawingContextWalker::new(&query);
        scoped.push_transform(Some(&transform));
        scoped.push_clip(Some(&clip_geometry(clip)));
        scoped.push_opacity(0.5);
        scoped.pop();
        scoped.pop();
        scoped.pop();
        scoped.draw_rectangle(Some(&Brush::BLACK), None, rect);

        prop_assert_eq!(direct.intersection_detail(), scoped.intersection_detail());
    }
}
