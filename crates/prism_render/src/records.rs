//! Binary instruction records
//!
//! Each record is a [`RecordHeader`] followed by a fixed-size payload. All
//! payloads are `#[repr(C)]` plain-old-data with explicit padding and a
//! size that is a multiple of 8, so records stay 8-byte aligned within the
//! buffer. Resource fields are 1-based indices into the render data's
//! dependent resource list; 0 means none.

use bytemuck::{Pod, Zeroable};
use prism_core::{Matrix, Point, Rect};

/// Instruction identifier stored in every record header
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InstructionId {
    DrawLine = 1,
    DrawRectangle = 2,
    DrawRoundedRectangle = 3,
    DrawEllipse = 4,
    DrawGeometry = 5,
    DrawImage = 6,
    DrawGlyphRun = 7,
    DrawVideo = 8,
    PushClip = 9,
    PushOpacityMask = 10,
    PushOpacity = 11,
    PushTransform = 12,
    PushGuidelineSet = 13,
    PushGuidelineY1 = 14,
    PushGuidelineY2 = 15,
    PushEffect = 16,
    Pop = 17,
}

impl TryFrom<u32> for InstructionId {
    type Error = u32;

    fn try_from(value: u32) -> Result<Self, u32> {
        use InstructionId::*;

        Ok(match value {
            1 => DrawLine,
            2 => DrawRectangle,
            3 => DrawRoundedRectangle,
            4 => DrawEllipse,
            5 => DrawGeometry,
            6 => DrawImage,
            7 => DrawGlyphRun,
            8 => DrawVideo,
            9 => PushClip,
            10 => PushOpacityMask,
            11 => PushOpacity,
            12 => PushTransform,
            13 => PushGuidelineSet,
            14 => PushGuidelineY1,
            15 => PushGuidelineY2,
            16 => PushEffect,
            17 => Pop,
            other => return Err(other),
        })
    }
}

/// Prefix of every record
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct RecordHeader {
    /// Size of the whole record including this header
    pub size: u32,
    pub id: u32,
}

pub const HEADER_SIZE: usize = std::mem::size_of::<RecordHeader>();

/// Record alignment within the buffer
pub const RECORD_ALIGN: usize = 8;

/// Payload type paired with its instruction id
///
/// `Pop` has no payload and is written as a bare header.
pub trait Record: Pod {
    const ID: InstructionId;
}

macro_rules! record {
    ($name:ident => $id:ident { $($field:ident: $ty:ty),* $(,)? }) => {
        #[repr(C)]
        #[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
        pub struct $name {
            $(pub $field: $ty,)*
        }

        impl Record for $name {
            const ID: InstructionId = InstructionId::$id;
        }
    };
}

record!(DrawLineRecord => DrawLine {
    pen: u32,
    _pad: u32,
    point0: [f64; 2],
    point1: [f64; 2],
});

record!(DrawRectangleRecord => DrawRectangle {
    brush: u32,
    pen: u32,
    rect: [f64; 4],
});

record!(DrawRoundedRectangleRecord => DrawRoundedRectangle {
    brush: u32,
    pen: u32,
    rect: [f64; 4],
    radius_x: f64,
    radius_y: f64,
});

record!(DrawEllipseRecord => DrawEllipse {
    brush: u32,
    pen: u32,
    center: [f64; 2],
    radius_x: f64,
    radius_y: f64,
});

record!(DrawGeometryRecord => DrawGeometry {
    brush: u32,
    pen: u32,
    geometry: u32,
    _pad: u32,
});

record!(DrawImageRecord => DrawImage {
    image: u32,
    _pad: u32,
    rect: [f64; 4],
});

record!(DrawGlyphRunRecord => DrawGlyphRun {
    brush: u32,
    glyph_run: u32,
});

record!(DrawVideoRecord => DrawVideo {
    player: u32,
    _pad: u32,
    rect: [f64; 4],
});

record!(PushClipRecord => PushClip {
    geometry: u32,
    _pad: u32,
});

record!(PushOpacityMaskRecord => PushOpacityMask {
    brush: u32,
    _pad: u32,
});

record!(PushOpacityRecord => PushOpacity {
    opacity: f64,
});

record!(PushTransformRecord => PushTransform {
    has_matrix: u32,
    _pad: u32,
    matrix: [f64; 6],
});

record!(PushGuidelineSetRecord => PushGuidelineSet {
    guidelines: u32,
    _pad: u32,
});

record!(PushGuidelineY1Record => PushGuidelineY1 {
    coordinate: f64,
});

record!(PushGuidelineY2Record => PushGuidelineY2 {
    leading_coordinate: f64,
    offset_to_driven_coordinate: f64,
});

record!(PushEffectRecord => PushEffect {
    effect: u32,
    effect_input: u32,
});

// ─────────────────────────────────────────────────────────────────────────────
// Value conversions
// ─────────────────────────────────────────────────────────────────────────────

pub(crate) fn point_to_raw(p: Point) -> [f64; 2] {
    [p.x, p.y]
}

pub(crate) fn point_from_raw(raw: [f64; 2]) -> Point {
    Point::new(raw[0], raw[1])
}

pub(crate) fn rect_to_raw(r: Rect) -> [f64; 4] {
    [r.x, r.y, r.width, r.height]
}

pub(crate) fn rect_from_raw(raw: [f64; 4]) -> Rect {
    Rect::new(raw[0], raw[1], raw[2], raw[3])
}

pub(crate) fn matrix_to_raw(m: &Matrix) -> [f64; 6] {
    [m.m11, m.m12, m.m21, m.m22, m.offset_x, m.offset_y]
}

pub(crate) fn matrix_from_raw(raw: [f64; 6]) -> Matrix {
    Matrix::new(raw[0], raw[1], raw[2], raw[3], raw[4], raw[5])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn test_record_sizes_are_aligned() {
        let sizes = [
            size_of::<DrawLineRecord>(),
            size_of::<DrawRectangleRecord>(),
            size_of::<DrawRoundedRectangleRecord>(),
            size_of::<DrawEllipseRecord>(),
            size_of::<DrawGeometryRecord>(),
            size_of::<DrawImageRecord>(),
            size_of::<DrawGlyphRunRecord>(),
            size_of::<DrawVideoRecord>(),
            size_of::<PushClipRecord>(),
            size_of::<PushOpacityMaskRecord>(),
            size_of::<PushOpacityRecord>(),
            size_of::<PushTransformRecord>(),
            size_of::<PushGuidelineSetRecord>(),
            size_of::<PushGuidelineY1Record>(),
            size_of::<PushGuidelineY2Record>(),
            size_of::<PushEffectRecord>(),
        ];
        assert!(sizes.iter().all(|size| size % RECORD_ALIGN == 0));
        assert_eq!(HEADER_SIZE, 8);
        assert_eq!(size_of::<PushTransformRecord>(), 56);
    }

    #[test]
    fn test_instruction_ids() {
        for raw in 1..=17 {
            let id = InstructionId::try_from(raw).unwrap();
            assert_eq!(id as u32, raw);
        }
        assert_eq!(InstructionId::try_from(0), Err(0));
        assert_eq!(InstructionId::try_from(99), Err(99));
    }

    #[test]
    fn test_matrix_conversion() {
        let m = Matrix::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        assert_eq!(matrix_from_raw(matrix_to_raw(&m)), m);
    }
}
