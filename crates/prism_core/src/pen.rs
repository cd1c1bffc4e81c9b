//! Stroke configuration

use crate::brush::Brush;

/// Shape drawn at the open ends of a stroke or dash
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PenLineCap {
    /// Ends exactly at the endpoint
    #[default]
    Flat,
    /// Half-thickness square extending past the endpoint
    Square,
    /// Half-circle centered on the endpoint
    Round,
    /// Triangle whose apex sits half a thickness past the endpoint
    Triangle,
}

/// Shape drawn where two stroked segments meet
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PenLineJoin {
    /// Sharp corner, falls back to bevel past the miter limit
    #[default]
    Miter,
    /// Flat corner
    Bevel,
    /// Rounded corner
    Round,
}

/// Dash pattern, lengths expressed in multiples of the pen thickness
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DashStyle {
    /// Alternating dash / gap lengths
    pub dashes: Vec<f64>,
    /// Distance into the pattern at which the stroke starts
    pub offset: f64,
}

impl DashStyle {
    pub fn new(dashes: Vec<f64>, offset: f64) -> Self {
        Self { dashes, offset }
    }

    pub fn solid() -> Self {
        Self::default()
    }

    pub fn dash() -> Self {
        Self::new(vec![2.0, 2.0], 1.0)
    }

    pub fn dot() -> Self {
        Self::new(vec![0.0, 2.0], 0.0)
    }

    pub fn dash_dot() -> Self {
        Self::new(vec![2.0, 2.0, 0.0, 2.0], 1.0)
    }

    /// True when the pattern produces gaps
    pub fn has_gaps(&self) -> bool {
        self.dashes.iter().skip(1).step_by(2).any(|gap| *gap > 0.0)
    }
}

/// Pen used to stroke geometry outlines
#[derive(Clone, Debug, PartialEq)]
pub struct Pen {
    /// Paint for the stroke; a pen without a brush draws nothing
    pub brush: Option<Brush>,
    pub thickness: f64,
    pub start_line_cap: PenLineCap,
    pub end_line_cap: PenLineCap,
    pub dash_cap: PenLineCap,
    pub line_join: PenLineJoin,
    /// Maximum ratio of miter length to half the thickness
    pub miter_limit: f64,
    pub dash_style: Option<DashStyle>,
}

impl Default for Pen {
    fn default() -> Self {
        Self {
            brush: None,
            thickness: 1.0,
            start_line_cap: PenLineCap::Flat,
            end_line_cap: PenLineCap::Flat,
            dash_cap: PenLineCap::Square,
            line_join: PenLineJoin::Miter,
            miter_limit: 10.0,
            dash_style: None,
        }
    }
}

impl Pen {
    /// Create a solid pen with the given brush and thickness
    pub fn new(brush: impl Into<Brush>, thickness: f64) -> Self {
        Self {
            brush: Some(brush.into()),
            thickness,
            ..Default::default()
        }
    }

    /// Set both end caps
    pub fn with_caps(mut self, cap: PenLineCap) -> Self {
        self.start_line_cap = cap;
        self.end_line_cap = cap;
        self
    }

    pub fn with_join(mut self, join: PenLineJoin) -> Self {
        self.line_join = join;
        self
    }

    pub fn with_miter_limit(mut self, limit: f64) -> Self {
        self.miter_limit = limit;
        self
    }

    pub fn with_dash_style(mut self, dash_style: DashStyle) -> Self {
        self.dash_style = Some(dash_style);
        self
    }

    pub fn with_dash_cap(mut self, cap: PenLineCap) -> Self {
        self.dash_cap = cap;
        self
    }

    /// Whether stroking with this pen inflates bounds at all
    ///
    /// False for a missing pen, a pen without a brush, and a pen whose
    /// thickness is zero or NaN.
    pub fn contributes_to_bounds(pen: Option<&Pen>) -> bool {
        match pen {
            Some(pen) => pen.brush.is_some() && pen.thickness != 0.0 && !pen.thickness.is_nan(),
            None => false,
        }
    }

    /// True when the stroke is a single continuous band
    pub fn does_not_contain_gaps(&self) -> bool {
        match &self.dash_style {
            Some(style) => !style.has_gaps(),
            None => true,
        }
    }

    /// Half the absolute thickness
    pub fn half_thickness(&self) -> f64 {
        self.thickness.abs() * 0.5
    }
}
