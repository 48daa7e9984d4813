//! Viewport geometry, axis handling and resting offsets.
//!
//! The carousel lays its slides out in a strip along one [`Axis`]. Every
//! offset calculation in the widget goes through [`direction_sign`], so the
//! right-to-left mirroring rule lives in exactly one place.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use horizon_carousel_core::logging::targets;

/// The single dimension along which the carousel moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Slides are laid out left to right (or right to left when mirrored).
    #[default]
    Horizontal,
    /// Slides are laid out top to bottom. Never mirrored.
    Vertical,
}

/// Reading direction of the host layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutDirection {
    /// Left-to-right layout.
    #[default]
    LeftToRight,
    /// Right-to-left layout; mirrors the horizontal axis only.
    RightToLeft,
}

/// Sign applied to `extent × index` to obtain a slide's resting offset.
///
/// Moving forward through the strip translates it towards negative
/// coordinates, except on a right-to-left horizontal strip where the
/// translation is mirrored.
#[inline]
pub fn direction_sign(axis: Axis, direction: LayoutDirection) -> f32 {
    match (axis, direction) {
        (Axis::Horizontal, LayoutDirection::RightToLeft) => 1.0,
        _ => -1.0,
    }
}

/// A 2D displacement of the slide strip.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset {
    /// Horizontal component.
    pub x: f32,
    /// Vertical component.
    pub y: f32,
}

impl Offset {
    /// The zero offset.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new offset.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// An offset of `amount` along `axis` and zero on the other axis.
    #[inline]
    pub fn along(axis: Axis, amount: f32) -> Self {
        match axis {
            Axis::Horizontal => Self::new(amount, 0.0),
            Axis::Vertical => Self::new(0.0, amount),
        }
    }

    /// The component along `axis`.
    #[inline]
    pub fn component(self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// Euclidean length.
    #[inline]
    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }
}

impl Add for Offset {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Offset {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Position and size of the carousel viewport, as reported by host layout.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutRect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Viewport width.
    pub width: f32,
    /// Viewport height.
    pub height: f32,
}

impl LayoutRect {
    /// Create a new rect.
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether the rect has a finite, positive width and height.
    #[inline]
    pub fn is_measurable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Size along `axis`.
    #[inline]
    pub fn extent(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }
}

/// Size of the full slide strip.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StripSize {
    /// Strip width.
    pub width: f32,
    /// Strip height.
    pub height: f32,
}

/// Caches the measured viewport and derives per-slide geometry from it.
#[derive(Debug, Clone)]
pub struct GeometryTracker {
    axis: Axis,
    direction: LayoutDirection,
    viewport: Option<LayoutRect>,
}

impl GeometryTracker {
    /// Create an unmeasured tracker.
    pub fn new(axis: Axis, direction: LayoutDirection) -> Self {
        Self {
            axis,
            direction,
            viewport: None,
        }
    }

    /// The configured axis.
    #[inline]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// The configured layout direction.
    #[inline]
    pub fn direction(&self) -> LayoutDirection {
        self.direction
    }

    /// Sign used for all resting-offset and swipe-direction math.
    #[inline]
    pub fn sign(&self) -> f32 {
        direction_sign(self.axis, self.direction)
    }

    /// Record a layout measurement.
    ///
    /// Returns `true` if the rect was accepted. Zero-sized or non-finite
    /// rects are ignored and leave the previous measurement in place.
    pub fn on_layout(&mut self, rect: LayoutRect) -> bool {
        if !rect.is_measurable() {
            if rect.width.is_finite() && rect.height.is_finite() {
                tracing::trace!(target: targets::GEOMETRY, ?rect, "ignoring empty layout");
            } else {
                tracing::warn!(target: targets::GEOMETRY, ?rect, "ignoring non-finite layout");
            }
            return false;
        }
        tracing::debug!(target: targets::GEOMETRY, ?rect, "viewport measured");
        self.viewport = Some(rect);
        true
    }

    /// The last accepted measurement, if any.
    #[inline]
    pub fn viewport(&self) -> Option<LayoutRect> {
        self.viewport
    }

    /// Whether a usable measurement is available.
    #[inline]
    pub fn is_measured(&self) -> bool {
        self.viewport.is_some()
    }

    /// Viewport size along the configured axis.
    pub fn extent(&self) -> Option<f32> {
        self.viewport.map(|rect| rect.extent(self.axis))
    }

    /// Resting offset (anchor) of the slide at `index`.
    pub fn resting_offset(&self, index: usize) -> Option<Offset> {
        self.extent()
            .map(|extent| Offset::along(self.axis, self.sign() * extent * index as f32))
    }

    /// Size of a strip holding `count` slides.
    pub fn strip_size(&self, count: usize) -> Option<StripSize> {
        self.viewport.map(|rect| match self.axis {
            Axis::Horizontal => StripSize {
                width: rect.width * count as f32,
                height: rect.height,
            },
            Axis::Vertical => StripSize {
                width: rect.width,
                height: rect.height * count as f32,
            },
        })
    }

    /// Rect of the slide at `index` in strip coordinates.
    pub fn slide_rect(&self, index: usize) -> Option<LayoutRect> {
        self.viewport.map(|rect| {
            let position = rect.extent(self.axis) * index as f32;
            match self.axis {
                Axis::Horizontal => LayoutRect::new(position, 0.0, rect.width, rect.height),
                Axis::Vertical => LayoutRect::new(0.0, position, rect.width, rect.height),
            }
        })
    }
}
