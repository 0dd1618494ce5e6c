//! Infinite 2D line with orientation (side-of-line) queries.
//!
//! A [`Line`] is either vertical (`x = c`) or sloped (`y = m·x + c`). Besides
//! its equation it keeps two reference points, `top` and `bottom`, ordered so
//! that `top.y >= bottom.y` (for horizontal lines, where both share `y`, `top`
//! is the point with the larger `x`). The direction `bottom -> top` orients the
//! line, which is what gives "left" and "right" a meaning in [`Line::side_of`].

use super::{approx_eq, is_finite, Point2D};
use crate::constants::{EPSILON, REFERENCE_POINT_OFFSET};
use crate::{Error, Result};

/// Position of a point relative to an oriented line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Positive signed area: counter-clockwise of `bottom -> top`
    Left,
    /// Negative (or zero, off-tolerance) signed area
    Right,
    /// Within [`EPSILON`] of the line
    OnLine,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Kind {
    Vertical { x: f64 },
    Sloped { slope: f64, intercept: f64 },
}

/// Immutable infinite line in the plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    kind: Kind,
    top: Point2D,
    bottom: Point2D,
}

/// Signed area of the parallelogram spanned by `p1 -> p2` and `p2 -> p3`
fn signed_area(p1: &Point2D, p2: &Point2D, p3: &Point2D) -> f64 {
    (p2 - p1).perp(&(p3 - p2))
}

/// Order two points on a line into `(top, bottom)`
fn ordered(p: Point2D, q: Point2D) -> (Point2D, Point2D) {
    if (p.y - q.y).abs() < EPSILON {
        if p.x >= q.x {
            (p, q)
        } else {
            (q, p)
        }
    } else if p.y > q.y {
        (p, q)
    } else {
        (q, p)
    }
}

impl Line {
    /// Line through two points.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DegenerateInput`] if the points coincide or are not finite.
    pub fn new(a: Point2D, b: Point2D) -> Result<Self> {
        if !is_finite(&a) || !is_finite(&b) {
            return Err(Error::DegenerateInput(format!(
                "non-finite line point ({}, {}) -> ({}, {})",
                a.x, a.y, b.x, b.y
            )));
        }
        if approx_eq(&a, &b, EPSILON) {
            return Err(Error::DegenerateInput(format!(
                "line points coincide at ({:.3}, {:.3})",
                a.x, a.y
            )));
        }

        let kind = if (a.x - b.x).abs() < EPSILON {
            Kind::Vertical { x: a.x }
        } else {
            let slope = (b.y - a.y) / (b.x - a.x);
            Kind::Sloped {
                slope,
                intercept: a.y - slope * a.x,
            }
        };
        let (top, bottom) = ordered(a, b);

        Ok(Self { kind, top, bottom })
    }

    /// Line of the given kind through `p`, with a derived second reference point
    fn anchored(kind: Kind, p: Point2D) -> Self {
        let second = match kind {
            Kind::Vertical { .. } => Point2D::new(p.x, p.y - REFERENCE_POINT_OFFSET),
            Kind::Sloped { slope, .. } if slope.abs() < EPSILON => {
                Point2D::new(p.x - REFERENCE_POINT_OFFSET, p.y)
            }
            Kind::Sloped { slope, intercept } => {
                let y = p.y - REFERENCE_POINT_OFFSET;
                Point2D::new((y - intercept) / slope, y)
            }
        };
        let (top, bottom) = ordered(p, second);
        Self { kind, top, bottom }
    }

    /// Line with the same direction passing through `p`
    #[must_use]
    pub fn parallel_through(&self, p: Point2D) -> Self {
        let kind = match self.kind {
            Kind::Vertical { .. } => Kind::Vertical { x: p.x },
            Kind::Sloped { slope, .. } => Kind::Sloped {
                slope,
                intercept: p.y - slope * p.x,
            },
        };
        Self::anchored(kind, p)
    }

    /// Line orthogonal to this one passing through `p`
    #[must_use]
    pub fn perpendicular_through(&self, p: Point2D) -> Self {
        let kind = match self.kind {
            Kind::Vertical { .. } => Kind::Sloped {
                slope: 0.0,
                intercept: p.y,
            },
            Kind::Sloped { slope, .. } if slope.abs() < EPSILON => Kind::Vertical { x: p.x },
            Kind::Sloped { slope, .. } => {
                let slope = -1.0 / slope;
                Kind::Sloped {
                    slope,
                    intercept: p.y - slope * p.x,
                }
            }
        };
        Self::anchored(kind, p)
    }

    /// X coordinate of the line at height `y`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAxisQuery`] on a horizontal line.
    pub fn x_at(&self, y: f64) -> Result<f64> {
        match self.kind {
            Kind::Vertical { x } => Ok(x),
            Kind::Sloped { slope, intercept } if slope.abs() < EPSILON => Err(Error::InvalidAxisQuery(
                format!("x requested at y = {y} on horizontal line y = {intercept}"),
            )),
            Kind::Sloped { slope, intercept } => Ok((y - intercept) / slope),
        }
    }

    /// Y coordinate of the line at `x`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAxisQuery`] on a vertical line.
    pub fn y_at(&self, x: f64) -> Result<f64> {
        match self.kind {
            Kind::Vertical { x: c } => Err(Error::InvalidAxisQuery(format!(
                "y requested at x = {x} on vertical line x = {c}"
            ))),
            Kind::Sloped { slope, intercept } => Ok(slope * x + intercept),
        }
    }

    /// Distance to the line measured along the axis the line can answer for
    fn axis_residual(&self, p: &Point2D) -> f64 {
        match self.kind {
            Kind::Vertical { x } => x - p.x,
            Kind::Sloped { slope, intercept } if slope.abs() < EPSILON => {
                slope * p.x + intercept - p.y
            }
            Kind::Sloped { slope, intercept } => (p.y - intercept) / slope - p.x,
        }
    }

    /// Side of the oriented line the point lies on.
    ///
    /// `OnLine` is decided first, so a point within tolerance of the line is
    /// never reported as left or right.
    #[must_use]
    pub fn side_of(&self, p: &Point2D) -> Side {
        if self.axis_residual(p).abs() < EPSILON {
            return Side::OnLine;
        }
        if signed_area(&self.bottom, &self.top, p) > 0.0 {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Slope `m`, or `None` for a vertical line
    #[must_use]
    pub fn slope(&self) -> Option<f64> {
        match self.kind {
            Kind::Vertical { .. } => None,
            Kind::Sloped { slope, .. } => Some(slope),
        }
    }

    #[must_use]
    pub fn is_vertical(&self) -> bool {
        matches!(self.kind, Kind::Vertical { .. })
    }

    #[must_use]
    pub fn is_horizontal(&self) -> bool {
        matches!(self.kind, Kind::Sloped { slope, .. } if slope.abs() < EPSILON)
    }

    /// Upper reference point (larger `y`)
    #[must_use]
    pub fn top(&self) -> Point2D {
        self.top
    }

    /// Lower reference point
    #[must_use]
    pub fn bottom(&self) -> Point2D {
        self.bottom
    }
}
