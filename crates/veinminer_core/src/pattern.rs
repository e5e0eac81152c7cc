//! # Mining Patterns
//!
//! A pattern is a fixed list of neighbor offsets. The search expands each
//! admitted block by this list, so the pattern decides what "connected"
//! means.
//!
//! Offsets are enumerated in lexicographic `(dx, dy, dz)` order from `-r` to
//! `r`, which keeps discovery order reproducible.
//!
//! A list longer than [`MAX_OFFSETS`] keeps only whole distance shells, the
//! nearest first, so the kept set stays symmetric around the origin.

use serde::{Deserialize, Serialize};

/// Hard cap on the number of offsets any pattern produces.
pub const MAX_OFFSETS: usize = 512;

/// Largest accepted cube/sphere radius.
pub const MAX_RADIUS: u8 = 6;

/// Largest accepted vertical/horizontal range.
pub const MAX_RANGE: u8 = 16;

/// Shape of the neighborhood.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "shape")]
pub enum PatternShape {
    /// Face neighbors, plus edges and corners with diagonals.
    Adjacent,
    /// Every offset with Chebyshev distance <= radius.
    Cube {
        /// Radius in blocks.
        radius: u8,
    },
    /// Every offset with Euclidean distance <= radius.
    Sphere {
        /// Radius in blocks.
        radius: u8,
    },
    /// Same column, up to `range` above and below.
    Vertical {
        /// Range in blocks.
        range: u8,
    },
    /// Same horizontal plane, up to `range` away.
    Horizontal {
        /// Range in blocks.
        range: u8,
    },
}

/// A neighborhood shape plus the diagonal toggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiningPattern {
    /// Neighborhood shape.
    pub shape: PatternShape,
    /// Include diagonal neighbors for `Adjacent` and `Horizontal`.
    pub include_diagonals: bool,
}

impl Default for MiningPattern {
    fn default() -> Self {
        Self::adjacent(true)
    }
}

impl MiningPattern {
    /// `Adjacent` pattern.
    #[must_use]
    pub const fn adjacent(include_diagonals: bool) -> Self {
        Self { shape: PatternShape::Adjacent, include_diagonals }
    }

    /// `Cube` pattern.
    #[must_use]
    pub const fn cube(radius: u8) -> Self {
        Self { shape: PatternShape::Cube { radius }, include_diagonals: true }
    }

    /// `Sphere` pattern.
    #[must_use]
    pub const fn sphere(radius: u8) -> Self {
        Self { shape: PatternShape::Sphere { radius }, include_diagonals: true }
    }

    /// `Vertical` pattern.
    #[must_use]
    pub const fn vertical(range: u8) -> Self {
        Self { shape: PatternShape::Vertical { range }, include_diagonals: false }
    }

    /// `Horizontal` pattern.
    #[must_use]
    pub const fn horizontal(range: u8, include_diagonals: bool) -> Self {
        Self { shape: PatternShape::Horizontal { range }, include_diagonals }
    }

    /// Produces the neighbor offsets for this pattern.
    ///
    /// Never contains `(0, 0, 0)` and never exceeds [`MAX_OFFSETS`]. If the
    /// shape is larger, offsets are dropped by squared distance, whole shells
    /// at a time, farthest first.
    #[must_use]
    pub fn offsets(&self) -> Vec<(i32, i32, i32)> {
        let mut out = self.offsets_uncapped();
        if out.len() > MAX_OFFSETS {
            let mut dist: Vec<i32> = out.iter().map(|&(x, y, z)| dist_sq(x, y, z)).collect();
            dist.sort_unstable();
            // First shell that does not fit whole, dropped with everything beyond it
            let cut = dist[MAX_OFFSETS];
            out.retain(|&(x, y, z)| dist_sq(x, y, z) < cut);
        }
        out
    }

    /// Every offset of the shape in lexicographic order.
    fn offsets_uncapped(&self) -> Vec<(i32, i32, i32)> {
        let diag = self.include_diagonals;
        let mut out = Vec::new();

        match self.shape {
            PatternShape::Adjacent => {
                cube_walk(1, |dx, dy, dz| {
                    if diag || manhattan(dx, dy, dz) == 1 {
                        out.push((dx, dy, dz));
                    }
                });
            }
            PatternShape::Cube { radius } => {
                cube_walk(i32::from(radius), |dx, dy, dz| out.push((dx, dy, dz)));
            }
            PatternShape::Sphere { radius } => {
                let r = i32::from(radius);
                let r_sq = r * r;
                cube_walk(r, |dx, dy, dz| {
                    if dist_sq(dx, dy, dz) <= r_sq {
                        out.push((dx, dy, dz));
                    }
                });
            }
            PatternShape::Vertical { range } => {
                let r = i32::from(range);
                out.extend((-r..=r).filter(|&dy| dy != 0).map(|dy| (0, dy, 0)));
            }
            PatternShape::Horizontal { range } => {
                let r = i32::from(range);
                for dx in -r..=r {
                    for dz in -r..=r {
                        if dx == 0 && dz == 0 {
                            continue;
                        }
                        if diag || dx.abs() + dz.abs() == 1 {
                            out.push((dx, 0, dz));
                        }
                    }
                }
            }
        }

        out
    }

    /// Returns the pattern with radius and range clamped to accepted bounds.
    #[must_use]
    pub fn clamped(self) -> Self {
        let shape = match self.shape {
            PatternShape::Adjacent => PatternShape::Adjacent,
            PatternShape::Cube { radius } => PatternShape::Cube { radius: radius.clamp(1, MAX_RADIUS) },
            PatternShape::Sphere { radius } => PatternShape::Sphere { radius: radius.clamp(1, MAX_RADIUS) },
            PatternShape::Vertical { range } => PatternShape::Vertical { range: range.clamp(1, MAX_RANGE) },
            PatternShape::Horizontal { range } => {
                PatternShape::Horizontal { range: range.clamp(1, MAX_RANGE) }
            }
        };
        Self { shape, ..self }
    }
}

#[inline]
fn dist_sq(dx: i32, dy: i32, dz: i32) -> i32 {
    dx * dx + dy * dy + dz * dz
}

#[inline]
fn manhattan(dx: i32, dy: i32, dz: i32) -> i32 {
    dx.abs() + dy.abs() + dz.abs()
}

/// Visits every non-zero offset of the `(2r+1)^3` cube in lexicographic order.
fn cube_walk(r: i32, mut visit: impl FnMut(i32, i32, i32)) {
    for dx in -r..=r {
        for dy in -r..=r {
            for dz in -r..=r {
                if dx != 0 || dy != 0 || dz != 0 {
                    visit(dx, dy, dz);
                }
            }
        }
    }
}
