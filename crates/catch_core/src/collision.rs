//! Axis-aligned bounding-box overlap test.
//!
//! Boxes are described by their origin (`position`) and `size`. The test
//! compares centre-to-centre distance against combined half extents on each
//! axis; touching edges do not count as overlap. A box with a non-positive
//! extent on either axis never overlaps anything, itself included.

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub position: Vec2,
    pub size: Vec2,
}

/// Anything that can report its collision box.
pub trait Bounded {
    fn bounds(&self) -> Aabb;
}

impl Aabb {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self { position, size }
    }

    pub fn half_extents(&self) -> Vec2 {
        self.size * 0.5
    }

    pub fn center(&self) -> Vec2 {
        self.position + self.half_extents()
    }

    pub fn is_empty(&self) -> bool {
        !(self.size.x > 0.0 && self.size.y > 0.0)
    }

    pub fn overlaps(&self, other: &Aabb) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        let delta = (self.center() - other.center()).abs();
        let combined = self.half_extents() + other.half_extents();
        delta.x < combined.x && delta.y < combined.y
    }
}

impl Bounded for Aabb {
    fn bounds(&self) -> Aabb {
        *self
    }
}

pub fn overlaps(a: &impl Bounded, b: &impl Bounded) -> bool {
    a.bounds().overlaps(&b.bounds())
}
