use crate::{Ray, Vec3};

/// Axis-Aligned Bounding Box for spatial acceleration structures (BVH).
///
/// Defined by its `min` and `max` corners with `min[i] <= max[i]` on every
/// axis. A zero-volume box (`min == max`) is the "empty" sentinel: it is what
/// [`Aabb::default`] returns, and it is ignored by [`Aabb::union`].
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from its corners.
    ///
    /// # Panics
    ///
    /// Panics if `min` exceeds `max` on any axis (or either corner is NaN).
    pub fn new(min: Vec3, max: Vec3) -> Self {
        assert!(
            min.x <= max.x && min.y <= max.y && min.z <= max.z,
            "invalid bounding box: min {min:?} exceeds max {max:?}"
        );
        Self { min, max }
    }

    /// The empty sentinel box.
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::ZERO,
        max: Vec3::ZERO,
    };

    /// A box containing all of space.
    pub const UNIVERSE: Aabb = Aabb {
        min: Vec3::NEG_INFINITY,
        max: Vec3::INFINITY,
    };

    /// Create an AABB from two arbitrary corner points.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self::new(a.min(b), a.max(b))
    }

    /// Is this the zero-volume "empty" sentinel?
    pub fn is_empty(&self) -> bool {
        self.min == self.max
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn union(a: &Aabb, b: &Aabb) -> Aabb {
        if a.is_empty() {
            return *b;
        }
        if b.is_empty() {
            return *a;
        }
        Self::new(a.min.min(b.min), a.max.max(b.max))
    }

    /// Grow this box in place so that it also surrounds `other`.
    pub fn expand(&mut self, other: &Aabb) {
        *self = Self::union(self, other);
    }

    /// Is `other` contained completely within this box?
    pub fn engulfs(&self, other: &Aabb) -> bool {
        if other.is_empty() {
            return true;
        }
        self.min.cmple(other.min).all() && self.max.cmpge(other.max).all()
    }

    /// Returns the index (0=X, 1=Y, 2=Z) of the axis with the longest extent.
    pub fn longest_axis(&self) -> usize {
        let size = self.max - self.min;

        if size.x > size.y && size.x > size.z {
            0
        } else if size.y > size.z {
            1
        } else {
            2
        }
    }

    /// Slab test against a ray, looking no further than `max_dist`.
    ///
    /// Returns the ray parameter at which the box is entered (negative when
    /// the origin is inside the box), or `None` on a miss. A ray parallel to
    /// a slab hits only if its origin lies within that slab, faces included.
    pub fn intersects(&self, ray: &Ray, max_dist: f32) -> Option<f32> {
        let mut tmin = f32::NEG_INFINITY;
        let mut tmax = f32::INFINITY;

        for axis in 0..3 {
            if ray.direction[axis] == 0.0 {
                let o = ray.origin[axis];
                if o < self.min[axis] || o > self.max[axis] {
                    return None;
                }
                continue;
            }
            let inv = ray.inv_direction[axis];
            let t0 = (self.min[axis] - ray.origin[axis]) * inv;
            let t1 = (self.max[axis] - ray.origin[axis]) * inv;
            tmin = tmin.max(t0.min(t1));
            tmax = tmax.min(t0.max(t1));
        }

        if tmax < 0.0 || tmin > tmax || tmin > max_dist {
            return None;
        }

        Some(tmin)
    }
}
