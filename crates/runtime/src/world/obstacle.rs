use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned static obstacle. Blocks projectiles and clips beams.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl Wall {
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            half_extents: half_extents.abs(),
        }
    }

    /// Entry distance of the ray into the box, if within `max` (slab test).
    ///
    /// A ray starting inside the wall reports 0.
    pub fn ray_distance(&self, origin: Vec3, direction: Vec3, max: f32) -> Option<f32> {
        let lo = self.center - self.half_extents;
        let hi = self.center + self.half_extents;
        let mut near = 0.0_f32;
        let mut far = max;

        for axis in 0..3 {
            let o = origin[axis];
            let d = direction[axis];
            if d.abs() <= f32::EPSILON {
                if o < lo[axis] || o > hi[axis] {
                    return None;
                }
                continue;
            }
            let inv = d.recip();
            let (mut t0, mut t1) = ((lo[axis] - o) * inv, (hi[axis] - o) * inv);
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            near = near.max(t0);
            far = far.min(t1);
            if near > far {
                return None;
            }
        }
        Some(near)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ray_hits_front_face() {
        let wall = Wall::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(2.0, 2.0, 0.5));
        let hit = wall.ray_distance(Vec3::ZERO, Vec3::Z, 10.0);
        assert_eq!(hit, Some(4.5));
    }

    #[test]
    fn ray_misses_beyond_max_or_aside() {
        let wall = Wall::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(2.0, 2.0, 0.5));
        assert_eq!(wall.ray_distance(Vec3::ZERO, Vec3::Z, 3.0), None);
        assert_eq!(wall.ray_distance(Vec3::new(3.0, 0.0, 0.0), Vec3::Z, 10.0), None);
        assert_eq!(wall.ray_distance(Vec3::ZERO, -Vec3::Z, 10.0), None);
    }
}
