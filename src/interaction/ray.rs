//! Rays and ray/drawable intersection.

use glam::Vec3;

/// A ray defined by origin and (normalized) direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point along the ray at parameter t.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// A single intersection with one drawable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub distance: f32,
    pub point: Vec3,
    /// Instance index for instanced drawables.
    pub instance: Option<usize>,
}

/// Identifies a drawable in the scene's interactive set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DrawableId(pub u32);

/// Anything that can be hit-tested.
pub trait Raycast {
    /// Every intersection, nearest first.
    fn raycast(&self, ray: &Ray) -> Vec<Hit>;
}

/// Intersect `ray` with every drawable and merge the hits by distance.
pub fn intersect_objects(
    ray: &Ray,
    objects: &[(DrawableId, &dyn Raycast)],
) -> Vec<(DrawableId, Hit)> {
    let mut hits: Vec<(DrawableId, Hit)> = objects
        .iter()
        .flat_map(|(id, object)| object.raycast(ray).into_iter().map(move |hit| (*id, hit)))
        .collect();
    hits.sort_by(|a, b| a.1.distance.total_cmp(&b.1.distance));
    hits
}

/// Upright hexagonal prism: the tile shape. The base sits on y = 0 and the
/// top face on y = height. One hexagon vertex points along +X.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HexPrism {
    /// Distance from the centre to the edge midpoints.
    apothem: f32,
    height: f32,
    /// Outward edge normals of three opposing edge pairs, in the XZ plane.
    normals: [Vec3; 3],
}

impl HexPrism {
    pub fn new(circumradius: f32, height: f32) -> Self {
        let normal = |deg: f32| {
            let rad = deg.to_radians();
            Vec3::new(rad.cos(), 0.0, rad.sin())
        };
        HexPrism {
            apothem: circumradius * 3.0_f32.sqrt() / 2.0,
            height: height.max(0.0),
            normals: [normal(30.0), normal(90.0), normal(150.0)],
        }
    }

    /// Entry distance of `ray` into the prism centred at `center`, using the
    /// slab method over the vertical span and the three edge pairs.
    /// A ray starting inside reports distance 0.
    pub fn intersect(&self, ray: &Ray, center: Vec3) -> Option<f32> {
        let local = ray.origin - center;
        let mut t_near = f32::NEG_INFINITY;
        let mut t_far = f32::INFINITY;

        let mut slab = |origin: f32, dir: f32, min: f32, max: f32| -> bool {
            if dir.abs() < 1e-8 {
                return origin >= min && origin <= max;
            }
            let t1 = (min - origin) / dir;
            let t2 = (max - origin) / dir;
            t_near = t_near.max(t1.min(t2));
            t_far = t_far.min(t1.max(t2));
            t_near <= t_far
        };

        if !slab(local.y, ray.direction.y, 0.0, self.height) {
            return None;
        }
        for n in &self.normals {
            if !slab(local.dot(*n), ray.direction.dot(*n), -self.apothem, self.apothem) {
                return None;
            }
        }

        if t_far < 0.0 {
            return None;
        }
        Some(t_near.max(0.0))
    }
}
