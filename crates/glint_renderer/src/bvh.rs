//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! Nodes live in a flat arena and refer to each other and to scene surfaces
//! by index. Both construction and traversal run off explicit work-stacks,
//! so deep or unbalanced trees cannot overflow the call stack.

use glint_math::{Aabb, Ray};

use crate::hittable::{Hittable, Intersection};
use crate::scene::{Scene, SurfaceId};

/// Default maximum number of surfaces per leaf.
pub const DEFAULT_LEAF_SIZE: usize = 4;

/// Index of the root node in the arena.
const ROOT: usize = 0;

/// BVH node - either a branch with two children or a leaf with surfaces.
#[derive(Debug, Clone)]
pub enum BvhNode {
    /// Internal node; `bbox` is the union of both children's boxes.
    Branch { bbox: Aabb, left: usize, right: usize },
    /// Leaf node; `bbox` is the union of its surfaces' boxes.
    Leaf { bbox: Aabb, surfaces: Vec<SurfaceId> },
}

impl BvhNode {
    #[inline]
    pub fn bbox(&self) -> &Aabb {
        match self {
            BvhNode::Branch { bbox, .. } | BvhNode::Leaf { bbox, .. } => bbox,
        }
    }
}

/// Binary BVH over the surfaces of a [`Scene`].
///
/// Immutable once built; queries take `&self` and can run from any number
/// of threads.
#[derive(Debug, Clone, Default)]
pub struct Bvh {
    nodes: Vec<BvhNode>,
}

impl Bvh {
    /// Build a BVH over every surface in `scene`.
    ///
    /// Nodes holding more than `leaf_size` surfaces are split at the mean
    /// surface position along the longest axis of their box. A split that
    /// would leave one side empty ends the subdivision instead.
    pub fn build(scene: &Scene, leaf_size: usize) -> Self {
        let leaf_size = leaf_size.max(1);
        let all: Vec<SurfaceId> = scene.surface_ids().collect();
        if all.is_empty() {
            return Self::default();
        }

        let mut nodes = vec![leaf(scene, all)];
        let mut work = vec![ROOT];

        while let Some(index) = work.pop() {
            let BvhNode::Leaf { bbox, surfaces } = &nodes[index] else {
                continue;
            };
            if surfaces.len() <= leaf_size {
                continue;
            }

            let axis = bbox.longest_axis();
            let mean = surfaces
                .iter()
                .map(|&id| scene.surface(id).position()[axis])
                .sum::<f32>()
                / surfaces.len() as f32;

            let (left, right): (Vec<SurfaceId>, Vec<SurfaceId>) = surfaces
                .iter()
                .copied()
                .partition(|&id| scene.surface(id).position()[axis] < mean);
            if left.is_empty() || right.is_empty() {
                continue;
            }

            let bbox = *bbox;
            let left_index = nodes.len();
            let right_index = left_index + 1;
            nodes.push(leaf(scene, left));
            nodes.push(leaf(scene, right));
            nodes[index] = BvhNode::Branch {
                bbox,
                left: left_index,
                right: right_index,
            };

            work.push(left_index);
            work.push(right_index);
        }

        let bvh = Self { nodes };
        log::debug!(
            "BVH built: {} nodes, {} leaves, depth {}",
            bvh.node_count(),
            bvh.leaf_count(),
            bvh.depth()
        );
        bvh
    }

    /// Nearest surface hit by `ray` within `max_dist`.
    pub fn intersect<'s>(
        &self,
        scene: &'s Scene,
        ray: &Ray,
        max_dist: f32,
    ) -> Option<Intersection<'s>> {
        let root = self.nodes.first()?;
        let t_root = root.bbox().intersects(ray, max_dist)?;

        let mut closest = None;
        let mut budget = max_dist;
        let mut stack = Vec::with_capacity(64);
        stack.push((ROOT, t_root));

        while let Some((index, t_enter)) = stack.pop() {
            if t_enter > budget {
                continue;
            }

            match &self.nodes[index] {
                BvhNode::Leaf { surfaces, .. } => {
                    for &id in surfaces {
                        let surface = scene.surface(id);
                        if let Some(hit) = surface.intersect(ray, budget) {
                            budget = hit.t;
                            closest = Some(Intersection { hit, surface });
                        }
                    }
                }
                BvhNode::Branch { left, right, .. } => {
                    self.push_children(&mut stack, ray, budget, *left, *right);
                }
            }
        }

        closest
    }

    /// Is anything hit by `ray` closer than `max_dist`?
    ///
    /// Stops at the first hit found; used for shadow rays.
    pub fn occluded(&self, scene: &Scene, ray: &Ray, max_dist: f32) -> bool {
        let Some(root) = self.nodes.first() else {
            return false;
        };
        let Some(t_root) = root.bbox().intersects(ray, max_dist) else {
            return false;
        };

        let mut stack = Vec::with_capacity(64);
        stack.push((ROOT, t_root));

        while let Some((index, _)) = stack.pop() {
            match &self.nodes[index] {
                BvhNode::Leaf { surfaces, .. } => {
                    let blocked = surfaces.iter().any(|&id| {
                        scene
                            .surface(id)
                            .intersect(ray, max_dist)
                            .is_some_and(|hit| hit.t < max_dist)
                    });
                    if blocked {
                        return true;
                    }
                }
                BvhNode::Branch { left, right, .. } => {
                    self.push_children(&mut stack, ray, max_dist, *left, *right);
                }
            }
        }

        false
    }

    /// Push the children whose boxes `ray` enters, nearer child last so it
    /// is visited first.
    #[inline]
    fn push_children(
        &self,
        stack: &mut Vec<(usize, f32)>,
        ray: &Ray,
        budget: f32,
        left: usize,
        right: usize,
    ) {
        let l = self.nodes[left].bbox().intersects(ray, budget);
        let r = self.nodes[right].bbox().intersects(ray, budget);

        match (l, r) {
            (Some(tl), Some(tr)) => {
                if tl <= tr {
                    stack.push((right, tr));
                    stack.push((left, tl));
                } else {
                    stack.push((left, tl));
                    stack.push((right, tr));
                }
            }
            (Some(tl), None) => stack.push((left, tl)),
            (None, Some(tr)) => stack.push((right, tr)),
            (None, None) => {}
        }
    }

    /// All nodes; the root is the first one.
    pub fn nodes(&self) -> &[BvhNode] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, BvhNode::Leaf { .. }))
            .count()
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        if self.nodes.is_empty() {
            return 0;
        }

        let mut deepest = 0;
        let mut stack = vec![(ROOT, 1)];
        while let Some((index, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            if let BvhNode::Branch { left, right, .. } = &self.nodes[index] {
                stack.push((*left, depth + 1));
                stack.push((*right, depth + 1));
            }
        }
        deepest
    }
}

fn leaf(scene: &Scene, surfaces: Vec<SurfaceId>) -> BvhNode {
    let bbox = surfaces.iter().fold(Aabb::EMPTY, |acc, &id| {
        Aabb::union(&acc, &scene.surface(id).bounding_box())
    });
    BvhNode::Leaf { bbox, surfaces }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Plane, Sphere, Triangle};
    use glint_core::{CameraSettings, Material};
    use glint_math::Vec3;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_scene(rng: &mut StdRng, count: usize) -> Scene {
        let mut scene = Scene::new(4, 4, CameraSettings::default());
        for _ in 0..count {
            let center = Vec3::new(
                rng.gen_range(-20.0..20.0),
                rng.gen_range(-20.0..20.0),
                rng.gen_range(-20.0..20.0),
            );
            let radius = rng.gen_range(0.2..1.5);
            scene.add_surface(Sphere::new(center, radius, Material::default()));
        }
        scene
    }

    fn random_ray(rng: &mut StdRng) -> Ray {
        let origin = Vec3::new(
            rng.gen_range(-25.0..25.0),
            rng.gen_range(-25.0..25.0),
            rng.gen_range(-25.0..25.0),
        );
        let target = Vec3::new(
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-10.0..10.0),
        );
        Ray::new(origin, target - origin)
    }

    /// Reference answer: test every surface.
    fn brute_force(scene: &Scene, ray: &Ray) -> Option<(SurfaceId, f32)> {
        scene
            .surface_ids()
            .filter_map(|id| scene.surface(id).intersect(ray, f32::INFINITY).map(|h| (id, h.t)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    #[test]
    fn test_bvh_empty() {
        let scene = Scene::new(4, 4, CameraSettings::default());
        let bvh = Bvh::build(&scene, DEFAULT_LEAF_SIZE);

        assert!(bvh.is_empty());
        assert_eq!(bvh.depth(), 0);
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert!(bvh.intersect(&scene, &ray, f32::INFINITY).is_none());
        assert!(!bvh.occluded(&scene, &ray, f32::INFINITY));
    }

    #[test]
    fn test_bvh_single_sphere() {
        let mut scene = Scene::new(4, 4, CameraSettings::default());
        scene.add_surface(Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, Material::default()));
        let bvh = Bvh::build(&scene, DEFAULT_LEAF_SIZE);

        // Should create a single leaf
        assert_eq!(bvh.node_count(), 1);
        assert!(matches!(bvh.nodes()[0], BvhNode::Leaf { .. }));

        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        let found = bvh.intersect(&scene, &ray, f32::INFINITY).unwrap();
        assert!((found.hit.t - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_bvh_multiple_spheres() {
        let mut scene = Scene::new(4, 4, CameraSettings::default());
        for i in 0..10 {
            scene.add_surface(Sphere::new(
                Vec3::new(i as f32, 0.0, -5.0),
                0.5,
                Material::default(),
            ));
        }
        let bvh = Bvh::build(&scene, 2);
        assert!(bvh.node_count() > 1);

        // Ray that hits the sphere at x=5
        let ray = Ray::new(Vec3::new(5.0, 0.0, 0.0), -Vec3::Z);
        let found = bvh.intersect(&scene, &ray, f32::INFINITY).unwrap();

        // Hit point should be near z = -4.5 (sphere at z=-5, radius 0.5)
        assert!((found.hit.point.z - (-4.5)).abs() < 0.01);
        assert_eq!(found.surface.position(), Vec3::new(5.0, 0.0, -5.0));
    }

    #[test]
    fn test_bvh_boxes_contain_descendants() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut scene = random_scene(&mut rng, 200);
        scene.add_surface(Plane::new(Vec3::new(0.0, -25.0, 0.0), Vec3::Y, Material::default()));
        scene.add_surface(Triangle::new(
            [Vec3::ZERO, Vec3::new(0.0, 3.0, 0.0), Vec3::new(3.0, 0.0, 1.0)],
            Material::default(),
        ));

        let bvh = Bvh::build(&scene, DEFAULT_LEAF_SIZE);
        assert!(bvh.leaf_count() > 1);

        let mut seen = 0;
        for node in bvh.nodes() {
            match node {
                BvhNode::Branch { bbox, left, right } => {
                    assert!(bbox.engulfs(bvh.nodes()[*left].bbox()));
                    assert!(bbox.engulfs(bvh.nodes()[*right].bbox()));
                }
                BvhNode::Leaf { bbox, surfaces } => {
                    assert!(!surfaces.is_empty());
                    for &id in surfaces {
                        assert!(bbox.engulfs(&scene.surface(id).bounding_box()));
                    }
                    seen += surfaces.len();
                }
            }
        }

        // Every surface lands in exactly one leaf
        assert_eq!(seen, scene.surfaces().len());
    }

    #[test]
    fn test_bvh_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(1234);
        let scene = random_scene(&mut rng, 150);
        let bvh = Bvh::build(&scene, DEFAULT_LEAF_SIZE);

        let mut hits = 0;
        for _ in 0..500 {
            let ray = random_ray(&mut rng);
            let expected = brute_force(&scene, &ray);
            let found = bvh.intersect(&scene, &ray, f32::INFINITY);

            match (expected, found) {
                (None, None) => {}
                (Some((_, t)), Some(found)) => {
                    assert!((found.hit.t - t).abs() < 1e-4);
                    hits += 1;
                }
                (e, f) => panic!("brute force {e:?} vs bvh {:?}", f.map(|f| f.hit)),
            }
        }
        assert!(hits > 0);
    }

    #[test]
    fn test_bvh_coincident_positions_terminate() {
        // All surfaces share one position: the mean split can't separate them
        let mut scene = Scene::new(4, 4, CameraSettings::default());
        for i in 1..=20 {
            scene.add_surface(Sphere::new(Vec3::ZERO, i as f32, Material::default()));
        }

        let bvh = Bvh::build(&scene, DEFAULT_LEAF_SIZE);
        assert_eq!(bvh.node_count(), 1);
        assert_eq!(bvh.depth(), 1);
    }

    #[test]
    fn test_bvh_tangent_ray_in_box_face() {
        let mut scene = Scene::new(4, 4, CameraSettings::default());
        scene.add_surface(Sphere::new(Vec3::ZERO, 1.0, Material::default()));
        let bvh = Bvh::build(&scene, DEFAULT_LEAF_SIZE);

        // Grazes the sphere at (1, 0, 0) while running along the box face x = 1
        let ray = Ray::new(Vec3::new(1.0, -5.0, 0.0), Vec3::Y);
        let (_, expected) = brute_force(&scene, &ray).unwrap();
        let found = bvh.intersect(&scene, &ray, f32::INFINITY).unwrap();
        assert!((found.hit.t - expected).abs() < 1e-5);
        assert!((expected - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_bvh_respects_max_dist() {
        let mut scene = Scene::new(4, 4, CameraSettings::default());
        scene.add_surface(Sphere::new(Vec3::new(0.0, 0.0, -10.0), 1.0, Material::default()));
        let bvh = Bvh::build(&scene, DEFAULT_LEAF_SIZE);

        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        assert!(bvh.intersect(&scene, &ray, 5.0).is_none());
        assert!(bvh.intersect(&scene, &ray, 20.0).is_some());

        assert!(!bvh.occluded(&scene, &ray, 5.0));
        assert!(bvh.occluded(&scene, &ray, 20.0));
    }
}
