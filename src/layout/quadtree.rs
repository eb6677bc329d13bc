use eframe::egui::{Vec2, vec2};

const LEAF_CAPACITY: usize = 8;
const MAX_DEPTH: usize = 12;

#[derive(Clone, Copy)]
struct QuadBounds {
    center: Vec2,
    half_extent: f32,
}

impl QuadBounds {
    fn from_points(points: &[Vec2]) -> Option<Self> {
        let mut min = vec2(f32::INFINITY, f32::INFINITY);
        let mut max = vec2(f32::NEG_INFINITY, f32::NEG_INFINITY);
        for point in points {
            min = min.min(*point);
            max = max.max(*point);
        }

        if !min.x.is_finite() || !min.y.is_finite() || !max.x.is_finite() || !max.y.is_finite() {
            return None;
        }

        let span = (max - min).max(Vec2::splat(1.0));
        Some(Self {
            center: (min + max) * 0.5,
            half_extent: span.max_elem() * 0.5 + 1.0,
        })
    }

    fn contains(self, point: Vec2) -> bool {
        let offset = point - self.center;
        offset.x.abs() <= self.half_extent && offset.y.abs() <= self.half_extent
    }

    fn child(self, quadrant: usize) -> Self {
        let quarter = self.half_extent * 0.5;
        let offset = match quadrant {
            0 => vec2(-quarter, -quarter),
            1 => vec2(quarter, -quarter),
            2 => vec2(-quarter, quarter),
            _ => vec2(quarter, quarter),
        };
        Self {
            center: self.center + offset,
            half_extent: quarter,
        }
    }

    fn quadrant_for(self, point: Vec2) -> usize {
        match (point.x >= self.center.x, point.y >= self.center.y) {
            (false, false) => 0,
            (true, false) => 1,
            (false, true) => 2,
            (true, true) => 3,
        }
    }
}

pub(super) struct QuadNode {
    bounds: QuadBounds,
    center_of_mass: Vec2,
    mass: f32,
    indices: Vec<usize>,
    children: [Option<Box<QuadNode>>; 4],
}

impl QuadNode {
    pub(super) fn build(positions: &[Vec2]) -> Option<Self> {
        let bounds = QuadBounds::from_points(positions)?;
        let indices = (0..positions.len()).collect::<Vec<_>>();
        Some(Self::build_node(bounds, indices, positions, 0))
    }

    fn build_node(bounds: QuadBounds, indices: Vec<usize>, positions: &[Vec2], depth: usize) -> Self {
        let mass = indices.len() as f32;
        let mut center_of_mass = indices
            .iter()
            .fold(Vec2::ZERO, |sum, &index| sum + positions[index]);
        if mass > 0.0 {
            center_of_mass /= mass;
        }

        let mut node = Self {
            bounds,
            center_of_mass,
            mass,
            indices,
            children: std::array::from_fn(|_| None),
        };

        if depth >= MAX_DEPTH || node.indices.len() <= LEAF_CAPACITY {
            return node;
        }

        let mut buckets = std::array::from_fn::<_, 4, _>(|_| Vec::new());
        for &index in &node.indices {
            buckets[bounds.quadrant_for(positions[index])].push(index);
        }
        if buckets.iter().filter(|bucket| !bucket.is_empty()).count() <= 1 {
            return node;
        }

        for (quadrant, bucket) in buckets.into_iter().enumerate() {
            if !bucket.is_empty() {
                node.children[quadrant] = Some(Box::new(Self::build_node(
                    bounds.child(quadrant),
                    bucket,
                    positions,
                    depth + 1,
                )));
            }
        }
        node.indices.clear();
        node
    }

    fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    pub(super) fn repulsion_on(
        &self,
        index: usize,
        positions: &[Vec2],
        theta: f32,
        pair_force: &impl Fn(Vec2) -> Vec2,
    ) -> Vec2 {
        let point = positions[index];

        if self.is_leaf() {
            return self
                .indices
                .iter()
                .filter(|&&other| other != index)
                .fold(Vec2::ZERO, |sum, &other| sum + pair_force(point - positions[other]));
        }

        let distance = (point - self.center_of_mass).length().max(0.5);
        if !self.bounds.contains(point) && self.bounds.half_extent * 2.0 / distance < theta {
            return pair_force(point - self.center_of_mass) * self.mass;
        }

        self.children
            .iter()
            .flatten()
            .fold(Vec2::ZERO, |sum, child| {
                sum + child.repulsion_on(index, positions, theta, pair_force)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scattered(count: usize) -> Vec<Vec2> {
        (0..count)
            .map(|index| {
                let (x, y) = crate::util::stable_pair(&format!("node-{index}"));
                vec2(x, y) * 500.0
            })
            .collect()
    }

    fn inverse_distance(delta: Vec2) -> Vec2 {
        let distance = delta.length().max(0.5);
        delta / distance * (100.0 / distance)
    }

    fn direct(index: usize, positions: &[Vec2]) -> Vec2 {
        (0..positions.len())
            .filter(|&other| other != index)
            .fold(Vec2::ZERO, |sum, other| {
                sum + inverse_distance(positions[index] - positions[other])
            })
    }

    #[test]
    fn zero_theta_matches_the_direct_sum() {
        let positions = scattered(120);
        let tree = QuadNode::build(&positions).unwrap();
        assert_eq!(tree.mass, 120.0);

        for index in [0, 17, 119] {
            let expected = direct(index, &positions);
            let actual = tree.repulsion_on(index, &positions, 0.0, &inverse_distance);
            assert!((expected - actual).length() <= expected.length() * 1e-3 + 1e-3);
        }
    }

    #[test]
    fn approximation_stays_close() {
        let positions = scattered(400);
        let tree = QuadNode::build(&positions).unwrap();

        for index in [3, 200, 399] {
            let magnitude_sum = (0..positions.len())
                .filter(|&other| other != index)
                .map(|other| inverse_distance(positions[index] - positions[other]).length())
                .sum::<f32>();
            let expected = direct(index, &positions);
            let actual = tree.repulsion_on(index, &positions, 0.7, &inverse_distance);
            assert!((expected - actual).length() <= magnitude_sum * 0.05);
        }
    }

    #[test]
    fn empty_positions_build_no_tree() {
        assert!(QuadNode::build(&[]).is_none());
    }
}
