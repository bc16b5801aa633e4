use super::{Edge, Vec2};

const ORIENTATION_EPSILON: f32 = 1e-6;

/// Turn direction of the path `a → b → c`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Orientation {
    Collinear,
    /// `c` lies on the right of `a → b`.
    Clockwise,
    /// `c` lies on the left of `a → b`.
    CounterClockwise,
}

/// Orientation test for three points in a +Y-up space.
pub fn three_point_orientation(a: Vec2, b: Vec2, c: Vec2) -> Orientation {
    let cross = (b - a).cross(c - a);
    if cross > ORIENTATION_EPSILON {
        Orientation::CounterClockwise
    } else if cross < -ORIENTATION_EPSILON {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

/// Closed polygon; the last vertex connects back to the first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    pub vertices: Vec<Vec2>,
}

impl Polygon {
    #[inline]
    pub fn new(vertices: Vec<Vec2>) -> Self {
        Self { vertices }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Edges in vertex order, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| Edge::new(self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Shoelace area; positive for counter-clockwise winding.
    pub fn signed_area(&self) -> f32 {
        self.edges().map(|e| e.p1.cross(e.p2)).sum::<f32>() * 0.5
    }

    /// A polygon is drawable when it has at least three finite vertices,
    /// a non-zero area and no two non-adjacent edges crossing.
    pub fn is_valid(&self) -> bool {
        if self.vertices.len() < 3 || !self.vertices.iter().all(|v| v.is_finite()) {
            return false;
        }
        if self.signed_area().abs() <= ORIENTATION_EPSILON {
            return false;
        }
        !self.is_self_intersecting()
    }

    fn is_self_intersecting(&self) -> bool {
        let n = self.vertices.len();
        for i in 0..n {
            let a = Edge::new(self.vertices[i], self.vertices[(i + 1) % n]);
            for j in (i + 2)..n {
                // The first and last edges share vertex 0.
                if i == 0 && j == n - 1 {
                    continue;
                }
                let b = Edge::new(self.vertices[j], self.vertices[(j + 1) % n]);
                if segments_cross(a, b) {
                    return true;
                }
            }
        }
        false
    }
}

fn segments_cross(a: Edge, b: Edge) -> bool {
    let o1 = three_point_orientation(a.p1, a.p2, b.p1);
    let o2 = three_point_orientation(a.p1, a.p2, b.p2);
    let o3 = three_point_orientation(b.p1, b.p2, a.p1);
    let o4 = three_point_orientation(b.p1, b.p2, a.p2);

    if o1 != o2 && o3 != o4 {
        return true;
    }

    (o1 == Orientation::Collinear && on_segment(a, b.p1))
        || (o2 == Orientation::Collinear && on_segment(a, b.p2))
        || (o3 == Orientation::Collinear && on_segment(b, a.p1))
        || (o4 == Orientation::Collinear && on_segment(b, a.p2))
}

fn on_segment(e: Edge, p: Vec2) -> bool {
    p.x >= e.p1.x.min(e.p2.x)
        && p.x <= e.p1.x.max(e.p2.x)
        && p.y >= e.p1.y.min(e.p2.y)
        && p.y <= e.p1.y.max(e.p2.y)
}
