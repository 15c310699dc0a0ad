//! Geometry kernel: vectors, the quadratic Bézier form shared by the glyph
//! decoder and the scan-line filler, and the intersection/extremum routines
//! the filler uses to turn contours into per-row spans.
//!
//! Grounded on `original_source/utils/Geometry.h` (`lerp`, `bezierLerp`) for
//! the curve formulas; the intersection and quadratic-solver routines are
//! spec-mandated numerics with no direct antecedent in either source repo.

/// Absolute tolerance used throughout this module, per spec.
pub const EPSILON: f32 = 1e-8;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Vec2 {
        Vec2 { x, y }
    }

    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn len(self) -> f32 {
        self.dot(self).sqrt()
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// A 3x3 affine transform, column-major as in spec section 4.E:
/// `[[a,b,0],[c,d,0],[e,f,1]]`, applied as `x' = a*x + c*y + e`, `y' = b*x + d*y + f`.
#[derive(Copy, Clone, Debug)]
pub struct Affine {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Affine {
    pub const IDENTITY: Affine = Affine { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 };

    pub fn apply(&self, p: Vec2) -> Vec2 {
        Vec2::new(self.a * p.x + self.c * p.y + self.e, self.b * p.x + self.d * p.y + self.f)
    }

    /// `self` applied after `inner`: `(self ∘ inner)(p) == self.apply(inner.apply(p))`.
    pub fn compose(&self, inner: &Affine) -> Affine {
        Affine {
            a: self.a * inner.a + self.c * inner.b,
            b: self.b * inner.a + self.d * inner.b,
            c: self.a * inner.c + self.c * inner.d,
            d: self.b * inner.c + self.d * inner.d,
            e: self.a * inner.e + self.c * inner.f + self.e,
            f: self.b * inner.e + self.d * inner.f + self.f,
        }
    }
}

/// Precondition: `0 <= t <= 1`.
pub fn lerp(a: Vec2, b: Vec2, t: f32) -> Vec2 {
    debug_assert!((0.0..=1.0).contains(&t));
    a + (b - a) * t
}

pub fn quad_bezier(p0: Vec2, c: Vec2, p1: Vec2, t: f32) -> Vec2 {
    lerp(lerp(p0, c, t), lerp(c, p1, t), t)
}

fn orient3(p: Vec2, q: Vec2, r: Vec2) -> f32 {
    (q.x - p.x) * (r.y - p.y) - (q.y - p.y) * (r.x - p.x)
}

/// Straight-segment intersection. Inclusive straddle test on the `a1,a2`
/// side, strict on the `b1,b2` side — this is the asymmetric rule the
/// scan-line filler relies on to avoid double-counting a vertex that sits
/// exactly on the ray while still catching a ray that grazes a segment
/// endpoint. Degenerate (parallel/collinear within `EPSILON`) yields `None`.
pub fn segment_segment_intersect(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> Option<Vec2> {
    let d1 = orient3(a1, a2, b1);
    let d2 = orient3(a1, a2, b2);
    let d3 = orient3(b1, b2, a1);
    let d4 = orient3(b1, b2, a2);

    if d1 * d2 > EPSILON {
        return None;
    }
    if d3 * d4 >= -EPSILON {
        return None;
    }

    let denom = (a2.x - a1.x) * (b2.y - b1.y) - (a2.y - a1.y) * (b2.x - b1.x);
    if denom.abs() < EPSILON {
        return None;
    }
    let t = ((b1.x - a1.x) * (b2.y - b1.y) - (b1.y - a1.y) * (b2.x - b1.x)) / denom;
    Some(a1 + (a2 - a1) * t)
}

fn sign_nonneg(v: f32) -> f32 {
    if v >= 0.0 {
        1.0
    } else {
        -1.0
    }
}

/// At most two real roots of `a*t^2 + b*t + c = 0`, via the stabilized
/// Citardauq form to avoid catastrophic cancellation. Degrades to linear
/// when `|a| < EPSILON`. Returns no roots if the discriminant is below
/// `-EPSILON`; duplicate roots are collapsed to one.
pub fn solve_quadratic(a: f32, b: f32, c: f32) -> Vec<f32> {
    if a.abs() < EPSILON {
        if b.abs() < EPSILON {
            return Vec::new();
        }
        return vec![-c / b];
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < -EPSILON {
        return Vec::new();
    }
    let d = discriminant.max(0.0);
    let sqrt_d = d.sqrt();
    let q = -0.5 * (b + sign_nonneg(b) * sqrt_d);

    let r1 = q / a;
    if q.abs() < EPSILON {
        vec![r1]
    } else {
        let r2 = c / q;
        if (r1 - r2).abs() < EPSILON {
            vec![r1]
        } else {
            vec![r1, r2]
        }
    }
}

/// Intersections of a quadratic Bézier `(p0, control, p2)` with the ray
/// through `l1, l2`, per spec section 4.B: solve `k . (A t^2 + B t + C -
/// l1) = 0` with `k` perpendicular to `l2 - l1`. Roots outside
/// `[-EPSILON, 1+EPSILON]` are dropped; the rest are clamped into `[0,1]`
/// and substituted back into the curve.
pub fn segment_quad_intersect(p0: Vec2, control: Vec2, p2: Vec2, l1: Vec2, l2: Vec2) -> Vec<Vec2> {
    let dir = l2 - l1;
    let k = Vec2::new(dir.y, -dir.x);

    let a = p2 - control * 2.0 + p0;
    let b = (control - p0) * 2.0;
    let c = p0 - l1;

    let roots = solve_quadratic(k.dot(a), k.dot(b), k.dot(c));
    roots
        .into_iter()
        .filter(|t| *t >= -EPSILON && *t <= 1.0 + EPSILON)
        .map(|t| t.clamp(0.0, 1.0))
        .map(|t| quad_bezier(p0, control, p2, t))
        .collect()
}

/// The lesser of the endpoint Ys, unless the curve's Y-coefficient opens
/// downward (`a > 0`) with its extremum inside `[0,1]`, in which case the
/// extremum's Y value is used instead.
pub fn quad_min_y(p0: Vec2, p1: Vec2, p2: Vec2) -> f32 {
    let a = p2.y - 2.0 * p1.y + p0.y;
    let b = 2.0 * (p1.y - p0.y);

    if a > EPSILON {
        let t_extreme = -b / (2.0 * a);
        if (0.0..=1.0).contains(&t_extreme) {
            return a * t_extreme * t_extreme + b * t_extreme + p0.y;
        }
    }
    p0.y.min(p2.y)
}
