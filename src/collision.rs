use nalgebra::{Point2, Vector2};

use crate::body::Body;

/// Floor for the distance between two centers, so coincident bodies still
/// get a usable normal.
pub const MIN_SEPARATION: f32 = 0.01;

/// Extra separation added on top of the penetration depth.
pub const SEPARATION_MARGIN: f32 = 1.0;

/// `true` when two circles strictly overlap. Touching circles do not.
pub fn circles_overlap(a: &Point2<f32>, ra: f32, b: &Point2<f32>, rb: f32) -> bool {
    let reach = ra + rb;
    let dx = a.x - b.x;
    let dy = a.y - b.y;

    // Separated along either axis, no need for the square root
    if dx.abs() > reach || dy.abs() > reach {
        return false;
    }

    (dx * dx + dy * dy).sqrt() < reach
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub normal: Vector2<f32>, // Unit vector pointing from b to a
    pub distance: f32,
}

impl Contact {
    pub fn between(a: &Body, b: &Body) -> Contact {
        let d = a.pos - b.pos;
        let distance = d.norm().max(MIN_SEPARATION);
        Contact {
            normal: d / distance,
            distance
        }
    }

    /// How far each body is pushed along the normal.
    pub fn push_depth(&self, a: &Body, b: &Body) -> f32 {
        0.5 * (a.radius() + b.radius() - self.distance + SEPARATION_MARGIN)
    }
}

/// Elastic 1D momentum exchange along the contact normal. Friction and
/// de-penetration are not applied here.
pub fn exchange_impulse(a: &mut Body, b: &mut Body, contact: &Contact) {
    let n = contact.normal;
    let p = 2.0 * (a.v.dot(&n) - b.v.dot(&n)) / (a.mass() + b.mass());
    a.v -= n * (p * b.mass());
    b.v += n * (p * a.mass());
}

pub fn separate(a: &mut Body, b: &mut Body, contact: &Contact) {
    let push = contact.normal * contact.push_depth(a, b);
    a.pos += push;
    b.pos -= push;
}

/// Full response for an overlapping pair: impulse, friction, separation.
pub fn resolve(a: &mut Body, b: &mut Body) {
    let contact = Contact::between(a, b);
    exchange_impulse(a, b, &contact);
    a.apply_friction();
    b.apply_friction();
    separate(a, b, &contact);
}

/// Resolves `a` against `b` if they overlap. Returns whether they did.
pub fn collide(a: &mut Body, b: &mut Body) -> bool {
    if !circles_overlap(&a.pos, a.radius(), &b.pos, b.radius()) {
        return false;
    }
    resolve(a, b);
    true
}

/// Mutable references to two distinct bodies of the same slice.
pub fn pair_mut(bodies: &mut [Body], i: usize, j: usize) -> (&mut Body, &mut Body) {
    assert_ne!(i, j, "a body cannot collide with itself");
    if i < j {
        let (left, right) = bodies.split_at_mut(j);
        (&mut left[i], &mut right[0])
    } else {
        let (left, right) = bodies.split_at_mut(i);
        (&mut right[0], &mut left[j])
    }
}
