//! Physics collaborator interface and a small box world.
//!
//! Positions and extents are in physics units (world pixels divided by the
//! map's `ppm`). A body's position is its center.

use macroquad::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Static,
    Dynamic,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDef {
    pub kind: BodyKind,
    pub position: Vec2,
    pub half_extents: Vec2,
    pub friction: f32,
    pub density: f32,
    pub restitution: f32,
}

impl BodyDef {
    pub fn fixed(position: Vec2, half_extents: Vec2) -> Self {
        Self {
            kind: BodyKind::Static,
            position,
            half_extents,
            friction: 0.1,
            density: 0.0,
            restitution: 0.0,
        }
    }

    pub fn dynamic(position: Vec2, half_extents: Vec2) -> Self {
        Self {
            kind: BodyKind::Dynamic,
            density: 0.1,
            ..Self::fixed(position, half_extents)
        }
    }
}

/// The physics engine as seen by the tile map. Bodies are owned by the world;
/// callers keep [`BodyHandle`]s.
pub trait PhysicsWorld {
    fn create_body(&mut self, def: &BodyDef) -> BodyHandle;

    fn create_static_body(&mut self, position: Vec2, half_extents: Vec2) -> BodyHandle {
        self.create_body(&BodyDef::fixed(position, half_extents))
    }

    fn create_dynamic_body(&mut self, position: Vec2, half_extents: Vec2) -> BodyHandle {
        self.create_body(&BodyDef::dynamic(position, half_extents))
    }

    fn step(&mut self, dt: f32, velocity_iterations: u32, position_iterations: u32);

    fn body_position(&self, body: BodyHandle) -> Option<Vec2>;

    fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec2);

    fn linear_velocity(&self, body: BodyHandle) -> Option<Vec2>;

    fn body_count(&self) -> usize;
}

#[derive(Debug, Clone)]
struct Body {
    def: BodyDef,
    position: Vec2,
    velocity: Vec2,
}

/// Axis-aligned boxes under gravity. Dynamic bodies collide with static ones
/// only, resolved along the axis of least penetration.
#[derive(Debug, Clone)]
pub struct SimpleWorld {
    gravity: Vec2,
    bodies: Vec<Body>,
}

impl Default for SimpleWorld {
    fn default() -> Self {
        Self::new(vec2(0.0, 10.0))
    }
}

impl SimpleWorld {
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity,
            bodies: Vec::new(),
        }
    }

    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    pub fn body_def(&self, body: BodyHandle) -> Option<&BodyDef> {
        self.bodies.get(body.0 as usize).map(|b| &b.def)
    }

    fn resolve_contacts(&mut self) {
        let statics: Vec<(Vec2, Vec2, f32)> = self
            .bodies
            .iter()
            .filter(|b| b.def.kind == BodyKind::Static)
            .map(|b| (b.position, b.def.half_extents, b.def.friction))
            .collect();

        for body in self
            .bodies
            .iter_mut()
            .filter(|b| b.def.kind == BodyKind::Dynamic)
        {
            for &(pos, half, friction) in &statics {
                let delta = body.position - pos;
                let overlap = body.def.half_extents + half - delta.abs();
                if overlap.x <= 0.0 || overlap.y <= 0.0 {
                    continue;
                }
                if overlap.x < overlap.y {
                    body.position.x += overlap.x.copysign(delta.x);
                    body.velocity.x = -body.velocity.x * body.def.restitution;
                } else {
                    body.position.y += overlap.y.copysign(delta.y);
                    body.velocity.y = -body.velocity.y * body.def.restitution;
                    let mu = (body.def.friction * friction).sqrt();
                    body.velocity.x *= (1.0 - mu).max(0.0);
                }
            }
        }
    }
}

impl PhysicsWorld for SimpleWorld {
    fn create_body(&mut self, def: &BodyDef) -> BodyHandle {
        let handle = BodyHandle(self.bodies.len() as u32);
        self.bodies.push(Body {
            def: *def,
            position: def.position,
            velocity: Vec2::ZERO,
        });
        handle
    }

    // Contacts are resolved positionally; velocity iterations have no separate solver here.
    fn step(&mut self, dt: f32, _velocity_iterations: u32, position_iterations: u32) {
        for body in &mut self.bodies {
            if body.def.kind == BodyKind::Dynamic {
                body.velocity += self.gravity * dt;
                body.position += body.velocity * dt;
            }
        }
        for _ in 0..position_iterations.max(1) {
            self.resolve_contacts();
        }
    }

    fn body_position(&self, body: BodyHandle) -> Option<Vec2> {
        self.bodies.get(body.0 as usize).map(|b| b.position)
    }

    fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec2) {
        if let Some(b) = self.bodies.get_mut(body.0 as usize) {
            if b.def.kind == BodyKind::Dynamic {
                b.velocity = velocity;
            }
        }
    }

    fn linear_velocity(&self, body: BodyHandle) -> Option<Vec2> {
        self.bodies.get(body.0 as usize).map(|b| b.velocity)
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn static_bodies_never_move() {
        let mut world = SimpleWorld::default();
        let ground = world.create_static_body(vec2(0.0, 5.0), vec2(10.0, 0.5));
        for _ in 0..120 {
            world.step(DT, 6, 2);
        }
        assert_eq!(world.body_position(ground), Some(vec2(0.0, 5.0)));
    }

    #[test]
    fn dynamic_body_falls_and_rests_on_ground() {
        let mut world = SimpleWorld::default();
        world.create_static_body(vec2(0.0, 5.0), vec2(10.0, 0.5));
        let crate_ = world.create_dynamic_body(vec2(0.0, 0.0), vec2(0.5, 0.5));

        for _ in 0..600 {
            world.step(DT, 6, 2);
        }

        let pos = world.body_position(crate_).expect("body exists");
        // ground top is at 4.5, box half height 0.5
        assert!((pos.y - 4.0).abs() < 0.05, "y = {}", pos.y);
        assert!(world.linear_velocity(crate_).expect("body exists").y.abs() < 0.5);
    }

    #[test]
    fn dynamic_defaults_match_fixed_except_density() {
        let d = BodyDef::dynamic(Vec2::ZERO, Vec2::ONE);
        assert_eq!(d.kind, BodyKind::Dynamic);
        assert_eq!(d.density, 0.1);
        assert_eq!(d.friction, BodyDef::fixed(Vec2::ZERO, Vec2::ONE).friction);
    }

    #[test]
    fn velocity_is_ignored_for_static_bodies() {
        let mut world = SimpleWorld::default();
        let wall = world.create_static_body(Vec2::ZERO, Vec2::ONE);
        world.set_linear_velocity(wall, vec2(3.0, 0.0));
        assert_eq!(world.linear_velocity(wall), Some(Vec2::ZERO));
    }
}
