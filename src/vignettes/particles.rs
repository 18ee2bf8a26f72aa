//! Small particle pool for bubbles, drops, balloons and puffs of smoke.
//! Positions are fractions of the window rectangle.

use rand::RngExt;
use rand::rngs::StdRng;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub life: f64,
    pub max_life: f64,
    /// Free per-particle value (size, colour index, wobble phase).
    pub tag: f64,
}

impl Particle {
    /// 0.0 just born, 1.0 about to die.
    #[inline]
    pub fn age(&self) -> f64 {
        1.0 - (self.life / self.max_life).clamp(0.0, 1.0)
    }

    /// Remaining life, 1.0 full to 0.0 dead.
    #[inline]
    pub fn life_frac(&self) -> f64 {
        (self.life / self.max_life).clamp(0.0, 1.0)
    }
}

pub struct Particles {
    items: Vec<Particle>,
    capacity: usize,
    /// Added to vy every second (positive falls).
    pub gravity: f64,
}

impl Particles {
    pub fn new(capacity: usize, gravity: f64) -> Self {
        Particles { items: Vec::with_capacity(capacity), capacity, gravity }
    }

    /// Emit one particle unless the pool is full.
    pub fn emit_at(&mut self, x: f64, y: f64, vx: f64, vy: f64, life: f64, tag: f64) {
        if self.items.len() >= self.capacity {
            return;
        }
        self.items.push(Particle { x, y, vx, vy, life, max_life: life.max(1e-3), tag });
    }

    /// Emit `count` particles flying outward from a point.
    pub fn burst(&mut self, x: f64, y: f64, count: usize, speed: f64, life: f64, rng: &mut StdRng) {
        for _ in 0..count {
            let angle = rng.random_range(0.0..std::f64::consts::TAU);
            let v = rng.random_range(speed * 0.5..=speed);
            self.emit_at(x, y, angle.cos() * v, angle.sin() * v, life, rng.random_range(0.0..1.0));
        }
    }

    pub fn update(&mut self, dt: f64) {
        for p in &mut self.items {
            p.vy += self.gravity * dt;
            p.x += p.vx * dt;
            p.y += p.vy * dt;
            p.life -= dt;
        }
        self.items.retain(|p| p.life > 0.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_capacity_is_respected() {
        let mut p = Particles::new(3, 0.0);
        for _ in 0..10 {
            p.emit_at(0.5, 0.5, 0.0, 0.0, 1.0, 0.0);
        }
        assert_eq!(p.len(), 3);
    }

    #[test]
    fn test_dead_particles_are_dropped() {
        let mut p = Particles::new(8, 0.0);
        p.emit_at(0.0, 0.0, 1.0, 0.0, 0.5, 0.0);
        p.emit_at(0.0, 0.0, 1.0, 0.0, 2.0, 0.0);
        p.update(1.0);
        assert_eq!(p.len(), 1);
        let survivor = p.iter().next().unwrap();
        assert!((survivor.x - 1.0).abs() < 1e-9);
        assert!((survivor.age() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_gravity_pulls_down() {
        let mut p = Particles::new(1, 2.0);
        p.emit_at(0.0, 0.0, 0.0, 0.0, 5.0, 0.0);
        p.update(0.5);
        p.update(0.5);
        assert!(p.iter().next().unwrap().y > 0.0);
    }

    #[test]
    fn test_burst_emits_requested_count() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut p = Particles::new(32, 0.0);
        p.burst(0.5, 0.5, 10, 0.4, 0.6, &mut rng);
        assert_eq!(p.len(), 10);
        assert!(p.iter().all(|q| (q.vx.hypot(q.vy) - 0.3).abs() <= 0.1 + 1e-9));
    }
}
