//! Per-object components shared by the simulation crates.

/// Hit points for damageable objects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    /// Objects that cannot be damaged (walls of the world, cameras, projectiles).
    pub fn invulnerable() -> Self {
        Self {
            current: f32::INFINITY,
            max: f32::INFINITY,
        }
    }

    /// Apply damage. Returns true if this hit took the object from alive to dead.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if self.is_dead() || amount <= 0.0 {
            return false;
        }
        self.current = (self.current - amount).max(0.0);
        self.is_dead()
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    pub fn is_invulnerable(&self) -> bool {
        self.max.is_infinite()
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

/// Remaining lifespan for temporary objects (weapons, debris, fireballs).
///
/// An object whose lifespan reaches zero is dead and its slot is reclaimed
/// at the end of the tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lifetime {
    pub remaining: f32,
}

impl Lifetime {
    pub fn new(seconds: f32) -> Self {
        Self { remaining: seconds }
    }

    /// Never expires on its own.
    pub fn permanent() -> Self {
        Self {
            remaining: f32::INFINITY,
        }
    }

    /// Count down. Returns true once expired.
    pub fn update(&mut self, dt: f32) -> bool {
        self.remaining -= dt;
        self.is_expired()
    }

    pub fn expire(&mut self) {
        self.remaining = 0.0;
    }

    pub fn is_expired(&self) -> bool {
        self.remaining <= 0.0
    }
}

impl Default for Lifetime {
    fn default() -> Self {
        Self::permanent()
    }
}
