//! Per-actor registry of particle and sound effects.
//!
//! Resource pack controller states may only reference effects that the owning
//! actor registered. The registry is a cheap, cloneable handle: the actor keeps
//! one and every controller it creates receives a clone.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

#[derive(Debug, Default)]
struct AssetTables {
    particles: BTreeMap<String, String>,
    sounds: BTreeMap<String, String>,
}

/// Shared handle to an actor's registered effects.
#[derive(Debug, Clone)]
pub struct ActorAssetRegistry {
    actor: Rc<str>,
    tables: Rc<RefCell<AssetTables>>,
}

impl ActorAssetRegistry {
    pub fn new(actor: &str) -> Self {
        Self {
            actor: Rc::from(actor),
            tables: Rc::default(),
        }
    }

    /// Identifier of the owning actor, e.g. `demo:guard`.
    pub fn actor(&self) -> &str {
        &self.actor
    }

    /// Register a particle effect under a short name.
    pub fn register_particle(&self, name: &str, identifier: &str) {
        self.tables
            .borrow_mut()
            .particles
            .insert(name.to_string(), identifier.to_string());
    }

    /// Register a sound effect under a short name.
    pub fn register_sound(&self, name: &str, event: &str) {
        self.tables
            .borrow_mut()
            .sounds
            .insert(name.to_string(), event.to_string());
    }

    pub fn has_particle(&self, name: &str) -> bool {
        self.tables.borrow().particles.contains_key(name)
    }

    pub fn has_sound(&self, name: &str) -> bool {
        self.tables.borrow().sounds.contains_key(name)
    }

    /// Registered particles as `short name -> identifier`, for the client entity file.
    pub fn particles(&self) -> BTreeMap<String, String> {
        self.tables.borrow().particles.clone()
    }

    /// Registered sounds as `short name -> event`.
    pub fn sounds(&self) -> BTreeMap<String, String> {
        self.tables.borrow().sounds.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_registrations() {
        let registry = ActorAssetRegistry::new("demo:guard");
        let handle = registry.clone();
        registry.register_particle("smoke", "minecraft:basic_smoke_particle");
        assert!(handle.has_particle("smoke"));
        assert!(!handle.has_sound("smoke"));
        assert_eq!(handle.actor(), "demo:guard");
    }

    #[test]
    fn sounds_are_separate_from_particles() {
        let registry = ActorAssetRegistry::new("demo:guard");
        registry.register_sound("step", "mob.guard.step");
        assert!(registry.has_sound("step"));
        assert!(!registry.has_particle("step"));
        assert_eq!(registry.sounds().get("step").map(String::as_str), Some("mob.guard.step"));
        assert!(registry.particles().is_empty());
    }
}
