//! Actor descriptions that own animation controllers.
//!
//! Adding a controller also registers it on the description (an animation
//! alias plus an `animate` entry). Controllers that turn out empty at export
//! time are dropped and their bookkeeping is retracted.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde_json::{json, Map, Value};
use tracing::{debug, info};

use crate::assets::ActorAssetRegistry;
use crate::controller::Controller;
use crate::error::ControllerError;
use crate::sink::JsonSink;
use crate::state::{BehaviorState, ControllerState, ResourceState};

/// `format_version` written to animation controller files.
pub const CONTROLLER_FORMAT_VERSION: &str = "1.10.0";

pub type BehaviorActor = Actor<BehaviorState>;
pub type ResourceActor = Actor<ResourceState>;

#[derive(Debug)]
pub struct Actor<S: ControllerState> {
    namespace: String,
    name: String,
    context: S::Context,
    controllers: Vec<Controller<S>>,
    /// Animation alias -> fully qualified controller name.
    animations: BTreeMap<String, String>,
    animate: Vec<String>,
}

impl<S: ControllerState> Actor<S> {
    pub fn with_context(namespace: &str, name: &str, context: S::Context) -> Self {
        Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            context,
            controllers: Vec::new(),
            animations: BTreeMap::new(),
            animate: Vec::new(),
        }
    }

    /// Namespaced identifier, e.g. `demo:guard`.
    pub fn identifier(&self) -> String {
        format!("{}:{}", self.namespace, self.name)
    }

    pub fn controllers(&self) -> &[Controller<S>] {
        &self.controllers
    }

    pub fn animations(&self) -> &BTreeMap<String, String> {
        &self.animations
    }

    pub fn animate(&self) -> &[String] {
        &self.animate
    }

    /// Add a controller and register it for playback. Fails on a duplicate shortname.
    pub fn add_controller(&mut self, shortname: &str) -> Result<&mut Controller<S>, ControllerError> {
        if self.controllers.iter().any(|c| c.shortname() == shortname) {
            return Err(ControllerError::DuplicateController {
                controller: shortname.to_string(),
                actor: self.identifier(),
            });
        }
        let controller = self.new_controller(shortname);
        self.register(&controller);
        self.controllers.push(controller);
        let idx = self.controllers.len() - 1;
        Ok(&mut self.controllers[idx])
    }

    /// Add a controller, replacing any earlier one with the same shortname.
    pub fn override_controller(&mut self, shortname: &str) -> &mut Controller<S> {
        let controller = self.new_controller(shortname);
        self.register(&controller);
        let idx = match self
            .controllers
            .iter()
            .position(|c| c.shortname() == shortname)
        {
            Some(idx) => {
                debug!("Overriding controller '{shortname}' on {}", self.identifier());
                self.controllers[idx] = controller;
                idx
            }
            None => {
                self.controllers.push(controller);
                self.controllers.len() - 1
            }
        };
        &mut self.controllers[idx]
    }

    fn new_controller(&self, shortname: &str) -> Controller<S> {
        Controller::new(&self.namespace, &self.name, shortname, self.context.clone())
    }

    fn register(&mut self, controller: &Controller<S>) {
        let alias = controller.shortname().to_string();
        self.animations.insert(alias.clone(), controller.name());
        if !self.animate.contains(&alias) {
            self.animate.push(alias);
        }
    }

    fn retract(&mut self, shortname: &str) {
        self.animations.remove(shortname);
        self.animate.retain(|a| a != shortname);
    }

    /// Validate and serialize every controller into one `animation_controllers` map.
    ///
    /// Controllers are consumed and empty ones are retracted from the
    /// description, but only once every controller has validated. On error the
    /// actor is left untouched.
    pub fn export_controllers(&mut self) -> Result<Map<String, Value>, ControllerError> {
        let wires = self
            .controllers
            .iter()
            .map(Controller::to_wire_format)
            .collect::<Result<Vec<_>, _>>()?;

        let controllers = std::mem::take(&mut self.controllers);
        let mut merged = Map::new();
        for (controller, wire) in controllers.iter().zip(wires) {
            if wire.is_empty() {
                self.retract(controller.shortname());
            }
            merged.extend(wire);
        }
        Ok(merged)
    }

    /// Export controllers and write them through `sink`; this is the
    /// sink-taking form of [`Actor::export_controllers`].
    ///
    /// Returns the path written, or `None` when every controller was empty.
    pub fn write_controllers(
        &mut self,
        sink: &mut dyn JsonSink,
    ) -> Result<Option<PathBuf>, ControllerError> {
        let count = self.controllers.len();
        let merged = self.export_controllers()?;
        if merged.is_empty() {
            debug!("No animation controllers to write for {}", self.identifier());
            return Ok(None);
        }

        let exported = merged.len();
        let document = json!({
            "format_version": CONTROLLER_FORMAT_VERSION,
            "animation_controllers": merged,
        });
        let path = PathBuf::from("animation_controllers")
            .join(format!("{}.animation_controllers.json", self.name));
        sink.write_json(&path, &document)?;

        info!(
            "Exported {} of {} animation controller(s) for {} to {}",
            exported,
            count,
            self.identifier(),
            path.display()
        );
        Ok(Some(path))
    }

    /// The `animations` / `scripts.animate` part of the actor description.
    pub fn description(&self) -> Value {
        json!({
            "identifier": self.identifier(),
            "animations": self.animations,
            "scripts": { "animate": self.animate },
        })
    }
}

impl Actor<BehaviorState> {
    pub fn new(namespace: &str, name: &str) -> Self {
        Self::with_context(namespace, name, ())
    }
}

impl Actor<ResourceState> {
    pub fn new(namespace: &str, name: &str) -> Self {
        let registry = ActorAssetRegistry::new(&format!("{namespace}:{name}"));
        Self::with_context(namespace, name, registry)
    }

    /// The registry shared with every controller of this actor.
    pub fn assets(&self) -> &ActorAssetRegistry {
        &self.context
    }

    pub fn register_particle(&mut self, name: &str, identifier: &str) -> &mut Self {
        self.context.register_particle(name, identifier);
        self
    }

    pub fn register_sound(&mut self, name: &str, event: &str) -> &mut Self {
        self.context.register_sound(name, event);
        self
    }

    /// Client description including registered particle and sound effects.
    pub fn client_description(&self) -> Value {
        let mut description = self.description();
        description["particle_effects"] = json!(self.context.particles());
        description["sound_effects"] = json!(self.context.sounds());
        description
    }
}
