//! Animation controllers: named state machines attached to an actor.
//!
//! Building is pure accumulation; nothing is checked until [`Controller::validate`]
//! runs, which [`Controller::to_wire_format`] always does before producing output.

use std::collections::HashSet;

use serde_json::{json, Map, Value};
use tracing::debug;

use crate::error::ControllerError;
use crate::state::{BehaviorState, ControllerState, ResourceState};

pub type BehaviorController = Controller<BehaviorState>;
pub type ResourceController = Controller<ResourceState>;

/// An animation controller with its ordered states.
#[derive(Debug, Clone)]
pub struct Controller<S: ControllerState> {
    namespace: String,
    owner: String,
    shortname: String,
    context: S::Context,
    initial_state: Option<String>,
    states: Vec<S>,
}

impl<S: ControllerState> Controller<S> {
    /// Create an empty controller for the actor `<namespace>:<owner>`.
    pub fn new(namespace: &str, owner: &str, shortname: &str, context: S::Context) -> Self {
        Self {
            namespace: namespace.to_string(),
            owner: owner.to_string(),
            shortname: shortname.to_string(),
            context,
            initial_state: None,
            states: Vec::new(),
        }
    }

    pub fn shortname(&self) -> &str {
        &self.shortname
    }

    /// Fully qualified name: `controller.animation.<namespace>.<owner>.<shortname>`.
    pub fn name(&self) -> String {
        format!(
            "controller.animation.{}.{}.{}",
            self.namespace, self.owner, self.shortname
        )
    }

    fn actor(&self) -> String {
        format!("{}:{}", self.namespace, self.owner)
    }

    pub fn states(&self) -> &[S] {
        &self.states
    }

    pub fn state(&self, name: &str) -> Option<&S> {
        self.states.iter().find(|s| s.name() == name)
    }

    /// Declare a new state. Fails if a state with this name already exists.
    pub fn add_state(&mut self, name: &str) -> Result<&mut S, ControllerError> {
        if self.state(name).is_some() {
            return Err(ControllerError::DuplicateState {
                state: name.to_string(),
                controller: self.shortname.clone(),
            });
        }
        self.states.push(S::new(name, self.context.clone()));
        let idx = self.states.len() - 1;
        Ok(&mut self.states[idx])
    }

    /// Declare a state, replacing any earlier declaration with the same name.
    ///
    /// The replacement keeps the original declaration position.
    pub fn override_state(&mut self, name: &str) -> &mut S {
        let fresh = S::new(name, self.context.clone());
        let idx = match self.states.iter().position(|s| s.name() == name) {
            Some(idx) => {
                debug!("Overriding state '{name}' in controller '{}'", self.shortname);
                self.states[idx] = fresh;
                idx
            }
            None => {
                self.states.push(fresh);
                self.states.len() - 1
            }
        };
        &mut self.states[idx]
    }

    /// Set the state the controller starts in. Checked by [`Controller::validate`].
    pub fn initial_state(&mut self, name: &str) -> &mut Self {
        self.initial_state = Some(name.to_string());
        self
    }

    /// `true` if no state received any mutation.
    pub fn is_empty(&self) -> bool {
        self.states.iter().all(|s| s.is_default())
    }

    /// Check that every transition target and the initial state are declared.
    pub fn validate(&self) -> Result<(), ControllerError> {
        let declared: HashSet<&str> = self.states.iter().map(|s| s.name()).collect();

        for state in &self.states {
            for transition in state.core().transitions() {
                if !declared.contains(transition.target.as_str()) {
                    return Err(ControllerError::UnknownTransitionTarget {
                        state: transition.target.clone(),
                        controller: self.shortname.clone(),
                        actor: self.actor(),
                    });
                }
            }
        }

        if let Some(initial) = &self.initial_state {
            if !declared.contains(initial.as_str()) {
                return Err(ControllerError::UnknownInitialState {
                    state: initial.clone(),
                    controller: self.shortname.clone(),
                    actor: self.actor(),
                });
            }
        }

        Ok(())
    }

    /// Validate and serialize to `{ "<name>": { "states": { ... } } }`.
    ///
    /// States that were never mutated are skipped. Returns an empty map when
    /// nothing is left to export.
    pub fn to_wire_format(&self) -> Result<Map<String, Value>, ControllerError> {
        self.validate()?;

        let mut states = Map::new();
        for state in self.states.iter().filter(|s| !s.is_default()) {
            states.insert(state.name().to_string(), state.to_wire());
        }

        let mut out = Map::new();
        if states.is_empty() {
            debug!("Controller '{}' has no active states, dropping it", self.name());
            return Ok(out);
        }

        let mut body = Map::new();
        if let Some(initial) = &self.initial_state {
            body.insert("initial_state".into(), json!(initial));
        }
        body.insert("states".into(), Value::Object(states));
        out.insert(self.name(), Value::Object(body));
        Ok(out)
    }

    /// Alias of [`Controller::to_wire_format`].
    pub fn export(&self) -> Result<Map<String, Value>, ControllerError> {
        self.to_wire_format()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ActorAssetRegistry;
    use crate::state::ParticleOptions;

    fn behavior(shortname: &str) -> BehaviorController {
        Controller::new("demo", "guard", shortname, ())
    }

    #[test]
    fn fully_qualified_name() {
        let c = behavior("movement");
        assert_eq!(c.name(), "controller.animation.demo.guard.movement");
    }

    #[test]
    fn empty_controller_exports_empty() {
        let mut c = behavior("movement");
        c.add_state("default").unwrap();
        c.add_state("walking").unwrap();
        assert!(c.is_empty());
        assert!(c.export().unwrap().is_empty());
    }

    #[test]
    fn default_states_are_not_exported() {
        let mut c = behavior("movement");
        c.add_state("default")
            .unwrap()
            .transition("walking", "q.is_moving");
        c.add_state("walking").unwrap();

        let out = c.export().unwrap();
        let states = &out["controller.animation.demo.guard.movement"]["states"];
        assert!(states.get("default").is_some());
        assert!(states.get("walking").is_none());
    }

    #[test]
    fn undeclared_target_fails_naming_state_and_controller() {
        let mut c = behavior("movement");
        c.add_state("default").unwrap().on_entry(["q.is_on_ground"]);
        c.add_state("jump").unwrap().transition("falling", "!q.is_on_ground");

        let err = c.export().unwrap_err();
        match &err {
            ControllerError::UnknownTransitionTarget {
                state,
                controller,
                actor,
            } => {
                assert_eq!(state, "falling");
                assert_eq!(controller, "movement");
                assert_eq!(actor, "demo:guard");
            }
            other => panic!("unexpected error {other:?}"),
        }
        let msg = err.to_string();
        assert!(msg.contains("falling") && msg.contains("movement"));
    }

    #[test]
    fn validate_is_independent_of_export() {
        let mut c = behavior("movement");
        c.add_state("default").unwrap().transition("run", "1");
        assert!(c.validate().is_err());
        c.add_state("run").unwrap();
        assert!(c.validate().is_ok());
    }

    #[test]
    fn duplicate_state_is_rejected() {
        let mut c = behavior("movement");
        c.add_state("default").unwrap();
        assert!(matches!(
            c.add_state("default"),
            Err(ControllerError::DuplicateState { .. })
        ));
    }

    #[test]
    fn override_state_replaces_in_place() {
        let mut c = behavior("movement");
        c.add_state("default").unwrap().animation("idle", None);
        c.add_state("walk").unwrap().animation("walk", None);
        c.override_state("default").animation("stand", None);

        assert_eq!(c.states().len(), 2);
        assert_eq!(c.states()[0].name(), "default");
        let out = c.export().unwrap();
        assert_eq!(
            out["controller.animation.demo.guard.movement"]["states"]["default"]["animations"],
            json!(["stand"])
        );
    }

    #[test]
    fn initial_state_must_exist() {
        let mut c = behavior("movement");
        c.add_state("idle").unwrap().animation("idle", None);
        c.initial_state("start");
        assert!(matches!(
            c.validate(),
            Err(ControllerError::UnknownInitialState { .. })
        ));
        c.initial_state("idle");
        let out = c.export().unwrap();
        assert_eq!(
            out["controller.animation.demo.guard.movement"]["initial_state"],
            json!("idle")
        );
    }

    #[test]
    fn resource_controller_shares_registry() {
        let registry = ActorAssetRegistry::new("demo:guard");
        let mut c: ResourceController =
            Controller::new("demo", "guard", "effects", registry.clone());
        registry.register_particle("sparkle", "demo:sparkle");
        c.add_state("default")
            .unwrap()
            .particle("sparkle", ParticleOptions::default())
            .unwrap();
        let out = c.export().unwrap();
        assert_eq!(
            out["controller.animation.demo.guard.effects"]["states"]["default"]
                ["particle_effects"][0]["effect"],
            json!("sparkle")
        );
    }
}
