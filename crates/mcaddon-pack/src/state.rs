//! Controller states for behavior pack and resource pack controllers.
//!
//! A state starts out *default* (inert). The first mutating call flips it, and
//! only non-default states are written when the controller is exported.

use serde_json::{json, Map, Value};

use crate::assets::ActorAssetRegistry;
use crate::command::Command;
use crate::error::ControllerError;

/// An entry of a state's `animations` list.
#[derive(Debug, Clone, PartialEq)]
pub enum AnimationEntry {
    Always(String),
    When { name: String, condition: String },
}

impl AnimationEntry {
    fn to_wire(&self) -> Value {
        match self {
            AnimationEntry::Always(name) => Value::String(name.clone()),
            AnimationEntry::When { name, condition } => json!({ name.clone(): condition }),
        }
    }
}

/// An outgoing edge: switch to `target` when `condition` evaluates true.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub target: String,
    pub condition: String,
}

/// Fields shared by both state flavours.
#[derive(Debug, Clone)]
pub struct StateCore {
    name: String,
    default: bool,
    on_entry: Vec<Command>,
    on_exit: Vec<Command>,
    animations: Vec<AnimationEntry>,
    transitions: Vec<Transition>,
    blend_transition: Option<f64>,
    blend_via_shortest_path: bool,
}

impl StateCore {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            default: true,
            on_entry: Vec::new(),
            on_exit: Vec::new(),
            animations: Vec::new(),
            transitions: Vec::new(),
            blend_transition: None,
            blend_via_shortest_path: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `true` until the state receives its first mutation.
    pub fn is_default(&self) -> bool {
        self.default
    }

    pub fn on_entry(&self) -> &[Command] {
        &self.on_entry
    }

    pub fn on_exit(&self) -> &[Command] {
        &self.on_exit
    }

    pub fn animations(&self) -> &[AnimationEntry] {
        &self.animations
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    fn touch(&mut self) -> &mut Self {
        self.default = false;
        self
    }

    fn push_entry(&mut self, commands: Vec<Command>) {
        self.touch().on_entry.extend(commands);
    }

    fn push_exit(&mut self, commands: Vec<Command>) {
        self.touch().on_exit.extend(commands);
    }

    fn push_animation(&mut self, name: &str, condition: Option<&str>) {
        let entry = match condition {
            Some(condition) => AnimationEntry::When {
                name: name.to_string(),
                condition: condition.to_string(),
            },
            None => AnimationEntry::Always(name.to_string()),
        };
        self.touch().animations.push(entry);
    }

    fn push_transition(&mut self, target: &str, condition: &str) {
        self.touch().transitions.push(Transition {
            target: target.to_string(),
            condition: condition.to_string(),
        });
    }

    fn set_blend_transition(&mut self, seconds: f64) {
        self.touch().blend_transition = Some(seconds);
    }

    fn set_blend_via_shortest_path(&mut self) {
        self.touch().blend_via_shortest_path = true;
    }

    fn to_wire(&self) -> Map<String, Value> {
        let commands = |list: &[Command]| -> Value {
            list.iter().map(|c| Value::from(c.as_wire())).collect()
        };

        let mut body = Map::new();
        body.insert("on_entry".into(), commands(&self.on_entry));
        body.insert("on_exit".into(), commands(&self.on_exit));
        body.insert(
            "animations".into(),
            self.animations.iter().map(AnimationEntry::to_wire).collect(),
        );
        body.insert(
            "transitions".into(),
            self.transitions
                .iter()
                .map(|t| json!({ t.target.clone(): t.condition }))
                .collect(),
        );
        if let Some(seconds) = self.blend_transition {
            body.insert("blend_transition".into(), json!(seconds));
        }
        if self.blend_via_shortest_path {
            body.insert("blend_via_shortest_path".into(), Value::Bool(true));
        }
        body
    }
}

/// Behaviour common to every controller state.
///
/// The provided builder methods all flip the state out of its default flag and
/// return `self` for chaining.
pub trait ControllerState: Sized {
    /// Whatever the owning actor hands to each new state.
    type Context: Clone;

    fn new(name: &str, context: Self::Context) -> Self;

    fn core(&self) -> &StateCore;

    fn core_mut(&mut self) -> &mut StateCore;

    /// Serialized state body (the value under `states.<name>`).
    fn to_wire(&self) -> Value;

    fn name(&self) -> &str {
        self.core().name()
    }

    fn is_default(&self) -> bool {
        self.core().is_default()
    }

    /// Play `name`, optionally only while `condition` holds.
    fn animation(&mut self, name: &str, condition: Option<&str>) -> &mut Self {
        self.core_mut().push_animation(name, condition);
        self
    }

    /// Add a transition; the target is only checked when the controller is validated.
    fn transition(&mut self, target: &str, condition: &str) -> &mut Self {
        self.core_mut().push_transition(target, condition);
        self
    }

    fn blend_transition(&mut self, seconds: f64) -> &mut Self {
        self.core_mut().set_blend_transition(seconds);
        self
    }

    fn blend_via_shortest_path(&mut self) -> &mut Self {
        self.core_mut().set_blend_via_shortest_path();
        self
    }
}

// ─── Behavior pack ──────────────────────────────────────────────────────────

/// A state of a behavior pack controller. Accepts every command kind.
#[derive(Debug, Clone)]
pub struct BehaviorState {
    core: StateCore,
}

impl BehaviorState {
    pub fn on_entry<I, S>(&mut self, commands: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.core.push_entry(classify_all(commands));
        self
    }

    pub fn on_exit<I, S>(&mut self, commands: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.core.push_exit(classify_all(commands));
        self
    }
}

impl ControllerState for BehaviorState {
    type Context = ();

    fn new(name: &str, _context: ()) -> Self {
        Self {
            core: StateCore::new(name),
        }
    }

    fn core(&self) -> &StateCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut StateCore {
        &mut self.core
    }

    fn to_wire(&self) -> Value {
        Value::Object(self.core.to_wire())
    }
}

// ─── Resource pack ──────────────────────────────────────────────────────────

/// Placement options for a particle effect.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleOptions {
    pub locator: String,
    pub pre_effect_script: Option<String>,
    pub bind_to_actor: bool,
}

impl Default for ParticleOptions {
    fn default() -> Self {
        Self {
            locator: "root".into(),
            pre_effect_script: None,
            bind_to_actor: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParticleEffect {
    pub effect: String,
    pub options: ParticleOptions,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SoundEffect {
    pub effect: String,
    pub locator: String,
}

/// A state of a resource pack controller.
///
/// Entry and exit commands must be Molang expressions, and particle and sound
/// effects must be registered on the owning actor.
#[derive(Debug, Clone)]
pub struct ResourceState {
    core: StateCore,
    registry: ActorAssetRegistry,
    particle_effects: Vec<ParticleEffect>,
    sound_effects: Vec<SoundEffect>,
}

impl ResourceState {
    pub fn on_entry<I, S>(&mut self, commands: I) -> Result<&mut Self, ControllerError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let commands = expressions_only(commands)?;
        self.core.push_entry(commands);
        Ok(self)
    }

    pub fn on_exit<I, S>(&mut self, commands: I) -> Result<&mut Self, ControllerError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let commands = expressions_only(commands)?;
        self.core.push_exit(commands);
        Ok(self)
    }

    /// Append `variable = value;` to the entry commands.
    pub fn on_entry_assign(&mut self, variable: &str, value: &str) -> &mut Self {
        self.core
            .push_entry(vec![Command::assignment(variable, value)]);
        self
    }

    /// Append `variable = value;` to the exit commands.
    pub fn on_exit_assign(&mut self, variable: &str, value: &str) -> &mut Self {
        self.core.push_exit(vec![Command::assignment(variable, value)]);
        self
    }

    /// Emit a registered particle effect while in this state.
    pub fn particle(
        &mut self,
        effect: &str,
        options: ParticleOptions,
    ) -> Result<&mut Self, ControllerError> {
        if !self.registry.has_particle(effect) {
            return Err(ControllerError::UnregisteredParticle {
                effect: effect.to_string(),
                actor: self.registry.actor().to_string(),
            });
        }
        self.core.touch();
        self.particle_effects.push(ParticleEffect {
            effect: effect.to_string(),
            options,
        });
        Ok(self)
    }

    /// Play a registered sound effect when entering this state.
    pub fn sound_effect(&mut self, effect: &str, locator: &str) -> Result<&mut Self, ControllerError> {
        if !self.registry.has_sound(effect) {
            return Err(ControllerError::UnregisteredSound {
                effect: effect.to_string(),
                actor: self.registry.actor().to_string(),
            });
        }
        self.core.touch();
        self.sound_effects.push(SoundEffect {
            effect: effect.to_string(),
            locator: locator.to_string(),
        });
        Ok(self)
    }

    pub fn particle_effects(&self) -> &[ParticleEffect] {
        &self.particle_effects
    }

    pub fn sound_effects(&self) -> &[SoundEffect] {
        &self.sound_effects
    }
}

impl ControllerState for ResourceState {
    type Context = ActorAssetRegistry;

    fn new(name: &str, registry: ActorAssetRegistry) -> Self {
        Self {
            core: StateCore::new(name),
            registry,
            particle_effects: Vec::new(),
            sound_effects: Vec::new(),
        }
    }

    fn core(&self) -> &StateCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut StateCore {
        &mut self.core
    }

    fn to_wire(&self) -> Value {
        let mut body = self.core.to_wire();
        if !self.particle_effects.is_empty() {
            let particles = self
                .particle_effects
                .iter()
                .map(|p| {
                    let mut entry = Map::new();
                    entry.insert("effect".into(), Value::from(p.effect.as_str()));
                    entry.insert("locator".into(), Value::from(p.options.locator.as_str()));
                    if let Some(script) = &p.options.pre_effect_script {
                        entry.insert("pre_effect_script".into(), Value::from(script.as_str()));
                    }
                    entry.insert("bind_to_actor".into(), Value::Bool(p.options.bind_to_actor));
                    Value::Object(entry)
                })
                .collect();
            body.insert("particle_effects".into(), particles);
        }
        if !self.sound_effects.is_empty() {
            let sounds = self
                .sound_effects
                .iter()
                .map(|s| json!({ "effect": s.effect, "locator": s.locator }))
                .collect();
            body.insert("sound_effects".into(), sounds);
        }
        Value::Object(body)
    }
}

fn classify_all<I, S>(commands: I) -> Vec<Command>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    commands
        .into_iter()
        .map(|c| Command::classify(c.as_ref()))
        .collect()
}

/// Classify every command, rejecting the batch if any is not an expression.
fn expressions_only<I, S>(commands: I) -> Result<Vec<Command>, ControllerError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    commands
        .into_iter()
        .map(|raw| {
            let raw = raw.as_ref();
            match Command::classify(raw) {
                cmd @ Command::Expression(_) => Ok(cmd),
                _ => Err(ControllerError::InvalidResourceCommand {
                    command: raw.to_string(),
                }),
            }
        })
        .collect()
}
