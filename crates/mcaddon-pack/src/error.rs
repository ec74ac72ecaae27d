//! Animation controller error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(
        "state '{state}' referenced by a transition in controller '{controller}' of actor '{actor}' is not declared"
    )]
    UnknownTransitionTarget {
        state: String,
        controller: String,
        actor: String,
    },

    #[error("initial state '{state}' of controller '{controller}' of actor '{actor}' is not declared")]
    UnknownInitialState {
        state: String,
        controller: String,
        actor: String,
    },

    #[error("controller '{controller}' is already declared on actor '{actor}'")]
    DuplicateController { controller: String, actor: String },

    #[error("state '{state}' is already declared in controller '{controller}'")]
    DuplicateState { state: String, controller: String },

    #[error("resource pack controllers only accept expression commands, got '{command}'")]
    InvalidResourceCommand { command: String },

    #[error("particle effect '{effect}' is not registered on actor '{actor}'")]
    UnregisteredParticle { effect: String, actor: String },

    #[error("sound effect '{effect}' is not registered on actor '{actor}'")]
    UnregisteredSound { effect: String, actor: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
