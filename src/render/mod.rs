//! Draw command recording and the scene context geometry binds against

pub mod command;
pub mod context;

pub use command::{Command, OBJECT_UNIFORM_SLOT, UniformBinding, UniformSlot};
pub use context::SceneContext;
