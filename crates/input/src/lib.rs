//! Input mapping: keys, pointer buttons and pointer motion to viewer actions.
//!
//! # Invariants
//! - Consumers see only `Action`s, never raw window events.
//! - Accumulated mouse-look pitch never exceeds `MouseLook::MAX_PITCH`.

pub mod action;
pub mod bindings;
pub mod look;

pub use action::Action;
pub use bindings::{BindingError, Bindings, Button, Key, KeyCommand};
pub use look::MouseLook;

pub fn crate_info() -> &'static str {
    "virtworld-input v0.1.0"
}
