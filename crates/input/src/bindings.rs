use crate::action::Action;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum BindingError {
    #[error("expected KEY=COMMAND, got '{0}'")]
    Malformed(String),

    #[error("key must be a single character, got '{0}'")]
    BadKey(String),

    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("{name} must be finite and non-negative, got {value}")]
    BadSpeed { name: &'static str, value: f32 },
}

/// Keys the viewer distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Escape,
}

/// Pointer buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Left,
    Right,
    Middle,
}

/// What a bound key does, before speeds are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Forwards,
    Backwards,
    Left,
    Right,
    PanLeft,
    PanRight,
}

impl KeyCommand {
    const NAMES: [(&'static str, KeyCommand); 6] = [
        ("forwards", KeyCommand::Forwards),
        ("backwards", KeyCommand::Backwards),
        ("left", KeyCommand::Left),
        ("right", KeyCommand::Right),
        ("pan-left", KeyCommand::PanLeft),
        ("pan-right", KeyCommand::PanRight),
    ];

    pub fn name(self) -> &'static str {
        Self::NAMES
            .iter()
            .find(|(_, c)| *c == self)
            .map_or("?", |(n, _)| n)
    }
}

impl fmt::Display for KeyCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KeyCommand {
    type Err = BindingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::NAMES
            .iter()
            .find(|(n, _)| *n == s)
            .map(|(_, c)| *c)
            .ok_or_else(|| BindingError::UnknownCommand(s.to_string()))
    }
}

/// Key and pointer-button bindings with movement and pan speeds.
///
/// Defaults: w/s move forwards/backwards, a/d strafe, q/e pan, all at speed
/// 0.2 and 5 degrees per press. Left button removes a block, right adds one,
/// and any press while unlocked also requests pointer lock. Escape releases
/// the pointer.
#[derive(Debug, Clone)]
pub struct Bindings {
    keys: BTreeMap<char, KeyCommand>,
    move_speed: f32,
    pan_speed: f32,
}

impl Default for Bindings {
    fn default() -> Self {
        let keys = [
            ('w', KeyCommand::Forwards),
            ('s', KeyCommand::Backwards),
            ('a', KeyCommand::Left),
            ('d', KeyCommand::Right),
            ('q', KeyCommand::PanLeft),
            ('e', KeyCommand::PanRight),
        ]
        .into_iter()
        .collect();
        Self {
            keys,
            move_speed: Self::DEFAULT_MOVE_SPEED,
            pan_speed: Self::DEFAULT_PAN_SPEED,
        }
    }
}

impl Bindings {
    pub const DEFAULT_MOVE_SPEED: f32 = 0.2;
    pub const DEFAULT_PAN_SPEED: f32 = 5.0;

    pub fn with_speeds(move_speed: f32, pan_speed: f32) -> Result<Self, BindingError> {
        Ok(Self {
            move_speed: check_speed("move speed", move_speed)?,
            pan_speed: check_speed("pan speed", pan_speed)?,
            ..Self::default()
        })
    }

    pub fn move_speed(&self) -> f32 {
        self.move_speed
    }

    pub fn pan_speed(&self) -> f32 {
        self.pan_speed
    }

    /// Bind `key` to `command`, replacing any previous binding of that key.
    pub fn bind(&mut self, key: char, command: KeyCommand) {
        if let Some(old) = self.keys.insert(key, command) {
            tracing::debug!("rebound '{key}' from {old} to {command}");
        }
    }

    /// Apply a `KEY=COMMAND` override such as `i=forwards`.
    pub fn apply_spec(&mut self, spec: &str) -> Result<(), BindingError> {
        let (key, command) = spec
            .split_once('=')
            .ok_or_else(|| BindingError::Malformed(spec.to_string()))?;
        let mut chars = key.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return Err(BindingError::BadKey(key.to_string()));
        };
        self.bind(c, command.trim().parse()?);
        Ok(())
    }

    pub fn command(&self, key: char) -> Option<KeyCommand> {
        self.keys.get(&key).copied()
    }

    /// Action for a key press, if the key is bound.
    pub fn key(&self, key: Key) -> Option<Action> {
        let c = match key {
            Key::Escape => return Some(Action::ReleasePointer),
            Key::Char(c) => c,
        };
        let (m, p) = (self.move_speed, self.pan_speed);
        self.command(c).map(|command| match command {
            KeyCommand::Forwards => Action::MoveForwards(m),
            KeyCommand::Backwards => Action::MoveBackwards(m),
            KeyCommand::Left => Action::MoveLeft(m),
            KeyCommand::Right => Action::MoveRight(m),
            KeyCommand::PanLeft => Action::PanLeft(p),
            KeyCommand::PanRight => Action::PanRight(p),
        })
    }

    /// Actions for a pointer-button press.
    pub fn button(&self, button: Button, pointer_locked: bool) -> Vec<Action> {
        let mut actions = Vec::with_capacity(2);
        match button {
            Button::Left => actions.push(Action::RemoveBlock),
            Button::Right => actions.push(Action::AddBlock),
            Button::Middle => {}
        }
        if !pointer_locked {
            actions.push(Action::LockPointer);
        }
        actions
    }
}

fn check_speed(name: &'static str, value: f32) -> Result<f32, BindingError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(BindingError::BadSpeed { name, value })
    }
}
