/// A high-level viewer action.
///
/// The viewer consumes actions, never raw input events. Distances are world
/// units and angles are degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    MoveForwards(f32),
    MoveBackwards(f32),
    MoveLeft(f32),
    MoveRight(f32),
    PanLeft(f32),
    PanRight(f32),
    /// Combined look: `yaw` about up (positive turns left), `pitch` about
    /// the right vector.
    Look { yaw: f32, pitch: f32 },
    /// Clear the block at the camera's look-at point.
    RemoveBlock,
    /// Fill the block at the camera's look-at point.
    AddBlock,
    LockPointer,
    ReleasePointer,
}

impl Action {
    /// True for actions that edit the world rather than the view.
    pub fn is_edit(&self) -> bool {
        matches!(self, Action::RemoveBlock | Action::AddBlock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_are_flagged() {
        assert!(Action::RemoveBlock.is_edit());
        assert!(Action::AddBlock.is_edit());
        assert!(!Action::MoveForwards(0.2).is_edit());
        assert!(!Action::Look { yaw: 1.0, pitch: 0.0 }.is_edit());
    }
}
