// Asset and group lifecycle states

use std::fmt;

/// Lifecycle of a single asset within one load invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AssetState {
    /// Declared, requirements not yet met
    #[default]
    Pending,
    /// Handed to the media starter, waiting for its callback
    Ready,
    /// Terminal success
    Loaded,
    /// Terminal failure, blocks every transitive dependent
    Failed,
}

impl AssetState {
    /// Check if the asset has reached a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Loaded | Self::Failed)
    }

    /// Check if the media starter may still report on this asset
    pub fn awaits_callback(&self) -> bool {
        matches!(self, Self::Ready)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Ready => "ready",
            Self::Loaded => "loaded",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for AssetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lifecycle of a group. There is no failed state: a group with a failed
/// member stays pending forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GroupState {
    #[default]
    Pending,
    Satisfied,
}

impl GroupState {
    pub fn is_satisfied(&self) -> bool {
        matches!(self, Self::Satisfied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_states() {
        assert_eq!(AssetState::default(), AssetState::Pending);
        assert_eq!(GroupState::default(), GroupState::Pending);
    }

    #[test]
    fn test_terminal_states() {
        assert!(!AssetState::Pending.is_terminal());
        assert!(!AssetState::Ready.is_terminal());
        assert!(AssetState::Loaded.is_terminal());
        assert!(AssetState::Failed.is_terminal());
    }

    #[test]
    fn test_only_ready_awaits_callback() {
        assert!(AssetState::Ready.awaits_callback());
        assert!(!AssetState::Pending.awaits_callback());
        assert!(!AssetState::Loaded.awaits_callback());
        assert!(!AssetState::Failed.awaits_callback());
    }

    #[test]
    fn test_state_display() {
        assert_eq!(AssetState::Ready.to_string(), "ready");
        assert!(GroupState::Satisfied.is_satisfied());
    }
}
