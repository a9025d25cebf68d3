//! State machine trait for lifecycle status enums.

use super::ValidationError;

/// A status enum with a fixed set of legal transitions.
///
/// Implementors describe the transition table once; `transition_to` and
/// `is_terminal` are derived from it.
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if moving from `self` to `target` is allowed.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Lists every state reachable in one step from `self`.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Moves to `target`, or reports the rejected transition.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_transition(self, target))
        }
    }

    /// A state with no outgoing transitions.
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Light {
        Off,
        On,
        Broken,
    }

    impl StateMachine for Light {
        fn can_transition_to(&self, target: &Self) -> bool {
            self.valid_transitions().contains(target)
        }

        fn valid_transitions(&self) -> Vec<Self> {
            match self {
                Light::Off => vec![Light::On, Light::Broken],
                Light::On => vec![Light::Off, Light::Broken],
                Light::Broken => vec![],
            }
        }
    }

    #[test]
    fn allowed_transition_returns_target() {
        assert_eq!(Light::Off.transition_to(Light::On), Ok(Light::On));
    }

    #[test]
    fn rejected_transition_names_both_states() {
        let err = Light::Broken.transition_to(Light::On).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidTransition {
                from: "Broken".to_string(),
                to: "On".to_string(),
            }
        );
    }

    #[test]
    fn terminal_state_has_no_exits() {
        assert!(Light::Broken.is_terminal());
        assert!(!Light::On.is_terminal());
    }
}
