/// Confirmation gate guarding an existing destination file.
///
/// A conversion request moves Idle → AwaitingConfirmation only when the
/// destination already exists; otherwise it proceeds straight away. While
/// awaiting, exactly one user response resolves the gate: confirm proceeds,
/// cancel terminates the request with no side effects. The existence check
/// is a plain check-then-act; races with concurrent filesystem changes are
/// accepted for a single-user tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteGate {
    #[default]
    Idle,
    AwaitingConfirmation,
    Proceed,
    Cancelled,
}

impl OverwriteGate {
    /// Entry transition for a conversion request.
    pub fn request(destination_exists: bool) -> Self {
        if destination_exists {
            OverwriteGate::AwaitingConfirmation
        } else {
            OverwriteGate::Proceed
        }
    }

    /// Applies the user's answer to the confirmation prompt. Only meaningful
    /// while awaiting; the terminal states are absorbing.
    pub fn resolve(self, confirmed: bool) -> Self {
        match self {
            OverwriteGate::AwaitingConfirmation => {
                if confirmed {
                    OverwriteGate::Proceed
                } else {
                    OverwriteGate::Cancelled
                }
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_destination_proceeds_without_a_prompt() {
        assert_eq!(OverwriteGate::request(false), OverwriteGate::Proceed);
    }

    #[test]
    fn existing_destination_awaits_confirmation() {
        assert_eq!(
            OverwriteGate::request(true),
            OverwriteGate::AwaitingConfirmation
        );
    }

    #[test]
    fn confirmation_proceeds_and_decline_cancels() {
        let gate = OverwriteGate::request(true);
        assert_eq!(gate.resolve(true), OverwriteGate::Proceed);
        assert_eq!(gate.resolve(false), OverwriteGate::Cancelled);
    }

    #[test]
    fn terminal_states_absorb_further_answers() {
        assert_eq!(OverwriteGate::Proceed.resolve(false), OverwriteGate::Proceed);
        assert_eq!(
            OverwriteGate::Cancelled.resolve(true),
            OverwriteGate::Cancelled
        );
        assert_eq!(OverwriteGate::Idle.resolve(true), OverwriteGate::Idle);
    }
}
