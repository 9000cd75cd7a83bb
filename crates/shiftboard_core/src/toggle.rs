/// Where an optimistic toggle is in its request lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TogglePhase {
    #[default]
    Idle,
    /// Request in flight; `previous` is what to restore on failure.
    Pending { previous: bool },
    Committed,
    RolledBack,
}

/// Visible selection state of one shift in a volunteer's shift picker.
///
/// `idle -> pending -> committed` on success, `idle -> pending -> rolledBack`
/// on failure. The visible value flips as soon as the request starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShiftToggle {
    selected: bool,
    phase: TogglePhase,
}

impl ShiftToggle {
    pub fn new(selected: bool) -> Self {
        Self {
            selected,
            phase: TogglePhase::Idle,
        }
    }

    pub fn selected(&self) -> bool {
        self.selected
    }

    pub fn phase(&self) -> TogglePhase {
        self.phase
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.phase, TogglePhase::Pending { .. })
    }

    /// Flips the visible selection and returns the value to submit.
    /// Returns `None` while an earlier request is still pending.
    pub fn begin(&mut self) -> Option<bool> {
        if self.is_pending() {
            return None;
        }
        let previous = self.selected;
        self.selected = !previous;
        self.phase = TogglePhase::Pending { previous };
        Some(self.selected)
    }

    pub fn commit(&mut self) {
        if self.is_pending() {
            self.phase = TogglePhase::Committed;
        }
    }

    pub fn roll_back(&mut self) {
        if let TogglePhase::Pending { previous } = self.phase {
            self.selected = previous;
            self.phase = TogglePhase::RolledBack;
        }
    }

    /// Adopts the server's view after a refetch. Ignored mid-request so a
    /// stale snapshot cannot undo the optimistic flip.
    pub fn sync(&mut self, selected: bool) {
        if !self.is_pending() {
            self.selected = selected;
        }
    }
}
