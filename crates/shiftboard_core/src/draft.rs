/// A locally edited copy of a server record next to the last copy the server
/// returned.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Draft<T> {
    saved: T,
    current: T,
}

impl<T: Clone + PartialEq> Draft<T> {
    pub fn new(saved: T) -> Self {
        Self {
            current: saved.clone(),
            saved,
        }
    }

    pub fn saved(&self) -> &T {
        &self.saved
    }

    pub fn current(&self) -> &T {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut T {
        &mut self.current
    }

    pub fn is_modified(&self) -> bool {
        self.saved != self.current
    }

    /// Adopts a fresh server copy. An untouched draft is replaced outright;
    /// an edited one keeps its edits and lets `merge` pull in what the
    /// editor does not own.
    pub fn rebase(&mut self, fresh: T, merge: impl FnOnce(&mut T, &T)) {
        if self.is_modified() {
            merge(&mut self.current, &fresh);
        } else {
            self.current = fresh.clone();
        }
        self.saved = fresh;
    }

    /// The server accepted a save and echoed back `saved`.
    pub fn commit(&mut self, saved: T) {
        self.current = saved.clone();
        self.saved = saved;
    }
}
