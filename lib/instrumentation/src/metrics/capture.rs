pub struct Capture<S>(Option<S>);

impl<S> Capture<S> {
    pub fn disabled() -> Self {
        Self(None)
    }

    pub fn enabled(state: S) -> Self {
        Self(Some(state))
    }

    pub fn take(self) -> Option<S> {
        self.0
    }

    pub fn is_enabled(&self) -> bool {
        self.0.is_some()
    }
}
