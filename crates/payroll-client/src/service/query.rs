//! Cached remote value with loading and staleness flags.

/// A remote read whose last value stays visible while it is refetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query<T> {
    value: Option<T>,
    fetching: bool,
    stale: bool,
    error: Option<String>,
}

impl<T> Default for Query<T> {
    fn default() -> Self {
        Self {
            value: None,
            fetching: false,
            stale: true,
            error: None,
        }
    }
}

impl<T> Query<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Fetching with nothing to show yet.
    pub fn is_loading(&self) -> bool {
        self.fetching && self.value.is_none()
    }

    pub fn is_fetching(&self) -> bool {
        self.fetching
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Neither a value nor a failure yet.
    pub fn is_pending(&self) -> bool {
        self.value.is_none() && self.error.is_none()
    }

    /// Stale and no fetch already running.
    pub fn needs_fetch(&self) -> bool {
        self.stale && !self.fetching
    }

    pub fn begin(&mut self) {
        self.fetching = true;
    }

    pub fn resolve(&mut self, value: T) {
        self.value = Some(value);
        self.fetching = false;
        self.stale = false;
        self.error = None;
    }

    /// Keeps the previous value. The query stays stale so the next
    /// refresh retries it.
    pub fn fail(&mut self, error: impl ToString) {
        self.fetching = false;
        self.error = Some(error.to_string());
    }

    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
