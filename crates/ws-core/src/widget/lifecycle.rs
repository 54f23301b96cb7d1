//! Per-mount lifecycle signal bookkeeping.

/// Tracks which host signals a mount has already emitted.
///
/// "ready" fires at most once per mount and never while loading; "error"
/// fires at most once per load attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MountSignals {
    loading: bool,
    ready_fired: bool,
    attempt: u32,
    error_fired_for_attempt: bool,
}

impl MountSignals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_loading(&mut self) {
        self.loading = true;
        self.attempt += 1;
        self.error_fired_for_attempt = false;
    }

    pub fn finish_loading(&mut self) {
        self.loading = false;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Returns `true` if the caller should emit "ready" now.
    pub fn try_ready(&mut self) -> bool {
        if self.loading || self.ready_fired {
            return false;
        }
        self.ready_fired = true;
        true
    }

    /// Returns `true` if the caller should emit "error" for the current attempt.
    pub fn try_error(&mut self) -> bool {
        if self.error_fired_for_attempt {
            return false;
        }
        self.error_fired_for_attempt = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_fires_once() {
        let mut signals = MountSignals::new();
        assert!(signals.try_ready());
        assert!(!signals.try_ready());
    }

    #[test]
    fn ready_never_fires_while_loading() {
        let mut signals = MountSignals::new();
        signals.begin_loading();
        assert!(!signals.try_ready());
        signals.finish_loading();
        assert!(signals.try_ready());
    }

    #[test]
    fn error_fires_once_per_attempt() {
        let mut signals = MountSignals::new();
        signals.begin_loading();
        assert!(signals.try_error());
        assert!(!signals.try_error());
        signals.begin_loading();
        assert_eq!(signals.attempt(), 2);
        assert!(signals.try_error());
    }
}
