use std::sync::{Arc, Mutex, PoisonError};
use tracing::trace;

/// Whatever owns the display title (terminal window, status line, tab).
pub trait TitleHost: Send + Sync {
    fn set_title(&self, title: &str);
}

/// Title held in memory; the CLI renders it as a header line.
#[derive(Clone)]
pub struct SharedTitle {
    current: Arc<Mutex<String>>,
}

impl SharedTitle {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            current: Arc::new(Mutex::new(initial.into())),
        }
    }

    pub fn current(&self) -> String {
        self.current.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl TitleHost for SharedTitle {
    fn set_title(&self, title: &str) {
        trace!("Display title -> {:?}", title);
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = title.to_string();
    }
}

/// Overrides the host title for as long as it lives.
///
/// Dropping the guard (including while unwinding) puts `restore` back.
pub struct TitleGuard {
    host: Arc<dyn TitleHost>,
    restore: String,
}

impl TitleGuard {
    pub fn new(host: Arc<dyn TitleHost>, title: &str, restore: impl Into<String>) -> Self {
        host.set_title(title);
        Self {
            host,
            restore: restore.into(),
        }
    }
}

impl Drop for TitleGuard {
    fn drop(&mut self) {
        self.host.set_title(&self.restore);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    #[test]
    fn test_guard_sets_and_restores() {
        let title = SharedTitle::new("usePopcorn");
        {
            let _guard = TitleGuard::new(Arc::new(title.clone()), "Movie | Heat", "usePopcorn");
            assert_eq!(title.current(), "Movie | Heat");
        }
        assert_eq!(title.current(), "usePopcorn");
    }

    #[test]
    fn test_guard_restores_on_panic() {
        let title = SharedTitle::new("usePopcorn");
        let host: Arc<dyn TitleHost> = Arc::new(title.clone());

        let result = catch_unwind(AssertUnwindSafe(|| {
            let _guard = TitleGuard::new(Arc::clone(&host), "Movie | Heat", "usePopcorn");
            panic!("view blew up");
        }));

        assert!(result.is_err());
        assert_eq!(title.current(), "usePopcorn");
    }
}
