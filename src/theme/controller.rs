use super::{resolve, Palette, ThemeMode};
use crate::config::ConfigError;
use std::sync::Arc;

/// Persistence contract for the last chosen mode.
pub trait ThemeStore: Send {
    fn load(&self) -> Result<ThemeMode, ConfigError>;
    fn save(&mut self, mode: ThemeMode) -> Result<(), ConfigError>;
}

/// In-memory store for tests.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct MemoryThemeStore {
    pub mode: Option<ThemeMode>,
}

#[cfg(test)]
impl ThemeStore for MemoryThemeStore {
    fn load(&self) -> Result<ThemeMode, ConfigError> {
        Ok(self.mode.unwrap_or_default())
    }

    fn save(&mut self, mode: ThemeMode) -> Result<(), ConfigError> {
        self.mode = Some(mode);
        Ok(())
    }
}

/// Called after a mode change has been committed.
pub type ThemeListener = Box<dyn FnMut(ThemeMode, &Palette) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Mode and palette as committed together. `revision` bumps on every change.
#[derive(Debug, Clone)]
pub struct ThemeSnapshot {
    pub mode: ThemeMode,
    pub palette: Arc<Palette>,
    pub revision: u64,
}

/// Owns the current [`ThemeMode`], the palette resolved for it, and the
/// subscribers to be told when it changes.
pub struct ThemeController {
    current: ThemeSnapshot,
    listeners: Vec<(SubscriptionId, ThemeListener)>,
    next_subscription: u64,
    store: Option<Box<dyn ThemeStore>>,
}

impl ThemeController {
    pub fn new(mode: ThemeMode) -> Self {
        Self {
            current: ThemeSnapshot {
                mode,
                palette: Arc::new(resolve(mode)),
                revision: 0,
            },
            listeners: Vec::new(),
            next_subscription: 0,
            store: None,
        }
    }

    /// Start from the mode the store remembers, or `Light` if it cannot be read.
    pub fn with_store(store: Box<dyn ThemeStore>) -> Self {
        let mode = match store.load() {
            Ok(mode) => mode,
            Err(e) => {
                crate::theme_log!(
                    log::Level::Warn,
                    "Could not load saved theme, using default: {}",
                    e
                );
                ThemeMode::default()
            }
        };
        crate::theme_log!(log::Level::Info, "Starting with {:?} theme", mode);
        let mut controller = Self::new(mode);
        controller.store = Some(store);
        controller
    }

    pub fn mode(&self) -> ThemeMode {
        self.current.mode
    }

    pub fn palette(&self) -> &Palette {
        &self.current.palette
    }

    pub fn snapshot(&self) -> ThemeSnapshot {
        self.current.clone()
    }

    /// Commit `mode`, persist it, then notify subscribers.
    /// Returns `false` without doing anything if the mode is already active.
    pub fn set_mode(&mut self, mode: ThemeMode) -> bool {
        if mode == self.current.mode {
            return false;
        }

        self.current = ThemeSnapshot {
            mode,
            palette: Arc::new(resolve(mode)),
            revision: self.current.revision + 1,
        };
        crate::theme_log!(
            log::Level::Debug,
            "Committed {:?} theme (revision {})",
            mode,
            self.current.revision
        );

        if let Some(store) = self.store.as_mut() {
            if let Err(e) = store.save(mode) {
                crate::theme_log!(log::Level::Warn, "Failed to persist theme: {}", e);
            }
        }

        let palette = Arc::clone(&self.current.palette);
        for (_, listener) in self.listeners.iter_mut() {
            listener(mode, &*palette);
        }
        true
    }

    pub fn toggle_mode(&mut self) -> ThemeMode {
        let next = super::toggle(self.current.mode);
        self.set_mode(next);
        next
    }

    pub fn subscribe(&mut self, listener: ThemeListener) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, listener));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }
}

impl Default for ThemeController {
    fn default() -> Self {
        Self::new(ThemeMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ColorRole;
    use std::sync::Mutex;

    struct FailingStore;

    impl ThemeStore for FailingStore {
        fn load(&self) -> Result<ThemeMode, ConfigError> {
            Err(ConfigError::Io {
                path: "missing.yml".into(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            })
        }

        fn save(&mut self, _mode: ThemeMode) -> Result<(), ConfigError> {
            Err(ConfigError::Io {
                path: "missing.yml".into(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            })
        }
    }

    #[test]
    fn round_trip_toggle_restores_original_palette() {
        let mut controller = ThemeController::new(ThemeMode::Light);
        let original = controller.snapshot();

        assert_eq!(controller.toggle_mode(), ThemeMode::Dark);
        assert_eq!(controller.palette(), &resolve(ThemeMode::Dark));
        assert_eq!(controller.toggle_mode(), ThemeMode::Light);

        let restored = controller.snapshot();
        assert_eq!(restored.mode, ThemeMode::Light);
        assert_eq!(*restored.palette, *original.palette);
        assert_eq!(restored.revision, original.revision + 2);
    }

    #[test]
    fn snapshot_mode_and_palette_always_agree() {
        let mut controller = ThemeController::default();
        for _ in 0..5 {
            controller.toggle_mode();
            let snap = controller.snapshot();
            assert_eq!(snap.palette.mode(), snap.mode);
        }
    }

    #[test]
    fn listeners_see_committed_state() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut controller = ThemeController::new(ThemeMode::Light);
        let sink = Arc::clone(&seen);
        controller.subscribe(Box::new(move |mode, palette| {
            sink.lock().unwrap().push((mode, palette.get(ColorRole::Background)));
        }));

        controller.set_mode(ThemeMode::Dark);
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, ThemeMode::Dark);
        assert_eq!(seen[0].1, resolve(ThemeMode::Dark).get(ColorRole::Background));
    }

    #[test]
    fn setting_same_mode_is_a_no_op() {
        let calls = Arc::new(Mutex::new(0));
        let mut controller = ThemeController::new(ThemeMode::Dark);
        let counter = Arc::clone(&calls);
        controller.subscribe(Box::new(move |_, _| *counter.lock().unwrap() += 1));

        assert!(!controller.set_mode(ThemeMode::Dark));
        assert_eq!(controller.snapshot().revision, 0);
        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[test]
    fn unsubscribed_listener_is_not_called() {
        let calls = Arc::new(Mutex::new(0));
        let mut controller = ThemeController::default();
        let counter = Arc::clone(&calls);
        let id = controller.subscribe(Box::new(move |_, _| *counter.lock().unwrap() += 1));

        assert!(controller.unsubscribe(id));
        assert!(!controller.unsubscribe(id));
        controller.toggle_mode();
        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[test]
    fn store_provides_initial_mode() {
        let store = MemoryThemeStore { mode: Some(ThemeMode::Dark) };
        let controller = ThemeController::with_store(Box::new(store));
        assert_eq!(controller.mode(), ThemeMode::Dark);
    }

    #[test]
    fn failing_store_falls_back_to_light_and_still_switches() {
        let mut controller = ThemeController::with_store(Box::new(FailingStore));
        assert_eq!(controller.mode(), ThemeMode::Light);
        assert!(controller.set_mode(ThemeMode::Dark));
        assert_eq!(controller.mode(), ThemeMode::Dark);
    }
}
