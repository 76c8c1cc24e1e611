//! The path matcher's breadcrumb.

/// Number of nesting levels tracked.
pub const BREADCRUMB_DEPTH: usize = 10;

/// The currently active name at each nesting level.
///
/// Slots are overwritten as lines at that level are consumed; deeper slots
/// are left stale until a deeper line overwrites them, so callers only read
/// paths up to the level they have just updated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Breadcrumb {
    slots: [Option<String>; BREADCRUMB_DEPTH],
}

impl Breadcrumb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set slot `level` to `name`, ignoring anything after a colon. Levels
    /// past the last slot are written to the last slot.
    pub fn update(&mut self, level: usize, name: &str) {
        let name = match name.split_once(':') {
            Some((name, _)) => name,
            None => name,
        };
        let level = level.min(BREADCRUMB_DEPTH - 1);
        self.slots[level] = Some(name.to_string());
    }

    pub fn get(&self, level: usize) -> Option<&str> {
        self.slots.get(level).and_then(Option::as_deref)
    }

    /// Dotted path of slots `0..=level`; empty slots are skipped.
    pub fn combined(&self, level: usize) -> String {
        let last = level.min(BREADCRUMB_DEPTH - 1);
        self.slots[..=last]
            .iter()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(".")
    }
}
