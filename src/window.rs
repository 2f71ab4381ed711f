//! Window identity, selection, and metadata snapshots.

use std::fmt;

use crate::region::Rect;

/// Opaque handle to a top-level window. The OS owns the underlying
/// handle; this crate only borrows it and never validates liveness —
/// a stale handle surfaces as a native failure on next use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WindowId {
    handle: isize,
}

impl WindowId {
    pub const fn from_raw_handle(raw_handle: isize) -> Self {
        Self { handle: raw_handle }
    }

    pub const fn raw_handle(&self) -> isize {
        self.handle
    }

    pub fn stable_id(&self) -> String {
        format!("{:016x}", self.handle as usize as u64)
    }
}

/// Identifies a top-level window for capture and geometry queries.
///
/// Title and class name match case-sensitively and exactly. The first
/// visible window in sibling order wins. A `Handle` selector is passed
/// through untouched — callers holding a handle are trusted, including
/// for invisible windows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WindowSelector {
    Title(String),
    ClassName(String),
    ProcessId(u32),
    Handle(WindowId),
}

impl WindowSelector {
    pub fn by_title(title: impl Into<String>) -> Self {
        Self::Title(title.into())
    }

    pub fn by_class_name(class_name: impl Into<String>) -> Self {
        Self::ClassName(class_name.into())
    }

    pub fn by_process_id(process_id: u32) -> Self {
        Self::ProcessId(process_id)
    }

    pub fn by_handle(id: WindowId) -> Self {
        Self::Handle(id)
    }
}

impl fmt::Display for WindowSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Title(title) => write!(f, "title {title:?}"),
            Self::ClassName(class_name) => write!(f, "class name {class_name:?}"),
            Self::ProcessId(pid) => write!(f, "process id {pid}"),
            Self::Handle(id) => write!(f, "handle {}", id.stable_id()),
        }
    }
}

/// Style bits of interest, decoded from the window's style word.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WindowStyle {
    pub is_minimized: bool,
    pub is_maximized: bool,
    pub is_disabled: bool,
}

/// A point-in-time snapshot of one top-level window. The handle may be
/// invalidated by the OS independently of the snapshot.
#[derive(Clone, Debug)]
pub struct WindowInfo {
    pub id: WindowId,
    pub title: String,
    pub class_name: String,
    pub process_id: u32,
    /// DPI-scaled window rectangle in device pixels.
    pub position: Rect,
    pub style: WindowStyle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_display_names_the_discriminant() {
        assert_eq!(
            WindowSelector::by_title("Notepad").to_string(),
            "title \"Notepad\""
        );
        assert_eq!(WindowSelector::by_process_id(42).to_string(), "process id 42");
        assert_eq!(
            WindowSelector::by_handle(WindowId::from_raw_handle(0x1234)).to_string(),
            "handle 0000000000001234"
        );
    }

    #[test]
    fn window_id_round_trips_the_raw_handle() {
        let id = WindowId::from_raw_handle(-1);
        assert_eq!(id.raw_handle(), -1);
    }
}
