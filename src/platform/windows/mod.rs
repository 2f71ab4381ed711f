pub(crate) mod cursor;
pub(crate) mod enumerate;
pub(crate) mod gdi;

use log::debug;

use crate::engine::CaptureOptions;
use crate::error::CaptureResult;
use crate::region::{CaptureArea, Rect};
use crate::window::{WindowInfo, WindowSelector};

pub(crate) fn capture_screen(
    options: &CaptureOptions,
    area: CaptureArea,
) -> CaptureResult<Vec<u8>> {
    // Avoid the screen-rect query when every edge was given explicitly.
    let rect = match area.fully_specified() {
        Some(rect) => rect,
        None => area.resolve(enumerate::screen_rect()?),
    };
    rect.size()?;
    debug!(
        "capturing screen region ({}, {}, {}, {}) at {} bpp",
        rect.left,
        rect.top,
        rect.right,
        rect.bottom,
        options.bit_depth.bits()
    );
    gdi::capture_screen_rect(options, rect)
}

pub(crate) fn capture_window(
    options: &CaptureOptions,
    selector: &WindowSelector,
) -> CaptureResult<Vec<u8>> {
    let hwnd = enumerate::resolve(selector)?;
    let rect = enumerate::scaled_window_rect(hwnd)?;
    rect.size()?;
    debug!(
        "capturing window {selector} with scaled rect ({}, {}, {}, {})",
        rect.left, rect.top, rect.right, rect.bottom
    );
    gdi::capture_window_rect(options, hwnd, rect)
}

pub(crate) fn screen_rect() -> CaptureResult<Rect> {
    enumerate::screen_rect()
}

pub(crate) fn window_rect(selector: &WindowSelector) -> CaptureResult<Rect> {
    let hwnd = enumerate::resolve(selector)?;
    enumerate::scaled_window_rect(hwnd)
}

pub(crate) fn window_list() -> CaptureResult<Vec<WindowInfo>> {
    enumerate::window_list()
}
