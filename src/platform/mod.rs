#[cfg(target_os = "windows")]
pub(crate) mod windows;

#[cfg(target_os = "windows")]
pub(crate) use windows::{capture_screen, capture_window, screen_rect, window_list, window_rect};

#[cfg(not(target_os = "windows"))]
mod unsupported {
    use crate::engine::CaptureOptions;
    use crate::error::{CaptureError, CaptureResult};
    use crate::region::{CaptureArea, Rect};
    use crate::window::{WindowInfo, WindowSelector};

    fn unsupported_error() -> CaptureError {
        CaptureError::Platform(anyhow::anyhow!(
            "screen capture is only supported on Windows"
        ))
    }

    pub(crate) fn capture_screen(
        _options: &CaptureOptions,
        _area: CaptureArea,
    ) -> CaptureResult<Vec<u8>> {
        Err(unsupported_error())
    }

    pub(crate) fn capture_window(
        _options: &CaptureOptions,
        _selector: &WindowSelector,
    ) -> CaptureResult<Vec<u8>> {
        Err(unsupported_error())
    }

    pub(crate) fn screen_rect() -> CaptureResult<Rect> {
        Err(unsupported_error())
    }

    pub(crate) fn window_rect(_selector: &WindowSelector) -> CaptureResult<Rect> {
        Err(unsupported_error())
    }

    pub(crate) fn window_list() -> CaptureResult<Vec<WindowInfo>> {
        Err(unsupported_error())
    }
}

#[cfg(not(target_os = "windows"))]
pub(crate) use unsupported::{
    capture_screen, capture_window, screen_rect, window_list, window_rect,
};
