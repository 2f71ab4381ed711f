//! Windows desktop and window capture to in-memory BMP, plus a
//! platform-agnostic BMP decoder.
//!
//! [`CaptureEngine`] captures the screen (or a sub-rectangle) and
//! individual top-level windows through GDI, returning self-contained
//! BMP byte streams at 1/4/8/16/24/32 bits per pixel, and answers
//! window enumeration and geometry queries. [`bmp_to_rgb`] decodes any
//! BMP stream — including this crate's output — into packed RGB/RGBA
//! pixels, and works on every platform.

pub mod bmp;
pub mod engine;
pub mod error;
mod platform;
pub mod region;
pub mod window;

pub use bmp::{BitDepth, BmpImage, PaletteType, RgbImage, bmp_to_rgb};
pub use engine::{CaptureEngine, CaptureOptions};
pub use error::{CaptureError, CaptureErrorClass, CaptureResult};
pub use region::{CaptureArea, Rect, Size};
pub use window::{WindowId, WindowInfo, WindowSelector, WindowStyle};

/// Capture the screen once with a throwaway engine.
pub fn capture_screen_once(options: CaptureOptions, area: CaptureArea) -> CaptureResult<Vec<u8>> {
    CaptureEngine::with_options(options)?.capture_screen(area)
}

/// Capture a window once with a throwaway engine.
pub fn capture_window_once(
    options: CaptureOptions,
    selector: &WindowSelector,
) -> CaptureResult<Vec<u8>> {
    CaptureEngine::with_options(options)?.capture_window(selector)
}
