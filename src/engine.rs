//! The public capture engine.
//!
//! An engine is a small, cloneable handle: capture options plus a
//! lifecycle flag. Every capture call acquires and releases its own
//! native resources, so concurrent captures from clones never share
//! mutable state.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::bmp::{BitDepth, PaletteType};
use crate::error::{CaptureError, CaptureResult};
use crate::platform;
use crate::region::{CaptureArea, Rect};
use crate::window::{WindowInfo, WindowSelector};

/// Output format and compositing options for captures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptureOptions {
    /// Bits per pixel of the emitted BMP.
    pub bit_depth: BitDepth,
    /// Color table flavor for 8-bit output. Other depths ignore it.
    pub palette_type: PaletteType,
    /// Draw the cursor into the capture when the OS reports it showing.
    pub include_cursor: bool,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            bit_depth: BitDepth::Bpp24,
            palette_type: PaletteType::Halftone,
            include_cursor: true,
        }
    }
}

#[derive(Clone)]
pub struct CaptureEngine {
    options: CaptureOptions,
    closed: Arc<AtomicBool>,
}

impl CaptureEngine {
    pub fn new() -> CaptureResult<Self> {
        Self::with_options(CaptureOptions::default())
    }

    pub fn with_options(options: CaptureOptions) -> CaptureResult<Self> {
        Ok(Self {
            options,
            closed: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn options(&self) -> CaptureOptions {
        self.options
    }

    /// Capture the screen (or the sub-rectangle `area` selects) as a
    /// complete BMP byte stream.
    ///
    /// Either a full BMP is returned or the call fails having released
    /// every native resource it acquired; a failed capture is safe to
    /// retry.
    pub fn capture_screen(&self, area: CaptureArea) -> CaptureResult<Vec<u8>> {
        self.ensure_open()?;
        // A fully specified area validates before any native call.
        if let Some(rect) = area.fully_specified() {
            rect.size()?;
        }
        platform::capture_screen(&self.options, area)
    }

    /// Capture the window `selector` resolves to, full frame including
    /// the non-client area, as a complete BMP byte stream.
    pub fn capture_window(&self, selector: &WindowSelector) -> CaptureResult<Vec<u8>> {
        self.ensure_open()?;
        platform::capture_window(&self.options, selector)
    }

    /// The primary screen rectangle in device pixels.
    pub fn screen_rect(&self) -> CaptureResult<Rect> {
        platform::screen_rect()
    }

    /// The DPI-scaled rectangle of the window `selector` resolves to.
    pub fn window_rect(&self, selector: &WindowSelector) -> CaptureResult<Rect> {
        platform::window_rect(selector)
    }

    /// Snapshot all visible top-level windows in OS sibling order.
    pub fn window_list(&self) -> CaptureResult<Vec<WindowInfo>> {
        platform::window_list()
    }

    /// Shut the engine down. Idempotent; captures issued afterward fail
    /// with [`CaptureError::Closed`].
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> CaptureResult<()> {
        if self.is_closed() {
            return Err(CaptureError::Closed);
        }
        Ok(())
    }
}

#[cfg(feature = "tokio-async")]
impl CaptureEngine {
    /// [`capture_screen`](Self::capture_screen) run on tokio's blocking
    /// pool, so the slow native calls don't stall the async runtime.
    pub async fn capture_screen_async(&self, area: CaptureArea) -> CaptureResult<Vec<u8>> {
        let engine = self.clone();
        tokio::task::spawn_blocking(move || engine.capture_screen(area))
            .await
            .map_err(|join_error| {
                CaptureError::Platform(anyhow::anyhow!("capture task failed: {join_error}"))
            })?
    }

    /// [`capture_window`](Self::capture_window) run on tokio's blocking
    /// pool.
    pub async fn capture_window_async(&self, selector: WindowSelector) -> CaptureResult<Vec<u8>> {
        let engine = self.clone();
        tokio::task::spawn_blocking(move || engine.capture_window(&selector))
            .await
            .map_err(|join_error| {
                CaptureError::Platform(anyhow::anyhow!("capture task failed: {join_error}"))
            })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::Rect;

    #[test]
    fn default_options_are_24bit_halftone_with_cursor() {
        let options = CaptureOptions::default();
        assert_eq!(options.bit_depth, BitDepth::Bpp24);
        assert_eq!(options.palette_type, PaletteType::Halftone);
        assert!(options.include_cursor);
    }

    #[test]
    fn fully_specified_empty_region_fails_before_any_native_work() {
        let engine = CaptureEngine::new().unwrap();
        let area = CaptureArea::from(Rect::new(-10, 0, -10, 5));
        assert!(matches!(
            engine.capture_screen(area),
            Err(CaptureError::InvalidRegion(_))
        ));
    }

    #[test]
    fn close_is_idempotent_and_blocks_captures() {
        let engine = CaptureEngine::new().unwrap();
        assert!(!engine.is_closed());
        engine.close();
        engine.close();
        assert!(engine.is_closed());
        assert!(matches!(
            engine.capture_screen(CaptureArea::default()),
            Err(CaptureError::Closed)
        ));
        assert!(matches!(
            engine.capture_window(&WindowSelector::by_title("anything")),
            Err(CaptureError::Closed)
        ));
    }

    #[test]
    fn clones_share_the_lifecycle_flag() {
        let engine = CaptureEngine::new().unwrap();
        let clone = engine.clone();
        engine.close();
        assert!(clone.is_closed());
    }
}
