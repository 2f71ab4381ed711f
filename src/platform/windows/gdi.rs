//! GDI capture paths.
//!
//! The screen path blits into a DIB section at the configured bit depth
//! so the pixel memory is directly addressable and cursor composition
//! draws onto the same backing. The window path renders through
//! `PrintWindow` into a compatible bitmap at the device's native depth
//! and extracts pixels with `GetDIBits` afterward.
//!
//! Every native handle is owned by a surface struct whose `Drop`
//! restores the original DC selection, deletes the bitmap, deletes the
//! memory DC, and releases the source DC — on success and on every
//! error path alike.

use std::ffi::c_void;
use std::ptr::null_mut;

use anyhow::Context;
use windows::Win32::Foundation::{HANDLE, HWND};
use windows::Win32::Graphics::Gdi::{
    BITMAPINFO, BitBlt, CreateCompatibleBitmap, CreateCompatibleDC, CreateDIBSection, DCX_CACHE,
    DCX_WINDOW, DIB_RGB_COLORS, DeleteDC, DeleteObject, GET_DCX_FLAGS, GetDCEx, GetDIBits,
    HBITMAP, HDC, HGDIOBJ, HRGN, ROP_CODE, ReleaseDC, SRCCOPY, SelectObject,
};
use windows::Win32::Storage::Xps::{PRINT_WINDOW_FLAGS, PrintWindow};

use super::cursor;
use crate::bmp::BmpImage;
use crate::engine::CaptureOptions;
use crate::error::{CaptureError, CaptureResult};
use crate::region::Rect;

/// SRCCOPY combined with CAPTUREBLT (0x40000000) so layered windows are
/// included in the screen blit.
const SCREEN_COPY_ROP: ROP_CODE = ROP_CODE(SRCCOPY.0 | 0x4000_0000);

/// Render the full window, client and non-client areas, through
/// WM_PRINT where the window supports it.
const PRINT_WINDOW_RENDER_FULL: PRINT_WINDOW_FLAGS = PRINT_WINDOW_FLAGS(2);

pub(crate) fn capture_screen_rect(options: &CaptureOptions, rect: Rect) -> CaptureResult<Vec<u8>> {
    let size = rect.size()?;
    let mut bmp = BmpImage::new(size.cx, size.cy, options.bit_depth, options.palette_type)?;

    let mut surface = ScreenSurface::acquire()?;
    surface.bind_dib_section(&mut bmp)?;

    unsafe {
        BitBlt(
            surface.mem_dc,
            0,
            0,
            size.cx,
            size.cy,
            surface.screen_dc,
            rect.left,
            rect.top,
            SCREEN_COPY_ROP,
        )
    }
    .map_err(|err| CaptureError::BlitFailed(err.to_string()))?;

    if options.include_cursor {
        cursor::compose(surface.mem_dc, rect.left, rect.top)?;
    }

    // The DIB section and the BMP pixel region share layout (bottom-up,
    // same stride), so the copy-out is a single move.
    let pixel_len = bmp.pixel_region().len();
    unsafe {
        std::ptr::copy_nonoverlapping(surface.bits.cast_const(), bmp.pixel_region_ptr(), pixel_len);
    }

    drop(surface);
    Ok(bmp.into_bytes())
}

pub(crate) fn capture_window_rect(
    options: &CaptureOptions,
    hwnd: HWND,
    rect: Rect,
) -> CaptureResult<Vec<u8>> {
    let size = rect.size()?;

    let mut surface = WindowSurface::acquire(hwnd)?;
    let bitmap = surface.bind_compatible_bitmap(size.cx, size.cy)?;

    if !unsafe { PrintWindow(hwnd, surface.mem_dc, PRINT_WINDOW_RENDER_FULL) }.as_bool() {
        return Err(CaptureError::PrintFailed(format!(
            "PrintWindow refused flags {:#x}",
            PRINT_WINDOW_RENDER_FULL.0
        )));
    }

    if options.include_cursor {
        cursor::compose(surface.mem_dc, rect.left, rect.top)?;
    }

    let mut bmp = BmpImage::new(size.cx, size.cy, options.bit_depth, options.palette_type)?;
    let scan_lines = unsafe {
        GetDIBits(
            surface.mem_dc,
            bitmap,
            0,
            size.cy as u32,
            Some(bmp.pixel_region_ptr().cast()),
            bmp.info_block_ptr() as *mut BITMAPINFO,
            DIB_RGB_COLORS,
        )
    };
    if scan_lines == 0 {
        return Err(CaptureError::GetBitsFailed(
            "GetDIBits copied no scan lines".into(),
        ));
    }

    drop(surface);
    Ok(bmp.into_bytes())
}

/// Screen DC, memory DC, and a DIB section selected into it.
struct ScreenSurface {
    screen_dc: HDC,
    mem_dc: HDC,
    bitmap: Option<HBITMAP>,
    original: Option<HGDIOBJ>,
    bits: *mut u8,
}

impl ScreenSurface {
    fn acquire() -> CaptureResult<Self> {
        let screen_dc = unsafe { GetDCEx(HWND(null_mut()), HRGN(null_mut()), DCX_CACHE) };
        if screen_dc.0.is_null() {
            return Err(CaptureError::DcUnavailable("the screen".into()));
        }

        let mem_dc = unsafe { CreateCompatibleDC(screen_dc) };
        if mem_dc.0.is_null() {
            unsafe {
                let _ = ReleaseDC(HWND(null_mut()), screen_dc);
            }
            return Err(CaptureError::Platform(anyhow::anyhow!(
                "CreateCompatibleDC failed for the screen DC"
            )));
        }

        Ok(Self {
            screen_dc,
            mem_dc,
            bitmap: None,
            original: None,
            bits: null_mut(),
        })
    }

    /// Create a DIB section described by the image's info block and
    /// select it into the memory DC. The OS owns the pixel storage and
    /// hands back its address.
    fn bind_dib_section(&mut self, bmp: &mut BmpImage) -> CaptureResult<()> {
        let mut bits: *mut c_void = null_mut();
        let bitmap = unsafe {
            CreateDIBSection(
                self.mem_dc,
                bmp.info_block_ptr() as *const BITMAPINFO,
                DIB_RGB_COLORS,
                &mut bits,
                HANDLE::default(),
                0,
            )
        }
        .context("CreateDIBSection failed")
        .map_err(CaptureError::Platform)?;
        if bits.is_null() {
            unsafe {
                let _ = DeleteObject(bitmap);
            }
            return Err(CaptureError::Platform(anyhow::anyhow!(
                "CreateDIBSection returned a null pixel buffer"
            )));
        }

        let selected = unsafe { SelectObject(self.mem_dc, bitmap) };
        if selected.0.is_null() {
            unsafe {
                let _ = DeleteObject(bitmap);
            }
            return Err(CaptureError::Platform(anyhow::anyhow!(
                "SelectObject failed for the capture DIB section"
            )));
        }

        self.bitmap = Some(bitmap);
        self.original = Some(selected);
        self.bits = bits.cast();
        Ok(())
    }
}

impl Drop for ScreenSurface {
    fn drop(&mut self) {
        if let Some(original) = self.original.take() {
            unsafe {
                let _ = SelectObject(self.mem_dc, original);
            }
        }
        if let Some(bitmap) = self.bitmap.take() {
            unsafe {
                let _ = DeleteObject(bitmap);
            }
        }
        unsafe {
            let _ = DeleteDC(self.mem_dc);
            let _ = ReleaseDC(HWND(null_mut()), self.screen_dc);
        }
    }
}

/// Window DC, memory DC, and a compatible bitmap selected into it.
struct WindowSurface {
    hwnd: HWND,
    window_dc: HDC,
    mem_dc: HDC,
    bitmap: Option<HBITMAP>,
    original: Option<HGDIOBJ>,
}

impl WindowSurface {
    fn acquire(hwnd: HWND) -> CaptureResult<Self> {
        let window_dc = unsafe {
            GetDCEx(
                hwnd,
                HRGN(null_mut()),
                GET_DCX_FLAGS(DCX_WINDOW.0 | DCX_CACHE.0),
            )
        };
        if window_dc.0.is_null() {
            return Err(CaptureError::DcUnavailable("the window".into()));
        }

        let mem_dc = unsafe { CreateCompatibleDC(window_dc) };
        if mem_dc.0.is_null() {
            unsafe {
                let _ = ReleaseDC(hwnd, window_dc);
            }
            return Err(CaptureError::Platform(anyhow::anyhow!(
                "CreateCompatibleDC failed for the window DC"
            )));
        }

        Ok(Self {
            hwnd,
            window_dc,
            mem_dc,
            bitmap: None,
            original: None,
        })
    }

    /// Create a bitmap at the device's native depth, sized to the
    /// window, and select it into the memory DC.
    fn bind_compatible_bitmap(&mut self, width: i32, height: i32) -> CaptureResult<HBITMAP> {
        let bitmap = unsafe { CreateCompatibleBitmap(self.window_dc, width, height) };
        if bitmap.is_invalid() {
            return Err(CaptureError::Platform(anyhow::anyhow!(
                "CreateCompatibleBitmap failed for {width}x{height}"
            )));
        }

        let selected = unsafe { SelectObject(self.mem_dc, bitmap) };
        if selected.0.is_null() {
            unsafe {
                let _ = DeleteObject(bitmap);
            }
            return Err(CaptureError::Platform(anyhow::anyhow!(
                "SelectObject failed for the window capture bitmap"
            )));
        }

        self.bitmap = Some(bitmap);
        self.original = Some(selected);
        Ok(bitmap)
    }
}

impl Drop for WindowSurface {
    fn drop(&mut self) {
        if let Some(original) = self.original.take() {
            unsafe {
                let _ = SelectObject(self.mem_dc, original);
            }
        }
        if let Some(bitmap) = self.bitmap.take() {
            unsafe {
                let _ = DeleteObject(bitmap);
            }
        }
        unsafe {
            let _ = DeleteDC(self.mem_dc);
            let _ = ReleaseDC(self.hwnd, self.window_dc);
        }
    }
}
