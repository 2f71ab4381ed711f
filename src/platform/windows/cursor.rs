//! Cursor compositing into a capture DC.

use std::mem::size_of;

use log::debug;
use windows::Win32::Graphics::Gdi::{DeleteObject, HDC};
use windows::Win32::UI::HiDpi::{GetDpiForSystem, SetProcessDPIAware};
use windows::Win32::UI::WindowsAndMessaging::{
    CURSORINFO, DI_NORMAL, DrawIconEx, GetCursorInfo, GetIconInfo, ICONINFO,
};

use crate::error::{CaptureError, CaptureResult};

const CURSOR_SHOWING: u32 = 0x1;
const CURSOR_SUPPRESSED: u32 = 0x2;

/// Releases the two bitmaps a cursor's icon info hands out. They must
/// be deleted after drawing on every path.
struct IconBitmapGuard(ICONINFO);

impl Drop for IconBitmapGuard {
    fn drop(&mut self) {
        if !self.0.hbmMask.is_invalid() {
            unsafe {
                let _ = DeleteObject(self.0.hbmMask);
            }
        }
        if !self.0.hbmColor.is_invalid() {
            unsafe {
                let _ = DeleteObject(self.0.hbmColor);
            }
        }
    }
}

/// Draw the current cursor into `target_dc`, translated so the capture
/// origin `(origin_x, origin_y)` maps to (0, 0) and scaled by the
/// system DPI.
pub(crate) fn compose(target_dc: HDC, origin_x: i32, origin_y: i32) -> CaptureResult<()> {
    let mut info = CURSORINFO {
        cbSize: size_of::<CURSORINFO>() as u32,
        ..Default::default()
    };
    if unsafe { GetCursorInfo(&mut info) }.is_err() {
        return Err(CaptureError::CursorUnavailable(
            "cursor state query failed".into(),
        ));
    }

    // flags: 0x1 = showing, 0x2 = suppressed. Both bits must be set
    // before the cursor is drawn.
    if info.flags.0 & CURSOR_SHOWING == 0 || info.flags.0 & CURSOR_SUPPRESSED == 0 {
        debug!("cursor not drawn (flags {:#x})", info.flags.0);
        return Ok(());
    }

    let mut icon = ICONINFO::default();
    if unsafe { GetIconInfo(info.hCursor.into(), &mut icon) }.is_err() {
        return Err(CaptureError::CursorUnavailable(
            "cursor icon info query failed".into(),
        ));
    }
    let _bitmaps = IconBitmapGuard(icon);

    unsafe {
        let _ = SetProcessDPIAware();
    }
    let scale = f64::from(unsafe { GetDpiForSystem() }) / 96.0;

    let x = (f64::from(info.ptScreenPos.x - origin_x - icon.xHotspot as i32) * scale).round();
    let y = (f64::from(info.ptScreenPos.y - origin_y - icon.yHotspot as i32) * scale).round();

    unsafe {
        DrawIconEx(
            target_dc,
            x as i32,
            y as i32,
            info.hCursor.into(),
            0,
            0,
            0,
            None,
            DI_NORMAL,
        )
    }
    .map_err(|err| CaptureError::CursorUnavailable(format!("DrawIconEx failed: {err}")))
}
