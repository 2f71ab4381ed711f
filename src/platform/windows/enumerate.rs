//! Top-level window enumeration, selector resolution, and geometry.

use std::ffi::c_void;
use std::ptr::null_mut;

use anyhow::Context;
use windows::Win32::Foundation::{HWND, RECT};
use windows::Win32::Graphics::Gdi::{
    DCX_CACHE, DESKTOPHORZRES, DESKTOPVERTRES, GetDCEx, GetDeviceCaps, HRGN, ReleaseDC,
};
use windows::Win32::UI::HiDpi::GetDpiForWindow;
use windows::Win32::UI::WindowsAndMessaging::{
    FindWindowExW, GWL_STYLE, GetClassNameW, GetWindowLongW, GetWindowRect, GetWindowTextW,
    GetWindowThreadProcessId, IsWindowVisible, WS_DISABLED, WS_MAXIMIZE, WS_MINIMIZE,
};
use windows::core::PCWSTR;

use crate::error::{CaptureError, CaptureResult};
use crate::region::Rect;
use crate::window::{WindowId, WindowInfo, WindowSelector, WindowStyle};

/// Title and class-name reads go through fixed 256-unit UTF-16 buffers;
/// longer strings are truncated.
const TEXT_BUFFER_LEN: usize = 256;

/// The primary screen rectangle in physical device pixels. Acquires and
/// releases the screen DC within the call.
pub(crate) fn screen_rect() -> CaptureResult<Rect> {
    let screen_dc = unsafe { GetDCEx(HWND(null_mut()), HRGN(null_mut()), DCX_CACHE) };
    if screen_dc.0.is_null() {
        return Err(CaptureError::DcUnavailable("the screen".into()));
    }
    let width = unsafe { GetDeviceCaps(screen_dc, DESKTOPHORZRES) };
    let height = unsafe { GetDeviceCaps(screen_dc, DESKTOPVERTRES) };
    unsafe {
        let _ = ReleaseDC(HWND(null_mut()), screen_dc);
    }
    Ok(Rect::new(0, 0, width, height))
}

/// The window rectangle scaled to device pixels by the window's own DPI,
/// each edge rounded up independently.
pub(crate) fn scaled_window_rect(hwnd: HWND) -> CaptureResult<Rect> {
    let mut raw = RECT::default();
    unsafe { GetWindowRect(hwnd, &mut raw) }
        .context("GetWindowRect failed")
        .map_err(CaptureError::Platform)?;
    let dpi = unsafe { GetDpiForWindow(hwnd) };
    if dpi == 0 {
        return Err(CaptureError::DpiUnavailable);
    }
    Ok(Rect::new(raw.left, raw.top, raw.right, raw.bottom).scale_per_edge_ceil(dpi))
}

/// Resolve a selector to a window handle. A `Handle` selector is passed
/// through without validation; the other selectors scan visible
/// top-level windows in sibling order and return the first exact match.
pub(crate) fn resolve(selector: &WindowSelector) -> CaptureResult<HWND> {
    if let WindowSelector::Handle(id) = selector {
        return Ok(HWND(id.raw_handle() as *mut c_void));
    }

    let mut prev = HWND(null_mut());
    while let Some(hwnd) = next_top_level(prev) {
        prev = hwnd;
        if !unsafe { IsWindowVisible(hwnd) }.as_bool() {
            continue;
        }
        let matched = match selector {
            WindowSelector::Title(title) => read_title(hwnd) == *title,
            WindowSelector::ClassName(class_name) => {
                read_class_name(hwnd).is_ok_and(|name| name == *class_name)
            }
            WindowSelector::ProcessId(pid) => {
                read_process_id(hwnd).is_ok_and(|found| found == *pid)
            }
            // Handle selectors returned above.
            WindowSelector::Handle(_) => false,
        };
        if matched {
            return Ok(hwnd);
        }
    }

    Err(CaptureError::WindowNotFound(selector.to_string()))
}

/// Snapshot every visible top-level window in OS sibling order.
pub(crate) fn window_list() -> CaptureResult<Vec<WindowInfo>> {
    let mut windows_info = Vec::new();
    let mut visited = 0usize;
    let mut prev = HWND(null_mut());
    while let Some(hwnd) = next_top_level(prev) {
        prev = hwnd;
        visited += 1;
        if !unsafe { IsWindowVisible(hwnd) }.as_bool() {
            continue;
        }
        windows_info.push(WindowInfo {
            id: WindowId::from_raw_handle(hwnd.0 as isize),
            title: read_title(hwnd),
            class_name: read_class_name(hwnd)?,
            process_id: read_process_id(hwnd)?,
            position: scaled_window_rect(hwnd)?,
            style: read_style(hwnd)?,
        });
    }
    if visited == 0 {
        return Err(CaptureError::EnumFailed(
            "no top-level windows were returned".into(),
        ));
    }
    Ok(windows_info)
}

/// Next top-level sibling after `prev`; a null `prev` starts from the
/// first child of the desktop.
fn next_top_level(prev: HWND) -> Option<HWND> {
    let found =
        unsafe { FindWindowExW(HWND(null_mut()), prev, PCWSTR::null(), PCWSTR::null()) };
    match found {
        Ok(hwnd) if !hwnd.0.is_null() => Some(hwnd),
        _ => None,
    }
}

/// An untitled window legitimately reads back empty.
fn read_title(hwnd: HWND) -> String {
    let mut buffer = [0u16; TEXT_BUFFER_LEN];
    let len = unsafe { GetWindowTextW(hwnd, &mut buffer) };
    if len <= 0 {
        return String::new();
    }
    utf16z_to_string(&buffer[..len as usize])
}

fn read_class_name(hwnd: HWND) -> CaptureResult<String> {
    let mut buffer = [0u16; TEXT_BUFFER_LEN];
    let len = unsafe { GetClassNameW(hwnd, &mut buffer) };
    if len <= 0 {
        return Err(CaptureError::ClassNameUnavailable(hwnd.0 as isize));
    }
    Ok(utf16z_to_string(&buffer[..len as usize]))
}

fn read_process_id(hwnd: HWND) -> CaptureResult<u32> {
    let mut pid = 0u32;
    unsafe {
        GetWindowThreadProcessId(hwnd, Some(&mut pid));
    }
    if pid == 0 {
        return Err(CaptureError::ProcessIdUnavailable(hwnd.0 as isize));
    }
    Ok(pid)
}

/// A style word of zero is treated as a failed read, even though a
/// window with a literal zero style is representable.
fn read_style(hwnd: HWND) -> CaptureResult<WindowStyle> {
    let style = unsafe { GetWindowLongW(hwnd, GWL_STYLE) };
    if style == 0 {
        return Err(CaptureError::StyleUnavailable(hwnd.0 as isize));
    }
    let style = style as u32;
    Ok(WindowStyle {
        is_minimized: style & WS_MINIMIZE.0 != 0,
        is_maximized: style & WS_MAXIMIZE.0 != 0,
        is_disabled: style & WS_DISABLED.0 != 0,
    })
}

fn utf16z_to_string(input: &[u16]) -> String {
    let len = input.iter().position(|&ch| ch == 0).unwrap_or(input.len());
    String::from_utf16_lossy(&input[..len])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf16_conversion_stops_at_the_first_nul() {
        let buffer: Vec<u16> = "abc\0def".encode_utf16().collect();
        assert_eq!(utf16z_to_string(&buffer), "abc");
        assert_eq!(utf16z_to_string(&[]), "");
    }
}
