//! Windows desktop window behind the desktop icons.
//!
//! Progman is asked (message `0x052C`) to spawn the WorkerW layer, the
//! window is reparented into Progman and stacked under `SHELLDLL_DefView`
//! so the icons stay on top. Frames are expanded to top-down 32-bit BGRX
//! and blitted with `StretchDIBits`.

use cell_dither::{expand_into, CellBuffer, PixelLayout};
use std::ffi::c_void;
use std::ptr;
use windows_sys::Win32::Foundation::{BOOL, HWND, LPARAM, LRESULT, WPARAM};
use windows_sys::Win32::Graphics::Gdi::{
    GetDC, ReleaseDC, StretchDIBits, BITMAPINFO, BITMAPINFOHEADER, BI_RGB, DIB_RGB_COLORS, HDC,
    SRCCOPY,
};
use windows_sys::Win32::System::LibraryLoader::GetModuleHandleW;
use windows_sys::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW, EnumChildWindows,
    FindWindowW, GetClassNameW, GetSystemMetrics, IsWindow, LoadCursorW, PeekMessageW,
    PostQuitMessage, RegisterClassW, SendMessageTimeoutW, SetLayeredWindowAttributes, SetParent,
    SetProcessDPIAware, SetWindowLongW, SetWindowPos, TranslateMessage, GWL_STYLE, IDC_ARROW,
    LWA_ALPHA, MSG, PM_REMOVE, SMTO_NORMAL, SM_CXSCREEN, SM_CYSCREEN, SWP_NOACTIVATE, SWP_NOMOVE,
    SWP_NOSIZE, WM_DESTROY, WM_QUIT, WNDCLASSW, WS_CHILD, WS_CLIPCHILDREN, WS_CLIPSIBLINGS,
    WS_EX_LAYERED, WS_EX_NOACTIVATE, WS_EX_TOOLWINDOW, WS_POPUP, WS_VISIBLE,
};

use super::{DesktopSurface, SurfaceStatus};
use crate::error::SurfaceError;

const CLASS_NAME: &str = "LiveDitherBG";
/// Undocumented Progman message that creates the WorkerW behind the icons
const SPAWN_WORKERW: u32 = 0x052C;

pub struct WindowsSurface {
    window: HWND,
    dc: HDC,
    width: usize,
    height: usize,
    cell_size: usize,
    frame: Vec<u8>,
    closed: bool,
    released: bool,
}

impl WindowsSurface {
    /// Create the wallpaper window and attach it to the desktop
    pub fn open(cell_size: usize) -> Result<Self, SurfaceError> {
        unsafe {
            SetProcessDPIAware();
            let width = GetSystemMetrics(SM_CXSCREEN).max(1) as usize;
            let height = GetSystemMetrics(SM_CYSCREEN).max(1) as usize;

            let progman_class = wide("Progman");
            let progman = FindWindowW(progman_class.as_ptr(), ptr::null());
            if progman.is_null() {
                return Err(SurfaceError::Unavailable(
                    "Progman window not found".to_string(),
                ));
            }
            let mut result = 0usize;
            SendMessageTimeoutW(progman, SPAWN_WORKERW, 0, 0, SMTO_NORMAL, 100, &mut result);

            let shell_view = find_child(progman, "SHELLDLL_DefView");
            let worker = find_child(progman, "WorkerW");
            tracing::info!(
                width,
                height,
                shell_view = !shell_view.is_null(),
                worker = !worker.is_null(),
                "Located desktop windows"
            );

            let instance = GetModuleHandleW(ptr::null());
            let class_name = wide(CLASS_NAME);
            let mut class: WNDCLASSW = std::mem::zeroed();
            class.lpfnWndProc = Some(window_proc);
            class.hInstance = instance;
            class.lpszClassName = class_name.as_ptr();
            class.hCursor = LoadCursorW(ptr::null_mut(), IDC_ARROW);
            // 0 when already registered by an earlier open; CreateWindowExW
            // reports real failures
            RegisterClassW(&class);

            let window = CreateWindowExW(
                WS_EX_LAYERED | WS_EX_NOACTIVATE | WS_EX_TOOLWINDOW,
                class_name.as_ptr(),
                class_name.as_ptr(),
                WS_POPUP | WS_VISIBLE | WS_CLIPCHILDREN | WS_CLIPSIBLINGS,
                0,
                0,
                width as i32,
                height as i32,
                ptr::null_mut(),
                ptr::null_mut(),
                instance,
                ptr::null(),
            );
            if window.is_null() {
                return Err(SurfaceError::Unavailable(
                    "failed to create wallpaper window".to_string(),
                ));
            }

            SetParent(window, progman);
            SetWindowLongW(
                window,
                GWL_STYLE,
                (WS_CHILD | WS_VISIBLE | WS_CLIPCHILDREN | WS_CLIPSIBLINGS) as i32,
            );
            SetLayeredWindowAttributes(window, 0, 255, LWA_ALPHA);
            let flags = SWP_NOMOVE | SWP_NOSIZE | SWP_NOACTIVATE;
            SetWindowPos(window, shell_view, 0, 0, 0, 0, flags);
            if !worker.is_null() {
                SetWindowPos(worker, window, 0, 0, 0, 0, flags);
            }

            let dc = GetDC(window);
            if dc.is_null() {
                DestroyWindow(window);
                return Err(SurfaceError::Unavailable(
                    "failed to get window device context".to_string(),
                ));
            }

            tracing::info!("Windows desktop window initialized");
            Ok(Self {
                window,
                dc,
                width,
                height,
                cell_size: cell_size.max(1),
                frame: vec![0; width * height * 4],
                closed: false,
                released: false,
            })
        }
    }
}

impl DesktopSurface for WindowsSurface {
    fn name(&self) -> &'static str {
        "windows"
    }

    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn present(&mut self, cells: &CellBuffer) -> Result<(), SurfaceError> {
        if self.released || self.closed {
            return Err(SurfaceError::Unavailable("window is gone".to_string()));
        }

        expand_into(
            cells,
            self.cell_size,
            self.width,
            self.height,
            PixelLayout::Bgrx,
            &mut self.frame,
        );

        let (width, height) = (self.width as i32, self.height as i32);
        let copied = unsafe {
            let mut info: BITMAPINFO = std::mem::zeroed();
            info.bmiHeader = BITMAPINFOHEADER {
                biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                biWidth: width,
                // negative height: rows run top to bottom
                biHeight: -height,
                biPlanes: 1,
                biBitCount: 32,
                biCompression: BI_RGB,
                biSizeImage: 0,
                biXPelsPerMeter: 0,
                biYPelsPerMeter: 0,
                biClrUsed: 0,
                biClrImportant: 0,
            };
            StretchDIBits(
                self.dc,
                0,
                0,
                width,
                height,
                0,
                0,
                width,
                height,
                self.frame.as_ptr() as *const c_void,
                &info,
                DIB_RGB_COLORS,
                SRCCOPY,
            )
        };
        if copied == 0 {
            return Err(SurfaceError::Unavailable("StretchDIBits failed".to_string()));
        }
        Ok(())
    }

    fn poll_events(&mut self) -> SurfaceStatus {
        if self.released {
            return SurfaceStatus::Closed;
        }
        unsafe {
            let mut msg: MSG = std::mem::zeroed();
            while PeekMessageW(&mut msg, ptr::null_mut(), 0, 0, PM_REMOVE) != 0 {
                if msg.message == WM_QUIT {
                    tracing::info!("Desktop window closed");
                    self.closed = true;
                }
                TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        }
        if self.closed {
            SurfaceStatus::Closed
        } else {
            SurfaceStatus::Open
        }
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        unsafe {
            ReleaseDC(self.window, self.dc);
            if IsWindow(self.window) != 0 {
                DestroyWindow(self.window);
            }
        }
        tracing::debug!("Windows surface released");
    }
}

impl Drop for WindowsSurface {
    fn drop(&mut self) {
        self.release();
    }
}

unsafe extern "system" fn window_proc(
    window: HWND,
    message: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    if message == WM_DESTROY {
        PostQuitMessage(0);
        return 0;
    }
    DefWindowProcW(window, message, wparam, lparam)
}

struct ClassSearch {
    class: Vec<u16>,
    found: HWND,
}

unsafe extern "system" fn match_class(window: HWND, lparam: LPARAM) -> BOOL {
    let search = &mut *(lparam as *mut ClassSearch);
    let mut name = [0u16; 256];
    let len = GetClassNameW(window, name.as_mut_ptr(), name.len() as i32);
    if len > 0 && name[..len as usize] == search.class[..] {
        search.found = window;
        return 0;
    }
    1
}

/// First child of `parent` with window class `class`, or null
unsafe fn find_child(parent: HWND, class: &str) -> HWND {
    let mut search = ClassSearch {
        class: class.encode_utf16().collect(),
        found: ptr::null_mut(),
    };
    EnumChildWindows(
        parent,
        Some(match_class),
        &mut search as *mut ClassSearch as LPARAM,
    );
    search.found
}

/// NUL-terminated UTF-16
fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_is_nul_terminated() {
        assert_eq!(wide("Progman").last(), Some(&0));
        assert_eq!(wide("ab"), vec![97, 98, 0]);
    }
}
