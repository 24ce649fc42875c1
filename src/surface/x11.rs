//! X11 desktop window for XFCE and similar window managers.
//!
//! The window is typed `_NET_WM_WINDOW_TYPE_DESKTOP`, kept below every
//! other window, hidden from taskbars and pagers, and has an empty input
//! shape so clicks reach the desktop icons underneath. Frames are expanded
//! to BGRX and pushed with `XPutImage`.

use cell_dither::{expand_into, CellBuffer, PixelLayout};
use std::ffi::{c_char, c_int, c_uint, CStr};
use std::process::Command;
use std::ptr;
use x11::xlib::*;

use super::{DesktopSurface, SurfaceStatus};
use crate::error::SurfaceError;
use crate::services::{DesktopConfig, Xfconf};

const WINDOW_NAME: &CStr = c"Live Dither Background";
const XFDESKTOP_NAME: &[u8] = b"xfceliveDesktop";

// X Nonrectangular Window Shape Extension, not covered by the x11 crate
const SHAPE_INPUT: c_int = 2;
const SHAPE_SET: c_int = 0;
const UNSORTED: c_int = 0;

#[link(name = "Xext")]
extern "C" {
    fn XShapeCombineRectangles(
        display: *mut Display,
        dest: Window,
        dest_kind: c_int,
        x_off: c_int,
        y_off: c_int,
        rectangles: *mut XRectangle,
        n_rects: c_int,
        op: c_int,
        ordering: c_int,
    );
}

pub struct X11Surface {
    display: *mut Display,
    window: Window,
    gc: GC,
    visual: *mut Visual,
    depth: c_int,
    width: usize,
    height: usize,
    cell_size: usize,
    frame: Vec<u8>,
    released: bool,
    /// The server already destroyed the window (DestroyNotify seen)
    destroyed: bool,
}

/// What `release` still has to free
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Teardown {
    Nothing,
    CloseDisplay,
    DestroyWindowAndClose,
}

fn teardown(released: bool, destroyed: bool) -> Teardown {
    match (released, destroyed) {
        (true, _) => Teardown::Nothing,
        (false, true) => Teardown::CloseDisplay,
        (false, false) => Teardown::DestroyWindowAndClose,
    }
}

/// Log protocol errors instead of letting Xlib exit the process
unsafe extern "C" fn on_x_error(_display: *mut Display, event: *mut XErrorEvent) -> c_int {
    if let Some(event) = event.as_ref() {
        tracing::warn!(
            code = event.error_code,
            request = event.request_code,
            "X protocol error"
        );
    }
    0
}

/// Xlib exits once this returns; put the desktop back first
unsafe extern "C" fn on_x_io_error(_display: *mut Display) -> c_int {
    tracing::error!("Lost connection to the X server, restoring desktop settings");
    Xfconf::new().restore();
    0
}

impl X11Surface {
    /// Open the default display and map a full-screen desktop window
    pub fn open(cell_size: usize) -> Result<Self, SurfaceError> {
        unsafe {
            XSetErrorHandler(Some(on_x_error));
            XSetIOErrorHandler(Some(on_x_io_error));

            let display = XOpenDisplay(ptr::null());
            if display.is_null() {
                return Err(SurfaceError::Unavailable(
                    "failed to open X display, is DISPLAY set?".to_string(),
                ));
            }

            let screen = XDefaultScreen(display);
            let root = XDefaultRootWindow(display);
            let width = XDisplayWidth(display, screen).max(1) as usize;
            let height = XDisplayHeight(display, screen).max(1) as usize;
            let visual = XDefaultVisual(display, screen);
            let depth = XDefaultDepth(display, screen);

            tracing::info!(width, height, depth, "X11 display opened");
            if depth != 24 && depth != 32 {
                tracing::warn!(depth, "Unexpected visual depth, colors may be wrong");
            }

            let mut attrs: XSetWindowAttributes = std::mem::zeroed();
            attrs.colormap = XCreateColormap(display, root, visual, AllocNone);
            attrs.background_pixel = XBlackPixel(display, screen);
            attrs.event_mask = ExposureMask | StructureNotifyMask;

            let window = XCreateWindow(
                display,
                root,
                0,
                0,
                width as c_uint,
                height as c_uint,
                0,
                depth,
                InputOutput as c_uint,
                visual,
                CWColormap | CWBackPixel | CWEventMask,
                &mut attrs,
            );
            if window == 0 {
                XCloseDisplay(display);
                return Err(SurfaceError::Unavailable(
                    "failed to create X11 window".to_string(),
                ));
            }

            set_atom_property(display, window, c"_NET_WM_WINDOW_TYPE", &[
                intern(display, c"_NET_WM_WINDOW_TYPE_DESKTOP"),
            ]);
            XStoreName(display, window, WINDOW_NAME.as_ptr());

            // empty input region: every click passes through
            XShapeCombineRectangles(
                display,
                window,
                SHAPE_INPUT,
                0,
                0,
                ptr::null_mut(),
                0,
                SHAPE_SET,
                UNSORTED,
            );

            XMapWindow(display, window);

            set_atom_property(display, window, c"_NET_WM_STATE", &[
                intern(display, c"_NET_WM_STATE_BELOW"),
                intern(display, c"_NET_WM_STATE_SKIP_TASKBAR"),
                intern(display, c"_NET_WM_STATE_SKIP_PAGER"),
                intern(display, c"_NET_WM_STATE_STICKY"),
            ]);

            match find_xfdesktop(display, root) {
                Some(xfdesktop) => {
                    tracing::info!(window = xfdesktop, "Found xfdesktop window");
                    XLowerWindow(display, xfdesktop);
                    XLowerWindow(display, window);
                    show_desktop();
                }
                None => {
                    tracing::warn!("xfdesktop window not found, desktop icons may be hidden");
                    XLowerWindow(display, window);
                }
            }

            let gc = XCreateGC(display, window, 0, ptr::null_mut());
            XFlush(display);

            tracing::info!("X11 desktop window initialized with click-through input shape");

            Ok(Self {
                display,
                window,
                gc,
                visual,
                depth,
                width,
                height,
                cell_size: cell_size.max(1),
                frame: vec![0; width * height * 4],
                released: false,
                destroyed: false,
            })
        }
    }
}

impl DesktopSurface for X11Surface {
    fn name(&self) -> &'static str {
        "x11"
    }

    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn present(&mut self, cells: &CellBuffer) -> Result<(), SurfaceError> {
        if self.released || self.destroyed {
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

        unsafe {
            let image = XCreateImage(
                self.display,
                self.visual,
                self.depth as c_uint,
                ZPixmap,
                0,
                self.frame.as_mut_ptr() as *mut c_char,
                self.width as c_uint,
                self.height as c_uint,
                32,
                0,
            );
            if image.is_null() {
                return Err(SurfaceError::Unavailable(
                    "failed to create XImage".to_string(),
                ));
            }

            XPutImage(
                self.display,
                self.window,
                self.gc,
                image,
                0,
                0,
                0,
                0,
                self.width as c_uint,
                self.height as c_uint,
            );

            // the pixel buffer stays owned by `frame`
            (*image).data = ptr::null_mut();
            XDestroyImage(image);
            XFlush(self.display);
        }
        Ok(())
    }

    fn poll_events(&mut self) -> SurfaceStatus {
        if self.released {
            return SurfaceStatus::Closed;
        }

        unsafe {
            while XPending(self.display) > 0 {
                let mut event: XEvent = std::mem::zeroed();
                XNextEvent(self.display, &mut event);
                if event.get_type() == DestroyNotify && event.destroy_window.window == self.window
                {
                    tracing::info!("Desktop window destroyed");
                    self.destroyed = true;
                }
            }
        }
        if self.destroyed {
            SurfaceStatus::Closed
        } else {
            SurfaceStatus::Open
        }
    }

    fn release(&mut self) {
        let steps = teardown(self.released, self.destroyed);
        if steps == Teardown::Nothing {
            return;
        }
        self.released = true;
        unsafe {
            if !self.gc.is_null() {
                XFreeGC(self.display, self.gc);
            }
            if steps == Teardown::DestroyWindowAndClose && self.window != 0 {
                XDestroyWindow(self.display, self.window);
            }
            XCloseDisplay(self.display);
        }
        tracing::debug!(window_destroyed = self.destroyed, "X11 surface released");
    }
}

impl Drop for X11Surface {
    fn drop(&mut self) {
        self.release();
    }
}

unsafe fn intern(display: *mut Display, name: &CStr) -> Atom {
    XInternAtom(display, name.as_ptr(), False)
}

unsafe fn set_atom_property(display: *mut Display, window: Window, property: &CStr, atoms: &[Atom]) {
    XChangeProperty(
        display,
        window,
        intern(display, property),
        XA_ATOM,
        32,
        PropModeReplace,
        atoms.as_ptr() as *const u8,
        atoms.len() as c_int,
    );
}

/// Locate xfdesktop by window name, then by the root `XFCE_DESKTOP_WINDOW`
/// property.
unsafe fn find_xfdesktop(display: *mut Display, root: Window) -> Option<Window> {
    let mut root_return: Window = 0;
    let mut parent: Window = 0;
    let mut children: *mut Window = ptr::null_mut();
    let mut count: c_uint = 0;

    let mut found = None;
    if XQueryTree(display, root, &mut root_return, &mut parent, &mut children, &mut count) != 0
        && !children.is_null()
    {
        for &child in std::slice::from_raw_parts(children, count as usize) {
            let mut name: *mut c_char = ptr::null_mut();
            if XFetchName(display, child, &mut name) != 0 && !name.is_null() {
                let matches = CStr::from_ptr(name).to_bytes() == XFDESKTOP_NAME;
                XFree(name as *mut _);
                if matches {
                    found = Some(child);
                    break;
                }
            }
        }
        XFree(children as *mut _);
    }
    if found.is_some() {
        return found;
    }

    let mut actual_type: Atom = 0;
    let mut actual_format: c_int = 0;
    let mut items = 0;
    let mut bytes_after = 0;
    let mut prop: *mut u8 = ptr::null_mut();
    let status = XGetWindowProperty(
        display,
        root,
        intern(display, c"XFCE_DESKTOP_WINDOW"),
        0,
        1,
        False,
        XA_WINDOW,
        &mut actual_type,
        &mut actual_format,
        &mut items,
        &mut bytes_after,
        &mut prop,
    );
    if status == Success as c_int && !prop.is_null() {
        if actual_type == XA_WINDOW && items == 1 {
            found = Some(*(prop as *const Window));
        }
        XFree(prop as *mut _);
    }
    found
}

/// Toggle the window manager's show-desktop mode so the new window is
/// stacked with the desktop
fn show_desktop() {
    tracing::info!("Activating show desktop mode");
    match Command::new("wmctrl").args(["-k", "on"]).status() {
        Ok(status) if status.success() => {}
        Ok(status) => tracing::warn!(%status, "wmctrl call failed"),
        Err(e) => tracing::warn!(%e, "wmctrl call failed"),
    }
}
