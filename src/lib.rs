pub mod cli;
pub mod color;
pub mod trap;
pub mod tray;

use std::cmp::min;

use anyhow::Context;
use log::{debug, info, trace};
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{
    Colormap, ConnectionExt, CreateWindowAux, EventMask, Window, WindowClass,
};
use x11rb::protocol::Event;

use color::ColorConfig;
use tray::Atoms;

/// Lifecycle of the icon window, driven by the X event stream. The protocol
/// layer cannot tell an embedded icon from a standalone one; only the window
/// events that follow the dock request can.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DockState {
    Created,
    DockRequested,
    Embedded,
    Standalone,
}

pub fn run(colors: ColorConfig) -> anyhow::Result<()> {
    info!("Starting btry");

    let (conn, screen_num) = x11rb::connect(None).context("Failed to open display")?;
    let screen = &conn.setup().roots[screen_num];
    let root = screen.root;
    let colormap = screen.default_colormap;
    let side = min(screen.width_in_pixels, screen.height_in_pixels);

    let atoms = Atoms::new(&conn)
        .context("Interning atoms")?
        .reply()
        .context("Interning atoms")?;

    let pixels = allocate_colors(&conn, colormap, &colors)?;

    let win = conn.generate_id().context("Allocating a window id")?;
    conn.create_window(
        x11rb::COPY_DEPTH_FROM_PARENT,
        win,
        root,
        0,
        0,
        side,
        side,
        0,
        WindowClass::INPUT_OUTPUT,
        x11rb::COPY_FROM_PARENT,
        &CreateWindowAux::new()
            .background_pixel(pixels[0])
            .event_mask(EventMask::STRUCTURE_NOTIFY),
    )
    .context("Creating icon window")?;
    let mut state = DockState::Created;
    debug!("Icon window 0x{win:x}, {side}x{side} ({state:?})");

    tray::request_dock(&conn, &atoms, screen_num, win)?;
    state = DockState::DockRequested;

    conn.map_window(win).context("Mapping icon window")?;
    conn.flush().context("Flushing window map")?;

    run_loop(&conn, root, win, &mut state)?;

    // terminal transition: give the colormap entries back
    conn.free_colors(colormap, 0, &pixels)
        .context("Freeing colormap entries")?;
    conn.flush().context("Flushing cleanup")?;

    Ok(())
}

/// Allocates one pixel per slot in the screen's default colormap. Any
/// failure here is fatal; an icon without its colors is useless.
fn allocate_colors<C: Connection>(
    conn: &C,
    colormap: Colormap,
    colors: &ColorConfig,
) -> anyhow::Result<[u32; 4]> {
    let slots = [
        colors.bg_charge,
        colors.bg_discharge,
        colors.fg_charge,
        colors.fg_discharge,
    ];

    let mut pixels = [0u32; 4];
    for (pixel, rgb) in pixels.iter_mut().zip(slots) {
        *pixel = conn
            .alloc_color(colormap, rgb.red, rgb.green, rgb.blue)
            .context("Failed to allocate color")?
            .reply()
            .context("Failed to allocate color")?
            .pixel;
        trace!("{rgb:?} -> pixel 0x{pixel:x}");
    }

    Ok(pixels)
}

/// Drains every pending event eagerly, then blocks for the next one. Exits
/// only when the icon window itself is destroyed.
fn run_loop<C: Connection>(
    conn: &C,
    root: Window,
    icon: Window,
    state: &mut DockState,
) -> anyhow::Result<()> {
    loop {
        let mut next = Some(conn.wait_for_event().context("Waiting for events")?);
        while let Some(event) = next {
            if handle_event(state, root, icon, event) {
                info!("Icon window destroyed; shutting down");
                return Ok(());
            }
            next = conn.poll_for_event().context("Polling for events")?;
        }
    }
}

/// Advances the dock state machine. Returns true once the icon window is
/// gone, the sole exit condition.
fn handle_event(state: &mut DockState, root: Window, icon: Window, event: Event) -> bool {
    match event {
        Event::ReparentNotify(e) if e.window == icon => {
            *state = if e.parent == root {
                DockState::Standalone
            } else {
                DockState::Embedded
            };
            debug!("Icon reparented under 0x{:x}: {state:?}", e.parent);
        }
        Event::MapNotify(e) if e.window == icon => {
            if *state == DockState::DockRequested {
                *state = DockState::Standalone;
                debug!("Icon mapped without being embedded; running standalone");
            }
        }
        Event::DestroyNotify(e) if e.window == icon => return true,
        Event::DestroyNotify(e) => {
            // a window we subscribed to, i.e. the tray manager, went away
            info!("Window 0x{:x} destroyed (tray manager exited?)", e.window);
        }
        Event::Error(err) => {
            debug!("Unhandled X error code {}", err.error_code);
        }
        event => trace!("Ignoring event: {event:?}"),
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use x11rb::protocol::xproto::{
        DestroyNotifyEvent, MapNotifyEvent, ReparentNotifyEvent, DESTROY_NOTIFY_EVENT,
        MAP_NOTIFY_EVENT, REPARENT_NOTIFY_EVENT,
    };

    const ROOT: Window = 1;
    const ICON: Window = 2;
    const TRAY: Window = 3;

    fn reparent(window: Window, parent: Window) -> Event {
        Event::ReparentNotify(ReparentNotifyEvent {
            response_type: REPARENT_NOTIFY_EVENT,
            sequence: 0,
            event: window,
            window,
            parent,
            x: 0,
            y: 0,
            override_redirect: false,
        })
    }

    fn map(window: Window) -> Event {
        Event::MapNotify(MapNotifyEvent {
            response_type: MAP_NOTIFY_EVENT,
            sequence: 0,
            event: window,
            window,
            override_redirect: false,
        })
    }

    fn destroy(window: Window) -> Event {
        Event::DestroyNotify(DestroyNotifyEvent {
            response_type: DESTROY_NOTIFY_EVENT,
            sequence: 0,
            event: window,
            window,
        })
    }

    #[test]
    fn embedding_reparent_marks_embedded() {
        let mut state = DockState::DockRequested;
        assert!(!handle_event(&mut state, ROOT, ICON, reparent(ICON, TRAY)));
        assert_eq!(state, DockState::Embedded);

        // a later map event must not demote an embedded icon
        assert!(!handle_event(&mut state, ROOT, ICON, map(ICON)));
        assert_eq!(state, DockState::Embedded);
    }

    #[test]
    fn map_without_embedding_marks_standalone() {
        let mut state = DockState::DockRequested;
        assert!(!handle_event(&mut state, ROOT, ICON, map(ICON)));
        assert_eq!(state, DockState::Standalone);
    }

    #[test]
    fn reparent_back_to_root_marks_standalone() {
        let mut state = DockState::Embedded;
        assert!(!handle_event(&mut state, ROOT, ICON, reparent(ICON, ROOT)));
        assert_eq!(state, DockState::Standalone);
    }

    #[test]
    fn only_the_icon_destroy_exits() {
        let mut state = DockState::Embedded;
        assert!(!handle_event(&mut state, ROOT, ICON, destroy(TRAY)));
        assert!(handle_event(&mut state, ROOT, ICON, destroy(ICON)));
    }

    #[test]
    fn foreign_events_are_ignored() {
        let mut state = DockState::DockRequested;
        assert!(!handle_event(&mut state, ROOT, ICON, reparent(TRAY, ROOT)));
        assert!(!handle_event(&mut state, ROOT, ICON, map(TRAY)));
        assert_eq!(state, DockState::DockRequested);
    }
}
