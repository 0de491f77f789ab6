//! Client side of the XEmbed system-tray docking handshake.
//!
//! The tray manager owns the `_NET_SYSTEM_TRAY_S<screen>` selection; docking
//! is requested by sending it a `_NET_SYSTEM_TRAY_OPCODE` client message
//! carrying the icon's window id.

use std::thread;
use std::time::Duration;

use anyhow::Context;
use log::{debug, info, warn};
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{
    Atom, ChangeWindowAttributesAux, ClientMessageEvent, ConnectionExt, EventMask, Window,
};

use crate::trap::ErrorTrap;

x11rb::atom_manager! {
    pub Atoms: AtomsCookie {
        _NET_SYSTEM_TRAY_OPCODE,
    }
}

/// Message kinds defined by the system-tray protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrayOpcode {
    RequestDock = 0,
    BeginMessage = 1,
    CancelMessage = 2,
}

/// Grace period between flushing the dock request and inspecting the trap,
/// so the manager gets a chance to react.
const DOCK_GRACE: Duration = Duration::from_millis(10);

/// Builds the REQUEST_DOCK client message for `icon`.
pub fn dock_request(opcode: Atom, tray: Window, icon: Window) -> ClientMessageEvent {
    // word 0 is a timestamp slot; CURRENT_TIME lets the server fill it in
    ClientMessageEvent::new(
        32,
        tray,
        opcode,
        [
            x11rb::CURRENT_TIME,
            TrayOpcode::RequestDock as u32,
            icon,
            0,
            0,
        ],
    )
}

/// Asks the tray manager on `screen_num` to embed `icon`.
///
/// Best effort: with no manager running the message still goes out to a null
/// target and the rejected send is trapped and logged, never fatal. Whether
/// the icon ends up embedded or standalone is only observable through the
/// window events that follow.
pub fn request_dock<C: Connection>(
    conn: &C,
    atoms: &Atoms,
    screen_num: usize,
    icon: Window,
) -> anyhow::Result<()> {
    let selection = format!("_NET_SYSTEM_TRAY_S{screen_num}");
    let selection_atom = conn
        .intern_atom(false, selection.as_bytes())
        .context("Interning tray selection atom")?
        .reply()
        .context("Interning tray selection atom")?
        .atom;

    let tray = conn
        .get_selection_owner(selection_atom)
        .context("Querying tray selection owner")?
        .reply()
        .context("Querying tray selection owner")?
        .owner;

    if tray == x11rb::NONE {
        info!("No tray manager owns {selection}; sending the dock request anyway");
    } else {
        debug!("Tray manager is window 0x{tray:x}");
        // watch for the manager going away
        conn.change_window_attributes(
            tray,
            &ChangeWindowAttributesAux::new().event_mask(EventMask::STRUCTURE_NOTIFY),
        )
        .context("Subscribing to tray manager lifetime events")?;
    }

    let event = dock_request(atoms._NET_SYSTEM_TRAY_OPCODE, tray, icon);

    let mut trap = ErrorTrap::engage();
    let cookie = conn
        .send_event(false, tray, EventMask::NO_EVENT, event)
        .context("Sending dock request")?;
    conn.flush().context("Flushing dock request")?;
    thread::sleep(DOCK_GRACE);
    trap.guard(cookie)?;

    match trap.release() {
        0 => debug!("Dock request delivered"),
        code => warn!("Dock request failed with X error code {code}; staying standalone"),
    }

    Ok(())
}
