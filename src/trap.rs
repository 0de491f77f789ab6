use log::debug;
use x11rb::connection::Connection;
use x11rb::cookie::VoidCookie;
use x11rb::errors::{ConnectionError, ReplyError};

/// Scoped interception of X protocol errors around a single risky request.
///
/// The dock request may legitimately target a window that does not exist
/// (no tray manager running), and the resulting protocol error must not take
/// the program down. A bracket records the most recent error code instead:
///
/// ```ignore
/// let mut trap = ErrorTrap::engage();
/// trap.guard(conn.send_event(..)?)?;
/// if trap.release() != 0 { /* rejected, carry on */ }
/// ```
///
/// The trap is a plain stack value, so a bracket cannot outlive its call
/// site and nesting one inside another is visible in the code that does it.
/// Losing the connection itself is not a protocol error and still propagates.
#[must_use]
pub struct ErrorTrap {
    last_code: u8,
}

impl ErrorTrap {
    pub fn engage() -> Self {
        Self { last_code: 0 }
    }

    /// Checks a void request under the trap, swallowing any X error.
    pub fn guard<C: Connection>(
        &mut self,
        cookie: VoidCookie<'_, C>,
    ) -> Result<(), ConnectionError> {
        match cookie.check() {
            Ok(()) => Ok(()),
            Err(ReplyError::X11Error(err)) => {
                debug!(
                    "trapped X error code {} from {}",
                    err.error_code,
                    err.request_name.unwrap_or("unknown request")
                );
                self.last_code = err.error_code;
                Ok(())
            }
            Err(ReplyError::ConnectionError(err)) => Err(err),
        }
    }

    /// Ends the bracket, yielding the last recorded error code (0 = clean).
    pub fn release(self) -> u8 {
        self.last_code
    }
}

#[test]
fn empty_bracket_is_clean() {
    assert_eq!(ErrorTrap::engage().release(), 0);
}
