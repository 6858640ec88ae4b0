//! Readiness wait shared by the fd-backed transports.

use std::io;
use std::os::fd::RawFd;
use std::time::Duration;

use crate::error::TransportError;

/// Wait up to `timeout` for `fd` to become readable.
///
/// Hang-up and error conditions count as readable so the caller's next
/// read observes them.  A signal interrupting the wait reports "not
/// readable" and lets the loop look at the shutdown trigger.
pub(crate) fn wait_readable(fd: RawFd, timeout: Duration) -> Result<bool, TransportError> {
    let timeout_ms = timeout.as_millis().min(libc::c_int::MAX as u128) as libc::c_int;
    let mut pfd = libc::pollfd {
        fd,
        events: libc::POLLIN,
        revents: 0,
    };

    // SAFETY: `pfd` is a valid, exclusively borrowed pollfd and nfds is 1.
    let rc = unsafe { libc::poll(&mut pfd, 1, timeout_ms) };
    if rc < 0 {
        let err = io::Error::last_os_error();
        if err.kind() == io::ErrorKind::Interrupted {
            return Ok(false);
        }
        return Err(err.into());
    }

    Ok(rc > 0 && pfd.revents & (libc::POLLIN | libc::POLLHUP | libc::POLLERR) != 0)
}
