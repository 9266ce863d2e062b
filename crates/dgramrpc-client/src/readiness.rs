//! Bounded readability polling for the datagram socket.
//!
//! `wait_readable` answers "does the descriptor have data to read"
//! within a millisecond-bounded window, so the receive loop never
//! blocks past its budget on a single read.

use std::io;
use std::net::UdpSocket;
use std::time::Duration;

/// Wait until the socket is readable or the window elapses.
///
/// Returns `Ok(false)` when the window passed with no data (not an
/// error). `EINTR` is retried against the remaining window.
#[cfg(unix)]
pub(crate) fn wait_readable(socket: &UdpSocket, window: Duration) -> io::Result<bool> {
    use std::os::fd::AsRawFd;
    use std::time::Instant;

    let deadline = Instant::now() + window;
    let mut fds = libc::pollfd {
        fd: socket.as_raw_fd(),
        events: libc::POLLIN,
        revents: 0,
    };

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Ok(false);
        }
        // Round up so millisecond truncation cannot expire the window
        // before the deadline.
        let timeout_ms = remaining
            .as_nanos()
            .div_ceil(1_000_000)
            .min(i32::MAX as u128) as libc::c_int;

        // SAFETY: `fds` is a valid pollfd array of length 1 for the
        // duration of the call.
        let rc = unsafe { libc::poll(&mut fds, 1, timeout_ms) };
        if rc < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                continue;
            }
            return Err(err);
        }
        if rc == 0 {
            continue;
        }
        if fds.revents & libc::POLLNVAL != 0 {
            return Err(io::Error::other("poll reported invalid descriptor"));
        }
        // POLLERR means a pending socket error (e.g. ICMP port
        // unreachable on a connected UDP socket): the descriptor is
        // readable in the sense that the next recv returns the real
        // error, which is what tears the connection down.
        return Ok(true);
    }
}

#[cfg(not(unix))]
pub(crate) fn wait_readable(_socket: &UdpSocket, _window: Duration) -> io::Result<bool> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "readiness polling requires poll(2) (non-unix support planned)",
    ))
}
