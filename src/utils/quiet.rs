//! Scoped silencing of the process standard output stream
//!
//! While a [`StdoutGag`] is alive, file descriptor 1 points at the null
//! device, so anything written to stdout (by Rust code, by the JS engine or
//! by native code) is discarded. Dropping the guard restores the original
//! descriptor.

use std::future::Future;
use std::io::{self, Write};

#[cfg(unix)]
pub use unix::StdoutGag;

#[cfg(not(unix))]
pub use fallback::StdoutGag;

/// Drive `future` to completion with standard output silenced
///
/// Stdout is restored before this returns, on success and on error alike.
pub async fn silenced<F, T, E>(future: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: From<io::Error>,
{
    let _gag = StdoutGag::acquire()?;
    future.await
}

fn flush_stdout() -> io::Result<()> {
    io::stdout().lock().flush()
}

#[cfg(unix)]
mod unix {
    use super::flush_stdout;
    use std::fs::OpenOptions;
    use std::io;
    use std::os::unix::io::AsRawFd;
    use tracing::warn;

    /// Guard that keeps stdout pointed at `/dev/null`
    #[derive(Debug)]
    pub struct StdoutGag {
        target_fd: libc::c_int,
        saved_fd: libc::c_int,
    }

    impl StdoutGag {
        /// Redirect stdout to the null device until the guard is dropped
        pub fn acquire() -> io::Result<Self> {
            flush_stdout()?;
            Self::redirect(libc::STDOUT_FILENO)
        }

        /// Point `target_fd` at the null device until the guard is dropped
        pub(crate) fn redirect(target_fd: libc::c_int) -> io::Result<Self> {
            let devnull = OpenOptions::new().write(true).open("/dev/null")?;

            // SAFETY: dup/dup2/close only touch descriptors we own or target_fd.
            let saved_fd = unsafe { libc::dup(target_fd) };
            if saved_fd < 0 {
                return Err(io::Error::last_os_error());
            }

            if unsafe { libc::dup2(devnull.as_raw_fd(), target_fd) } < 0 {
                let err = io::Error::last_os_error();
                unsafe { libc::close(saved_fd) };
                return Err(err);
            }

            Ok(Self {
                target_fd,
                saved_fd,
            })
        }
    }

    impl Drop for StdoutGag {
        fn drop(&mut self) {
            // Buffered bytes written while gagged belong to /dev/null.
            if self.target_fd == libc::STDOUT_FILENO {
                let _ = flush_stdout();
            }

            // SAFETY: saved_fd came from dup() in redirect and is closed once.
            unsafe {
                if libc::dup2(self.saved_fd, self.target_fd) < 0 {
                    warn!(
                        "failed to restore descriptor {}: {}",
                        self.target_fd,
                        io::Error::last_os_error()
                    );
                }
                libc::close(self.saved_fd);
            }
        }
    }
}

#[cfg(not(unix))]
mod fallback {
    use super::flush_stdout;
    use std::io;

    /// No-op guard on targets without POSIX descriptors
    #[derive(Debug)]
    pub struct StdoutGag {
        _private: (),
    }

    impl StdoutGag {
        pub fn acquire() -> io::Result<Self> {
            flush_stdout()?;
            Ok(Self { _private: () })
        }
    }

    impl Drop for StdoutGag {
        fn drop(&mut self) {
            let _ = flush_stdout();
        }
    }
}
