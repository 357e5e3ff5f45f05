#![warn(clippy::all, clippy::pedantic)]

use std::{mem::MaybeUninit, os::fd::RawFd};

/// Terminal settings captured before the line editor switches to raw mode
#[derive(Clone, Copy)]
pub struct TerminalMode {
    fd: RawFd,
    termios: libc::termios,
}

impl TerminalMode {
    /// Snapshot the settings of `fd`, or `None` if it is not a terminal
    #[must_use]
    pub fn capture(fd: RawFd) -> Option<Self> {
        let mut termios = MaybeUninit::<libc::termios>::uninit();
        // SAFETY: tcgetattr only writes into the buffer and fully initialises it on success
        if unsafe { libc::tcgetattr(fd, termios.as_mut_ptr()) } != 0 {
            return None;
        }
        Some(Self {
            fd,
            // SAFETY: checked above
            termios: unsafe { termios.assume_init() },
        })
    }

    /// Put the captured settings back; returns false if the terminal refused
    pub fn restore(&self) -> bool {
        // SAFETY: the pointer refers to a valid termios owned by self
        unsafe { libc::tcsetattr(self.fd, libc::TCSANOW, &self.termios) == 0 }
    }
}

#[cfg(all(test, target_os = "linux"))]
mod tests {
    use super::*;
    use std::{ffi::CStr, fs::OpenOptions, os::fd::AsRawFd};

    fn flags(fd: RawFd) -> libc::tcflag_t {
        TerminalMode::capture(fd)
            .map(|mode| mode.termios.c_lflag)
            .unwrap_or_default()
    }

    #[test]
    fn test_files_are_not_terminals() -> anyhow::Result<()> {
        let file = tempfile::tempfile()?;
        assert!(TerminalMode::capture(file.as_raw_fd()).is_none());
        Ok(())
    }

    #[test]
    fn test_restore_undoes_raw_mode() -> anyhow::Result<()> {
        // SAFETY: plain pty allocation; the name is copied out before any other call
        let (master, name) = unsafe {
            let master = libc::posix_openpt(libc::O_RDWR | libc::O_NOCTTY);
            assert!(master >= 0, "no pty available");
            assert_eq!(libc::grantpt(master), 0);
            assert_eq!(libc::unlockpt(master), 0);
            let name = CStr::from_ptr(libc::ptsname(master))
                .to_string_lossy()
                .into_owned();
            (master, name)
        };
        let replica = OpenOptions::new().read(true).write(true).open(&name)?;
        let fd = replica.as_raw_fd();

        let saved = TerminalMode::capture(fd).expect("pty is a terminal");
        assert_ne!(flags(fd) & libc::ICANON, 0);
        assert_ne!(flags(fd) & libc::ECHO, 0);

        let mut raw = saved;
        raw.termios.c_lflag &= !(libc::ICANON | libc::ECHO);
        assert!(raw.restore());
        assert_eq!(flags(fd) & (libc::ICANON | libc::ECHO), 0);

        assert!(saved.restore());
        assert_ne!(flags(fd) & libc::ICANON, 0);
        assert_ne!(flags(fd) & libc::ECHO, 0);

        // SAFETY: master came from posix_openpt above
        unsafe { libc::close(master) };
        Ok(())
    }
}
