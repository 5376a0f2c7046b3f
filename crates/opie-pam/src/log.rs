// Copyright (c) 2026 pam-opie contributors
// OPIE One-Time Password PAM Module
// Licensed under the MIT License

//! Routes `tracing` events into syslog.
//!
//! A PAM module has no terminal of its own; the host application owns
//! stdout and stderr. Authentication events therefore go to the
//! `authpriv` facility, matching where sshd and login report.

use std::io;
use std::sync::Once;

use tracing_subscriber::filter::LevelFilter;

/// Identity string passed to `openlog`. Must stay alive for the process
/// lifetime, so it is a static with an explicit terminator.
static IDENT: &[u8] = b"pam_opie\0";

static INIT: Once = Once::new();

/// Buffers one log line and hands it to `syslog(3)` on flush.
#[derive(Default)]
struct SyslogWriter {
    buf: Vec<u8>,
}

impl io::Write for SyslogWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for SyslogWriter {
    fn drop(&mut self) {
        while self.buf.last() == Some(&b'\n') {
            self.buf.pop();
        }
        if self.buf.is_empty() {
            return;
        }
        let Ok(line) = std::ffi::CString::new(self.buf.as_slice()) else {
            return;
        };
        // SAFETY: both pointers reference NUL-terminated buffers that
        // outlive the call; "%s" prevents format expansion of the line.
        unsafe {
            libc::syslog(
                libc::LOG_NOTICE,
                b"%s\0".as_ptr().cast(),
                line.as_ptr(),
            );
        }
    }
}

/// Installs the syslog subscriber. Safe to call from every PAM entry
/// point; only the first call takes effect.
pub fn init(debug: bool) {
    INIT.call_once(|| {
        // SAFETY: IDENT is NUL-terminated and 'static.
        unsafe {
            libc::openlog(IDENT.as_ptr().cast(), libc::LOG_PID, libc::LOG_AUTHPRIV);
        }
        let level = if debug {
            LevelFilter::DEBUG
        } else {
            LevelFilter::INFO
        };
        // try_init: the host application may already carry a global
        // subscriber; losing the race is fine.
        let _ = tracing_subscriber::fmt()
            .with_writer(SyslogWriter::default)
            .with_max_level(level)
            .with_ansi(false)
            .with_target(false)
            .without_time()
            .try_init();
    });
}
