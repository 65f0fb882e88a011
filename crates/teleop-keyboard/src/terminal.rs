//! Raw-mode single-key input.
//!
//! The terminal is switched to raw mode only for the duration of one key
//! read and restored before the key is returned. Between reads it is in
//! whatever mode the user had, so status output and other processes print
//! normally.
//!
//! Raw mode also disables `ISIG`, which is why Ctrl-C arrives as the byte
//! `0x03` instead of raising `SIGINT`.

use std::io::{self, Read};

use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use teleop_types::TeleopError;
use tracing::{trace, warn};

/// Anything that can hand the loop one key at a time.
pub trait KeySource {
    /// Block until one key is available and return it.
    ///
    /// # Errors
    ///
    /// [`TeleopError::InputClosed`] at end of input,
    /// [`TeleopError::Terminal`] when the terminal cannot be read or
    /// switched into raw mode.
    fn next_key(&mut self) -> Result<char, TeleopError>;
}

/// RAII guard holding the terminal in raw mode.
///
/// Dropping the guard restores the previous mode, including on early
/// returns and unwinding.
#[derive(Debug)]
pub struct RawModeGuard {
    _private: (),
}

impl RawModeGuard {
    pub fn acquire() -> Result<Self, TeleopError> {
        enable_raw_mode()
            .map_err(|e| TeleopError::Terminal(format!("failed to enter raw mode: {e}")))?;
        Ok(Self { _private: () })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            warn!(error = %e, "failed to restore terminal mode");
        }
    }
}

/// Read exactly one byte from `reader` and return it as a key.
///
/// Bytes above `0x7f` map to the Latin-1 code point of the same value, so a
/// multi-byte UTF-8 keystroke shows up as several unbound keys.
pub fn read_key<R: Read>(reader: &mut R) -> Result<char, TeleopError> {
    let mut buf = [0u8; 1];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => return Err(TeleopError::InputClosed),
            Ok(_) => return Ok(char::from(buf[0])),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(TeleopError::Terminal(format!("failed to read key: {e}"))),
        }
    }
}

/// Keys read from standard input, one raw-mode scope per key.
#[derive(Debug, Default)]
pub struct TerminalKeys;

impl TerminalKeys {
    pub fn new() -> Self {
        Self
    }
}

impl KeySource for TerminalKeys {
    fn next_key(&mut self) -> Result<char, TeleopError> {
        let _raw = RawModeGuard::acquire()?;
        let key = read_key(&mut io::stdin().lock())?;
        trace!(key = ?key, "key read");
        Ok(key)
    }
}

/// Replays a fixed key sequence, then reports end of input.
#[cfg(test)]
pub(crate) struct ScriptedKeys {
    keys: std::collections::VecDeque<char>,
}

#[cfg(test)]
impl ScriptedKeys {
    pub(crate) fn new(keys: &str) -> Self {
        Self {
            keys: keys.chars().collect(),
        }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.keys.len()
    }
}

#[cfg(test)]
impl KeySource for ScriptedKeys {
    fn next_key(&mut self) -> Result<char, TeleopError> {
        self.keys.pop_front().ok_or(TeleopError::InputClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_one_byte_at_a_time() {
        let mut input = Cursor::new(b"iq".to_vec());
        assert_eq!(read_key(&mut input).unwrap(), 'i');
        assert_eq!(read_key(&mut input).unwrap(), 'q');
    }

    #[test]
    fn ctrl_c_byte_is_a_key() {
        let mut input = Cursor::new(vec![0x03]);
        assert_eq!(read_key(&mut input).unwrap(), '\x03');
    }

    #[test]
    fn end_of_input_is_reported() {
        let mut input = Cursor::new(Vec::new());
        assert!(matches!(read_key(&mut input), Err(TeleopError::InputClosed)));
    }

    #[test]
    fn high_bytes_map_to_latin1() {
        let mut input = Cursor::new(vec![0xc3]);
        assert_eq!(read_key(&mut input).unwrap(), '\u{c3}');
    }

    struct Flaky {
        interrupted: bool,
    }

    impl Read for Flaky {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(io::Error::from(io::ErrorKind::Interrupted));
            }
            buf[0] = b'k';
            Ok(1)
        }
    }

    #[test]
    fn interrupted_reads_are_retried() {
        let mut input = Flaky { interrupted: false };
        assert_eq!(read_key(&mut input).unwrap(), 'k');
    }

    #[test]
    fn broken_reader_is_a_terminal_error() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::other("device gone"))
            }
        }
        let err = read_key(&mut Broken).unwrap_err();
        assert!(matches!(err, TeleopError::Terminal(msg) if msg.contains("device gone")));
    }

    #[test]
    fn scripted_keys_run_out() {
        let mut keys = ScriptedKeys::new("a");
        assert_eq!(keys.next_key().unwrap(), 'a');
        assert_eq!(keys.remaining(), 0);
        assert!(matches!(keys.next_key(), Err(TeleopError::InputClosed)));
    }
}
