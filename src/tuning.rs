//! Live servo endpoint tuning over the serial port.
//!
//! Commands are three ASCII bytes with no terminator:
//!
//! | Command | Effect                       |
//! |---------|------------------------------|
//! | `O##`   | open angle = ## degrees      |
//! | `C##`   | closed angle = ## degrees    |
//!
//! The letter is case-insensitive. Line endings and spaces between
//! commands are skipped so a terminal that sends `O45\r\n` still frames
//! correctly. After a malformed command the rest of that line is discarded,
//! up to the next `\r` or `\n`. Tuned values apply to all four servos and
//! are lost on reset.

use crate::config::TUNING_QUEUE_LEN;
use crate::error::Error;
use crate::servo::{Angle, Endpoint};
use heapless::Deque;

/// Bytes per command.
pub const COMMAND_LEN: usize = 3;

/// A parsed tuning command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Command {
    pub endpoint: Endpoint,
    pub angle: Angle,
}

/// Parse one framed command.
pub fn parse(bytes: [u8; COMMAND_LEN]) -> Result<Command, Error> {
    let endpoint = match bytes[0] {
        b'O' | b'o' => Endpoint::Open,
        b'C' | b'c' => Endpoint::Closed,
        _ => return Err(Error::MalformedCommand(bytes)),
    };

    let digit = |b: u8| {
        if b.is_ascii_digit() {
            Ok(u16::from(b - b'0'))
        } else {
            Err(Error::MalformedCommand(bytes))
        }
    };
    let degrees = digit(bytes[1])? * 10 + digit(bytes[2])?;

    // Two digits cap out at 99, but the range check stays with the type.
    let angle = Angle::new(degrees)?;
    Ok(Command { endpoint, angle })
}

fn is_separator(b: u8) -> bool {
    matches!(b, b'\r' | b'\n' | b' ')
}

fn is_line_end(b: u8) -> bool {
    matches!(b, b'\r' | b'\n')
}

/// Inbound byte queue that frames tuning commands.
pub struct TuningChannel {
    queue: Deque<u8, TUNING_QUEUE_LEN>,
    /// Set after a malformed command until the next line end is seen.
    discarding: bool,
}

impl Default for TuningChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl TuningChannel {
    pub const fn new() -> Self {
        Self {
            queue: Deque::new(),
            discarding: false,
        }
    }

    /// Queue received bytes. Returns how many were dropped because the
    /// queue was full.
    pub fn feed(&mut self, bytes: &[u8]) -> usize {
        let mut dropped = 0;
        for &b in bytes {
            if self.queue.push_back(b).is_err() {
                dropped += 1;
            }
        }
        dropped
    }

    /// Take at most one complete command off the queue.
    ///
    /// Returns `None` until a full command has arrived.
    pub fn poll(&mut self) -> Option<Result<Command, Error>> {
        if self.discarding {
            while let Some(b) = self.queue.front().copied() {
                if is_line_end(b) {
                    self.discarding = false;
                    break;
                }
                self.queue.pop_front();
            }
            if self.discarding {
                return None;
            }
        }

        while self.queue.front().copied().is_some_and(is_separator) {
            self.queue.pop_front();
        }
        if self.queue.len() < COMMAND_LEN {
            return None;
        }

        let mut bytes = [0u8; COMMAND_LEN];
        for slot in bytes.iter_mut() {
            *slot = self.queue.pop_front()?;
        }
        let parsed = parse(bytes);
        self.discarding = parsed.is_err();
        Some(parsed)
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn angle(deg: u16) -> Angle {
        Angle::new(deg).unwrap()
    }

    #[test]
    fn parse_open_and_closed() {
        assert_eq!(
            parse(*b"O45"),
            Ok(Command {
                endpoint: Endpoint::Open,
                angle: angle(45)
            })
        );
        assert_eq!(
            parse(*b"C99"),
            Ok(Command {
                endpoint: Endpoint::Closed,
                angle: angle(99)
            })
        );
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(parse(*b"o07").unwrap().endpoint, Endpoint::Open);
        assert_eq!(parse(*b"c00").unwrap().angle, angle(0));
    }

    #[test]
    fn parse_rejects_bad_prefix() {
        assert_eq!(parse(*b"X12"), Err(Error::MalformedCommand(*b"X12")));
    }

    #[test]
    fn parse_rejects_non_digits() {
        assert_eq!(parse(*b"O4a"), Err(Error::MalformedCommand(*b"O4a")));
        assert_eq!(parse(*b"C-1"), Err(Error::MalformedCommand(*b"C-1")));
    }

    #[test]
    fn poll_waits_for_full_command() {
        let mut ch = TuningChannel::new();
        ch.feed(b"O4");
        assert_eq!(ch.poll(), None);
        ch.feed(b"5");
        assert_eq!(ch.poll().unwrap().unwrap().angle, angle(45));
        assert_eq!(ch.poll(), None);
    }

    #[test]
    fn poll_returns_one_command_per_call() {
        let mut ch = TuningChannel::new();
        ch.feed(b"O10C20");
        assert_eq!(ch.poll().unwrap().unwrap().endpoint, Endpoint::Open);
        assert_eq!(ch.pending(), 3);
        assert_eq!(ch.poll().unwrap().unwrap().endpoint, Endpoint::Closed);
    }

    #[test]
    fn poll_skips_line_endings() {
        let mut ch = TuningChannel::new();
        ch.feed(b"O45\r\n C30\n");
        assert_eq!(ch.poll().unwrap().unwrap().angle, angle(45));
        assert_eq!(ch.poll().unwrap().unwrap().angle, angle(30));
        assert_eq!(ch.poll(), None);
        assert_eq!(ch.pending(), 0);
    }

    #[test]
    fn malformed_command_discards_rest_of_line() {
        let mut ch = TuningChannel::new();
        ch.feed(b"X12345\r\nO45");
        assert_eq!(ch.poll(), Some(Err(Error::MalformedCommand(*b"X12"))));
        assert_eq!(ch.poll().unwrap().unwrap().angle, angle(45));
        assert_eq!(ch.poll(), None);
    }

    #[test]
    fn discarding_spans_packets_until_line_end() {
        let mut ch = TuningChannel::new();
        ch.feed(b"hello");
        assert!(matches!(ch.poll(), Some(Err(Error::MalformedCommand(_)))));
        assert_eq!(ch.poll(), None);

        // Tail of the same line arrives later and is still dropped.
        ch.feed(b" world");
        assert_eq!(ch.poll(), None);
        assert_eq!(ch.pending(), 0);

        ch.feed(b"\nC20");
        assert_eq!(ch.poll().unwrap().unwrap().endpoint, Endpoint::Closed);
    }

    #[test]
    fn unterminated_garbage_swallows_following_command() {
        let mut ch = TuningChannel::new();
        ch.feed(b"X12O45");
        assert!(ch.poll().unwrap().is_err());
        assert_eq!(ch.poll(), None);
        assert_eq!(ch.pending(), 0);
    }

    #[test]
    fn feed_drops_overflow() {
        let mut ch = TuningChannel::new();
        let bytes = [b'O'; TUNING_QUEUE_LEN + 5];
        assert_eq!(ch.feed(&bytes), 5);
        assert_eq!(ch.pending(), TUNING_QUEUE_LEN);
    }
}
