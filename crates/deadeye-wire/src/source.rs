//! Dart sources and the pump that feeds them to a session

use crate::error::Result;
use crate::message::{decode, RelayMessage};
use deadeye_core::{DartEvent, Game, Presenter, Session};
use std::collections::VecDeque;
use std::io::BufRead;

/// Anything that produces darts in throw order
pub trait DartSource {
    /// The next dart, `Ok(None)` once the source is exhausted
    fn next_dart(&mut self) -> Result<Option<DartEvent>>;
}

/// A fixed list of darts
#[derive(Debug, Clone, Default)]
pub struct ScriptSource {
    darts: VecDeque<DartEvent>,
}

impl ScriptSource {
    pub fn new(darts: impl IntoIterator<Item = DartEvent>) -> Self {
        Self {
            darts: darts.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.darts.len()
    }
}

impl DartSource for ScriptSource {
    fn next_dart(&mut self) -> Result<Option<DartEvent>> {
        Ok(self.darts.pop_front())
    }
}

/// Newline-delimited relay JSON, e.g. a captured relay log
///
/// Non-throw messages are skipped. Lines that fail to decode are logged
/// and skipped; read errors end the pump.
#[derive(Debug)]
pub struct LineSource<R> {
    reader: R,
    line: String,
    line_no: u64,
    skipped: u64,
}

impl<R: BufRead> LineSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            line_no: 0,
            skipped: 0,
        }
    }

    /// Lines that could not be decoded
    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}

impl<R: BufRead> DartSource for LineSource<R> {
    fn next_dart(&mut self) -> Result<Option<DartEvent>> {
        loop {
            self.line.clear();
            if self.reader.read_line(&mut self.line)? == 0 {
                return Ok(None);
            }
            self.line_no += 1;
            let text = self.line.trim();
            if text.is_empty() {
                continue;
            }
            match decode(text) {
                Ok(RelayMessage::Throw(throw)) => return Ok(Some(throw.dart)),
                Ok(RelayMessage::Status { connected }) => {
                    log::debug!("wire: caller connected = {}", connected);
                }
                Ok(RelayMessage::Ignored(event)) => {
                    log::debug!("wire: ignoring event {:?}", event);
                }
                Err(err) => {
                    self.skipped += 1;
                    log::warn!("wire: skipping line {}: {}", self.line_no, err);
                }
            }
        }
    }
}

/// What a pump did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpStats {
    /// Darts read from the source
    pub received: u64,
    /// Darts the session took
    pub applied: u64,
    /// Darts the session turned away (paused, pending, over)
    pub rejected: u64,
}

/// Feed every dart from `source` to `session`, presenting each update
///
/// Time does not pass while pumping; callers with pending transitions tick
/// or advance the session between pumps.
pub fn pump<G, S, P>(source: &mut S, session: &mut Session<G>, presenter: &mut P) -> Result<PumpStats>
where
    G: Game,
    S: DartSource + ?Sized,
    P: Presenter + ?Sized,
{
    let mut stats = PumpStats::default();
    while let Some(event) = source.next_dart()? {
        stats.received += 1;
        let result = session.handle_dart_throw(event);
        match result.rejected {
            Some(reason) => {
                stats.rejected += 1;
                log::debug!("wire: {:?} rejected: {:?}", event, reason);
            }
            None => stats.applied += 1,
        }
        presenter.present_all(&result.cmd);
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_script_source_in_order() {
        let mut source = ScriptSource::new([DartEvent::single(1), DartEvent::triple(20)]);
        assert_eq!(source.remaining(), 2);
        assert_eq!(source.next_dart().unwrap(), Some(DartEvent::single(1)));
        assert_eq!(source.next_dart().unwrap(), Some(DartEvent::triple(20)));
        assert_eq!(source.next_dart().unwrap(), None);
    }

    #[test]
    fn test_line_source_skips_noise() {
        let log = "\
{\"event\":\"subscribe\",\"client\":\"DeadEyeGames\"}

{\"connected\":true}
garbage
{\"event\":\"dart1-thrown\",\"game\":{\"fieldNumber\":20,\"fieldMultiplier\":1,\"dartValue\":20}}
{\"segment\":25,\"multiplier\":1,\"value\":25}
";
        let mut source = LineSource::new(Cursor::new(log));
        assert_eq!(source.next_dart().unwrap(), Some(DartEvent::single(20)));
        assert_eq!(source.next_dart().unwrap(), Some(DartEvent::bull()));
        assert_eq!(source.next_dart().unwrap(), None);
        assert_eq!(source.skipped(), 1);
    }
}
