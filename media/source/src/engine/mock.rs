/*!
    Instrumented in-memory engine for tests.

    Every buffer, format context and I/O context it hands out is recorded in a
    [`Ledger`] when acquired and when released, so tests can check both leaks
    and release order. Any acquisition stage can be made to fail.

    Inputs use a tiny synthetic container built by [`synthetic`]: the magic
    `MOCK`, a stream count, then one `(native type, decodable)` byte pair per
    stream.
*/

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use super::{BestStream, Demuxer, Engine, EngineError, NativeMediaType};
use crate::io::{EOF, IoCallbacks, SEEK_SIZE};
use crate::probe::ProbeLimits;

const MAGIC: &[u8; 4] = b"MOCK";
const INVALID_DATA: i32 = -0x4144_4E49;
const NOT_FOUND: i32 = -2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resource {
    Buffer,
    Context,
    Io,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Acquire(Resource),
    Release(Resource),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Buffer,
    Context,
    Io,
    Open,
    Probe,
}

impl Stage {
    pub const ALL: [Self; 5] = [
        Self::Buffer,
        Self::Context,
        Self::Io,
        Self::Open,
        Self::Probe,
    ];
}

/**
    Acquisition/release log shared by the engine and every handle it creates.
*/
#[derive(Debug, Default)]
pub struct Ledger {
    /// Events since the last `clear_events`.
    events: RefCell<Vec<Event>>,
    /// Every event, used for live counts.
    history: RefCell<Vec<Event>>,
}

impl Ledger {
    fn record(&self, event: Event) {
        self.events.borrow_mut().push(event);
        self.history.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub fn clear_events(&self) {
        self.events.borrow_mut().clear();
    }

    pub fn releases(&self) -> Vec<Resource> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Release(r) => Some(*r),
                Event::Acquire(_) => None,
            })
            .collect()
    }

    pub fn released(&self, resource: Resource) -> bool {
        self.history
            .borrow()
            .contains(&Event::Release(resource))
    }

    pub fn live(&self, resource: Resource) -> usize {
        let history = self.history.borrow();
        let count = |event: Event| history.iter().filter(|e| **e == event).count();
        count(Event::Acquire(resource)) - count(Event::Release(resource))
    }

    pub fn live_total(&self) -> usize {
        [Resource::Buffer, Resource::Context, Resource::Io]
            .into_iter()
            .map(|r| self.live(r))
            .sum()
    }
}

/**
    Ledger entry that is released when dropped.
*/
struct Tracked {
    ledger: Rc<Ledger>,
    resource: Resource,
}

impl Tracked {
    fn acquire(ledger: &Rc<Ledger>, resource: Resource) -> Self {
        ledger.record(Event::Acquire(resource));
        Self {
            ledger: Rc::clone(ledger),
            resource,
        }
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.ledger.record(Event::Release(self.resource));
    }
}

pub struct MockBuffer {
    _tracked: Tracked,
}

pub struct MockContext {
    io: Option<Rc<RefCell<IoCallbacks>>>,
    _tracked: Tracked,
}

pub struct MockIo {
    // The buffer is released before the context that owns it.
    _buffer: MockBuffer,
    callbacks: Rc<RefCell<IoCallbacks>>,
    _tracked: Tracked,
}

#[derive(Clone, Copy, Debug)]
struct MockStream {
    native: NativeMediaType,
    decodable: bool,
}

pub struct MockInput {
    streams: Vec<MockStream>,
    _context: MockContext,
}

/**
    Build a synthetic container holding `streams`.
*/
pub fn synthetic(streams: &[(NativeMediaType, bool)]) -> Vec<u8> {
    let mut buf = MAGIC.to_vec();
    buf.push(streams.len() as u8);
    for (native, decodable) in streams {
        buf.push(native.0 as i8 as u8);
        buf.push(u8::from(*decodable));
    }
    buf
}

fn parse(data: &[u8]) -> Result<Vec<MockStream>, EngineError> {
    let invalid = || EngineError::new(INVALID_DATA, "Invalid data found when processing input");

    let rest = data.strip_prefix(MAGIC).ok_or_else(invalid)?;
    let (&count, table) = rest.split_first().ok_or_else(invalid)?;
    if table.len() != usize::from(count) * 2 {
        return Err(invalid());
    }
    Ok(table
        .chunks_exact(2)
        .map(|pair| MockStream {
            native: NativeMediaType(i32::from(pair[0] as i8)),
            decodable: pair[1] != 0,
        })
        .collect())
}

#[derive(Default)]
pub struct MockEngine {
    ledger: Rc<Ledger>,
    fail_at: Option<Stage>,
    named: HashMap<String, Vec<u8>>,
    probed_with: Cell<Option<ProbeLimits>>,
    reported_size: Cell<Option<i64>>,
    buffer_sizes: RefCell<Vec<usize>>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_at(mut self, stage: Stage) -> Self {
        self.fail_at = Some(stage);
        self
    }

    /**
        Make `name` openable by name, holding `streams`.
    */
    pub fn with_named(mut self, name: &str, streams: &[(NativeMediaType, bool)]) -> Self {
        self.named.insert(name.to_owned(), synthetic(streams));
        self
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Limits passed to the last successful probe.
    pub fn probed_with(&self) -> Option<ProbeLimits> {
        self.probed_with.get()
    }

    /// Size reported by the seek callback's size query during the last open.
    pub fn reported_size(&self) -> Option<i64> {
        self.reported_size.get()
    }

    pub fn buffer_sizes(&self) -> Vec<usize> {
        self.buffer_sizes.borrow().clone()
    }

    fn fails(&self, stage: Stage) -> bool {
        self.fail_at == Some(stage)
    }

    /**
        Pull the whole input through the callbacks, the way a demuxer would
        while sniffing the format.
    */
    fn read_all(&self, callbacks: &RefCell<IoCallbacks>) -> Result<Vec<u8>, EngineError> {
        let mut callbacks = callbacks.borrow_mut();
        if callbacks.is_seekable() {
            let size = callbacks.seek(0, SEEK_SIZE);
            self.reported_size.set((size >= 0).then_some(size));
        }

        let mut data = Vec::new();
        // Deliberately smaller than any payload so reads are split.
        let mut chunk = [0u8; 3];
        loop {
            match callbacks.read(&mut chunk) {
                EOF => return Ok(data),
                n if n < 0 => return Err(EngineError::new(n, "read failed")),
                n => data.extend_from_slice(&chunk[..n as usize]),
            }
        }
    }
}

impl Engine for MockEngine {
    type Buffer = MockBuffer;
    type Context = MockContext;
    type Io = MockIo;
    type Input = MockInput;

    fn open_by_name(&self, name: &str) -> Result<MockInput, EngineError> {
        if self.fails(Stage::Open) {
            return Err(EngineError::new(INVALID_DATA, "open refused"));
        }
        let data = self
            .named
            .get(name)
            .ok_or_else(|| EngineError::new(NOT_FOUND, "No such file or directory"))?;
        let streams = parse(data)?;
        Ok(MockInput {
            streams,
            _context: MockContext {
                io: None,
                _tracked: Tracked::acquire(&self.ledger, Resource::Context),
            },
        })
    }

    fn alloc_buffer(&self, size: usize) -> Option<MockBuffer> {
        if self.fails(Stage::Buffer) {
            return None;
        }
        self.buffer_sizes.borrow_mut().push(size);
        Some(MockBuffer {
            _tracked: Tracked::acquire(&self.ledger, Resource::Buffer),
        })
    }

    fn alloc_context(&self) -> Option<MockContext> {
        if self.fails(Stage::Context) {
            return None;
        }
        Some(MockContext {
            io: None,
            _tracked: Tracked::acquire(&self.ledger, Resource::Context),
        })
    }

    fn alloc_io(&self, buffer: MockBuffer, callbacks: IoCallbacks) -> Result<MockIo, MockBuffer> {
        if self.fails(Stage::Io) {
            return Err(buffer);
        }
        Ok(MockIo {
            _buffer: buffer,
            callbacks: Rc::new(RefCell::new(callbacks)),
            _tracked: Tracked::acquire(&self.ledger, Resource::Io),
        })
    }

    fn attach_io(&self, context: &mut MockContext, io: &mut MockIo) {
        context.io = Some(Rc::clone(&io.callbacks));
    }

    fn open_with_io(
        &self,
        context: MockContext,
        _placeholder: &str,
    ) -> Result<MockInput, EngineError> {
        if self.fails(Stage::Open) {
            return Err(EngineError::new(INVALID_DATA, "open refused"));
        }
        let callbacks = context
            .io
            .as_ref()
            .ok_or_else(|| EngineError::new(-22, "no I/O context attached"))?;
        let streams = parse(&self.read_all(callbacks)?)?;
        Ok(MockInput {
            streams,
            _context: context,
        })
    }

    fn probe(&self, _input: &mut MockInput, limits: &ProbeLimits) -> Result<(), EngineError> {
        if self.fails(Stage::Probe) {
            return Err(EngineError::new(EOF, "End of file"));
        }
        self.probed_with.set(Some(*limits));
        Ok(())
    }
}

impl Demuxer for MockInput {
    fn stream_count(&self) -> usize {
        self.streams.len()
    }

    fn stream_type(&self, index: usize) -> NativeMediaType {
        self.streams[index].native
    }

    fn best_stream(&self, media_type: NativeMediaType) -> Result<BestStream, EngineError> {
        let mut matched = false;
        for (index, stream) in self.streams.iter().enumerate() {
            if stream.native != media_type {
                continue;
            }
            if stream.decodable {
                return Ok(BestStream::Found(index));
            }
            matched = true;
        }
        Ok(if matched {
            BestStream::DecoderNotFound
        } else {
            BestStream::NotFound
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_container_parses_back() {
        let data = synthetic(&[
            (NativeMediaType::VIDEO, true),
            (NativeMediaType(9), false),
            (NativeMediaType::UNKNOWN, true),
        ]);
        let streams = parse(&data).unwrap();
        assert_eq!(streams.len(), 3);
        assert_eq!(streams[1].native, NativeMediaType(9));
        assert!(!streams[1].decodable);
        assert_eq!(streams[2].native, NativeMediaType::UNKNOWN);
    }

    #[test]
    fn truncated_container_is_rejected() {
        let mut data = synthetic(&[(NativeMediaType::AUDIO, true)]);
        data.pop();
        assert_eq!(parse(&data).unwrap_err().code, INVALID_DATA);
        assert!(parse(b"MOC").is_err());
    }

    #[test]
    fn ledger_counts_live_resources() {
        let engine = MockEngine::new();
        let buffer = engine.alloc_buffer(8).unwrap();
        let context = engine.alloc_context().unwrap();
        assert_eq!(engine.ledger().live_total(), 2);

        drop(context);
        drop(buffer);
        assert_eq!(engine.ledger().live_total(), 0);
        assert_eq!(
            engine.ledger().releases(),
            [Resource::Context, Resource::Buffer]
        );
    }
}
