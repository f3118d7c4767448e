use crate::byte_source::ByteSource;
use crate::constants::{ETX, STX};
use crate::error::SickError;

/// Outcome of pulling one frame from the byte source.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameEvent {
    /// Payload found between STX and ETX, delimiters excluded.
    Frame(Vec<u8>),
    /// The source closed outside of a frame.
    EndOfStream,
    /// The source closed after this many payload bytes of an unterminated frame.
    Truncated(usize),
}

/// STX/ETX state machine.
///
/// Bytes before STX are dropped. A second STX inside an open frame is dropped
/// as well, the payload keeps accumulating until ETX.
#[derive(Debug, Default)]
pub struct FrameAssembler {
    buffer: Vec<u8>,
    in_frame: bool,
}

impl FrameAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, byte: u8) -> Option<Vec<u8>> {
        match (self.in_frame, byte) {
            (false, STX) => {
                self.in_frame = true;
                None
            }
            (false, _) | (true, STX) => None,
            (true, ETX) => {
                self.in_frame = false;
                Some(std::mem::take(&mut self.buffer))
            }
            (true, _) => {
                self.buffer.push(byte);
                None
            }
        }
    }

    pub fn in_frame(&self) -> bool {
        self.in_frame
    }

    /// Payload bytes of the frame currently being accumulated.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}

/// Pulls delimited frames out of a [`ByteSource`].
///
/// A frame without ETX blocks until the source delivers one or closes.
pub struct FrameExtractor<S> {
    source: S,
    assembler: FrameAssembler,
    finished: bool,
}

impl<S: ByteSource> FrameExtractor<S> {
    pub fn new(source: S) -> Self {
        FrameExtractor {
            source,
            assembler: FrameAssembler::new(),
            finished: false,
        }
    }

    pub fn next_frame(&mut self) -> Result<FrameEvent, SickError> {
        if self.finished {
            return Ok(FrameEvent::EndOfStream);
        }
        while let Some(byte) = self.source.next_byte()? {
            if let Some(frame) = self.assembler.push(byte) {
                return Ok(FrameEvent::Frame(frame));
            }
        }
        self.finished = true;
        if self.assembler.in_frame() {
            let pending = self.assembler.pending();
            self.assembler = FrameAssembler::new();
            return Ok(FrameEvent::Truncated(pending));
        }
        Ok(FrameEvent::EndOfStream)
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S: ByteSource> Iterator for FrameExtractor<S> {
    type Item = Result<Vec<u8>, SickError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_frame() {
            Ok(FrameEvent::Frame(frame)) => Some(Ok(frame)),
            Ok(FrameEvent::EndOfStream) | Ok(FrameEvent::Truncated(_)) => None,
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}
