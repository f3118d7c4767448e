use crate::constants::READ_CHUNK_SIZE;
use crate::error::SickError;
use std::io::{ErrorKind, Read};

/// Something that hands out the raw bytes received from the sensor.
pub trait ByteSource: Send {
    /// Blocks until the next byte arrives.
    ///
    /// Returns `Ok(None)` once the source is closed.
    fn next_byte(&mut self) -> Result<Option<u8>, SickError>;
}

/// [`ByteSource`] over any reader, pulled in chunks of up to 256 bytes.
pub struct ReadByteSource<R> {
    reader: R,
    buffer: Box<[u8; READ_CHUNK_SIZE]>,
    position: usize,
    filled: usize,
}

impl<R: Read> ReadByteSource<R> {
    pub fn new(reader: R) -> Self {
        ReadByteSource {
            reader,
            buffer: Box::new([0; READ_CHUNK_SIZE]),
            position: 0,
            filled: 0,
        }
    }

    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    fn refill(&mut self) -> Result<usize, SickError> {
        loop {
            match self.reader.read(&mut self.buffer[..]) {
                Ok(n) => {
                    self.position = 0;
                    self.filled = n;
                    return Ok(n);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(SickError::IoError(e)),
            }
        }
    }
}

impl<R: Read + Send> ByteSource for ReadByteSource<R> {
    fn next_byte(&mut self) -> Result<Option<u8>, SickError> {
        if self.position == self.filled && self.refill()? == 0 {
            return Ok(None);
        }
        let byte = self.buffer[self.position];
        self.position += 1;
        Ok(Some(byte))
    }
}

impl<I: Iterator<Item = u8> + Send> ByteSource for std::iter::Fuse<I> {
    fn next_byte(&mut self) -> Result<Option<u8>, SickError> {
        Ok(self.next())
    }
}
