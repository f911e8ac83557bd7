use std::io::{ErrorKind, Write};
use std::net::TcpStream;

use bytes::BytesMut;

use crate::codec::{encode_header, FrameHeader, WireConfig, HEADER_SIZE};
use crate::error::{Result, WireError};

/// Writes complete frame messages to any `Write` stream.
pub struct FrameWriter<T> {
    inner: T,
    buf: BytesMut,
    config: WireConfig,
}

impl<T: Write> FrameWriter<T> {
    /// Create a new frame writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, WireConfig::default())
    }

    /// Create a new frame writer with explicit configuration.
    pub fn with_config(inner: T, config: WireConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(HEADER_SIZE),
            config,
        }
    }

    /// Encode a header and send it followed by `payload` (blocking).
    pub fn send(&mut self, header: &FrameHeader, payload: &[u8]) -> Result<()> {
        if payload.len() > self.config.max_payload_size {
            return Err(WireError::PayloadTooLarge {
                size: payload.len(),
                max: self.config.max_payload_size,
            });
        }

        self.buf.clear();
        encode_header(header, payload.len(), &mut self.buf)?;

        write_all(&mut self.inner, &self.buf)?;
        write_all(&mut self.inner, payload)?;
        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(WireError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl FrameWriter<TcpStream> {
    /// Create a frame writer for a TCP stream and apply the write timeout from config.
    pub fn with_config_tcp(inner: TcpStream, config: WireConfig) -> Result<Self> {
        inner.set_write_timeout(config.write_timeout)?;
        Ok(Self::with_config(inner, config))
    }
}

fn write_all<T: Write>(inner: &mut T, bytes: &[u8]) -> Result<()> {
    let mut offset = 0usize;
    while offset < bytes.len() {
        match inner.write(&bytes[offset..]) {
            Ok(0) => return Err(WireError::ConnectionClosed),
            Ok(n) => offset += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(WireError::Io(err)),
        }
    }
    Ok(())
}
