use crate::buffer::{BufferRequest, FrameBuffer};
use crate::error::Result;

/// The collaborator call that produced a failure.
///
/// Used as the structured origin label when a failure is reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Construct,
    Connect,
    AcquireBuffer,
    PollReady,
    Synchronize,
    Transmit,
    Release,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Construct => "transport::construct",
            Operation::Connect => "transport::connect",
            Operation::AcquireBuffer => "transport::acquire_buffer",
            Operation::PollReady => "transport::poll_ready",
            Operation::Synchronize => "transport::synchronize",
            Operation::Transmit => "transport::transmit",
            Operation::Release => "transport::release",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A frame transport.
///
/// Construction is left to the implementor; the session receives an already
/// constructed transport and owns it exclusively until `release`.
pub trait Transport {
    /// Establish the session with a receiver. May block until the receiver
    /// can accept frames.
    fn connect(&mut self, address: &str, port: u16) -> Result<()>;

    /// Hand out pixel storage shaped per `request`.
    fn acquire_buffer(&mut self, request: BufferRequest) -> Result<FrameBuffer>;

    /// Non-blocking: true when an acquire/transmit cycle would not block.
    fn poll_ready(&mut self) -> Result<bool>;

    /// Block until every transmitted frame has been dispatched.
    fn block_until_synced(&mut self) -> Result<()>;

    /// Take back a filled buffer and send it. With `sync`, block until this
    /// frame has been dispatched.
    fn transmit(&mut self, buffer: FrameBuffer, sync: bool) -> Result<()>;

    /// Tear down the connection. Further calls fail.
    fn release(&mut self) -> Result<()>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn connect(&mut self, address: &str, port: u16) -> Result<()> {
        (**self).connect(address, port)
    }

    fn acquire_buffer(&mut self, request: BufferRequest) -> Result<FrameBuffer> {
        (**self).acquire_buffer(request)
    }

    fn poll_ready(&mut self) -> Result<bool> {
        (**self).poll_ready()
    }

    fn block_until_synced(&mut self) -> Result<()> {
        (**self).block_until_synced()
    }

    fn transmit(&mut self, buffer: FrameBuffer, sync: bool) -> Result<()> {
        (**self).transmit(buffer, sync)
    }

    fn release(&mut self) -> Result<()> {
        (**self).release()
    }
}
