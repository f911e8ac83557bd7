use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::mpsc;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::JoinHandle;

use rrtrans_wire::{Eye, FrameWriter, WireConfig};
use tracing::{debug, info, warn};

use crate::buffer::{BufferRequest, FrameBuffer};
use crate::config::TransportConfig;
use crate::error::{Result, TransportError};
use crate::traits::Transport;

/// Reference transport: streams uncompressed frames to a receiver over TCP.
///
/// Frames are handed to one sender thread. At most `pool_size` frames are
/// queued or being written at a time; `acquire_buffer` blocks while that
/// limit is reached, and written buffers are recycled for later frames.
/// A write failure is sticky and reported by every later call.
pub struct TcpTransport {
    config: TransportConfig,
    shared: Arc<Shared>,
    sender: Option<Sender>,
    next_frame_id: u32,
    released: bool,
}

struct Sender {
    jobs: mpsc::Sender<Job>,
    thread: JoinHandle<()>,
    peer: SocketAddr,
}

enum Job {
    Frame(FrameBuffer),
    Stop,
}

struct Shared {
    state: Mutex<PoolState>,
    changed: Condvar,
}

#[derive(Default)]
struct PoolState {
    in_flight: usize,
    submitted: u64,
    written: u64,
    free: Vec<FrameBuffer>,
    failure: Option<String>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, PoolState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn wait<'a>(&self, guard: MutexGuard<'a, PoolState>) -> MutexGuard<'a, PoolState> {
        self.changed
            .wait(guard)
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PoolState {
    fn check_failure(&self) -> Result<()> {
        match &self.failure {
            Some(message) => Err(TransportError::SenderFailed(message.clone())),
            None => Ok(()),
        }
    }
}

impl TcpTransport {
    /// Create an unconnected transport with default tuning.
    pub fn new() -> Self {
        Self::with_config(TransportConfig::default())
    }

    /// Create an unconnected transport with explicit tuning.
    pub fn with_config(config: TransportConfig) -> Self {
        Self {
            config,
            shared: Arc::new(Shared {
                state: Mutex::new(PoolState::default()),
                changed: Condvar::new(),
            }),
            sender: None,
            next_frame_id: 0,
            released: false,
        }
    }

    /// Address of the connected receiver.
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.sender.as_ref().map(|sender| sender.peer)
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Transport name for diagnostics.
    pub fn transport_name(&self) -> &'static str {
        "tcp"
    }

    fn ensure_live(&self) -> Result<()> {
        if self.released {
            return Err(TransportError::Shutdown);
        }
        Ok(())
    }

    fn validate(&self, request: &BufferRequest) -> Result<()> {
        let max = self.config.max_dimension;
        if request.width == 0 || request.height == 0 || request.width > max || request.height > max
        {
            return Err(TransportError::InvalidDimensions {
                width: request.width,
                height: request.height,
                max,
            });
        }
        if !matches!(request.pixel_size, 3 | 4) {
            return Err(TransportError::InvalidPixelSize(request.pixel_size));
        }
        Ok(())
    }

    fn open_stream(&self, address: &str, port: u16) -> Result<TcpStream> {
        let addrs: Vec<SocketAddr> = (address, port)
            .to_socket_addrs()
            .map_err(|source| TransportError::Resolve {
                host: address.to_string(),
                port,
                source,
            })?
            .collect();

        let mut last_error = None;
        for addr in &addrs {
            match TcpStream::connect_timeout(addr, self.config.connect_timeout) {
                Ok(stream) => return Ok(stream),
                Err(err) => {
                    debug!(%addr, error = %err, "connect attempt failed");
                    last_error = Some((*addr, err));
                }
            }
        }

        Err(match last_error {
            Some((addr, source)) => TransportError::Connect {
                addr: addr.to_string(),
                source,
            },
            None => TransportError::Resolve {
                host: address.to_string(),
                port,
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "no addresses resolved",
                ),
            },
        })
    }
}

impl Default for TcpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for TcpTransport {
    fn connect(&mut self, address: &str, port: u16) -> Result<()> {
        self.ensure_live()?;
        if let Some(sender) = &self.sender {
            return Err(TransportError::AlreadyConnected(sender.peer));
        }

        let stream = self.open_stream(address, port)?;
        let peer = stream.peer_addr()?;
        stream.set_nodelay(true)?;
        let writer = FrameWriter::with_config_tcp(
            stream,
            WireConfig {
                write_timeout: self.config.write_timeout,
                ..WireConfig::default()
            },
        )?;

        self.shared.lock().failure = None;

        let (jobs, queue) = mpsc::channel();
        let shared = Arc::clone(&self.shared);
        let pool_size = self.config.pool_size;
        let thread = std::thread::Builder::new()
            .name("rrtrans-sender".to_string())
            .spawn(move || run_sender(writer, queue, shared, pool_size))?;

        info!(%peer, "connected to receiver");
        self.sender = Some(Sender { jobs, thread, peer });
        Ok(())
    }

    fn acquire_buffer(&mut self, request: BufferRequest) -> Result<FrameBuffer> {
        self.ensure_live()?;
        self.validate(&request)?;

        let mut state = self.shared.lock();
        while state.in_flight >= self.config.pool_size && state.failure.is_none() {
            state = self.shared.wait(state);
        }
        state.check_failure()?;

        let recycled = match state.free.iter().position(|b| b.matches(&request)) {
            Some(index) => Some(state.free.swap_remove(index)),
            None => state.free.pop(),
        };
        drop(state);

        let buffer = match recycled {
            Some(mut buffer) => {
                buffer.reshape(&request);
                debug!(width = request.width, height = request.height, "reusing frame buffer");
                buffer
            }
            None => {
                debug!(width = request.width, height = request.height, "allocating frame buffer");
                FrameBuffer::new(&request)
            }
        };
        Ok(buffer)
    }

    fn poll_ready(&mut self) -> Result<bool> {
        self.ensure_live()?;
        let state = self.shared.lock();
        state.check_failure()?;
        Ok(state.in_flight < self.config.pool_size)
    }

    fn block_until_synced(&mut self) -> Result<()> {
        self.ensure_live()?;
        let mut state = self.shared.lock();
        while state.in_flight > 0 && state.failure.is_none() {
            state = self.shared.wait(state);
        }
        state.check_failure()
    }

    fn transmit(&mut self, mut buffer: FrameBuffer, sync: bool) -> Result<()> {
        self.ensure_live()?;
        let sender = self.sender.as_ref().ok_or(TransportError::NotConnected)?;

        let frame_id = self.next_frame_id;
        self.next_frame_id = self.next_frame_id.wrapping_add(1);
        buffer.header_mut().frame_id = frame_id;

        let sequence = {
            let mut state = self.shared.lock();
            state.check_failure()?;
            state.in_flight += 1;
            state.submitted += 1;
            state.submitted
        };

        if sender.jobs.send(Job::Frame(buffer)).is_err() {
            let mut state = self.shared.lock();
            state.in_flight = state.in_flight.saturating_sub(1);
            let message = state
                .failure
                .clone()
                .unwrap_or_else(|| "sender thread exited".to_string());
            return Err(TransportError::SenderFailed(message));
        }

        if sync {
            let mut state = self.shared.lock();
            while state.written < sequence && state.failure.is_none() {
                state = self.shared.wait(state);
            }
            state.check_failure()?;
        }
        Ok(())
    }

    fn release(&mut self) -> Result<()> {
        self.released = true;
        let Some(sender) = self.sender.take() else {
            return Ok(());
        };

        // The thread may already have exited after a failure.
        let _ = sender.jobs.send(Job::Stop);
        sender
            .thread
            .join()
            .map_err(|_| TransportError::SenderFailed("sender thread panicked".to_string()))?;
        self.shared.changed.notify_all();
        info!(peer = %sender.peer, "released transport");
        Ok(())
    }
}

impl Drop for TcpTransport {
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            warn!(error = %err, "transport release failed during drop");
        }
    }
}

fn run_sender(
    mut writer: FrameWriter<TcpStream>,
    queue: mpsc::Receiver<Job>,
    shared: Arc<Shared>,
    pool_size: usize,
) {
    while let Ok(job) = queue.recv() {
        let buffer = match job {
            Job::Frame(buffer) => buffer,
            Job::Stop => break,
        };

        match write_buffer(&mut writer, &buffer) {
            Ok(()) => {
                let mut state = shared.lock();
                state.in_flight = state.in_flight.saturating_sub(1);
                state.written += 1;
                if state.free.len() < pool_size {
                    state.free.push(buffer);
                }
                drop(state);
                shared.changed.notify_all();
            }
            Err(err) => {
                warn!(error = %err, "frame send failed");
                let mut state = shared.lock();
                state.failure = Some(err.to_string());
                state.in_flight = 0;
                drop(state);
                shared.changed.notify_all();
                break;
            }
        }
    }
    debug!("sender thread exiting");
}

fn write_buffer(writer: &mut FrameWriter<TcpStream>, buffer: &FrameBuffer) -> Result<()> {
    let mut header = *buffer.header();
    header.eye = Eye::Left;
    writer.send(&header, buffer.bits())?;

    if let Some(right) = buffer.right_bits() {
        header.eye = Eye::Right;
        writer.send(&header, right)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::time::Duration;

    use rrtrans_format::{Compression, FrameFlags};
    use rrtrans_wire::{FrameReader, WireError};

    use super::*;

    fn request(stereo: bool) -> BufferRequest {
        BufferRequest {
            width: 16,
            height: 8,
            pixel_size: 4,
            flags: FrameFlags::BOTTOM_UP | FrameFlags::BGR,
            stereo,
        }
    }

    fn listener() -> (TcpListener, u16) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        (listener, port)
    }

    #[test]
    fn acquire_works_before_connect() {
        let mut transport = TcpTransport::new();
        let buffer = transport.acquire_buffer(request(false)).unwrap();
        assert_eq!(buffer.pitch(), 64);
        assert_eq!(buffer.bits().len(), 64 * 8);
        assert!(transport.poll_ready().unwrap());
        transport.block_until_synced().unwrap();
    }

    #[test]
    fn transmit_before_connect_fails() {
        let mut transport = TcpTransport::new();
        let buffer = transport.acquire_buffer(request(false)).unwrap();
        let err = transport.transmit(buffer, false).unwrap_err();
        assert!(matches!(err, TransportError::NotConnected));
    }

    #[test]
    fn rejects_bad_geometry() {
        let mut transport = TcpTransport::new();
        let err = transport
            .acquire_buffer(BufferRequest {
                width: 0,
                ..request(false)
            })
            .unwrap_err();
        assert!(matches!(err, TransportError::InvalidDimensions { .. }));

        let err = transport
            .acquire_buffer(BufferRequest {
                pixel_size: 2,
                ..request(false)
            })
            .unwrap_err();
        assert!(matches!(err, TransportError::InvalidPixelSize(2)));
    }

    #[test]
    fn connect_refused_reports_connect_error() {
        let (listener, port) = listener();
        drop(listener);

        let mut transport = TcpTransport::with_config(TransportConfig {
            connect_timeout: Duration::from_secs(2),
            ..TransportConfig::default()
        });
        let err = transport.connect("127.0.0.1", port).unwrap_err();
        assert!(matches!(err, TransportError::Connect { .. }));
        assert!(transport.peer_addr().is_none());
    }

    #[test]
    fn streams_mono_and_stereo_frames() {
        let (listener, port) = listener();
        let receiver = std::thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = FrameReader::new(stream);
            let mut frames = Vec::new();
            loop {
                match reader.read_frame() {
                    Ok(frame) => frames.push(frame),
                    Err(WireError::ConnectionClosed) => break,
                    Err(err) => panic!("unexpected error: {err}"),
                }
            }
            frames
        });

        let mut transport = TcpTransport::new();
        transport.connect("127.0.0.1", port).unwrap();
        assert!(transport.peer_addr().is_some());

        let mut mono = transport.acquire_buffer(request(false)).unwrap();
        mono.bits_mut().fill(0x11);
        mono.header_mut().compression = Compression::Jpeg;
        mono.header_mut().window_id = 99;
        transport.transmit(mono, true).unwrap();

        let mut stereo = transport.acquire_buffer(request(true)).unwrap();
        stereo.bits_mut().fill(0x22);
        stereo.right_bits_mut().unwrap().fill(0x33);
        transport.transmit(stereo, false).unwrap();

        transport.block_until_synced().unwrap();
        transport.release().unwrap();

        let frames = receiver.join().unwrap();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].header.frame_id, 0);
        assert_eq!(frames[0].header.window_id, 99);
        assert!(frames[0].payload.iter().all(|&b| b == 0x11));
        assert_eq!(frames[1].header.frame_id, 1);
        assert_eq!(frames[1].header.eye, Eye::Left);
        assert!(frames[1].payload.iter().all(|&b| b == 0x22));
        assert_eq!(frames[2].header.eye, Eye::Right);
        assert!(frames[2].payload.iter().all(|&b| b == 0x33));
    }

    #[test]
    fn second_connect_is_rejected() {
        let (listener, port) = listener();
        let accept = std::thread::spawn(move || listener.accept().map(|(s, _)| s));

        let mut transport = TcpTransport::new();
        transport.connect("127.0.0.1", port).unwrap();
        let err = transport.connect("127.0.0.1", port).unwrap_err();
        assert!(matches!(err, TransportError::AlreadyConnected(_)));

        let _stream = accept.join().unwrap().unwrap();
        transport.release().unwrap();
    }

    #[test]
    fn calls_after_release_fail() {
        let mut transport = TcpTransport::new();
        transport.release().unwrap();
        transport.release().unwrap();
        assert!(matches!(
            transport.poll_ready(),
            Err(TransportError::Shutdown)
        ));
        assert!(matches!(
            transport.connect("127.0.0.1", 1),
            Err(TransportError::Shutdown)
        ));
    }

    #[test]
    fn written_buffers_are_recycled() {
        let (listener, port) = listener();
        let receiver = std::thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = FrameReader::new(stream);
            while reader.read_frame().is_ok() {}
        });

        let mut transport = TcpTransport::new();
        transport.connect("127.0.0.1", port).unwrap();

        let buffer = transport.acquire_buffer(request(false)).unwrap();
        let first = buffer.bits().as_ptr();
        transport.transmit(buffer, true).unwrap();

        let buffer = transport.acquire_buffer(request(false)).unwrap();
        assert_eq!(buffer.bits().as_ptr(), first);
        assert!(buffer.bits().iter().all(|&b| b == 0));

        drop(buffer);
        transport.release().unwrap();
        receiver.join().unwrap();
    }
}
