use std::io::ErrorKind;
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use rrtrans_wire::{Eye, FrameReader, WireConfig, WireError, WireFrame};
use tracing::{debug, info};

use crate::cmd::ReceiveArgs;
use crate::exit::{io_error, wire_error, CliError, CliResult, SUCCESS};
use crate::output::{print_frame, OutputFormat};

/// How often blocked accepts and reads check for Ctrl-C.
const STOP_POLL: Duration = Duration::from_millis(250);

/// Per-sender delivery counters.
#[derive(Debug)]
struct StreamStats {
    started: Instant,
    images: u64,
    frames: u64,
    stereo_frames: u64,
    bytes: u64,
}

impl StreamStats {
    fn new() -> Self {
        Self {
            started: Instant::now(),
            images: 0,
            frames: 0,
            stereo_frames: 0,
            bytes: 0,
        }
    }

    /// A right-eye image completes the stereo frame its left eye started.
    fn record(&mut self, frame: &WireFrame) {
        self.images += 1;
        self.bytes += frame.payload.len() as u64;
        match frame.header.eye {
            Eye::Left => self.frames += 1,
            Eye::Right => self.stereo_frames += 1,
        }
    }

    fn frames_per_second(&self, elapsed: Duration) -> f64 {
        let secs = elapsed.as_secs_f64();
        if secs > 0.0 {
            self.frames as f64 / secs
        } else {
            0.0
        }
    }

    fn log_summary(&self, peer: &str) {
        let elapsed = self.started.elapsed();
        info!(
            %peer,
            frames = self.frames,
            stereo_frames = self.stereo_frames,
            bytes = self.bytes,
            fps = format_args!("{:.1}", self.frames_per_second(elapsed)),
            ?elapsed,
            "sender finished"
        );
    }
}

pub fn run(args: ReceiveArgs, format: OutputFormat) -> CliResult<i32> {
    let listener = TcpListener::bind(&args.bind).map_err(|err| io_error("bind failed", err))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| io_error("bind failed", err))?;
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "waiting for sender");
    }

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut printed = 0usize;

    while running.load(Ordering::SeqCst) {
        let Some((stream, peer)) = accept(&listener, &running)? else {
            break;
        };
        let peer = peer.to_string();
        info!(%peer, "sender connected");

        let mut reader = FrameReader::with_config_tcp(
            stream,
            WireConfig {
                read_timeout: Some(STOP_POLL),
                ..WireConfig::default()
            },
        )
        .map_err(|err| wire_error("receive setup failed", err))?;
        let mut stats = StreamStats::new();

        while running.load(Ordering::SeqCst) {
            let frame = match reader.read_frame() {
                Ok(frame) => frame,
                // Partial frames stay buffered in the reader across timeouts.
                Err(WireError::Io(err)) if is_timeout(&err) => continue,
                Err(WireError::ConnectionClosed) => break,
                Err(err) => {
                    stats.log_summary(&peer);
                    return Err(wire_error("receive failed", err));
                }
            };

            stats.record(&frame);
            print_frame(&frame, &peer, format);
            printed = printed.saturating_add(1);

            if args.count.is_some_and(|count| printed >= count) {
                stats.log_summary(&peer);
                return Ok(SUCCESS);
            }
        }
        stats.log_summary(&peer);
    }

    Ok(SUCCESS)
}

fn accept(
    listener: &TcpListener,
    running: &AtomicBool,
) -> CliResult<Option<(TcpStream, std::net::SocketAddr)>> {
    while running.load(Ordering::SeqCst) {
        match listener.accept() {
            Ok((stream, peer)) => {
                stream
                    .set_nonblocking(false)
                    .map_err(|err| io_error("accept failed", err))?;
                return Ok(Some((stream, peer)));
            }
            Err(err) if err.kind() == ErrorKind::WouldBlock => thread::sleep(STOP_POLL),
            Err(err) => return Err(io_error("accept failed", err)),
        }
    }
    debug!("receive interrupted");
    Ok(None)
}

fn is_timeout(err: &std::io::Error) -> bool {
    matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
