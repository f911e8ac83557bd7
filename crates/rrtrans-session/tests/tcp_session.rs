use std::net::TcpListener;
use std::sync::{Arc, RwLock};
use std::thread;

use rrtrans_format::{Compression, FrameFlags, PixelFormat, Subsampling};
use rrtrans_session::{Config, Session, WindowId};
use rrtrans_transport::TcpTransport;
use rrtrans_wire::{Eye, FrameReader, WireError, WireFrame};

fn spawn_receiver() -> (u16, thread::JoinHandle<Vec<WireFrame>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("listener should bind");
    let port = listener.local_addr().expect("local addr").port();
    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().expect("receiver should accept");
        let mut reader = FrameReader::new(stream);
        let mut frames = Vec::new();
        loop {
            match reader.read_frame() {
                Ok(frame) => frames.push(frame),
                Err(WireError::ConnectionClosed) => return frames,
                Err(err) => panic!("receiver failed: {err}"),
            }
        }
    });
    (port, handle)
}

#[test]
fn frames_reach_receiver_with_negotiated_layout() {
    let (port, receiver) = spawn_receiver();
    let config = Arc::new(RwLock::new(Config {
        compression: Compression::Jpeg,
        quality: 80,
        subsampling: Subsampling::S422,
    }));

    let mut session = Session::open(WindowId(0x1234), Arc::clone(&config), || {
        Ok(TcpTransport::new())
    })
    .expect("session should open");
    session
        .connect("127.0.0.1", port)
        .expect("session should connect");

    let mut frame = session
        .allocate(32, 16, PixelFormat::Abgr, false)
        .expect("frame should allocate");
    assert_eq!(frame.format(), PixelFormat::Abgr);
    frame.bits_mut().fill(0x7F);
    session.send(frame, true).expect("send should succeed");

    config.write().expect("config lock").quality = 20;
    let mut stereo = session
        .allocate(8, 4, PixelFormat::Rgb, true)
        .expect("stereo frame should allocate");
    stereo.bits_mut().fill(1);
    if let Some(right) = stereo.right_bits_mut() {
        right.fill(2);
    }
    session.send(stereo, false).expect("send should succeed");

    session.ready().expect("ready should succeed");
    session.synchronize().expect("synchronize should succeed");
    session.destroy().expect("destroy should succeed");

    let frames = receiver.join().expect("receiver thread");
    assert_eq!(frames.len(), 3);

    let first = &frames[0].header;
    assert_eq!(first.width, 32);
    assert_eq!(first.pixel_size, 4);
    assert_eq!(
        first.flags,
        FrameFlags::BOTTOM_UP | FrameFlags::BGR | FrameFlags::ALPHA_FIRST
    );
    assert_eq!(first.compression, Compression::Jpeg);
    assert_eq!(first.quality, 80);
    assert_eq!(first.subsampling, Subsampling::S422);
    assert_eq!(first.window_id, 0x1234);
    assert!(frames[0].payload.iter().all(|&b| b == 0x7F));

    assert_eq!(frames[1].header.eye, Eye::Left);
    assert_eq!(frames[1].header.quality, 20);
    assert!(frames[1].payload.iter().all(|&b| b == 1));
    assert_eq!(frames[2].header.eye, Eye::Right);
    assert!(frames[2].payload.iter().all(|&b| b == 2));
}

#[test]
fn uncompressed_preference_sends_packed_rgb() {
    let (port, receiver) = spawn_receiver();
    let config = Config {
        compression: Compression::Proxy,
        ..Config::default()
    };

    let mut session =
        Session::open(WindowId(9), config, || Ok(TcpTransport::new())).expect("open");
    session.connect("127.0.0.1", port).expect("connect");

    let frame = session
        .allocate(5, 3, PixelFormat::Bgra, false)
        .expect("allocate");
    assert_eq!(frame.format(), PixelFormat::Rgb);
    assert_eq!(frame.pitch(), 16);
    session.send(frame, true).expect("send");
    session.destroy().expect("destroy");

    let frames = receiver.join().expect("receiver thread");
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].header.compression, Compression::Rgb);
    assert_eq!(frames[0].header.pixel_size, 3);
    assert_eq!(frames[0].payload.len(), 16 * 3);
}

#[test]
fn connect_failure_leaves_session_usable() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("addr").port();
    drop(listener);

    let mut session = Session::open(WindowId(1), Config::default(), || {
        Ok(TcpTransport::new())
    })
    .expect("open");
    let err = session.connect("127.0.0.1", port).unwrap_err();
    assert_eq!(err.origin(), "transport::connect");

    let (port, receiver) = spawn_receiver();
    session.connect("127.0.0.1", port).expect("retry should connect");
    session.destroy().expect("destroy");
    assert!(receiver.join().expect("receiver thread").is_empty());
}
