use std::time::Instant;

use rrtrans_session::{Config, Frame, Session, WindowId};
use rrtrans_transport::TcpTransport;
use serde::Serialize;
use tracing::{debug, info};

use crate::cmd::SendArgs;
use crate::exit::{session_error, CliResult, SUCCESS};
use crate::output::OutputFormat;

#[derive(Serialize)]
struct SendSummary {
    receiver: String,
    frames: u32,
    stereo: bool,
    requested: &'static str,
    format: &'static str,
    compression: &'static str,
    pitch: usize,
    elapsed_ms: u128,
}

pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let config = Config {
        compression: args.compress.into(),
        quality: args.quality,
        subsampling: args.subsamp.into(),
    };
    let requested = args.format.into();

    let mut session = Session::open(WindowId(args.window), config, || Ok(TcpTransport::new()))
        .map_err(|err| session_error("open failed", err))?;
    session
        .connect(&args.host, args.port)
        .map_err(|err| session_error("connect failed", err))?;

    let started = Instant::now();
    let mut layout = None;
    for index in 0..args.frames {
        let mut frame = session
            .allocate(args.width, args.height, requested, args.stereo)
            .map_err(|err| session_error("allocate failed", err))?;
        fill_pattern(&mut frame, index);
        layout.get_or_insert((frame.format(), frame.compression(), frame.pitch()));

        session
            .send(frame, args.sync)
            .map_err(|err| session_error("send failed", err))?;
        debug!(index, "frame queued");
    }

    session
        .synchronize()
        .map_err(|err| session_error("synchronize failed", err))?;
    let elapsed = started.elapsed();
    session
        .destroy()
        .map_err(|err| session_error("shutdown failed", err))?;
    info!(frames = args.frames, ?elapsed, "frames delivered");

    let Some((negotiated, compression, pitch)) = layout else {
        return Ok(SUCCESS);
    };
    let summary = SendSummary {
        receiver: format!("{}:{}", args.host, args.port),
        frames: args.frames,
        stereo: args.stereo,
        requested: requested.name(),
        format: negotiated.name(),
        compression: compression.name(),
        pitch,
        elapsed_ms: elapsed.as_millis(),
    };
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string(&summary).unwrap_or_else(|_| "{}".to_string())
        ),
        OutputFormat::Table | OutputFormat::Pretty | OutputFormat::Raw => println!(
            "sent {} frame(s) to {} as {} ({}, pitch {}) in {} ms",
            summary.frames,
            summary.receiver,
            summary.format,
            summary.compression,
            summary.pitch,
            summary.elapsed_ms
        ),
    }

    Ok(SUCCESS)
}

/// Diagonal gradient that shifts with `index`; the right eye is inverted.
fn fill_pattern(frame: &mut Frame, index: u32) {
    let pitch = frame.pitch();
    let pixel_size = usize::from(frame.pixel_size());
    let shift = index as usize;

    let paint = |rows: &mut [u8], invert: bool| {
        for (y, row) in rows.chunks_mut(pitch).enumerate() {
            for (x, pixel) in row.chunks_exact_mut(pixel_size).enumerate() {
                let value = ((x + y + shift) & 0xFF) as u8;
                pixel.fill(if invert { !value } else { value });
            }
        }
    };

    paint(frame.bits_mut(), false);
    if let Some(right) = frame.right_bits_mut() {
        paint(right, true);
    }
}
