use std::io::{IsTerminal, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use rrtrans_format::{Negotiated, PixelFormat};
use rrtrans_wire::{Eye, WireFrame};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
pub struct FormatRow {
    pub requested: &'static str,
    pub compression: &'static str,
    pub format: &'static str,
    pub pixel_size: u8,
    pub bgr: bool,
    pub alpha_first: bool,
    pub bottom_up: bool,
}

impl FormatRow {
    pub fn new(requested: PixelFormat, negotiated: &Negotiated) -> Self {
        Self {
            requested: requested.name(),
            compression: negotiated.compression.name(),
            format: negotiated.format.name(),
            pixel_size: negotiated.pixel_size,
            bgr: negotiated.flags.is_bgr(),
            alpha_first: negotiated.flags.is_alpha_first(),
            bottom_up: negotiated
                .flags
                .contains(rrtrans_format::FrameFlags::BOTTOM_UP),
        }
    }
}

pub fn print_formats(rows: &[FormatRow], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(rows).unwrap_or_else(|_| "[]".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec![
                    "REQUESTED",
                    "COMPRESSION",
                    "FORMAT",
                    "PIXEL SIZE",
                    "BGR",
                    "ALPHA FIRST",
                ]);
            for row in rows {
                table.add_row(vec![
                    row.requested.to_string(),
                    row.compression.to_string(),
                    row.format.to_string(),
                    row.pixel_size.to_string(),
                    row.bgr.to_string(),
                    row.alpha_first.to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for row in rows {
                println!(
                    "{} -> {} ({}, {} bytes/pixel)",
                    row.requested, row.format, row.compression, row.pixel_size
                );
            }
        }
    }
}

#[derive(Serialize)]
struct FrameOutput<'a> {
    peer: &'a str,
    window_id: String,
    frame_id: u32,
    eye: &'static str,
    width: u32,
    height: u32,
    pitch: u32,
    pixel_size: u8,
    flags: u8,
    compression: &'static str,
    quality: u8,
    subsampling: &'static str,
    payload_size: usize,
    timestamp: String,
}

pub fn print_frame(frame: &WireFrame, peer: &str, format: OutputFormat) {
    let header = &frame.header;
    let eye = match header.eye {
        Eye::Left => "left",
        Eye::Right => "right",
    };

    match format {
        OutputFormat::Json => {
            let out = FrameOutput {
                peer,
                window_id: format!("{:#x}", header.window_id),
                frame_id: header.frame_id,
                eye,
                width: header.width,
                height: header.height,
                pitch: header.pitch,
                pixel_size: header.pixel_size,
                flags: header.flags.bits(),
                compression: header.compression.name(),
                quality: header.quality,
                subsampling: header.subsampling.name(),
                payload_size: frame.payload.len(),
                timestamp: now_unix_seconds(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FRAME", "EYE", "SIZE", "PITCH", "COMPRESSION", "PEER"])
                .add_row(vec![
                    header.frame_id.to_string(),
                    eye.to_string(),
                    format!("{}x{}x{}", header.width, header.height, header.pixel_size),
                    header.pitch.to_string(),
                    format!("{} q{}", header.compression.name(), header.quality),
                    peer.to_string(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "frame={} eye={} size={}x{} pitch={} pixel_size={} compression={} quality={} peer={}",
                header.frame_id,
                eye,
                header.width,
                header.height,
                header.pitch,
                header.pixel_size,
                header.compression.name(),
                header.quality,
                peer
            );
        }
        OutputFormat::Raw => {
            print_raw(frame.payload.as_ref());
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
