use clap::{Args, Subcommand, ValueEnum};

use rrtrans_format::{Compression, PixelFormat, Subsampling};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod formats;
pub mod receive;
pub mod send;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the negotiated layout for every pixel format.
    Formats(FormatsArgs),
    /// Accept a sender and print received frame headers.
    Receive(ReceiveArgs),
    /// Stream test-pattern frames to a receiver.
    Send(SendArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Formats(args) => formats::run(args, format),
        Command::Receive(args) => receive::run(args, format),
        Command::Send(args) => send::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum CompressArg {
    Proxy,
    Jpeg,
    Rgb,
}

impl From<CompressArg> for Compression {
    fn from(value: CompressArg) -> Self {
        match value {
            CompressArg::Proxy => Compression::Proxy,
            CompressArg::Jpeg => Compression::Jpeg,
            CompressArg::Rgb => Compression::Rgb,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum FormatArg {
    Rgb,
    Bgr,
    Rgba,
    Bgra,
    Abgr,
    Argb,
}

impl From<FormatArg> for PixelFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Rgb => PixelFormat::Rgb,
            FormatArg::Bgr => PixelFormat::Bgr,
            FormatArg::Rgba => PixelFormat::Rgba,
            FormatArg::Bgra => PixelFormat::Bgra,
            FormatArg::Abgr => PixelFormat::Abgr,
            FormatArg::Argb => PixelFormat::Argb,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum SubsampArg {
    #[value(name = "444")]
    S444,
    #[value(name = "422")]
    S422,
    #[value(name = "420")]
    S420,
    Gray,
}

impl From<SubsampArg> for Subsampling {
    fn from(value: SubsampArg) -> Self {
        match value {
            SubsampArg::S444 => Subsampling::S444,
            SubsampArg::S422 => Subsampling::S422,
            SubsampArg::S420 => Subsampling::S420,
            SubsampArg::Gray => Subsampling::Gray,
        }
    }
}

#[derive(Args, Debug)]
pub struct FormatsArgs {
    /// Compression preference to negotiate under.
    #[arg(long, value_enum, default_value = "jpeg")]
    pub compress: CompressArg,
}

#[derive(Args, Debug)]
pub struct ReceiveArgs {
    /// Address to listen on (e.g. 127.0.0.1:4242).
    pub bind: String,
    /// Exit after receiving N frames.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Receiver host name or address.
    pub host: String,
    /// Receiver port.
    #[arg(long, short = 'p')]
    pub port: u16,
    /// Frame width in pixels.
    #[arg(long, default_value = "640")]
    pub width: u32,
    /// Frame height in pixels.
    #[arg(long, default_value = "480")]
    pub height: u32,
    /// Requested pixel format.
    #[arg(long, value_enum, default_value = "rgb")]
    pub format: FormatArg,
    /// Number of frames to send.
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub frames: u32,
    /// Send stereo frames.
    #[arg(long)]
    pub stereo: bool,
    /// Wait for each frame to be written before continuing.
    #[arg(long)]
    pub sync: bool,
    /// Compression preference.
    #[arg(long, value_enum, default_value = "jpeg")]
    pub compress: CompressArg,
    /// Compression quality (1-100).
    #[arg(long, default_value = "95", value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: u8,
    /// Chroma subsampling.
    #[arg(long, value_enum, default_value = "444")]
    pub subsamp: SubsampArg,
    /// Window identifier stamped on frames.
    #[arg(long, default_value = "0")]
    pub window: u64,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
