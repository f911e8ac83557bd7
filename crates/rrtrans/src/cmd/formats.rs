use rrtrans_format::{negotiate, Compression, PixelFormat};

use crate::cmd::FormatsArgs;
use crate::exit::{format_error, CliResult, SUCCESS};
use crate::output::{print_formats, FormatRow, OutputFormat};

pub fn run(args: FormatsArgs, format: OutputFormat) -> CliResult<i32> {
    let rows = negotiate_all(args.compress.into())?;
    print_formats(&rows, format);
    Ok(SUCCESS)
}

fn negotiate_all(preference: Compression) -> CliResult<Vec<FormatRow>> {
    PixelFormat::ALL
        .into_iter()
        .map(|requested| {
            negotiate(preference, requested)
                .map(|negotiated| FormatRow::new(requested, &negotiated))
                .map_err(|err| format_error("negotiation failed", err))
        })
        .collect()
}
