//! charts command - List the available charts

use anyhow::Result;

use crate::cli::Context;
use crate::dashboard::ChartKind;

/// Print each chart kind with its description.
///
/// In quiet mode only the names are printed, one per line.
pub fn charts(ctx: &Context) -> Result<()> {
    let default = ctx.config.default_chart();
    let width = ChartKind::ALL
        .iter()
        .map(|k| k.name().len())
        .max()
        .unwrap_or(0);

    for kind in ChartKind::ALL {
        if ctx.quiet {
            println!("{}", kind.name());
            continue;
        }
        let marker = if kind == default { " (default)" } else { "" };
        println!(
            "{:<width$}  {}{}",
            kind.name(),
            kind.description(),
            marker,
            width = width
        );
    }
    Ok(())
}
