//! `retext apply`: rewrite one input through the active rules.

use anyhow::{Context as _, Result};
use is_terminal::IsTerminal;
use log::{debug, info};
use std::fs;
use std::io;
use std::path::PathBuf;

use retext_core::{Context, ExtensionPoint, Replacer, RetextConfig, SinkKind};

use crate::commands::{info_msg, write_output};
use crate::ui::diff_viewer;
use crate::ui::theme::ThemeMap;

/// Where the input is routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyTarget {
    Sink(SinkKind),
    Field(ExtensionPoint),
}

/// Options for [`run_apply`].
pub struct ApplyOptions {
    pub input: String,
    pub context: Context,
    pub target: ApplyTarget,
    pub output_path: Option<PathBuf>,
    pub diff: bool,
    pub quiet: bool,
}

pub fn run_apply(config: &RetextConfig, opts: ApplyOptions, theme_map: &ThemeMap) -> Result<()> {
    info!("Starting apply for context '{}'.", opts.context);

    let replacer = Replacer::new(config, opts.context);
    debug!("{} rule(s) active.", replacer.active_rules().len());

    let replaced = match opts.target {
        ApplyTarget::Sink(sink) => replacer.replace_sink(sink, &opts.input),
        ApplyTarget::Field(point) => {
            debug!("Routing input through '{}' ({}).", point.identifier(), point.sink());
            replacer.replace_field(point, &opts.input)
        }
    };

    debug!(
        "Input length: {}, output length: {}, changed: {}",
        opts.input.len(),
        replaced.len(),
        replaced != opts.input
    );

    if opts.diff {
        print_diff_output(&opts, &replaced, theme_map)?;
    } else {
        write_output(opts.output_path.as_ref(), &replaced, opts.quiet, theme_map)?;
    }

    info!("Apply completed.");
    Ok(())
}

fn print_diff_output(opts: &ApplyOptions, replaced: &str, theme_map: &ThemeMap) -> Result<()> {
    match &opts.output_path {
        Some(path) => {
            if !opts.quiet {
                info_msg(format!("Writing diff to file: {}", path.display()), theme_map);
            }
            let mut file = fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            diff_viewer::print_diff(&opts.input, replaced, &mut file, theme_map, false)?;
        }
        None => {
            let stdout = io::stdout();
            let supports_color = stdout.is_terminal();
            let mut writer = stdout.lock();
            diff_viewer::print_diff(&opts.input, replaced, &mut writer, theme_map, supports_color)?;
        }
    }
    Ok(())
}
