//! `retext client`: run the browser-side applier's initial pass offline.

use anyhow::{Context as _, Result};
use log::{debug, info};
use std::path::PathBuf;

use retext_core::{ClientPayload, ClientSideApplier, Context, LiveDocument, Replacer, RetextConfig};

use crate::commands::{warn_msg, write_output};
use crate::ui::theme::ThemeMap;

/// Options for [`run_client`].
pub struct ClientOptions {
    pub document: String,
    pub context: Context,
    pub payload_json: Option<String>,
    pub output_path: Option<PathBuf>,
    pub quiet: bool,
}

pub fn run_client(config: &RetextConfig, opts: ClientOptions, theme_map: &ThemeMap) -> Result<()> {
    let payload = match &opts.payload_json {
        Some(json) => ClientPayload::from_json(json).context("Invalid client payload")?,
        None => Replacer::new(config, opts.context).client_payload(),
    };
    debug!("Client payload carries {} rule(s).", payload.rules.len());

    let mut applier = ClientSideApplier::from_payload(&payload);
    if !opts.quiet {
        for skipped in applier.skipped() {
            warn_msg(format!("Client rule skipped: {}", skipped), theme_map);
        }
    }

    let mut doc = LiveDocument::parse(&opts.document);
    let rewritten = applier.start(&mut doc);
    info!("Initial pass rewrote {} text node(s).", rewritten);

    let mut html = doc.html();
    html.push('\n');
    write_output(opts.output_path.as_ref(), &html, opts.quiet, theme_map)
}
