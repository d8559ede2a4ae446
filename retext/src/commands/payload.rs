//! `retext payload`: export the browser-side rule list for one context.

use anyhow::{Context as _, Result};
use log::info;

use retext_core::{Context, Replacer, RetextConfig};

use crate::commands::write_output;
use crate::ui::theme::ThemeMap;

pub fn run_payload(
    config: &RetextConfig,
    context: Context,
    inline_script: Option<&str>,
    theme_map: &ThemeMap,
) -> Result<()> {
    let payload = Replacer::new(config, context).client_payload();
    info!("Exporting {} client rule(s) for '{}'.", payload.rules.len(), context);

    let mut rendered = match inline_script {
        Some(var_name) => payload
            .to_inline_script(var_name)
            .context("Failed to render inline script")?,
        None => payload.to_json().context("Failed to serialize payload")?,
    };
    rendered.push('\n');
    write_output(None, &rendered, true, theme_map)
}
