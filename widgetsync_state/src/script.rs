// Copyright 2025 the Widgetsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Client script fragments emitted with the page.
//!
//! Two fragments travel with every page that hosts widgets:
//! - the state block, which assigns the page payload to a client global, and
//! - the submit statement, which runs before the form is sent and serializes
//!   each live widget's current options into the hidden state field.
//!
//! The submit statement reads options with the jQuery UI convention
//! `$(element)[widgetName]("option")` and HTML-encodes the options the payload
//! lists under `encodedOptions`.

use crate::config::SyncConfig;

/// Make JSON safe to embed inside a `<script>` element.
///
/// Escapes `</` so the text cannot close the element, and the line separators
/// U+2028 and U+2029, which older script engines reject inside string literals.
pub fn escape_for_script(json: &str) -> String {
    json.replace("</", "<\\/")
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}

/// Script element assigning `payload_json` to the configured client global.
pub fn state_block(config: &SyncConfig, payload_json: &str) -> String {
    format!(
        "<script type=\"text/javascript\">\n//<![CDATA[\nwindow.{var} = {payload};\n//]]>\n</script>",
        var = config.state_variable,
        payload = escape_for_script(payload_json),
    )
}

/// Statement run on form submission that fills the hidden state field.
pub fn submit_statement(config: &SyncConfig) -> String {
    format!(
        concat!(
            "(function () {{",
            " var state = window.{var} || [], bundle = [];",
            " for (var i = 0; i < state.length; i++) {{",
            " var w = state[i], el = jQuery(document.getElementById(w.id)), live = {{}}, posted = {{}};",
            " if (el.length && el[w.widgetName]) {{ live = el[w.widgetName]('option'); }}",
            " for (var name in live) {{",
            " var v = live[name];",
            " if (typeof v === 'function') {{ continue; }}",
            " if (typeof v === 'string' && w.encodedOptions.indexOf(name) >= 0) {{ v = jQuery('<div/>').text(v).html(); }}",
            " posted[name] = v;",
            " }}",
            " bundle.push({{ ControlID: w.id, WidgetName: w.widgetName, Options: posted }});",
            " }}",
            " var field = document.getElementById('{field}');",
            " if (field) {{ field.value = JSON.stringify(bundle); }}",
            " }})();"
        ),
        var = config.state_variable,
        field = config.state_field,
    )
}
