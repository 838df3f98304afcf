//! Prometheus text exposition format.
//!
//! Renders the gauge set into the text format scraped by a Prometheus
//! server or compatible agent.

use selgrid_core::GaugeDesc;
use selgrid_core::grid::UP;

use crate::gauges::GaugeSet;

/// Content type of the rendered exposition.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Render a gauge set into Prometheus text format.
///
/// `up` comes first, then the variant gauges in declaration order.
pub fn render_prometheus(set: &GaugeSet) -> String {
    let mut out = String::new();

    push_gauge(&mut out, &UP, set.up());
    for (desc, value) in set.iter() {
        push_gauge(&mut out, desc, value);
    }

    out
}

fn push_gauge(out: &mut String, desc: &GaugeDesc, value: f64) {
    out.push_str(&format!("# HELP {} {}\n", desc.name, escape_help(desc.help)));
    out.push_str(&format!("# TYPE {} gauge\n", desc.name));
    out.push_str(&format!("{} {}\n", desc.name, format_value(value)));
}

fn escape_help(help: &str) -> String {
    help.replace('\\', "\\\\").replace('\n', "\\n")
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        let sign = if value > 0.0 { "+" } else { "-" };
        format!("{sign}Inf")
    } else {
        format!("{value}")
    }
}
