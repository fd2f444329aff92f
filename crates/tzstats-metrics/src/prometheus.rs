//! Prometheus text exposition format.
//!
//! Renders the samples of one collection pass for scraping by a
//! Prometheus server or compatible agent.

use std::fmt::Write;

use crate::collector::MetricSample;
use crate::registry::MetricDefinition;

/// Render samples into Prometheus text format.
///
/// Every metric is a GAUGE. Samples are grouped under one HELP/TYPE header
/// per metric, in the order each metric first appears; metrics without
/// samples are left out.
pub fn render_prometheus(samples: &[MetricSample<'_>]) -> String {
    let mut groups: Vec<(&MetricDefinition, Vec<&MetricSample<'_>>)> = Vec::new();
    for sample in samples {
        match groups
            .iter_mut()
            .find(|(def, _)| def.name() == sample.definition.name())
        {
            Some((_, members)) => members.push(sample),
            None => groups.push((sample.definition, vec![sample])),
        }
    }

    let mut out = String::new();
    for (def, members) in groups {
        let _ = writeln!(out, "# HELP {} {}", def.name(), escape_help(def.description()));
        let _ = writeln!(out, "# TYPE {} gauge", def.name());
        for sample in members {
            let _ = writeln!(
                out,
                "{}{} {}",
                def.name(),
                render_labels(def.label_names(), &sample.label_values),
                format_value(sample.value)
            );
        }
    }
    out
}

fn render_labels(names: &[&str], values: &[String]) -> String {
    if names.is_empty() {
        return String::new();
    }
    let pairs: Vec<String> = names
        .iter()
        .zip(values)
        .map(|(name, value)| format!("{name}=\"{}\"", escape_label_value(value)))
        .collect();
    format!("{{{}}}", pairs.join(","))
}

fn escape_label_value(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

fn escape_help(help: &str) -> String {
    help.replace('\\', "\\\\").replace('\n', "\\n")
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "+Inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        value.to_string()
    }
}
