//! `sb decode`: parse release labels and show how duplicates resolve.

use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};
use clap::Args;
use serde::Serialize;
use sprintboard_core::config::BoardConfig;
use sprintboard_core::release::ReleaseTag;
use sprintboard_triage::precedence::{LabelResolution, resolve_labels};
use std::io::Write;

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Labels to decode, as they appear on a card.
    #[arg(required = true)]
    pub labels: Vec<String>,

    /// Treat the labels as one card's set and resolve duplicates per product.
    #[arg(long)]
    pub resolve: bool,
}

#[derive(Debug, Serialize)]
pub struct DecodedLabel {
    pub label: String,
    /// `None` for ordinary (non-release) labels.
    pub tag: Option<ReleaseTag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DecodeOutput {
    pub labels: Vec<DecodedLabel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<LabelResolution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dominant: Option<ReleaseTag>,
}

pub fn run_decode(
    args: &DecodeArgs,
    config: &BoardConfig,
    output: OutputMode,
) -> anyhow::Result<()> {
    let result = decode(args, config);
    render_mode(output, &result, write_text, write_pretty)
}

fn decode(args: &DecodeArgs, config: &BoardConfig) -> DecodeOutput {
    let codec = config.codec();
    let labels = args
        .labels
        .iter()
        .map(|label| {
            let tag = codec.decode(label);
            DecodedLabel {
                label: label.clone(),
                canonical: tag.as_ref().map(ToString::to_string),
                tag,
            }
        })
        .collect();

    let resolution = args.resolve.then(|| resolve_labels(&args.labels, &codec));
    let dominant = resolution
        .as_ref()
        .and_then(|r| r.dominant(&config.product_order()).cloned());

    DecodeOutput {
        labels,
        resolution,
        dominant,
    }
}

fn write_text(out: &DecodeOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for d in &out.labels {
        match &d.tag {
            Some(tag) => writeln!(
                w,
                "{}\t{}\t{}\t{}",
                d.label, tag.state, tag.product, tag.version
            )?,
            None => writeln!(w, "{}\t-", d.label)?,
        }
    }
    if let Some(resolution) = &out.resolution {
        for label in &resolution.remove {
            writeln!(w, "remove\t{label}")?;
        }
    }
    if let Some(tag) = &out.dominant {
        writeln!(w, "dominant\t{tag}")?;
    }
    Ok(())
}

fn write_pretty(out: &DecodeOutput, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Labels")?;
    for d in &out.labels {
        let value = d
            .canonical
            .as_deref()
            .map_or_else(|| "(not a release label)".to_string(), |c| format!("→ {c}"));
        writeln!(w, "  {:<32} {value}", d.label)?;
    }

    if let Some(resolution) = &out.resolution {
        writeln!(w)?;
        pretty_section(w, "Resolution")?;
        for (product, kept) in &resolution.kept {
            pretty_kv(w, product, &kept.label)?;
        }
        if resolution.remove.is_empty() {
            writeln!(w, "  nothing to remove")?;
        }
        for label in &resolution.remove {
            writeln!(w, "  ✗ {label}")?;
        }
        if let Some(tag) = &out.dominant {
            pretty_kv(w, "dominant", tag.to_string())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(labels: &[&str], resolve: bool) -> DecodeArgs {
        DecodeArgs {
            labels: labels.iter().map(ToString::to_string).collect(),
            resolve,
        }
    }

    #[test]
    fn ordinary_labels_have_no_tag() {
        let out = decode(&args(&["no-qe", "committed-3.1"], false), &BoardConfig::default());
        assert!(out.labels[0].tag.is_none());
        assert_eq!(out.labels[1].canonical.as_deref(), Some("committed-core-3.1"));
        assert!(out.resolution.is_none());
    }

    #[test]
    fn resolve_flags_duplicates() {
        let out = decode(
            &args(&["proposed-3.1", "committed-3.1"], true),
            &BoardConfig::default(),
        );
        let resolution = out.resolution.expect("resolved");
        assert_eq!(resolution.remove, ["proposed-3.1"]);
        assert_eq!(
            out.dominant.map(|t| t.to_string()).as_deref(),
            Some("committed-core-3.1")
        );
    }

    #[test]
    fn text_output_is_tab_separated() {
        let out = decode(&args(&["targeted-web-2.0", "docs"], false), &BoardConfig::default());
        let mut buf = Vec::new();
        write_text(&out, &mut buf).expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        assert_eq!(text, "targeted-web-2.0\ttargeted\tweb\t2.0\ndocs\t-\n");
    }
}
