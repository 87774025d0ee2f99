//! Command handlers, kept free of argument parsing so they can be tested
//! directly.

use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use stockwatch_classifier::{Classification, Classifier};
use stockwatch_core::{DomainRuleTable, RendererKind, RulesFile};
use stockwatch_render::{build_renderer, RenderOptions};

/// One classified page as printed on stdout.
#[derive(Debug, Serialize)]
pub(crate) struct Report {
    pub url: String,
    #[serde(flatten)]
    pub classification: Classification,
}

pub(crate) fn run_classify(
    classifier: &Classifier,
    file: &Path,
    url: Option<&str>,
) -> anyhow::Result<Report> {
    let html = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let url = url.unwrap_or_default();

    Ok(Report {
        url: url.to_owned(),
        classification: classifier.classify(&html, url),
    })
}

pub(crate) async fn run_check(
    classifier: &Classifier,
    kind: RendererKind,
    options: RenderOptions,
    url: &str,
) -> anyhow::Result<Report> {
    let renderer = build_renderer(kind, options).await?;
    let page = renderer
        .render(url)
        .await
        .with_context(|| format!("failed to render {url}"))?;

    tracing::debug!(url, final_url = %page.final_url, bytes = page.html.len(), "rendered page");

    Ok(Report {
        classification: classifier.classify(&page.html, &page.final_url),
        url: page.final_url,
    })
}

/// Serializes `table` in the rules-file format, so the output can be edited
/// and fed back through `--rules`.
pub(crate) fn render_rules(table: &DomainRuleTable) -> anyhow::Result<String> {
    serde_yaml::to_string(&RulesFile::from(table)).context("failed to serialize rule table")
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
