use std::io::Write;

use stockwatch_core::{AvailabilityState, DomainRuleTable};

use super::*;

#[test]
fn parses_classify_command() {
    let cli = Cli::try_parse_from([
        "stockwatch-cli",
        "classify",
        "--file",
        "page.html",
        "--url",
        "https://www.ebgames.ca/p/1",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Classify { ref file, url: Some(ref url) }
            if file == &PathBuf::from("page.html") && url == "https://www.ebgames.ca/p/1"
    ));
}

#[test]
fn parses_check_command_with_renderer_override() {
    let cli = Cli::try_parse_from([
        "stockwatch-cli",
        "check",
        "https://shop.example.com/p/1",
        "--renderer",
        "http",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Check {
            renderer: Some(RendererKind::Http),
            ..
        }
    ));
}

#[test]
fn rejects_unknown_renderer() {
    let result = Cli::try_parse_from([
        "stockwatch-cli",
        "check",
        "https://shop.example.com/p/1",
        "--renderer",
        "lynx",
    ]);
    assert!(result.is_err());
}

#[test]
fn rules_flag_is_global() {
    let cli = Cli::try_parse_from(["stockwatch-cli", "rules", "--rules", "extra.yaml"])
        .expect("expected valid cli args");
    assert_eq!(cli.rules, Some(PathBuf::from("extra.yaml")));
    assert!(matches!(cli.command, Commands::Rules));
}

#[test]
fn missing_subcommand_is_an_error() {
    assert!(Cli::try_parse_from(["stockwatch-cli"]).is_err());
}

#[test]
fn run_classify_reads_saved_page() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(
        file,
        "<html><body><p>Pre-order now</p><span>CAD $79.99</span></body></html>"
    )
    .expect("write page");

    let report = commands::run_classify(
        &Classifier::default(),
        file.path(),
        Some("https://www.ebgames.ca/Switch/1"),
    )
    .expect("classify");

    assert_eq!(
        report.classification.availability,
        AvailabilityState::OutOfStock
    );
    assert_eq!(report.classification.price, Some(79.99));

    let json = serde_json::to_value(&report).expect("serialize");
    assert_eq!(json["availability"], "out_of_stock");
    assert_eq!(json["tier"], "domain_rules");
}

#[test]
fn run_classify_reports_missing_file() {
    let err = commands::run_classify(
        &Classifier::default(),
        std::path::Path::new("/nonexistent/page.html"),
        None,
    )
    .unwrap_err();
    assert!(err.to_string().contains("failed to read"));
}

#[test]
fn render_rules_lists_builtin_domains() {
    let yaml = commands::render_rules(DomainRuleTable::builtin()).expect("yaml");
    assert!(yaml.starts_with("domains:"));
    for domain in ["ebgames.ca", "gamestop.ca", "amazon.ca"] {
        assert!(yaml.contains(domain), "missing {domain} in:\n{yaml}");
    }
}
