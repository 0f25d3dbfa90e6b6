//! # Composer CLI
//!
//! Checks, fixes and lays out creatives from the command line. Every
//! subcommand prints JSON on stdout; logs go to stderr.
//!
//! ```bash
//! composer suggest --format FB_STORY --headline "Fresh for summer" --packshot a.png
//! composer check scene.json
//! composer fix scene.json --issues issues.json
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use composer_core::compositing::outside_safe_zone;
use composer_core::{
    autofix_with_report, render_order, safe_zone, ComplianceChecker, FormatTable, Issue,
    LayoutCriteria, LayoutSuggester, Scene,
};
use composer_rules::{RuleChecker, RuleConfig, TemplateSuggester};
use serde_json::{json, Value};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for `composer`.
#[derive(Debug, Parser)]
#[command(name = "composer")]
#[command(about = "Creative composer: layout, compliance and autofix")]
#[command(version)]
struct Cli {
    /// JSON file of extra or overriding formats, merged over the built-ins
    #[arg(long, global = true, env = "COMPOSER_FORMATS")]
    formats: Option<PathBuf>,

    /// JSON file of compliance rule settings
    #[arg(long, global = true, env = "COMPOSER_RULES")]
    rules: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the effective format table.
    Formats,
    /// Suggest a layout for the given assets.
    Suggest(SuggestArgs),
    /// Run the compliance rules against a scene.
    Check {
        /// Scene JSON.
        scene: PathBuf,
    },
    /// Apply autofix directives to a scene.
    Fix {
        /// Scene JSON.
        scene: PathBuf,
        /// Issue list JSON; the rule checker's findings are used when omitted.
        #[arg(long)]
        issues: Option<PathBuf>,
    },
    /// Print paint order and safe-zone geometry.
    Order {
        /// Scene JSON.
        scene: PathBuf,
    },
}

#[derive(Debug, Parser)]
struct SuggestArgs {
    /// Target format name.
    #[arg(long)]
    format: String,
    /// Headline copy.
    #[arg(long)]
    headline: Option<String>,
    /// Subhead copy.
    #[arg(long)]
    subhead: Option<String>,
    /// Value tile copy.
    #[arg(long)]
    value: Option<String>,
    /// Logo source.
    #[arg(long)]
    logo: Option<String>,
    /// Packshot source; repeat for several.
    #[arg(long = "packshot")]
    packshots: Vec<String>,
}

impl From<SuggestArgs> for LayoutCriteria {
    fn from(args: SuggestArgs) -> Self {
        Self {
            headline: args.headline,
            subhead: args.subhead,
            value_text: args.value,
            logo: args.logo,
            packshots: args.packshots,
            ..LayoutCriteria::new(args.format.as_str())
        }
    }
}

/// Initialize structured tracing on stderr with optional JSON format.
///
/// Set `RUST_LOG` to control log levels (default: info,composer_core=debug).
/// Set `RUST_LOG_FORMAT=json` for JSON output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,composer_core=debug"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let output = run(cli).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<Value> {
    let formats = load_formats(cli.formats.as_deref())?;

    match cli.cmd {
        Command::Formats => Ok(serde_json::to_value(&formats)?),
        Command::Suggest(args) => {
            let criteria = LayoutCriteria::from(args);
            tracing::info!("Suggesting layout for {}", criteria.format);
            let candidates = TemplateSuggester::new(formats)
                .suggest_layouts(&criteria)
                .await?;
            Ok(serde_json::to_value(candidates)?)
        }
        Command::Check { scene } => {
            let scene = load_scene(&scene, &formats)?;
            let checker = load_checker(cli.rules.as_deref(), formats)?;
            let report = checker.check_compliance(&scene).await?;
            tracing::info!(
                passed = report.passed,
                issues = report.issues.len(),
                "Compliance check finished"
            );
            Ok(serde_json::to_value(report)?)
        }
        Command::Fix { scene, issues } => {
            let scene = load_scene(&scene, &formats)?;
            let issues = match issues {
                Some(path) => load_issues(&path)?,
                None => {
                    load_checker(cli.rules.as_deref(), formats)?
                        .check_compliance(&scene)
                        .await?
                        .issues
                }
            };
            let (fixed, report) = autofix_with_report(&scene, &issues);
            tracing::info!(applied = report.applied, "Autofix finished");
            Ok(json!({ "scene": fixed, "report": report }))
        }
        Command::Order { scene } => {
            let scene = load_scene(&scene, &formats)?;
            let order: Vec<&str> = render_order(&scene).iter().map(|e| e.id.as_str()).collect();
            Ok(json!({
                "order": order,
                "safe_zone": safe_zone(&scene, &formats),
                "outside_safe_zone": outside_safe_zone(&scene, &formats),
            }))
        }
    }
}

fn load_formats(path: Option<&Path>) -> anyhow::Result<FormatTable> {
    match path {
        Some(path) => FormatTable::load(path)
            .with_context(|| format!("Failed to load formats from {}", path.display())),
        None => Ok(FormatTable::builtin()),
    }
}

fn load_checker(path: Option<&Path>, formats: FormatTable) -> anyhow::Result<RuleChecker> {
    let config = match path {
        Some(path) => RuleConfig::load(path)
            .with_context(|| format!("Failed to load rules from {}", path.display()))?,
        None => RuleConfig::default(),
    };
    RuleChecker::new(config, formats).context("Invalid rule configuration")
}

fn load_scene(path: &Path, formats: &FormatTable) -> anyhow::Result<Scene> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scene {}", path.display()))?;
    let scene = Scene::from_json(&contents)
        .with_context(|| format!("Failed to parse scene {}", path.display()))?;
    if let Err(e) = scene.validate(formats) {
        tracing::warn!("Scene {} is inconsistent: {}", path.display(), e);
    }
    Ok(scene)
}

fn load_issues(path: &Path) -> anyhow::Result<Vec<Issue>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read issues {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse issues {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use composer_core::{Bounds, Element, Format};

    fn write_scene(dir: &tempfile::TempDir) -> PathBuf {
        let scene = Scene::new(Format::SQUARE, 1080, 1080)
            .with_element(Element::logo("logo", "logo.png", Bounds::new(10, 10, 200, 120)).with_z(2))
            .with_element(Element::packshot("p1", "p1.png", Bounds::new(300, 300, 220, 240)));
        let path = dir.path().join("scene.json");
        std::fs::write(&path, scene.to_json().expect("serialize")).expect("write scene");
        path
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args.iter().copied()).expect("valid arguments")
    }

    #[test]
    fn test_parse_suggest_with_repeated_packshots() {
        let cli = parse(&[
            "composer", "suggest", "--format", "SQUARE", "--packshot", "a.png", "--packshot", "b.png",
        ]);
        let Command::Suggest(args) = cli.cmd else {
            panic!("expected suggest");
        };
        let criteria = LayoutCriteria::from(args);
        assert_eq!(criteria.format.as_str(), "SQUARE");
        assert_eq!(criteria.packshots, ["a.png", "b.png"]);
        assert!(criteria.headline.is_none());
    }

    #[test]
    fn test_suggest_requires_format() {
        assert!(Cli::try_parse_from(["composer", "suggest"]).is_err());
    }

    #[tokio::test]
    async fn test_fix_uses_checker_findings() {
        let dir = tempfile::tempdir().expect("tempdir");
        let scene = write_scene(&dir);
        let scene = scene.to_str().expect("utf-8 path");

        let output = run(parse(&["composer", "fix", scene])).await.expect("fix");
        assert_eq!(output["report"]["applied"], 1);
        let logo = &output["scene"]["elements"][0];
        assert_eq!(logo["bounds"]["x"], 150);
        assert_eq!(logo["bounds"]["y"], 150);
    }

    #[tokio::test]
    async fn test_fix_with_issue_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let scene = write_scene(&dir);
        let issues = dir.path().join("issues.json");
        std::fs::write(
            &issues,
            r#"[{"code": "X", "message": "m", "autofix": {"action": "move_to", "id": "p1", "y": 10}},
                {"code": "Y", "message": "m", "autofix": {"action": "highlight_image", "id": "p1"}}]"#,
        )
        .expect("write issues");

        let output = run(parse(&[
            "composer",
            "fix",
            scene.to_str().expect("utf-8 path"),
            "--issues",
            issues.to_str().expect("utf-8 path"),
        ]))
        .await
        .expect("fix");

        assert_eq!(output["report"]["applied"], 1);
        assert_eq!(output["report"]["unrecognized"], 1);
        assert_eq!(output["scene"]["elements"][1]["bounds"]["y"], 10);
    }

    #[tokio::test]
    async fn test_order_and_formats_override() {
        let dir = tempfile::tempdir().expect("tempdir");
        let scene = write_scene(&dir);
        let formats = dir.path().join("formats.json");
        std::fs::write(
            &formats,
            r#"{"SQUARE": {"width": 1080, "height": 1080, "safe_zone": {"top": 0, "right": 0, "bottom": 0, "left": 0}}}"#,
        )
        .expect("write formats");

        let output = run(parse(&[
            "composer",
            "order",
            scene.to_str().expect("utf-8 path"),
            "--formats",
            formats.to_str().expect("utf-8 path"),
        ]))
        .await
        .expect("order");

        assert_eq!(output["order"], json!(["p1", "logo"]));
        assert_eq!(output["safe_zone"]["width"], 1080);
        assert_eq!(output["outside_safe_zone"], json!([]));
    }

    #[tokio::test]
    async fn test_check_reports_missing_file() {
        let err = run(parse(&["composer", "check", "/nonexistent/scene.json"]))
            .await
            .expect_err("missing scene");
        assert!(err.to_string().contains("Failed to read scene"));
    }
}
