//! Plugin-marketplace tree validation.
//!
//! Walks `<root>/.claude-plugin/marketplace.json`, every plugin directory it
//! names, and each plugin's `skills/*/SKILL.md`. Findings are values on the
//! report; `Err` is reserved for I/O the walk cannot continue past.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use jsonschema::Draft;
use regex::Regex;
use serde_json::Value;

const MARKETPLACE_SCHEMA: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../schemas/marketplace/v1.schema.json"
));
const PLUGIN_SCHEMA: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../schemas/plugin/v1.schema.json"
));

/// Everything the walk found wrong, split by severity. Warnings never fail
/// a run.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate a marketplace working tree rooted at `root`.
///
/// Manifest-level errors stop the walk before any plugin directory is
/// visited, so one malformed manifest does not cascade into a finding per
/// plugin.
pub fn validate_marketplace(root: &Path) -> Result<ValidationReport> {
    let mut report = ValidationReport::default();

    let manifest_path = root.join(".claude-plugin/marketplace.json");
    if !manifest_path.exists() {
        report
            .errors
            .push("marketplace.json not found at .claude-plugin/marketplace.json".to_string());
        return Ok(report);
    }

    let contents = fs::read_to_string(&manifest_path)
        .with_context(|| format!("read {}", manifest_path.display()))?;
    let manifest: Value = match serde_json::from_str(&contents) {
        Ok(manifest) => manifest,
        Err(err) => {
            report
                .errors
                .push(format!("marketplace.json: invalid JSON - {err}"));
            return Ok(report);
        }
    };

    for message in schema_errors(MARKETPLACE_SCHEMA, &manifest)? {
        report.errors.push(format!("marketplace.json: {message}"));
    }

    let plugins = match manifest.get("plugins").and_then(Value::as_array) {
        Some(plugins) => plugins.as_slice(),
        None => &[],
    };

    for plugin in plugins {
        let name = plugin.get("name").and_then(Value::as_str).unwrap_or("");
        if plugin.get("version").and_then(Value::as_str).is_none() {
            report
                .warnings
                .push(format!("marketplace.json: plugin '{name}' missing 'version'"));
        }
    }

    if !report.passed() {
        return Ok(report);
    }

    for plugin in plugins {
        let name = plugin.get("name").and_then(Value::as_str).unwrap_or("");
        let Some(source) = plugin.get("source").and_then(Value::as_str) else {
            continue;
        };
        let plugin_dir = root.join(source.strip_prefix("./").unwrap_or(source));
        if !plugin_dir.exists() {
            report
                .errors
                .push(format!("Plugin directory not found: {source}"));
            continue;
        }
        validate_plugin(&plugin_dir, name, &mut report)?;
    }

    Ok(report)
}

fn validate_plugin(plugin_dir: &Path, plugin_name: &str, report: &mut ValidationReport) -> Result<()> {
    validate_plugin_manifest(plugin_dir, plugin_name, report)?;
    validate_skills(plugin_dir, plugin_name, report)?;

    if !plugin_dir.join("README.md").exists() {
        report
            .warnings
            .push(format!("{plugin_name}: missing README.md"));
    }
    Ok(())
}

fn validate_plugin_manifest(
    plugin_dir: &Path,
    plugin_name: &str,
    report: &mut ValidationReport,
) -> Result<()> {
    let manifest_path = plugin_dir.join(".claude-plugin/plugin.json");
    if !manifest_path.exists() {
        report
            .errors
            .push(format!("{plugin_name}: missing .claude-plugin/plugin.json"));
        return Ok(());
    }

    let contents = fs::read_to_string(&manifest_path)
        .with_context(|| format!("read {}", manifest_path.display()))?;
    let manifest: Value = match serde_json::from_str(&contents) {
        Ok(manifest) => manifest,
        Err(err) => {
            report
                .errors
                .push(format!("{plugin_name}/plugin.json: invalid JSON - {err}"));
            return Ok(());
        }
    };

    for message in schema_errors(PLUGIN_SCHEMA, &manifest)? {
        report
            .errors
            .push(format!("{plugin_name}/plugin.json: {message}"));
    }

    if manifest.get("author").is_none() {
        report
            .warnings
            .push(format!("{plugin_name}/plugin.json: missing 'author'"));
    }
    let keywords = manifest.get("keywords").and_then(Value::as_array);
    if keywords.is_none_or(|keywords| keywords.is_empty()) {
        report
            .warnings
            .push(format!("{plugin_name}/plugin.json: missing 'keywords'"));
    }
    Ok(())
}

fn validate_skills(plugin_dir: &Path, plugin_name: &str, report: &mut ValidationReport) -> Result<()> {
    let skills_dir = plugin_dir.join("skills");
    if !skills_dir.is_dir() {
        return Ok(());
    }

    let mut skill_dirs: Vec<_> = fs::read_dir(&skills_dir)
        .with_context(|| format!("read {}", skills_dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("read {}", skills_dir.display()))?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    skill_dirs.sort();

    for skill_dir in skill_dirs {
        let Some(skill_name) = skill_dir.file_name().map(|name| name.to_string_lossy()) else {
            continue;
        };
        validate_skill(&skill_dir, plugin_name, &skill_name, report)?;
    }
    Ok(())
}

fn validate_skill(
    skill_dir: &Path,
    plugin_name: &str,
    skill_name: &str,
    report: &mut ValidationReport,
) -> Result<()> {
    let skill_md = skill_dir.join("SKILL.md");
    if !skill_md.exists() {
        report
            .errors
            .push(format!("{plugin_name}/{skill_name}: missing SKILL.md"));
        return Ok(());
    }

    let contents =
        fs::read_to_string(&skill_md).with_context(|| format!("read {}", skill_md.display()))?;
    let Some(frontmatter) = parse_frontmatter(&contents) else {
        report
            .errors
            .push(format!("{plugin_name}/{skill_name}/SKILL.md: missing YAML frontmatter"));
        return Ok(());
    };

    for field in ["name", "version", "description"] {
        if frontmatter.get(field).is_none_or(|value| value.is_empty()) {
            report.errors.push(format!(
                "{plugin_name}/{skill_name}/SKILL.md: frontmatter missing '{field}'"
            ));
        }
    }

    if let Some(description) = frontmatter.get("description") {
        if !description.is_empty() && description.chars().count() < 50 {
            report.warnings.push(format!(
                "{plugin_name}/{skill_name}/SKILL.md: description seems short (< 50 chars)"
            ));
        }
    }

    let lines = contents.split('\n').count();
    if lines > 500 {
        report.warnings.push(format!(
            "{plugin_name}/{skill_name}/SKILL.md: {lines} lines (recommended < 500)"
        ));
    }
    Ok(())
}

/// Parse a leading `---` delimited frontmatter block into key/value pairs.
/// Values keep only the text after the first colon, trimmed.
fn parse_frontmatter(contents: &str) -> Option<HashMap<String, String>> {
    static FRONTMATTER: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\A---\n([\s\S]*?)\n---").unwrap());

    let block = FRONTMATTER.captures(contents)?;
    let mut fields = HashMap::new();
    for line in block[1].split('\n') {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        if key.trim().is_empty() {
            continue;
        }
        fields.insert(key.trim().to_string(), value.trim().to_string());
    }
    Some(fields)
}

/// Validate `instance` against an embedded Draft 2020-12 schema, returning
/// one message per violation.
fn schema_errors(schema: &str, instance: &Value) -> Result<Vec<String>> {
    let schema_value: Value = serde_json::from_str(schema).context("parse embedded schema")?;
    let compiled = jsonschema::options()
        .with_draft(Draft::Draft202012)
        .build(&schema_value)
        .context("compile json schema")?;
    Ok(compiled
        .iter_errors(instance)
        .map(|err| err.to_string())
        .collect())
}
