//! Client config validation.

use std::path::Path;

use anyhow::{bail, Context as _, Result};
use roofer_core::{ClientConfig, ClientIdentifier};
use serde::Serialize;

use super::ConfigsArgs;
use crate::context::Context;
use crate::output::status_badge;

/// Check result for one config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigReport {
    pub file: String,
    pub identifier: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    pub channels: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem: Option<String>,
}

/// Check one config body. `file_stem` is the identifier the file serves.
pub fn check_config(file_name: &str, file_stem: &str, body: &[u8]) -> ConfigReport {
    let mut report = ConfigReport {
        file: file_name.to_string(),
        identifier: file_stem.to_string(),
        status: "ok",
        company_name: None,
        channels: Vec::new(),
        problem: None,
    };

    let config = match ClientConfig::from_slice(body) {
        Ok(config) => config,
        Err(e) => {
            report.status = "invalid";
            report.problem = Some(e.to_string());
            return report;
        }
    };

    report.company_name = Some(config.company_name().to_string());
    report.channels = config.enabled_channels().iter().map(|c| c.as_str()).collect();

    if ClientIdentifier::parse(file_stem).is_none() {
        report.status = "warning";
        report.problem = Some("no host can resolve to this identifier".to_string());
    } else if report.channels.is_empty() {
        report.status = "warning";
        report.problem = Some("no contact channel enabled".to_string());
    }

    report
}

/// Run the configs command.
pub async fn run(args: ConfigsArgs, ctx: &Context) -> Result<()> {
    let dir = match args.dir {
        Some(ref dir) => ctx.resolve_path(dir),
        None => ctx.configs_dir(),
    };

    let files = list_configs(&dir).await?;
    if files.is_empty() {
        bail!("No *.json configs found in {}", dir.display());
    }
    ctx.output.debug(&format!("Checking {} configs in {}", files.len(), dir.display()));

    let pb = ctx.output.progress(files.len() as u64, "Checking configs");
    let mut reports = Vec::with_capacity(files.len());
    for file in &files {
        let body = tokio::fs::read(file)
            .await
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = file
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        reports.push(check_config(&name, &stem, &body));
        pb.inc(1);
    }
    pb.finish_and_clear();

    let invalid = reports.iter().filter(|r| r.status == "invalid").count();

    if ctx.output.is_json() {
        ctx.output.json(&reports);
    } else {
        ctx.output.header(&format!("Configs in {}", dir.display()));
        let widths = [24, 10, 24, 24];
        ctx.output
            .table_row(&["IDENTIFIER", "STATUS", "COMPANY", "CHANNELS"], &widths);
        for report in &reports {
            let channels = report.channels.join(",");
            ctx.output.table_row(
                &[
                    &report.identifier,
                    &status_badge(report.status),
                    report.company_name.as_deref().unwrap_or("-"),
                    if channels.is_empty() { "-" } else { &channels },
                ],
                &widths,
            );
        }
        for report in reports.iter().filter(|r| r.problem.is_some()) {
            let problem = report.problem.as_deref().unwrap_or_default();
            ctx.output.list_item(&format!("{}: {}", report.file, problem));
        }
    }

    if invalid > 0 {
        bail!("{} of {} configs failed to parse", invalid, reports.len());
    }
    ctx.output.success(&format!("{} configs valid", reports.len()));
    Ok(())
}

async fn list_configs(dir: &Path) -> Result<Vec<std::path::PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("Failed to read config directory {}", dir.display()))?;

    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
