//! Local preview of the edge branding rewrite.

use anyhow::{Context as _, Result};
use roofer_cache::{from_pairs, to_pairs};
use roofer_core::{Method, RequestContext};
use roofer_executor::{BrandingPipeline, Disposition};
use serde::Serialize;

use super::{command_logger, PreviewArgs};
use crate::assets::FsAssetFetcher;
use crate::context::Context;
use crate::output::{format_bytes, status_badge};

/// Machine-readable preview result.
#[derive(Debug, Serialize)]
struct PreviewReport {
    url: String,
    disposition: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    status: u16,
    headers: Vec<(String, String)>,
    bytes_in: usize,
    bytes_out: usize,
    degraded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    out: Option<String>,
}

/// Run the preview command.
pub async fn run(args: PreviewArgs, ctx: &Context) -> Result<()> {
    let host = args
        .host
        .clone()
        .or_else(|| ctx.config.preview.host.clone())
        .context("No host given; pass --host or set [preview] host in roofer.toml")?;
    let url = format!("{}://{}{}", ctx.config.preview.scheme, host, args.path);
    let request =
        RequestContext::parse(Method::Get, &url).with_context(|| format!("Invalid request URL: {}", url))?;

    let html_path = match args.html {
        Some(ref path) => ctx.resolve_path(path),
        None => ctx.index_path(),
    };
    let body = tokio::fs::read(&html_path)
        .await
        .with_context(|| format!("Failed to read {}", html_path.display()))?;
    ctx.output
        .debug(&format!("Origin body: {} ({})", html_path.display(), format_bytes(body.len() as u64)));

    let headers = from_pairs([("content-type", "text/html; charset=utf-8")])?;
    let pipeline = BrandingPipeline::new(
        FsAssetFetcher::new(ctx.site_root()).with_configs_dir(ctx.configs_dir()),
        command_logger(ctx, "preview").with_route(request.path()),
    );

    let spinner = ctx.output.spinner(&format!("Branding {}", url));
    let disposition = pipeline.decide(&request, &headers).await;

    let mut report = PreviewReport {
        url: url.clone(),
        disposition: if disposition.is_rewrite() { "rewrite" } else { "pass_through" },
        identifier: None,
        reason: None,
        status: 200,
        headers: Vec::new(),
        bytes_in: body.len(),
        bytes_out: body.len(),
        degraded: false,
        out: None,
    };

    let (final_headers, rendered) = match disposition {
        Disposition::PassThrough(reason) => {
            let detail = match reason.error() {
                Some(e) => format!("{}: {}", reason.name(), e),
                None => reason.name().to_string(),
            };
            if reason.is_failure() {
                ctx.output.warn(&format!("Branding skipped: {}", detail));
            }
            report.reason = Some(detail);
            (headers, body)
        }
        Disposition::Rewrite(plan) => {
            report.identifier = Some(plan.identifier.as_str().to_string());

            let mut sink = pipeline.open_sink(&plan, Vec::<Vec<u8>>::new())?;
            for chunk in body.chunks(args.chunk_size.max(1)) {
                sink.send_chunk(chunk.to_vec()).await?;
            }
            let summary = sink.finish().await?;
            pipeline.report_stream(&sink, summary);

            report.bytes_out = summary.bytes_out;
            report.degraded = summary.degraded;

            let mut rewritten = headers;
            pipeline.finalize_headers(&mut rewritten);
            (rewritten, sink.into_inner().concat())
        }
    };
    spinner.finish_and_clear();

    report.headers = to_pairs(&final_headers)
        .into_iter()
        .map(|(name, value)| (name, String::from_utf8_lossy(&value).into_owned()))
        .collect();

    if let Some(ref out) = args.out {
        let out_path = ctx.resolve_path(out);
        tokio::fs::write(&out_path, &rendered)
            .await
            .with_context(|| format!("Failed to write {}", out_path.display()))?;
        report.out = Some(out_path.display().to_string());
    }

    if ctx.output.is_json() {
        ctx.output.json(&report);
        return Ok(());
    }

    ctx.output.header("Preview");
    ctx.output.kv("url", &report.url);
    ctx.output.kv("disposition", &status_badge(report.disposition));
    if let Some(ref identifier) = report.identifier {
        ctx.output.kv("identifier", identifier);
    }
    if let Some(ref reason) = report.reason {
        ctx.output.kv("reason", reason);
    }
    if report.degraded {
        ctx.output.warn("Rewrite gave up part way; origin bytes were forwarded");
    }

    if ctx.output.is_verbose() {
        ctx.output.header(&format!("Response {}", report.status));
        for (name, value) in &report.headers {
            ctx.output.kv(name, value);
        }
    }

    match report.out {
        Some(ref path) => ctx.output.success(&format!(
            "Wrote {} to {}",
            format_bytes(report.bytes_out as u64),
            path
        )),
        None => println!("{}", String::from_utf8_lossy(&rendered)),
    }

    Ok(())
}
