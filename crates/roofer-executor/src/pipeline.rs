//! Edge branding pipeline: gate, identify, fetch, plan, rewrite.

use std::fmt::Display;

use futures::Sink;
use http::HeaderMap;
use roofer_cache::{apply_no_store, is_rewritable_body, strip_length};
use roofer_core::{Branding, BrandingError, ClientIdentifier, RequestContext};
use roofer_data::{AssetFetcher, ConfigClient};
use roofer_observability::StructuredLogger;
use roofer_streaming::{rewrite_document, RewriteTargets, RewritingSink, StreamRewriter, StreamSummary};

use crate::fallback::PassReason;
use crate::gate::is_rewritable_path;

/// Branding resolved for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewritePlan {
    /// Client the branding belongs to.
    pub identifier: ClientIdentifier,
    /// Values to inject.
    pub branding: Branding,
}

/// What to do with an origin response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Return the origin response untouched.
    PassThrough(PassReason),
    /// Stream the body through the rewriter.
    Rewrite(RewritePlan),
}

impl Disposition {
    /// Check if the response will be rewritten.
    pub fn is_rewrite(&self) -> bool {
        matches!(self, Self::Rewrite(_))
    }
}

/// A fully buffered origin response.
#[derive(Debug, Clone, PartialEq)]
pub struct OriginResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body.
    pub body: Vec<u8>,
}

impl OriginResponse {
    /// Create a new response.
    pub fn new(status: u16, headers: HeaderMap, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }
}

/// Per-request branding pipeline.
///
/// Every failure is logged once and turns into a pass-through; nothing
/// here produces an error response.
pub struct BrandingPipeline<F> {
    client: ConfigClient<F>,
    targets: RewriteTargets,
    logger: StructuredLogger,
}

impl<F: AssetFetcher> BrandingPipeline<F> {
    /// Create a pipeline fetching configs through `fetcher`.
    pub fn new(fetcher: F, logger: StructuredLogger) -> Self {
        Self {
            client: ConfigClient::edge(fetcher),
            targets: RewriteTargets::standard(),
            logger,
        }
    }

    /// Get the rewrite table.
    pub fn targets(&self) -> &RewriteTargets {
        &self.targets
    }

    /// Cheap checks that need no I/O beyond the origin response head.
    pub fn screen(&self, ctx: &RequestContext, headers: &HeaderMap) -> Option<PassReason> {
        if !is_rewritable_path(ctx.path()) {
            self.logger
                .debug_builder("Path not eligible for branding")
                .field("path", ctx.path())
                .emit();
            return Some(PassReason::IneligiblePath);
        }

        if !is_rewritable_body(headers) {
            self.logger
                .info_builder("Origin body cannot be rewritten")
                .field("path", ctx.path())
                .emit();
            return Some(PassReason::UnsupportedBody);
        }

        None
    }

    /// Resolve the identifier and config for a request.
    pub async fn plan(&self, ctx: &RequestContext) -> Disposition {
        if !is_rewritable_path(ctx.path()) {
            return Disposition::PassThrough(PassReason::IneligiblePath);
        }

        let identifier = match ClientIdentifier::from_edge_host(ctx.host()) {
            Ok(id) => id,
            Err(e) => {
                self.logger
                    .info_builder("No client identifier, skipping branding")
                    .field("host", ctx.host())
                    .branding_error(&e)
                    .emit();
                return Disposition::PassThrough(PassReason::Unresolved(e));
            }
        };

        let config = match self.client.fetch_config(&identifier).await {
            Ok(config) => config,
            Err(e) => {
                let mut log = self
                    .logger
                    .warn_builder("Config unavailable, serving origin response")
                    .field("identifier", identifier.as_str())
                    .branding_error(&e);
                if let BrandingError::ConfigNotFound { status, .. } = &e {
                    log = log.field_i64("status", i64::from(*status));
                }
                log.emit();
                return Disposition::PassThrough(PassReason::ConfigUnavailable(e));
            }
        };

        let branding = Branding::derive(&config, &ctx.url);
        self.logger
            .info_builder("Branding response")
            .field("identifier", identifier.as_str())
            .field("company", branding.company_name.as_str())
            .emit();

        Disposition::Rewrite(RewritePlan {
            identifier,
            branding,
        })
    }

    /// Screen the origin head, then plan.
    pub async fn decide(&self, ctx: &RequestContext, headers: &HeaderMap) -> Disposition {
        match self.screen(ctx, headers) {
            Some(reason) => Disposition::PassThrough(reason),
            None => self.plan(ctx).await,
        }
    }

    /// Adjust origin headers for a rewritten body.
    pub fn finalize_headers(&self, headers: &mut HeaderMap) {
        apply_no_store(headers);
        strip_length(headers);
    }

    /// Wrap `sink` so body chunks are rewritten for `plan`.
    ///
    /// On error nothing has been written and the caller should pass the
    /// origin response through.
    pub fn open_sink<S, E>(&self, plan: &RewritePlan, sink: S) -> Result<RewritingSink<S, E>, BrandingError>
    where
        S: Sink<Vec<u8>, Error = E> + Unpin,
        E: Display,
    {
        let rewriter = StreamRewriter::new(&self.targets, &plan.branding).map_err(|e| {
            self.logger
                .error_builder("Rewriter setup failed")
                .branding_error(&e)
                .emit();
            e
        })?;
        Ok(RewritingSink::new(sink, rewriter))
    }

    /// Log how a streamed rewrite ended.
    pub fn report_stream<S, E>(&self, sink: &RewritingSink<S, E>, summary: StreamSummary)
    where
        S: Sink<Vec<u8>, Error = E> + Unpin,
        E: Display,
    {
        match sink.failure() {
            Some(e) => self
                .logger
                .error_builder("Rewrite failed mid-stream, forwarded origin bytes")
                .branding_error(e)
                .field_i64("bytes_in", summary.bytes_in as i64)
                .emit(),
            None => self
                .logger
                .debug_builder("Rewrite complete")
                .field_i64("bytes_in", summary.bytes_in as i64)
                .field_i64("bytes_out", summary.bytes_out as i64)
                .emit(),
        }
    }

    /// Run the whole pipeline over a buffered origin response.
    pub async fn handle_buffered(&self, ctx: &RequestContext, origin: OriginResponse) -> OriginResponse {
        let plan = match self.decide(ctx, &origin.headers).await {
            Disposition::Rewrite(plan) => plan,
            Disposition::PassThrough(_) => return origin,
        };

        match rewrite_document(&origin.body, &self.targets, &plan.branding) {
            Ok(body) => {
                let mut headers = origin.headers;
                self.finalize_headers(&mut headers);
                OriginResponse {
                    status: origin.status,
                    headers,
                    body,
                }
            }
            Err(e) => {
                self.logger
                    .error_builder("Rewrite failed, serving origin response")
                    .field("identifier", plan.identifier.as_str())
                    .branding_error(&e)
                    .emit();
                origin
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use roofer_core::{Method, RequestId};
    use roofer_data::MemoryAssets;

    fn logger() -> StructuredLogger {
        StructuredLogger::new(RequestId::from_string("test")).with_component("branding")
    }

    fn ctx(url: &str) -> RequestContext {
        RequestContext::parse(Method::Get, url).unwrap()
    }

    fn assets() -> MemoryAssets {
        MemoryAssets::new().with_asset("configs/acme.json", r#"{"companyName": "Acme Roofing"}"#)
    }

    // === Plan Tests ===

    #[test]
    fn test_plan_rewrites_known_client() {
        let pipeline = BrandingPipeline::new(assets(), logger());

        match block_on(pipeline.plan(&ctx("https://acme.pages.dev/"))) {
            Disposition::Rewrite(plan) => {
                assert_eq!(plan.identifier.as_str(), "acme");
                assert_eq!(plan.branding.company_name, "Acme Roofing");
            }
            other => panic!("expected rewrite, got {:?}", other),
        }
    }

    #[test]
    fn test_plan_skips_ineligible_path() {
        let pipeline = BrandingPipeline::new(assets(), logger());
        let disposition = block_on(pipeline.plan(&ctx("https://acme.pages.dev/app.js")));
        assert_eq!(disposition, Disposition::PassThrough(PassReason::IneligiblePath));
    }

    #[test]
    fn test_plan_skips_www() {
        let pipeline = BrandingPipeline::new(assets(), logger());
        let disposition = block_on(pipeline.plan(&ctx("https://www.pages.dev/")));
        assert!(matches!(
            disposition,
            Disposition::PassThrough(PassReason::Unresolved(_))
        ));
    }

    #[test]
    fn test_plan_missing_config() {
        let pipeline = BrandingPipeline::new(assets(), logger());
        let disposition = block_on(pipeline.plan(&ctx("https://other.pages.dev/index.html")));

        match disposition {
            Disposition::PassThrough(PassReason::ConfigUnavailable(e)) => {
                assert_eq!(e.kind(), "config_not_found")
            }
            other => panic!("expected pass-through, got {:?}", other),
        }
    }

    // === Screen Tests ===

    #[test]
    fn test_screen_rejects_encoded_body() {
        let pipeline = BrandingPipeline::new(assets(), logger());
        let headers = roofer_cache::from_pairs([("content-encoding", "br")]).unwrap();

        let disposition = block_on(pipeline.decide(&ctx("https://acme.pages.dev/"), &headers));
        assert_eq!(disposition, Disposition::PassThrough(PassReason::UnsupportedBody));
    }

    // === Sink Tests ===

    #[test]
    fn test_open_sink_streams_rewrite() {
        use futures::channel::mpsc;
        use futures::StreamExt;

        let pipeline = BrandingPipeline::new(assets(), logger());
        let plan = match block_on(pipeline.plan(&ctx("https://acme.pages.dev/"))) {
            Disposition::Rewrite(plan) => plan,
            other => panic!("expected rewrite, got {:?}", other),
        };

        let (tx, rx) = mpsc::unbounded();
        let mut sink = pipeline.open_sink(&plan, tx).unwrap();
        let summary = block_on(async {
            sink.send_chunk(b"<html><head><title>x</ti".to_vec()).await.unwrap();
            sink.send_chunk(b"tle></head></html>".to_vec()).await.unwrap();
            sink.finish().await.unwrap()
        });
        pipeline.report_stream(&sink, summary);

        let body: Vec<Vec<u8>> = block_on(rx.collect());
        let body = String::from_utf8(body.concat()).unwrap();
        assert!(body.contains("<title>Acme Roofing - Roofing Cost Estimate</title>"));
    }
}
