//! Edge middleware that brands the estimate page per client host.
//!
//! The component fronts the static site: every request is proxied to
//! `origin_url`. Responses for `/` and `/index.html` on a client host are
//! streamed through the branding rewriter; everything else, and every
//! failure along the way, goes back to the client as the origin sent it.

mod assets;
mod settings;

use anyhow::{anyhow, Result};
use futures::StreamExt;
use spin_sdk::http::{
    Fields, IncomingRequest, IncomingResponse, Method as HttpMethod, OutgoingResponse, Request,
    ResponseOutparam, Scheme,
};
use spin_sdk::http_component;

use roofer_sdk::prelude::*;

use assets::SpinAssetFetcher;
use settings::Settings;

/// Request headers passed on to the origin.
const FORWARDED_HEADERS: [&str; 3] = ["accept", "accept-language", "user-agent"];

/// Branding middleware handler.
#[http_component]
async fn handle_branding(req: IncomingRequest, response_out: ResponseOutparam) {
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("roofer-branding misconfigured: {:#}", e);
            send_status(response_out, 500);
            return;
        }
    };

    let ctx = match request_context(&req) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("roofer-branding rejected request: {:#}", e);
            send_status(response_out, 400);
            return;
        }
    };

    let logger = StructuredLogger::new(ctx.request_id.clone())
        .with_component("branding")
        .with_route(ctx.path())
        .with_format(settings.log_format);

    let origin = match fetch_origin(&req, &ctx, &settings).await {
        Ok(origin) => origin,
        Err(e) => {
            logger
                .error_builder("Origin fetch failed")
                .field("reason", format!("{:#}", e))
                .emit();
            send_status(response_out, 502);
            return;
        }
    };

    if let Err(e) = serve(&ctx, &settings, &logger, origin, response_out).await {
        logger
            .error_builder("Response streaming failed")
            .field("reason", format!("{:#}", e))
            .emit();
    }
}

/// Decide on the origin head, then stream the body.
async fn serve(
    ctx: &RequestContext,
    settings: &Settings,
    logger: &StructuredLogger,
    origin: IncomingResponse,
    response_out: ResponseOutparam,
) -> Result<()> {
    let status = origin.status();
    let origin_headers = sanitize_pairs(origin.headers().entries());

    let headers = match from_pairs(origin_headers.iter().map(|(k, v)| (k.as_str(), v.as_slice()))) {
        Ok(headers) => headers,
        Err(e) => {
            logger
                .warn_builder("Unreadable origin headers, passing through")
                .field("reason", e.to_string())
                .emit();
            return relay(origin, status, &origin_headers, None, logger, response_out).await;
        }
    };

    let pipeline = BrandingPipeline::new(SpinAssetFetcher::new(settings.assets.clone()), logger.clone());
    let plan = match pipeline.decide(ctx, &headers).await {
        Disposition::Rewrite(plan) => plan,
        Disposition::PassThrough(_) => {
            return relay(origin, status, &origin_headers, None, logger, response_out).await
        }
    };

    let rewriter = match StreamRewriter::new(pipeline.targets(), &plan.branding) {
        Ok(rewriter) => rewriter,
        Err(e) => {
            logger
                .error_builder("Rewriter setup failed, passing through")
                .branding_error(&e)
                .emit();
            return relay(origin, status, &origin_headers, None, logger, response_out).await;
        }
    };

    let mut rewritten = headers;
    pipeline.finalize_headers(&mut rewritten);
    relay(
        origin,
        status,
        &to_pairs(&rewritten),
        Some((&pipeline, rewriter)),
        logger,
        response_out,
    )
    .await
}

/// Send the response head and copy the origin body, rewriting if asked.
async fn relay(
    origin: IncomingResponse,
    status: u16,
    headers: &HeaderPairs,
    rewrite: Option<(&BrandingPipeline<SpinAssetFetcher>, StreamRewriter)>,
    logger: &StructuredLogger,
    response_out: ResponseOutparam,
) -> Result<()> {
    let response = response_head(status, headers, logger);
    let body = response.take_body();
    response_out.set(response);

    let (pipeline, mut sink) = match rewrite {
        Some((pipeline, rewriter)) => (Some(pipeline), RewritingSink::new(body, rewriter)),
        None => (None, RewritingSink::passthrough(body)),
    };

    let mut stream = origin.take_body_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| anyhow!("origin body: {:?}", e))?;
        sink.send_chunk(chunk).await?;
    }
    let summary = sink.finish().await?;

    if let Some(pipeline) = pipeline {
        pipeline.report_stream(&sink, summary);
    }
    Ok(())
}

/// Build the outgoing head. Always yields a response: headers the host
/// refuses are dropped and an unusable status becomes 502.
fn response_head(status: u16, headers: &HeaderPairs, logger: &StructuredLogger) -> OutgoingResponse {
    let fields = match Fields::from_list(headers) {
        Ok(fields) => fields,
        Err(e) => {
            logger
                .warn_builder("Host rejected origin headers, sending bare head")
                .field("reason", format!("{:?}", e))
                .emit();
            Fields::new()
        }
    };

    let response = OutgoingResponse::new(fields);
    if response.set_status_code(status).is_err() {
        logger
            .warn_builder("Invalid origin status, sending 502")
            .field("status", status.to_string())
            .emit();
        let _ = response.set_status_code(502);
    }
    response
}

/// Proxy the request to the origin, asking for an unencoded body.
async fn fetch_origin(
    req: &IncomingRequest,
    ctx: &RequestContext,
    settings: &Settings,
) -> Result<IncomingResponse> {
    let path_with_query = match ctx.url.query() {
        Some(query) => format!("{}?{}", ctx.path(), query),
        None => ctx.path().to_string(),
    };
    let url = settings.origin_url(&path_with_query)?;

    let mut builder = Request::builder();
    builder.method(req.method()).uri(url.as_str());
    for name in FORWARDED_HEADERS {
        if let Some(value) = req.headers().get(&name.to_string()).into_iter().next() {
            builder.header(name, String::from_utf8_lossy(&value).into_owned());
        }
    }
    builder.header("accept-encoding", "identity");

    spin_sdk::http::send(builder.build())
        .await
        .map_err(|e| anyhow!("origin request to {} failed: {}", url, e))
}

/// Rebuild the public request URL the client used.
fn request_context(req: &IncomingRequest) -> Result<RequestContext> {
    let scheme = match req.scheme() {
        Some(Scheme::Http) => "http".to_string(),
        Some(Scheme::Other(other)) => other,
        Some(Scheme::Https) | None => "https".to_string(),
    };

    let authority = req
        .authority()
        .or_else(|| {
            req.headers()
                .get(&"host".to_string())
                .into_iter()
                .next()
                .map(|v| String::from_utf8_lossy(&v).into_owned())
        })
        .ok_or_else(|| anyhow!("request has no host"))?;

    let path_with_query = req.path_with_query().unwrap_or_else(|| "/".to_string());
    let method = match req.method() {
        HttpMethod::Get => Method::Get,
        HttpMethod::Head => Method::Head,
        HttpMethod::Post => Method::Post,
        _ => Method::Other,
    };

    Ok(RequestContext::parse(
        method,
        &format!("{}://{}{}", scheme, authority, path_with_query),
    )?)
}

fn send_status(response_out: ResponseOutparam, status: u16) {
    let response = OutgoingResponse::new(Fields::new());
    let _ = response.set_status_code(status);
    response_out.set(response);
}
