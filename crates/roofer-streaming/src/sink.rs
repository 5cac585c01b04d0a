//! Rewriting response sink.

use std::fmt::Display;

use futures::{Sink, SinkExt};
use roofer_core::BrandingError;

use crate::engine::StreamRewriter;

/// State of the rewriting sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SinkState {
    /// Chunks go through the rewriter.
    Streaming,
    /// The rewriter failed after output was committed; chunks go through raw.
    Degraded,
    /// Body has been finished.
    Completed,
}

/// Counters reported when the body is finished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamSummary {
    /// Origin bytes received.
    pub bytes_in: usize,
    /// Bytes written to the client.
    pub bytes_out: usize,
    /// Whether the rewrite gave up part way through.
    pub degraded: bool,
}

/// Feeds origin body chunks through a `StreamRewriter` into a sink.
///
/// The response head has already been sent by the time a rewrite error can
/// surface, so an error switches the sink to forwarding origin bytes as
/// they are. Only write failures on the inner sink are returned.
pub struct RewritingSink<S, E>
where
    S: Sink<Vec<u8>, Error = E> + Unpin,
    E: Display,
{
    inner: S,
    rewriter: Option<StreamRewriter>,
    state: SinkState,
    failure: Option<BrandingError>,
    summary: StreamSummary,
}

impl<S, E> RewritingSink<S, E>
where
    S: Sink<Vec<u8>, Error = E> + Unpin,
    E: Display,
{
    /// Create a new rewriting sink.
    pub fn new(sink: S, rewriter: StreamRewriter) -> Self {
        Self {
            inner: sink,
            rewriter: Some(rewriter),
            state: SinkState::Streaming,
            failure: None,
            summary: StreamSummary::default(),
        }
    }

    /// Create a sink that forwards everything untouched.
    pub fn passthrough(sink: S) -> Self {
        Self {
            inner: sink,
            rewriter: None,
            state: SinkState::Degraded,
            failure: None,
            summary: StreamSummary::default(),
        }
    }

    /// Send one origin chunk.
    pub async fn send_chunk(&mut self, chunk: Vec<u8>) -> Result<(), BrandingError> {
        self.summary.bytes_in += chunk.len();

        let out = match self.state {
            SinkState::Completed => {
                return Err(BrandingError::Transport(
                    "Sink already completed".to_string(),
                ))
            }
            SinkState::Degraded => chunk,
            SinkState::Streaming => match self.rewriter.as_mut().map(|r| r.write(&chunk)) {
                Some(Ok(out)) => out,
                Some(Err(e)) => {
                    self.degrade(e);
                    chunk
                }
                None => chunk,
            },
        };

        self.forward(out).await
    }

    /// Flush the rewriter tail and close the inner sink.
    pub async fn finish(&mut self) -> Result<StreamSummary, BrandingError> {
        if self.state == SinkState::Completed {
            return Ok(self.summary);
        }

        if let Some(rewriter) = self.rewriter.take() {
            if self.state == SinkState::Streaming {
                match rewriter.end() {
                    Ok(tail) => self.forward(tail).await?,
                    Err(e) => self.degrade(e),
                }
            }
        }

        self.state = SinkState::Completed;
        self.inner
            .close()
            .await
            .map_err(|e| BrandingError::Transport(e.to_string()))?;

        Ok(self.summary)
    }

    /// The rewrite error that caused degradation, if any.
    pub fn failure(&self) -> Option<&BrandingError> {
        self.failure.as_ref()
    }

    /// Check if the sink fell back to raw forwarding.
    pub fn is_degraded(&self) -> bool {
        self.summary.degraded
    }

    /// Consume the sink and return the inner value.
    pub fn into_inner(self) -> S {
        self.inner
    }

    fn degrade(&mut self, error: BrandingError) {
        self.rewriter = None;
        self.state = SinkState::Degraded;
        self.summary.degraded = true;
        self.failure = Some(error);
    }

    async fn forward(&mut self, bytes: Vec<u8>) -> Result<(), BrandingError> {
        if bytes.is_empty() {
            return Ok(());
        }
        self.summary.bytes_out += bytes.len();
        self.inner
            .send(bytes)
            .await
            .map_err(|e| BrandingError::Transport(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{Replacement, RewriteAction, RewriteRule, RewriteTargets};
    use futures::channel::mpsc;
    use futures::executor::block_on;
    use futures::StreamExt;
    use roofer_core::{Branding, ClientConfig};
    use url::Url;

    const PAGE: &str =
        "<html><head><title>Roofer</title></head><body><h1 class=\"hero-title\">x</h1></body></html>";

    fn branding() -> Branding {
        let config = ClientConfig {
            company_name: Some("Acme Roofing".to_string()),
            ..ClientConfig::default()
        };
        Branding::derive(&config, &Url::parse("https://acme.pages.dev/").unwrap())
    }

    fn run(sink: &mut RewritingSink<mpsc::UnboundedSender<Vec<u8>>, mpsc::SendError>, chunk: usize) -> StreamSummary {
        block_on(async {
            for part in PAGE.as_bytes().chunks(chunk) {
                sink.send_chunk(part.to_vec()).await.unwrap();
            }
            sink.finish().await.unwrap()
        })
    }

    fn collect(rx: mpsc::UnboundedReceiver<Vec<u8>>) -> String {
        let chunks: Vec<Vec<u8>> = block_on(rx.collect());
        String::from_utf8(chunks.concat()).unwrap()
    }

    // === Streaming Tests ===

    #[test]
    fn test_streams_rewritten_body() {
        let (tx, rx) = mpsc::unbounded();
        let rewriter = StreamRewriter::new(&RewriteTargets::standard(), &branding()).unwrap();
        let mut sink = RewritingSink::new(tx, rewriter);

        let summary = run(&mut sink, 16);
        let body = collect(rx);

        assert!(body.contains("<title>Acme Roofing - Roofing Cost Estimate</title>"));
        assert!(body.contains("company-brand\">Acme Roofing</span>"));
        assert_eq!(summary.bytes_in, PAGE.len());
        assert_eq!(summary.bytes_out, body.len());
        assert!(!summary.degraded);
    }

    #[test]
    fn test_passthrough_forwards_bytes() {
        let (tx, rx) = mpsc::unbounded();
        let mut sink = RewritingSink::passthrough(tx);

        let summary = run(&mut sink, 10);

        assert_eq!(collect(rx), PAGE);
        assert_eq!(summary.bytes_in, summary.bytes_out);
    }

    // === Degradation Tests ===

    #[test]
    fn test_rewrite_failure_degrades_to_raw() {
        let targets = RewriteTargets::new().with_rule(RewriteRule::new(
            "body",
            RewriteAction::SetAttribute {
                name: "bad name".to_string(),
                value: Replacement::CompanyName,
            },
        ));
        let (tx, rx) = mpsc::unbounded();
        let rewriter = StreamRewriter::new(&targets, &branding()).unwrap();
        let mut sink = RewritingSink::new(tx, rewriter);

        let summary = run(&mut sink, PAGE.len());

        assert!(summary.degraded);
        assert!(sink.is_degraded());
        assert_eq!(sink.failure().map(|e| e.kind()), Some("rewrite_failure"));
        assert_eq!(collect(rx), PAGE);
    }

    // === Lifecycle Tests ===

    #[test]
    fn test_send_after_finish_fails() {
        let (tx, _rx) = mpsc::unbounded();
        let mut sink = RewritingSink::passthrough(tx);

        block_on(sink.finish()).unwrap();
        let err = block_on(sink.send_chunk(b"late".to_vec())).unwrap_err();
        assert_eq!(err.kind(), "transport");
    }
}
