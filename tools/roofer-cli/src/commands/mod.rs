//! CLI command implementations.

pub mod configs;
pub mod preview;
pub mod wizard;

use clap::Args;
use roofer_core::RequestId;
use roofer_observability::{LogFormat, LogLevel, StructuredLogger};

use crate::context::Context;

/// Arguments for the preview command.
#[derive(Args)]
pub struct PreviewArgs {
    /// Host to impersonate (e.g. acme.pages.dev).
    #[arg(long)]
    pub host: Option<String>,

    /// Request path.
    #[arg(short, long, default_value = "/")]
    pub path: String,

    /// HTML file to use as the origin body (default: the site index).
    #[arg(long)]
    pub html: Option<String>,

    /// Write the resulting body to this file instead of stdout.
    #[arg(short, long)]
    pub out: Option<String>,

    /// Rewrite chunk size in bytes.
    #[arg(long, default_value = "4096")]
    pub chunk_size: usize,
}

/// Arguments for the configs command.
#[derive(Args)]
pub struct ConfigsArgs {
    /// Config directory (default: the site's configs directory).
    #[arg(short, long)]
    pub dir: Option<String>,
}

/// Arguments for the wizard command.
#[derive(Args)]
pub struct WizardArgs {
    /// Host the page is served from.
    #[arg(long)]
    pub host: Option<String>,

    /// Config identifier override, as `?config=` would give.
    #[arg(long = "client")]
    pub client: Option<String>,
}

/// Logger for pipeline and loader output, quiet unless `--verbose`.
pub(crate) fn command_logger(ctx: &Context, component: &str) -> StructuredLogger {
    let level = if ctx.output.is_verbose() {
        LogLevel::Debug
    } else {
        LogLevel::Error
    };
    StructuredLogger::new(RequestId::generate())
        .with_component(component)
        .with_min_level(level)
        .with_format(LogFormat::Human)
}
