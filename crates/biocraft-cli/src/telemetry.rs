//! Tracing subscriber setup for the `biocraft` binary.
//!
//! Call [`init_tracing`] once at startup.  The library crates emit these
//! events, which this module routes to the console and optionally to OTLP:
//!
//! | Target | Level | What |
//! |---|---|---|
//! | `biocraft_safety::safety_layer` | `debug` span | `allow_command`, fields are its arguments |
//! | `biocraft_safety::safety_layer` | `info` / `warn` | accepted, pending or rejected |
//! | `biocraft_safety::confirmation_gate` | `info` / `warn` | operator answers and timeouts |
//! | `biocraft_safety::rate_limiter` | `debug` | rate-limited attempts with `retry_after` |
//! | `biocraft_spatial::frames` | `debug` | frame edges set or removed |
//!
//! The default `info` filter shows outcomes and operator answers only;
//! `RUST_LOG=biocraft_safety=debug` also records the `allow_command` spans,
//! which are what the OTLP exporter ships to a collector.
//!
//! # Environment variables
//!
//! | Variable | Effect |
//! |---|---|
//! | `RUST_LOG` | Log filter (default `"info"`, also used when unparseable). |
//! | `BIOCRAFT_LOG_FORMAT=json` | Newline-delimited JSON instead of compact lines. |
//! | `OTEL_EXPORTER_OTLP_ENDPOINT` | OTLP/HTTP collector base URL; enables span export. |

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{Resource, trace::SdkTracerProvider};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

// ─────────────────────────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────────────────────────

/// Install the global `tracing` subscriber, with OTLP export when configured.
///
/// The returned [`TracerProviderGuard`] must live until the process exits;
/// dropping it flushes pending `allow_command` spans.
pub fn init_tracing(service_name: &str) -> TracerProviderGuard {
    let env_filter = filter_from(std::env::var("RUST_LOG").ok().as_deref());

    let fmt_layer = if use_json_format(std::env::var("BIOCRAFT_LOG_FORMAT").ok().as_deref()) {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().compact().boxed()
    };

    let provider = build_provider(service_name);
    let otel_layer = provider
        .as_ref()
        .map(|p| tracing_opentelemetry::layer().with_tracer(p.tracer("biocraft")));

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(otel_layer)
        .with(env_filter)
        .init();

    TracerProviderGuard(provider)
}

// ─────────────────────────────────────────────────────────────────────────────
// RAII guard
// ─────────────────────────────────────────────────────────────────────────────

/// Shuts down the OTel [`SdkTracerProvider`] on drop.
pub struct TracerProviderGuard(Option<SdkTracerProvider>);

impl Drop for TracerProviderGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.0.take()
            && let Err(e) = provider.shutdown()
        {
            eprintln!("[biocraft] OpenTelemetry provider shutdown error: {e}");
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Internal helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Parse a `RUST_LOG` directive, falling back to `info` when it is absent
/// or malformed.
fn filter_from(directive: Option<&str>) -> EnvFilter {
    directive
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn use_json_format(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.eq_ignore_ascii_case("json"))
}

/// `None` when `OTEL_EXPORTER_OTLP_ENDPOINT` is unset or the exporter fails
/// to build; the caller then logs to the console only.
fn build_provider(service_name: &str) -> Option<SdkTracerProvider> {
    let endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok()?;

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_http()
        .with_endpoint(endpoint)
        .build()
        .map_err(|e| eprintln!("[biocraft] OTLP exporter init failed: {e}"))
        .ok()?;

    let resource = Resource::builder()
        .with_service_name(service_name.to_string())
        .build();

    Some(
        SdkTracerProvider::builder()
            .with_resource(resource)
            // The CLI has no async runtime, so spans are exported synchronously.
            .with_simple_exporter(exporter)
            .build(),
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
