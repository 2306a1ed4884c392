use crate::server::ServiceKind;
use axum::http::Request;
use tracing::{Span, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub fn init_cli_logger(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("anipe=debug,info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("anipe=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

pub fn init_service_logger() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("anipe=info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(service_layer(std::io::stdout))
        .init();
}

/// JSON 輸出，並帶上目前 span 的欄位（service、method、uri）
fn service_layer<S, W>(writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .json() // 雲端日誌收集使用 JSON 格式
        .with_current_span(true)
        .with_span_list(false)
        .with_writer(writer)
}

/// Per-request span; every event logged while handling the request carries
/// the name of the service that received it.
pub fn request_span<B>(service: ServiceKind, request: &Request<B>) -> Span {
    tracing::info_span!(
        "request",
        service = service.service_name(),
        method = %request.method(),
        uri = %request.uri(),
    )
}
