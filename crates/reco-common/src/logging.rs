use std::any::Any;
use std::panic;
use std::sync::OnceLock;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Text carried by a panic payload; `panic!` produces either `&str` or `String`.
fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("panic payload not string")
}

fn backtrace_requested(value: Option<&str>) -> bool {
    value.is_some_and(|value| value == "1" || value.eq_ignore_ascii_case("true"))
}

/// Logs panics as `error!` events tagged with the application, thread and
/// source location. Installed at most once per process; the default hook
/// still runs when `RECO_LOG_INCLUDE_BACKTRACE` is set.
pub fn install_tracing_panic_hook(app_name: &'static str) {
    static INSTALLED: OnceLock<()> = OnceLock::new();

    INSTALLED.get_or_init(|| {
        let default_hook = panic::take_hook();
        let include_backtrace =
            backtrace_requested(std::env::var("RECO_LOG_INCLUDE_BACKTRACE").ok().as_deref());

        panic::set_hook(Box::new(move |info| {
            let thread = std::thread::current();
            let thread_name = thread.name().unwrap_or("unnamed");
            let location = info
                .location()
                .map(|loc| format!("{}:{}", loc.file(), loc.line()))
                .unwrap_or_else(|| "unknown".into());

            tracing::error!(
                application = app_name,
                %thread_name,
                %location,
                panic_message = panic_message(info.payload()),
                "panic captured"
            );

            if include_backtrace {
                default_hook(info);
            }
        }));
    });
}

fn rotating_file_writer(app_name: &'static str) -> Option<BoxMakeWriter> {
    let dir = std::env::var_os("RECO_LOG_DIR")?;
    let dir = std::path::PathBuf::from(dir);
    if let Err(err) = std::fs::create_dir_all(&dir) {
        eprintln!("failed to create RECO_LOG_DIR ({err}); logging to stderr");
        return None;
    }

    let appender = tracing_appender::rolling::daily(dir, format!("{app_name}.log"));
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
    let _ = LOG_GUARD.set(guard);
    Some(BoxMakeWriter::new(non_blocking))
}

fn build_filter(debug: bool) -> EnvFilter {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if !debug {
        return filter;
    }
    match "reco_common=debug".parse::<Directive>() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

/// Initialize the tracing subscriber.
///
/// Stdout carries the ranked JSON, so logs go to stderr, or to
/// `<RECO_LOG_DIR>/<app>.log` with daily rotation when that variable is set.
/// `RUST_LOG` drives filtering; `debug` raises this crate to debug level so
/// backend selection and fallback reasons become visible.
pub fn init_tracing_subscriber(app_name: &'static str, debug: bool) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(build_filter(debug))
        .with_target(false);

    if let Some(writer) = rotating_file_writer(app_name) {
        let _ = builder.with_ansi(false).with_writer(writer).try_init();
    } else {
        let _ = builder.with_writer(std::io::stderr).try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_flag_adds_crate_directive() {
        let filter = build_filter(true).to_string();
        assert!(filter.contains("reco_common=debug"), "filter was {filter}");
    }

    #[test]
    fn panic_payload_text_is_recovered() {
        let literal = std::panic::catch_unwind(|| {
            panic!("static message");
        })
        .unwrap_err();
        assert_eq!(panic_message(literal.as_ref()), "static message");

        let formatted = std::panic::catch_unwind(|| {
            panic!("candidate {}", 7);
        })
        .unwrap_err();
        assert_eq!(panic_message(formatted.as_ref()), "candidate 7");

        let opaque = std::panic::catch_unwind(|| {
            std::panic::panic_any(42_u8);
        })
        .unwrap_err();
        assert_eq!(panic_message(opaque.as_ref()), "panic payload not string");
    }

    #[test]
    fn backtrace_flag_parsing() {
        assert!(backtrace_requested(Some("1")));
        assert!(backtrace_requested(Some("TRUE")));
        assert!(!backtrace_requested(Some("0")));
        assert!(!backtrace_requested(None));
    }
}
