//! Diagnostic sink and the per-thread error relay slot.
//!
//! The raster library underneath this crate grew up around a C-style model
//! where decode failures surface as one free-form message per call rather
//! than a structured value the caller can match on. We keep that text in a
//! thread-local relay slot: each operation stores the message as it fails,
//! then [`take`]s the slot immediately afterwards to build its caller-facing
//! error. The slot is never exposed as ambient state.
//!
//! If a message is still sitting in the slot when a new one arrives (a
//! previous caller forgot to consume it), the stale message is flushed to the
//! injected [`DiagnosticSink`] instead of being silently dropped.
//!
//! The slot is `thread_local!`, so concurrent decodes on different threads
//! cannot observe or clear each other's messages.

use std::cell::RefCell;

/// Single-method logging collaborator.
///
/// The core emits diagnostic text through this interface and nothing else; it
/// never configures or owns a logger. One call per event, one string per
/// call.
pub trait DiagnosticSink: Send + Sync {
    fn diagnostic(&self, message: &str);
}

/// Default sink: forwards each diagnostic to the `log` facade at warn level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn diagnostic(&self, message: &str) {
        log::warn!("{message}");
    }
}

thread_local! {
    static RELAY_SLOT: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Store a library-emitted message in this thread's relay slot.
///
/// A stale unconsumed message is flushed to `sink` before being overwritten.
pub(crate) fn report(sink: &dyn DiagnosticSink, message: String) {
    RELAY_SLOT.with(|slot| {
        if let Some(stale) = slot.borrow_mut().replace(message) {
            sink.diagnostic(&stale);
        }
    });
}

/// Take and clear this thread's relayed message, if any.
///
/// Callers consult this immediately after the library call whose failure may
/// have filled it.
pub(crate) fn take() -> Option<String> {
    RELAY_SLOT.with(|slot| slot.borrow_mut().take())
}
