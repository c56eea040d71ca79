//! GL debug output routing.
//!
//! The driver reports errors and warnings through the debug-output callback.
//! [`App`](super::App) forwards every message to a [`DiagnosticSink`] handed to it
//! at construction, so callers decide where diagnostics end up.

/// A single message from the GL debug output.
#[derive(Clone, Copy, Debug)]
pub struct DebugMessage<'a> {
    pub source: u32,
    pub kind: u32,
    pub id: u32,
    pub severity: u32,
    pub text: &'a str,
}

impl DebugMessage<'_> {
    /// Human readable name of the message source.
    pub fn source_name(&self) -> &'static str {
        match self.source {
            glow::DEBUG_SOURCE_API => "api",
            glow::DEBUG_SOURCE_WINDOW_SYSTEM => "window-system",
            glow::DEBUG_SOURCE_SHADER_COMPILER => "shader-compiler",
            glow::DEBUG_SOURCE_THIRD_PARTY => "third-party",
            glow::DEBUG_SOURCE_APPLICATION => "application",
            _ => "other",
        }
    }

    /// Human readable name of the message type.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            glow::DEBUG_TYPE_ERROR => "error",
            glow::DEBUG_TYPE_DEPRECATED_BEHAVIOR => "deprecated",
            glow::DEBUG_TYPE_UNDEFINED_BEHAVIOR => "undefined-behavior",
            glow::DEBUG_TYPE_PORTABILITY => "portability",
            glow::DEBUG_TYPE_PERFORMANCE => "performance",
            glow::DEBUG_TYPE_MARKER => "marker",
            _ => "other",
        }
    }
}

/// Receives GL debug messages. Called on the rendering thread, synchronously.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, message: &DebugMessage<'_>);
}

impl<F> DiagnosticSink for F
where
    F: Fn(&DebugMessage<'_>) + Send + Sync,
{
    fn report(&self, message: &DebugMessage<'_>) {
        self(message)
    }
}

/// Default sink: forwards to the `log` facade under the `gl` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&self, message: &DebugMessage<'_>) {
        log::log!(
            target: "gl",
            severity_level(message.severity),
            "[{}/{} #{}] {}",
            message.source_name(),
            message.kind_name(),
            message.id,
            message.text.trim_end()
        );
    }
}

/// Maps a GL debug severity to a log level.
pub fn severity_level(severity: u32) -> log::Level {
    match severity {
        glow::DEBUG_SEVERITY_HIGH => log::Level::Error,
        glow::DEBUG_SEVERITY_MEDIUM => log::Level::Warn,
        glow::DEBUG_SEVERITY_LOW => log::Level::Info,
        glow::DEBUG_SEVERITY_NOTIFICATION => log::Level::Debug,
        _ => log::Level::Warn,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[test]
    fn severities_map_to_levels() {
        assert_eq!(severity_level(glow::DEBUG_SEVERITY_HIGH), log::Level::Error);
        assert_eq!(severity_level(glow::DEBUG_SEVERITY_MEDIUM), log::Level::Warn);
        assert_eq!(severity_level(glow::DEBUG_SEVERITY_LOW), log::Level::Info);
        assert_eq!(
            severity_level(glow::DEBUG_SEVERITY_NOTIFICATION),
            log::Level::Debug
        );
        assert_eq!(severity_level(0), log::Level::Warn);
    }

    #[test]
    fn closures_act_as_sinks() {
        let seen = Mutex::new(Vec::new());
        let sink = |msg: &DebugMessage<'_>| {
            seen.lock()
                .unwrap()
                .push(format!("{}:{}", msg.kind_name(), msg.text));
        };
        let message = DebugMessage {
            source: glow::DEBUG_SOURCE_API,
            kind: glow::DEBUG_TYPE_ERROR,
            id: 1282,
            severity: glow::DEBUG_SEVERITY_HIGH,
            text: "GL_INVALID_OPERATION",
        };
        sink.report(&message);
        assert_eq!(message.source_name(), "api");
        assert_eq!(*seen.lock().unwrap(), vec!["error:GL_INVALID_OPERATION"]);
    }
}
