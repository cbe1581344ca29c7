//! Logging macros
//!
//! Context values may be any `Display` type; they are rendered once and
//! borrowed for the duration of the call.

/// Build `Vec<(&str, String)>` context storage from `key => value` pairs
#[doc(hidden)]
#[macro_export]
macro_rules! __log_context {
    ($($key:expr => $value:expr),*) => {
        vec![$(($key, format!("{}", $value))),*]
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __log_context_refs {
    ($storage:expr) => {
        $storage
            .iter()
            .map(|(k, v): &(&str, String)| (*k, v.as_str()))
            .collect::<Vec<(&str, &str)>>()
    };
}

/// Log an error with a code, optional span and optional context
#[macro_export]
macro_rules! log_error {
    ($code:expr, $message:expr) => {
        $crate::logging::log_error_with_context($code, $message, None, vec![])
    };

    ($code:expr, $message:expr, span = $span:expr) => {
        $crate::logging::log_error_with_context($code, $message, Some($span), vec![])
    };

    ($code:expr, $message:expr, $($key:expr => $value:expr),+) => {{
        let context: Vec<(&str, String)> = $crate::__log_context!($($key => $value),+);
        $crate::logging::log_error_with_context($code, $message, None, $crate::__log_context_refs!(context))
    }};

    ($code:expr, $message:expr, span = $span:expr, $($key:expr => $value:expr),+) => {{
        let context: Vec<(&str, String)> = $crate::__log_context!($($key => $value),+);
        $crate::logging::log_error_with_context($code, $message, Some($span), $crate::__log_context_refs!(context))
    }};
}

/// Log a success event
#[macro_export]
macro_rules! log_success {
    ($code:expr, $message:expr) => {
        $crate::logging::log_success_with_context($code, $message, vec![])
    };

    ($code:expr, $message:expr, $($key:expr => $value:expr),+) => {{
        if $crate::logging::is_level_enabled($crate::logging::LogLevel::Info) {
            let context: Vec<(&str, String)> = $crate::__log_context!($($key => $value),+);
            $crate::logging::log_success_with_context($code, $message, $crate::__log_context_refs!(context))
        }
    }};
}

#[macro_export]
macro_rules! log_info {
    ($message:expr) => {
        $crate::logging::log_info_with_context($message, vec![])
    };

    ($message:expr, $($key:expr => $value:expr),+) => {{
        if $crate::logging::is_level_enabled($crate::logging::LogLevel::Info) {
            let context: Vec<(&str, String)> = $crate::__log_context!($($key => $value),+);
            $crate::logging::log_info_with_context($message, $crate::__log_context_refs!(context))
        }
    }};
}

/// Log a warning, optionally with a code
#[macro_export]
macro_rules! log_warning {
    ($message:expr) => {
        $crate::logging::log_warning_with_context(None, $message, vec![])
    };

    (code = $code:expr, $message:expr $(, $key:expr => $value:expr)*) => {{
        let context: Vec<(&str, String)> = $crate::__log_context!($($key => $value),*);
        $crate::logging::log_warning_with_context(Some($code), $message, $crate::__log_context_refs!(context))
    }};

    ($message:expr, $($key:expr => $value:expr),+) => {{
        let context: Vec<(&str, String)> = $crate::__log_context!($($key => $value),+);
        $crate::logging::log_warning_with_context(None, $message, $crate::__log_context_refs!(context))
    }};
}

/// Log a debug event; arguments are not evaluated unless debug logging is enabled
#[macro_export]
macro_rules! log_debug {
    ($message:expr) => {
        if $crate::logging::is_level_enabled($crate::logging::LogLevel::Debug) {
            $crate::logging::log_debug_with_context($message, vec![])
        }
    };

    ($message:expr, $($key:expr => $value:expr),+) => {
        if $crate::logging::is_level_enabled($crate::logging::LogLevel::Debug) {
            let context: Vec<(&str, String)> = $crate::__log_context!($($key => $value),+);
            $crate::logging::log_debug_with_context($message, $crate::__log_context_refs!(context))
        }
    };
}

/// Log a timed success event when performance logging is enabled
#[macro_export]
macro_rules! log_performance {
    ($code:expr, $message:expr, duration = $duration:expr) => {
        if $crate::logging::config::log_performance_events() {
            $crate::log_success!($code, $message,
                "duration_ms" => format!("{:.3}", $duration.as_secs_f64() * 1000.0)
            );
        }
    };

    ($code:expr, $message:expr, duration = $duration:expr, $($key:expr => $value:expr),+) => {
        if $crate::logging::config::log_performance_events() {
            $crate::log_success!($code, $message,
                "duration_ms" => format!("{:.3}", $duration.as_secs_f64() * 1000.0),
                $($key => $value),+
            );
        }
    };
}
