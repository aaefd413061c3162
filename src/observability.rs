//! Structured diagnostics for the conversion path.
//!
//! The `log_metric!` macro emits one key/value line per event through the `log`
//! facade at debug level. It is compiled out of release builds.

/// Logs a structured key-value metric string at debug level, only in debug builds.
///
/// # Example
/// ```
/// use packrat::log_metric;
/// let ratio = 0.25;
/// log_metric!("event"="compress_field", "field"="payload", "ratio"=&ratio);
/// ```
#[macro_export]
macro_rules! log_metric {
    ($($key:literal = $value:expr),+ $(,)?) => {
        #[cfg(debug_assertions)]
        {
            // Collect each pair as a JSON string fragment
            let mut parts = Vec::new();
            $(
                parts.push(format!("\"{}\": \"{}\"", $key, $value));
            )+

            $crate::__log::debug!("PACKRAT_METRIC: {{ {} }}", parts.join(", "));
        }
    };
}
