use std::env;
use std::sync::OnceLock;

pub(crate) const DEFAULT_DEVICE: &str = "cpu";

static TENSORNET_DEFAULT_DEVICE: OnceLock<String> = OnceLock::new();
static TENSORNET_STRICT_EXTERNAL_INPUTS: OnceLock<bool> = OnceLock::new();

pub(crate) fn parse_bool(value: &str) -> bool {
    let normalized = value.trim().to_ascii_lowercase();
    matches!(normalized.as_str(), "1" | "true" | "yes" | "on")
}

/// Device used when neither an operator nor its net names one.
pub(crate) fn default_device() -> String {
    TENSORNET_DEFAULT_DEVICE
        .get_or_init(|| match env::var("TENSORNET_DEFAULT_DEVICE") {
            Ok(value) if !value.trim().is_empty() => value.trim().to_ascii_lowercase(),
            _ => DEFAULT_DEVICE.to_string(),
        })
        .clone()
}

/// Whether nets require their declared external inputs to exist at creation.
pub(crate) fn strict_external_inputs() -> bool {
    *TENSORNET_STRICT_EXTERNAL_INPUTS.get_or_init(
        || match env::var("TENSORNET_STRICT_EXTERNAL_INPUTS") {
            Ok(value) if !value.trim().is_empty() => parse_bool(&value),
            _ => true,
        },
    )
}
