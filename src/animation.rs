//! Best-effort fetch of the decorative header animation descriptor. The
//! fetch happens once at startup, is bounded by a short timeout, and every
//! failure path collapses to `None`; nothing else in the application may
//! depend on the result.

use std::time::Duration;

use serde::Deserialize;

/// Fixed URL of the animation descriptor shown alongside the title.
const ANIMATION_URL: &str =
    "https://lottie.host/embed/0c086a61-5972-4466-a993-8bc269ff2466/xAYCI2YK52.lottie";
/// Upper bound on the whole request. Startup must not stall on a slow host.
const FETCH_TIMEOUT: Duration = Duration::from_secs(3);

/// The subset of the descriptor the header cares about. Unknown fields are
/// ignored during deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct AnimationDescriptor {
    /// Descriptor name, if the document carries one.
    #[serde(default, rename = "nm")]
    pub name: Option<String>,
    /// Declared frame rate. Only used to decide that the descriptor really
    /// is an animation document.
    #[serde(default, rename = "fr")]
    pub frame_rate: Option<f64>,
}

/// Fetch the descriptor, returning `None` on any error including timeout,
/// a non-success status, or a body that is not descriptor JSON. The caller
/// treats `None` as "no animation" and renders a static header.
pub fn fetch_animation() -> Option<AnimationDescriptor> {
    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .ok()?;
    let response = client.get(ANIMATION_URL).send().ok()?;
    if !response.status().is_success() {
        return None;
    }
    response.json().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_parses_from_a_lottie_style_document() {
        let raw = r#"{"v": "5.7.4", "fr": 30, "ip": 0, "op": 120, "nm": "book"}"#;
        let descriptor: AnimationDescriptor = serde_json::from_str(raw).unwrap();
        assert_eq!(descriptor.name.as_deref(), Some("book"));
        assert_eq!(descriptor.frame_rate, Some(30.0));
    }

    #[test]
    fn descriptor_tolerates_missing_fields() {
        let descriptor: AnimationDescriptor = serde_json::from_str("{}").unwrap();
        assert!(descriptor.name.is_none());
        assert!(descriptor.frame_rate.is_none());
    }
}
