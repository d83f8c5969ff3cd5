//! Data-driven physics and camera balance
//!
//! Defaults reproduce the shipped feel. A page can override any subset of
//! fields with a `<script id="tuning" type="application/json">` block; native
//! runs read the file named by `CODE_QUEST_TUNING`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player movement (px per tick) ===
    pub walk_speed: f32,
    pub run_speed: f32,
    /// Fraction of the target speed added per tick of held input
    pub acceleration: f32,
    pub jump_force: f32,
    pub gravity: f32,
    /// Horizontal velocity multiplier per tick
    pub friction: f32,

    // === Camera ===
    /// Lerp factor toward the follow target per tick
    pub camera_lerp: f32,
    /// Follow target sits this far below the player centre
    pub camera_offset_y: f32,

    /// RNG seed; `None` draws one from the clock
    pub seed: Option<u64>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            walk_speed: 4.0,
            run_speed: 6.0,
            acceleration: 0.3,
            jump_force: -12.0,
            gravity: 0.6,
            friction: 0.85,

            camera_lerp: 0.08,
            camera_offset_y: 50.0,

            seed: None,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[cfg(target_arch = "wasm32")]
    const ELEMENT_ID: &'static str = "tuning";
    #[cfg(not(target_arch = "wasm32"))]
    const ENV_VAR: &'static str = "CODE_QUEST_TUNING";

    /// Read overrides from the page (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::ELEMENT_ID))
            .and_then(|el| el.text_content());

        match json.map(|j| Self::from_json(&j)) {
            Some(Ok(tuning)) => {
                log::info!("Loaded tuning overrides from page");
                tuning
            }
            Some(Err(e)) => {
                log::warn!("Ignoring malformed tuning block: {}", e);
                Self::default()
            }
            None => Self::default(),
        }
    }

    /// Read overrides from the file named by the environment
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(Self::ENV_VAR) else {
            return Self::default();
        };
        let parsed = std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| Self::from_json(&json).map_err(|e| e.to_string()));
        match parsed {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides from {}", path);
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning file {}: {}", path, e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let t = Tuning::from_json(r#"{ "gravity": 0.4, "seed": 7 }"#).expect("valid json");
        assert_eq!(t.gravity, 0.4);
        assert_eq!(t.seed, Some(7));
        assert_eq!(t.jump_force, -12.0);
        assert_eq!(t.camera_lerp, 0.08);
    }

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(Tuning::from_json("{}").expect("valid json"), Tuning::default());
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(Tuning::from_json("{ gravity: ").is_err());
        assert!(Tuning::from_json(r#"{ "gravity": "heavy" }"#).is_err());
    }
}
