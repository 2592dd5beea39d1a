use serde::{Deserialize, Serialize};

use crate::error::{WidgetError, WidgetResult};

pub const MIN_RATE: f32 = 0.5;
pub const MAX_RATE: f32 = 2.0;
pub const MIN_PITCH: f32 = 0.5;
pub const MAX_PITCH: f32 = 2.0;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SpeechOptions {
    pub rate: f32,
    pub pitch: f32,
}

impl Default for SpeechOptions {
    fn default() -> Self {
        Self {
            rate: 1.0,
            pitch: 1.0,
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UtterancePlan {
    pub text: String,
    pub rate: f32,
    pub pitch: f32,
}

fn clamp_or_default(value: f32, min: f32, max: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        1.0
    }
}

pub fn plan_utterance(text: &str, options: SpeechOptions) -> WidgetResult<UtterancePlan> {
    if text.trim().is_empty() {
        return Err(WidgetError::EmptyInput("text to speak"));
    }
    Ok(UtterancePlan {
        text: text.to_string(),
        rate: clamp_or_default(options.rate, MIN_RATE, MAX_RATE),
        pitch: clamp_or_default(options.pitch, MIN_PITCH, MAX_PITCH),
    })
}

#[cfg(target_arch = "wasm32")]
fn synthesizer() -> WidgetResult<web_sys::SpeechSynthesis> {
    web_sys::window()
        .ok_or(WidgetError::Browser("window"))?
        .speech_synthesis()
        .map_err(|_| WidgetError::Browser("speech synthesis not supported"))
}

/// Queues the utterance with the browser's speech engine.
#[cfg(target_arch = "wasm32")]
pub fn speak(plan: &UtterancePlan) -> WidgetResult<()> {
    let synth = synthesizer()?;
    let utterance = web_sys::SpeechSynthesisUtterance::new_with_text(&plan.text)
        .map_err(|_| WidgetError::Browser("speech synthesis not supported"))?;
    utterance.set_rate(plan.rate);
    utterance.set_pitch(plan.pitch);
    synth.speak(&utterance);
    log::debug!(
        "speaking {} chars at rate {} pitch {}",
        plan.text.len(),
        plan.rate,
        plan.pitch
    );
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
pub fn speak(_plan: &UtterancePlan) -> WidgetResult<()> {
    Err(WidgetError::Browser("speech synthesis not supported"))
}

#[cfg(target_arch = "wasm32")]
pub fn cancel() -> WidgetResult<()> {
    synthesizer()?.cancel();
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
pub fn cancel() -> WidgetResult<()> {
    Err(WidgetError::Browser("speech synthesis not supported"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_normal_speed_and_pitch() {
        let plan = plan_utterance("hello", SpeechOptions::default()).unwrap();
        assert_eq!(plan.rate, 1.0);
        assert_eq!(plan.pitch, 1.0);
    }

    #[test]
    fn rate_and_pitch_are_clamped() {
        let plan = plan_utterance(
            "hello",
            SpeechOptions {
                rate: 5.0,
                pitch: 0.1,
            },
        )
        .unwrap();
        assert_eq!(plan.rate, MAX_RATE);
        assert_eq!(plan.pitch, MIN_PITCH);
        let plan = plan_utterance(
            "hello",
            SpeechOptions {
                rate: f32::NAN,
                pitch: 1.5,
            },
        )
        .unwrap();
        assert_eq!(plan.rate, 1.0);
        assert_eq!(plan.pitch, 1.5);
    }

    #[test]
    fn blank_text_is_rejected() {
        assert_eq!(
            plan_utterance(" \n", SpeechOptions::default()).unwrap_err(),
            WidgetError::EmptyInput("text to speak")
        );
    }

    #[test]
    fn host_has_no_speech_engine() {
        let plan = plan_utterance("hi", SpeechOptions::default()).unwrap();
        assert!(matches!(speak(&plan), Err(WidgetError::Browser(_))));
        assert!(cancel().is_err());
    }
}
