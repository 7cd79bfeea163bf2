//! Speech-synthesis collaborator
//!
//! The assistant only forwards composed text and carries back opaque audio
//! bytes; it never inspects their content. [`NullSpeech`] satisfies the
//! contract for deployments without a voice backend.

use crate::error::AssistantError;
use async_trait::async_trait;

/// Narrow interface to a text-to-speech backend
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize audio for the given text. `Ok(None)` means the backend is
    /// present but produced no audio (e.g. voice disabled).
    async fn synthesize(
        &self,
        text: &str,
        voice: &str,
        speed: f32,
    ) -> Result<Option<Vec<u8>>, AssistantError>;
}

/// Null object: always succeeds with no audio
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSpeech;

#[async_trait]
impl SpeechSynthesizer for NullSpeech {
    async fn synthesize(
        &self,
        _text: &str,
        _voice: &str,
        _speed: f32,
    ) -> Result<Option<Vec<u8>>, AssistantError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_null_speech_yields_no_audio() {
        let audio = NullSpeech.synthesize("Olá", "luna", 1.0).await.unwrap();
        assert!(audio.is_none());
    }
}
