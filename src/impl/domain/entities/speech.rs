use fractic_server_error::ServerError;

/// Host speech-to-text capability (browser, mobile OS, ...). Recognized text
/// is pushed back through `VoiceSession::on_result`.
pub trait SpeechRecognizer: Send {
    fn start(&mut self) -> Result<(), ServerError>;
    fn stop(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechResult {
    pub transcript: String,
    /// Interim hypotheses may still change; only final results are parsed.
    pub is_final: bool,
}

impl SpeechResult {
    pub fn interim(transcript: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
            is_final: false,
        }
    }

    pub fn final_result(transcript: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
            is_final: true,
        }
    }
}
