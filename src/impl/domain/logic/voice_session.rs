use fractic_server_error::ServerError;
use tracing::{debug, info};

use crate::entities::{
    Client, Product, SimilarityScorer, SpeechRecognizer, SpeechResult, VoiceCommand,
};

use super::voice_parser::VoiceCommandParser;

/// Ties a host speech recognizer to the parser. Listening is toggled by the
/// operator; interim hypotheses and anything arriving while stopped are
/// dropped.
pub struct VoiceSession<R, S>
where
    R: SpeechRecognizer,
    S: SimilarityScorer,
{
    recognizer: R,
    parser: VoiceCommandParser<S>,
    listening: bool,
}

impl<R, S> VoiceSession<R, S>
where
    R: SpeechRecognizer,
    S: SimilarityScorer,
{
    pub fn new(recognizer: R, parser: VoiceCommandParser<S>) -> Self {
        Self {
            recognizer,
            parser,
            listening: false,
        }
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Starts or stops listening; returns the new state.
    pub fn toggle(&mut self) -> Result<bool, ServerError> {
        if self.listening {
            self.recognizer.stop();
            self.listening = false;
        } else {
            self.recognizer.start()?;
            self.listening = true;
        }
        info!(listening = self.listening, "voice input toggled");
        Ok(self.listening)
    }

    /// Feed a recognizer result. Returns a command only for final results
    /// received while listening.
    pub fn on_result(
        &self,
        result: &SpeechResult,
        clients: &[Client],
        products: &[Product],
    ) -> Option<VoiceCommand> {
        if !self.listening || !result.is_final {
            debug!(is_final = result.is_final, listening = self.listening, "ignoring speech result");
            return None;
        }
        Some(self.parser.parse(&result.transcript, clients, products))
    }

    pub fn recognizer(&self) -> &R {
        &self.recognizer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{entities::Shift, ext::standard_scorers::TokenEditDistance};

    #[derive(Default)]
    struct FakeRecognizer {
        starts: usize,
        stops: usize,
    }

    impl SpeechRecognizer for FakeRecognizer {
        fn start(&mut self) -> Result<(), ServerError> {
            self.starts += 1;
            Ok(())
        }

        fn stop(&mut self) {
            self.stops += 1;
        }
    }

    fn session() -> VoiceSession<FakeRecognizer, TokenEditDistance> {
        VoiceSession::new(FakeRecognizer::default(), VoiceCommandParser::new())
    }

    #[test]
    fn toggling_drives_the_recognizer() {
        let mut session = session();
        assert!(session.toggle().unwrap());
        assert!(!session.toggle().unwrap());
        assert_eq!(session.recognizer().starts, 1);
        assert_eq!(session.recognizer().stops, 1);
    }

    #[test]
    fn only_final_results_while_listening_are_parsed() {
        let mut session = session();
        let final_result = SpeechResult::final_result("pago 10 tarde");

        assert_eq!(session.on_result(&final_result, &[], &[]), None);

        session.toggle().unwrap();
        assert_eq!(
            session.on_result(&SpeechResult::interim("pago 10"), &[], &[]),
            None
        );
        let command = session.on_result(&final_result, &[], &[]).unwrap();
        assert_eq!(command.payment_amount, Some(10.0));
        assert_eq!(command.shift, Some(Shift::Afternoon));

        session.toggle().unwrap();
        assert_eq!(session.on_result(&final_result, &[], &[]), None);
    }
}
