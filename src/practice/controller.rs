use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::bootstrap::SessionSeed;
use crate::drawing::pointer::{self, PointerEvent, Viewport};
use crate::drawing::surface::DrawingSurface;
use crate::gateway::client::RequestKind;
use crate::gateway::{CheckResult, Gateway, GatewayReply, GatewayRequest, GatewayResponse};
use crate::practice::attempt::{Attempt, AttemptHistory};
use crate::practice::charset::CharacterSet;
use crate::speech::Speaker;

pub const PRACTICE_FIRST_MESSAGE: &str =
    "Practice a few characters first so I can see how you're doing!";
pub const HINT_UNAVAILABLE_MESSAGE: &str = "Sorry, I couldn't generate a hint right now.";
pub const CHECK_FAILED_MESSAGE: &str = "Error checking character.";
pub const EMPTY_SEQUENCE_MESSAGE: &str = "No characters found for this mode.";

const SUCCESS_PREFIX: &str = "Correct! ";
const RETRY_PREFIX: &str = "Try again. ";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequenceKind {
    Letters,
    Numbers,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PracticeMode {
    SelectingMode,
    PracticingLetters,
    PracticingNumbers,
}

impl PracticeMode {
    pub fn title(self) -> &'static str {
        match self {
            PracticeMode::SelectingMode => "Choose a mode",
            PracticeMode::PracticingLetters => "Letters",
            PracticeMode::PracticingNumbers => "Numbers",
        }
    }
}

impl From<SequenceKind> for PracticeMode {
    fn from(kind: SequenceKind) -> Self {
        match kind {
            SequenceKind::Letters => PracticeMode::PracticingLetters,
            SequenceKind::Numbers => PracticeMode::PracticingNumbers,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PracticeError {
    #[error("no characters found for this mode")]
    EmptySequence,
    #[error("no character is being practiced")]
    NotPracticing,
    #[error("a {0:?} request is already in flight")]
    Busy(RequestKind),
    #[error("could not capture the drawing: {0}")]
    Capture(String),
}

/// The outcome of the last check, with the exact sentence that was spoken
/// for it so it can be replayed verbatim.
#[derive(Clone, Debug, PartialEq)]
pub struct Feedback {
    pub result: CheckResult,
    pub announcement: String,
}

/// Mode selection, circular navigation over a character sequence, attempt
/// history and coaching for one language.
///
/// Every change of character or mode bumps `epoch`. Requests carry the
/// epoch they were issued under and replies from an older epoch are
/// dropped, so a slow check for one character can never land on another.
pub struct PracticeController<G: Gateway, S: Speaker> {
    language: String,
    charset: CharacterSet,
    letter_label: Option<String>,
    digit_label: Option<String>,
    mode: PracticeMode,
    sequence: Vec<String>,
    index: usize,
    history: AttemptHistory,
    hint: Option<String>,
    feedback: Option<Feedback>,
    surface: DrawingSurface,
    epoch: u64,
    pending_check: Option<u64>,
    pending_hint: Option<u64>,
    captured_at: Option<DateTime<Utc>>,
    gateway: G,
    speaker: S,
}

impl<G: Gateway, S: Speaker> PracticeController<G, S> {
    /// Start in mode selection for a bootstrapped session.
    pub fn new(seed: SessionSeed, surface: DrawingSurface, gateway: G, speaker: S) -> Self {
        let letter_label = seed.letter_label();
        let digit_label = seed.digit_label();
        let SessionSeed { language, charset } = seed;
        Self {
            language,
            charset,
            letter_label,
            digit_label,
            mode: PracticeMode::SelectingMode,
            sequence: Vec::new(),
            index: 0,
            history: AttemptHistory::default(),
            hint: None,
            feedback: None,
            surface,
            epoch: 0,
            pending_check: None,
            pending_hint: None,
            captured_at: None,
            gateway,
            speaker,
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn mode(&self) -> PracticeMode {
        self.mode
    }

    pub fn is_practicing(&self) -> bool {
        self.mode != PracticeMode::SelectingMode
    }

    pub fn letter_label(&self) -> Option<&str> {
        self.letter_label.as_deref()
    }

    pub fn digit_label(&self) -> Option<&str> {
        self.digit_label.as_deref()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn sequence_len(&self) -> usize {
        self.sequence.len()
    }

    pub fn current_character(&self) -> Option<&str> {
        if !self.is_practicing() {
            return None;
        }
        self.sequence.get(self.index).map(String::as_str)
    }

    pub fn history(&self) -> &AttemptHistory {
        &self.history
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    pub fn surface(&self) -> &DrawingSurface {
        &self.surface
    }

    pub fn is_checking(&self) -> bool {
        self.pending_check == Some(self.epoch)
    }

    pub fn is_hinting(&self) -> bool {
        self.pending_hint == Some(self.epoch)
    }

    /// End the session and hand the speaker back to the caller.
    pub fn into_speaker(self) -> S {
        self.speaker
    }

    /// A new character is on screen: fresh canvas, no hint, no feedback.
    fn character_changed(&mut self) {
        self.epoch += 1;
        self.hint = None;
        self.feedback = None;
        self.captured_at = None;
        self.surface.reset();
    }

    pub fn enter_mode(&mut self, kind: SequenceKind) -> Result<(), PracticeError> {
        let sequence = match kind {
            SequenceKind::Letters => self.charset.letters(),
            SequenceKind::Numbers => self.charset.digits(),
        };
        if sequence.is_empty() {
            log::info!("{kind:?} sequence is empty for {}", self.language);
            return Err(PracticeError::EmptySequence);
        }
        self.sequence = sequence;
        self.index = 0;
        self.mode = kind.into();
        self.history.clear();
        self.character_changed();
        Ok(())
    }

    pub fn advance(&mut self) {
        if !self.is_practicing() || self.sequence.is_empty() {
            return;
        }
        self.index = (self.index + 1) % self.sequence.len();
        self.character_changed();
    }

    pub fn retreat(&mut self) {
        if !self.is_practicing() || self.sequence.is_empty() {
            return;
        }
        let len = self.sequence.len();
        self.index = (self.index + len - 1) % len;
        self.character_changed();
    }

    pub fn exit_to_selection(&mut self) {
        self.mode = PracticeMode::SelectingMode;
        self.sequence.clear();
        self.index = 0;
        self.history.clear();
        self.character_changed();
    }

    /// Wipe the drawing. Refused while a check of it is outstanding.
    pub fn clear_canvas(&mut self) -> Result<(), PracticeError> {
        if self.is_checking() {
            return Err(PracticeError::Busy(RequestKind::Check));
        }
        self.surface.reset();
        self.feedback = None;
        Ok(())
    }

    pub fn handle_pointer(&mut self, event: PointerEvent, viewport: &Viewport) {
        if self.is_practicing() {
            pointer::apply(&mut self.surface, viewport, event);
        }
    }

    /// Send the current drawing off for matching against the current character.
    pub fn check_drawing(&mut self) -> Result<(), PracticeError> {
        let expected_char = self
            .current_character()
            .ok_or(PracticeError::NotPracticing)?
            .to_string();
        if self.is_checking() {
            return Err(PracticeError::Busy(RequestKind::Check));
        }
        let image = self
            .surface
            .export_image()
            .map_err(|e| PracticeError::Capture(e.to_string()))?;
        self.captured_at = Some(Utc::now());
        self.pending_check = Some(self.epoch);
        let request = GatewayRequest::Check {
            image,
            expected_char,
            language: self.language.clone(),
        };
        self.gateway.submit(request.ticket(self.epoch), request);
        Ok(())
    }

    /// Append an attempt for the current character and announce the result.
    pub fn record_attempt(&mut self, result: &CheckResult) -> Result<(), PracticeError> {
        let character = self
            .current_character()
            .ok_or(PracticeError::NotPracticing)?
            .to_string();
        let timestamp = self.captured_at.take().unwrap_or_else(Utc::now);
        self.history.push(Attempt {
            character,
            is_match: result.is_match,
            feedback: result.feedback.clone(),
            timestamp,
        });
        let prefix = if result.is_match {
            SUCCESS_PREFIX
        } else {
            RETRY_PREFIX
        };
        let announcement = format!("{prefix}{}", result.feedback);
        self.speaker.speak(&announcement, &self.language);
        self.feedback = Some(Feedback {
            result: result.clone(),
            announcement,
        });
        Ok(())
    }

    pub fn request_hint(&mut self) -> Result<(), PracticeError> {
        if self.is_hinting() {
            return Err(PracticeError::Busy(RequestKind::Coach));
        }
        if self.history.is_empty() {
            self.set_hint(PRACTICE_FIRST_MESSAGE.to_string());
            return Ok(());
        }
        self.pending_hint = Some(self.epoch);
        let request = GatewayRequest::Coach {
            history: self.history.as_slice().to_vec(),
            language: self.language.clone(),
        };
        self.gateway.submit(request.ticket(self.epoch), request);
        Ok(())
    }

    fn set_hint(&mut self, hint: String) {
        self.speaker.speak(&hint, &self.language);
        self.hint = Some(hint);
    }

    /// Apply a gateway reply. Returns false when the reply was stale or not
    /// meant for the practice flow.
    pub fn apply_reply(&mut self, reply: GatewayReply) -> bool {
        let GatewayReply { ticket, response } = reply;
        match ticket.kind {
            RequestKind::Check if self.pending_check == Some(ticket.epoch) => {
                self.pending_check = None;
            }
            RequestKind::Coach if self.pending_hint == Some(ticket.epoch) => {
                self.pending_hint = None;
            }
            _ => {}
        }
        if ticket.epoch != self.epoch {
            log::debug!(
                "dropping stale {:?} reply (epoch {} != {})",
                ticket.kind,
                ticket.epoch,
                self.epoch
            );
            return false;
        }
        match response {
            GatewayResponse::Check(Ok(result)) => {
                if let Err(e) = self.record_attempt(&result) {
                    log::debug!("check reply ignored: {e}");
                    return false;
                }
            }
            GatewayResponse::Check(Err(_)) => {
                self.captured_at = None;
                self.speaker.speak(CHECK_FAILED_MESSAGE, &self.language);
                self.feedback = Some(Feedback {
                    result: CheckResult {
                        is_match: false,
                        feedback: CHECK_FAILED_MESSAGE.to_string(),
                        confidence: 0.0,
                    },
                    announcement: CHECK_FAILED_MESSAGE.to_string(),
                });
            }
            GatewayResponse::Coach(Ok(hint)) => self.set_hint(hint.hint),
            GatewayResponse::Coach(Err(_)) => self.set_hint(HINT_UNAVAILABLE_MESSAGE.to_string()),
            GatewayResponse::Characters(_) => return false,
        }
        true
    }

    pub fn replay_last_feedback(&mut self) {
        if let Some(ref feedback) = self.feedback {
            self.speaker.speak(&feedback.announcement, &self.language);
        }
    }

    pub fn replay_last_hint(&mut self) {
        if let Some(ref hint) = self.hint {
            self.speaker.speak(hint, &self.language);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::gateway::{CoachHint, GatewayError, Ticket};
    use crate::practice::charset::Alphabets;

    #[derive(Clone, Default)]
    struct RecordingGateway {
        sent: Rc<RefCell<Vec<(Ticket, GatewayRequest)>>>,
    }

    impl Gateway for RecordingGateway {
        fn submit(&self, ticket: Ticket, request: GatewayRequest) {
            self.sent.borrow_mut().push((ticket, request));
        }
    }

    #[derive(Clone, Default)]
    struct RecordingSpeaker {
        said: Rc<RefCell<Vec<(String, String)>>>,
    }

    impl Speaker for RecordingSpeaker {
        fn speak(&mut self, text: &str, language: &str) {
            self.said
                .borrow_mut()
                .push((text.to_string(), language.to_string()));
        }
    }

    type Controller = PracticeController<RecordingGateway, RecordingSpeaker>;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn charset(letters: &[&str], digits: &[&str]) -> CharacterSet {
        CharacterSet {
            alphabets: Alphabets {
                general: Some(strings(letters)),
                ..Alphabets::default()
            },
            digits: strings(digits),
        }
    }

    fn controller_with(set: CharacterSet) -> (Controller, RecordingGateway, RecordingSpeaker) {
        let gateway = RecordingGateway::default();
        let speaker = RecordingSpeaker::default();
        let surface = DrawingSurface::new(64, 4.0).unwrap();
        let seed = SessionSeed {
            language: "English".to_string(),
            charset: set,
        };
        let c = PracticeController::new(seed, surface, gateway.clone(), speaker.clone());
        (c, gateway, speaker)
    }

    fn controller() -> (Controller, RecordingGateway, RecordingSpeaker) {
        controller_with(charset(&["a", "b", "c"], &["1", "2"]))
    }

    fn check_reply(epoch: u64, is_match: bool, feedback: &str) -> GatewayReply {
        GatewayReply {
            ticket: Ticket {
                kind: RequestKind::Check,
                epoch,
            },
            response: GatewayResponse::Check(Ok(CheckResult {
                is_match,
                feedback: feedback.to_string(),
                confidence: 0.4,
            })),
        }
    }

    fn last_ticket(gateway: &RecordingGateway) -> Ticket {
        gateway.sent.borrow().last().unwrap().0
    }

    fn last_said(speaker: &RecordingSpeaker) -> String {
        speaker.said.borrow().last().unwrap().0.clone()
    }

    fn check_and_reply(c: &mut Controller, gateway: &RecordingGateway, is_match: bool) {
        c.check_drawing().unwrap();
        let epoch = last_ticket(gateway).epoch;
        assert!(c.apply_reply(check_reply(epoch, is_match, "ok")));
    }

    #[test]
    fn test_starts_in_selection_with_labels() {
        let (c, _, _) = controller();
        assert_eq!(c.mode(), PracticeMode::SelectingMode);
        assert_eq!(c.current_character(), None);
        assert_eq!(c.letter_label(), Some("(a-c)"));
        assert_eq!(c.digit_label(), Some("(1-2)"));
    }

    #[test]
    fn test_letters_navigation_wraps() {
        let (mut c, _, _) = controller();
        c.enter_mode(SequenceKind::Letters).unwrap();
        assert_eq!(c.mode(), PracticeMode::PracticingLetters);
        assert_eq!(c.current_character(), Some("a"));
        c.advance();
        assert_eq!(c.current_character(), Some("b"));
        c.advance();
        assert_eq!(c.current_character(), Some("c"));
        c.advance();
        assert_eq!(c.current_character(), Some("a"));
    }

    #[test]
    fn test_retreat_wraps_backwards() {
        let (mut c, _, _) = controller();
        c.enter_mode(SequenceKind::Numbers).unwrap();
        assert_eq!(c.current_character(), Some("1"));
        c.retreat();
        assert_eq!(c.current_character(), Some("2"));
    }

    #[test]
    fn test_advance_n_times_returns_to_start_and_retreat_inverts() {
        let letters: Vec<String> = (0..7).map(|i| i.to_string()).collect();
        let refs: Vec<&str> = letters.iter().map(String::as_str).collect();
        let (mut c, _, _) = controller_with(charset(&refs, &[]));
        c.enter_mode(SequenceKind::Letters).unwrap();
        for start in 0..7 {
            while c.index() != start {
                c.advance();
            }
            for _ in 0..7 {
                c.advance();
            }
            assert_eq!(c.index(), start);
            c.advance();
            c.retreat();
            assert_eq!(c.index(), start);
        }
    }

    #[test]
    fn test_empty_sequence_never_transitions() {
        let (mut c, gateway, _) = controller_with(charset(&[], &["1"]));
        assert_eq!(
            c.enter_mode(SequenceKind::Letters),
            Err(PracticeError::EmptySequence)
        );
        assert_eq!(c.mode(), PracticeMode::SelectingMode);
        assert!(gateway.sent.borrow().is_empty());

        // and from inside another mode
        c.enter_mode(SequenceKind::Numbers).unwrap();
        assert!(c.enter_mode(SequenceKind::Letters).is_err());
        assert_eq!(c.mode(), PracticeMode::PracticingNumbers);
        assert_eq!(c.current_character(), Some("1"));
    }

    #[test]
    fn test_cased_letters_concatenate() {
        let set = CharacterSet {
            alphabets: Alphabets {
                general: None,
                uppercase: Some(strings(&["A", "B"])),
                lowercase: Some(strings(&["a", "b"])),
            },
            digits: Vec::new(),
        };
        let (mut c, _, _) = controller_with(set);
        c.enter_mode(SequenceKind::Letters).unwrap();
        assert_eq!(c.sequence_len(), 4);
        c.retreat();
        assert_eq!(c.current_character(), Some("b"));
    }

    #[test]
    fn test_failed_match_records_attempt_and_announces_retry() {
        let (mut c, gateway, speaker) = controller();
        c.enter_mode(SequenceKind::Letters).unwrap();
        c.check_drawing().unwrap();
        assert!(c.is_checking());

        let (ticket, request) = gateway.sent.borrow().last().cloned().unwrap();
        match request {
            GatewayRequest::Check {
                image,
                expected_char,
                language,
            } => {
                assert!(image.starts_with("data:image/png;base64,"));
                assert_eq!(expected_char, "a");
                assert_eq!(language, "English");
            }
            other => panic!("unexpected request {other:?}"),
        }

        assert!(c.apply_reply(check_reply(ticket.epoch, false, "too curved")));
        assert!(!c.is_checking());
        assert_eq!(c.history().len(), 1);
        let attempt = c.history().last().unwrap();
        assert_eq!(attempt.character, "a");
        assert!(!attempt.is_match);
        assert_eq!(attempt.feedback, "too curved");
        let said = last_said(&speaker);
        assert!(said.starts_with("Try again."));
        assert!(said.contains("too curved"));
        assert_eq!(c.feedback().unwrap().result.confidence, 0.4);
    }

    #[test]
    fn test_successful_match_announces_correct() {
        let (mut c, gateway, speaker) = controller();
        c.enter_mode(SequenceKind::Letters).unwrap();
        check_and_reply(&mut c, &gateway, true);
        assert_eq!(last_said(&speaker), "Correct! ok");
        assert!(c.history().last().unwrap().is_match);
    }

    #[test]
    fn test_history_is_append_only_until_mode_reset() {
        let (mut c, gateway, _) = controller();
        c.enter_mode(SequenceKind::Letters).unwrap();
        for expected in 1..=3 {
            check_and_reply(&mut c, &gateway, expected % 2 == 0);
            assert_eq!(c.history().len(), expected);
            c.advance();
        }
        assert_eq!(c.history().len(), 3);
        c.exit_to_selection();
        assert!(c.history().is_empty());

        c.enter_mode(SequenceKind::Letters).unwrap();
        check_and_reply(&mut c, &gateway, true);
        c.enter_mode(SequenceKind::Numbers).unwrap();
        assert!(c.history().is_empty());
    }

    #[test]
    fn test_duplicate_check_is_refused() {
        let (mut c, gateway, _) = controller();
        c.enter_mode(SequenceKind::Letters).unwrap();
        c.check_drawing().unwrap();
        assert_eq!(
            c.check_drawing(),
            Err(PracticeError::Busy(RequestKind::Check))
        );
        assert_eq!(gateway.sent.borrow().len(), 1);
    }

    #[test]
    fn test_check_requires_practicing() {
        let (mut c, gateway, _) = controller();
        assert_eq!(c.check_drawing(), Err(PracticeError::NotPracticing));
        assert!(gateway.sent.borrow().is_empty());
    }

    #[test]
    fn test_stale_check_reply_is_dropped() {
        let (mut c, gateway, speaker) = controller();
        c.enter_mode(SequenceKind::Letters).unwrap();
        c.check_drawing().unwrap();
        let stale = last_ticket(&gateway).epoch;
        c.advance();
        assert!(!c.is_checking());

        assert!(!c.apply_reply(check_reply(stale, true, "nice")));
        assert!(c.history().is_empty());
        assert!(c.feedback().is_none());
        assert!(speaker.said.borrow().is_empty());
        assert_eq!(c.current_character(), Some("b"));
    }

    #[test]
    fn test_stale_reply_does_not_release_newer_request() {
        let (mut c, gateway, _) = controller();
        c.enter_mode(SequenceKind::Letters).unwrap();
        c.check_drawing().unwrap();
        let stale = last_ticket(&gateway).epoch;
        c.advance();
        c.check_drawing().unwrap();
        assert!(!c.apply_reply(check_reply(stale, true, "nice")));
        assert!(c.is_checking());
    }

    #[test]
    fn test_check_failure_sets_error_feedback_without_attempt() {
        let (mut c, gateway, speaker) = controller();
        c.enter_mode(SequenceKind::Letters).unwrap();
        c.check_drawing().unwrap();
        let ticket = last_ticket(&gateway);
        assert!(c.apply_reply(GatewayReply {
            ticket,
            response: GatewayResponse::Check(Err(GatewayError::Status(502))),
        }));
        assert!(c.history().is_empty());
        let feedback = c.feedback().unwrap();
        assert!(!feedback.result.is_match);
        assert_eq!(feedback.result.feedback, CHECK_FAILED_MESSAGE);
        assert_eq!(last_said(&speaker), CHECK_FAILED_MESSAGE);
        assert!(!c.is_checking());
    }

    #[test]
    fn test_hint_without_history_is_local() {
        let (mut c, gateway, speaker) = controller();
        c.enter_mode(SequenceKind::Letters).unwrap();
        c.request_hint().unwrap();
        assert!(gateway.sent.borrow().is_empty());
        assert_eq!(c.hint(), Some(PRACTICE_FIRST_MESSAGE));
        assert_eq!(last_said(&speaker), PRACTICE_FIRST_MESSAGE);
    }

    #[test]
    fn test_hint_posts_history_and_speaks_reply() {
        let (mut c, gateway, speaker) = controller();
        c.enter_mode(SequenceKind::Letters).unwrap();
        check_and_reply(&mut c, &gateway, false);
        c.request_hint().unwrap();
        assert!(c.is_hinting());
        assert_eq!(
            c.request_hint(),
            Err(PracticeError::Busy(RequestKind::Coach))
        );

        let (ticket, request) = gateway.sent.borrow().last().cloned().unwrap();
        match request {
            GatewayRequest::Coach { history, language } => {
                assert_eq!(history.len(), 1);
                assert_eq!(language, "English");
            }
            other => panic!("unexpected request {other:?}"),
        }
        assert!(c.apply_reply(GatewayReply {
            ticket,
            response: GatewayResponse::Coach(Ok(CoachHint {
                hint: "Close the loop on your a.".to_string(),
            })),
        }));
        assert_eq!(c.hint(), Some("Close the loop on your a."));
        assert_eq!(last_said(&speaker), "Close the loop on your a.");
        assert!(!c.is_hinting());
    }

    #[test]
    fn test_hint_failure_uses_fallback_and_still_speaks() {
        let (mut c, gateway, speaker) = controller();
        c.enter_mode(SequenceKind::Letters).unwrap();
        check_and_reply(&mut c, &gateway, false);
        c.request_hint().unwrap();
        let ticket = last_ticket(&gateway);
        assert!(c.apply_reply(GatewayReply {
            ticket,
            response: GatewayResponse::Coach(Err(GatewayError::Transport(
                "connection reset".to_string()
            ))),
        }));
        assert_eq!(c.hint(), Some(HINT_UNAVAILABLE_MESSAGE));
        assert_eq!(last_said(&speaker), HINT_UNAVAILABLE_MESSAGE);
    }

    #[test]
    fn test_navigation_clears_hint_and_feedback() {
        let (mut c, gateway, _) = controller();
        c.enter_mode(SequenceKind::Letters).unwrap();
        check_and_reply(&mut c, &gateway, true);
        c.request_hint().unwrap();
        let ticket = last_ticket(&gateway);
        c.apply_reply(GatewayReply {
            ticket,
            response: GatewayResponse::Coach(Ok(CoachHint {
                hint: "keep going".to_string(),
            })),
        });
        assert!(c.hint().is_some());
        assert!(c.feedback().is_some());
        c.advance();
        assert!(c.hint().is_none());
        assert!(c.feedback().is_none());
    }

    #[test]
    fn test_replays_repeat_last_messages_unchanged() {
        let (mut c, gateway, speaker) = controller();
        c.enter_mode(SequenceKind::Letters).unwrap();
        c.replay_last_feedback();
        c.replay_last_hint();
        assert!(speaker.said.borrow().is_empty());

        c.check_drawing().unwrap();
        let epoch = last_ticket(&gateway).epoch;
        c.apply_reply(check_reply(epoch, false, "too curved"));
        c.request_hint().unwrap();
        let ticket = last_ticket(&gateway);
        c.apply_reply(GatewayReply {
            ticket,
            response: GatewayResponse::Coach(Ok(CoachHint {
                hint: "slow down".to_string(),
            })),
        });
        c.replay_last_feedback();
        c.replay_last_hint();
        let said = speaker.said.borrow();
        let n = said.len();
        assert_eq!(said[n - 2].0, "Try again. too curved");
        assert_eq!(said[n - 1].0, "slow down");
        assert_eq!(said[n - 1].1, "English");
    }

    #[test]
    fn test_clear_canvas_resets_surface_and_feedback() {
        let (mut c, gateway, _) = controller();
        c.enter_mode(SequenceKind::Letters).unwrap();
        let viewport = Viewport {
            left: 0,
            top: 0,
            columns: 8,
            rows: 8,
            raster_width: 64,
            raster_height: 64,
        };
        c.handle_pointer(
            PointerEvent {
                kind: crate::drawing::PointerKind::Down,
                column: 1,
                row: 4,
            },
            &viewport,
        );
        c.handle_pointer(
            PointerEvent {
                kind: crate::drawing::PointerKind::Move,
                column: 6,
                row: 4,
            },
            &viewport,
        );
        assert!(!c.surface().is_blank());
        check_and_reply(&mut c, &gateway, true);
        c.clear_canvas().unwrap();
        assert!(c.surface().is_blank());
        assert!(c.feedback().is_none());
        assert_eq!(c.history().len(), 1);
    }

    #[test]
    fn test_clear_refused_while_checking() {
        let (mut c, gateway, _) = controller();
        c.enter_mode(SequenceKind::Letters).unwrap();
        c.check_drawing().unwrap();
        assert_eq!(
            c.clear_canvas(),
            Err(PracticeError::Busy(RequestKind::Check))
        );

        let ticket = last_ticket(&gateway);
        assert_eq!(ticket.kind, RequestKind::Check);
        assert!(c.apply_reply(check_reply(ticket.epoch, false, "too curved")));
        assert_eq!(c.history().len(), 1);
        assert!(c.feedback().is_some());
        c.clear_canvas().unwrap();
        assert!(c.feedback().is_none());
    }

    #[test]
    fn test_character_change_resets_surface() {
        let (mut c, _, _) = controller();
        c.enter_mode(SequenceKind::Letters).unwrap();
        let viewport = Viewport {
            left: 0,
            top: 0,
            columns: 8,
            rows: 8,
            raster_width: 64,
            raster_height: 64,
        };
        for (kind, column) in [
            (crate::drawing::PointerKind::Down, 1),
            (crate::drawing::PointerKind::Move, 6),
        ] {
            c.handle_pointer(
                PointerEvent {
                    kind,
                    column,
                    row: 2,
                },
                &viewport,
            );
        }
        assert!(!c.surface().is_blank());
        c.advance();
        assert!(c.surface().is_blank());
    }
}
