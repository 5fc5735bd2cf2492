use std::cell::Cell;

use crate::bootstrap::{self, Bootstrap, SessionSeed};
use crate::config::Config;
use crate::drawing::pointer::{PointerEvent, Viewport};
use crate::drawing::surface::DrawingSurface;
use crate::gateway::client::RequestKind;
use crate::gateway::{Gateway, GatewayReply, GatewayRequest, GatewayResponse, Ticket};
use crate::practice::charset::CharacterSet;
use crate::practice::controller::EMPTY_SEQUENCE_MESSAGE;
use crate::practice::{PracticeController, PracticeError, SequenceKind};
use crate::speech::Speaker;
use crate::store::session_store::SessionStore;
use crate::ui::theme::Theme;

pub const SELECT_PLACEHOLDER: &str = "Select";
pub const INVALID_LANGUAGE_MESSAGE: &str = "Must select a valid language from the dropdown";
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load characters. Please try again.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Home,
    Practice,
    About,
    Contact,
}

/// Language picker state. Index 0 is the "Select" placeholder.
#[derive(Debug, Default)]
pub struct HomeState {
    pub selected: usize,
    pub error: Option<String>,
    pub loading: bool,
    epoch: u64,
    requested: Option<String>,
}

pub struct App<G: Gateway + Clone, S: Speaker> {
    pub screen: AppScreen,
    pub config: Config,
    pub theme: &'static Theme,
    pub home: HomeState,
    pub practice: Option<PracticeController<G, S>>,
    /// Blocking message; any key dismisses it.
    pub alert: Option<String>,
    /// Transient one-line note shown in the practice footer.
    pub status: Option<String>,
    /// Where the canvas was last drawn, filled in during render.
    pub canvas: Cell<Option<Viewport>>,
    pub should_quit: bool,
    store: Option<SessionStore>,
    gateway: G,
    speaker: Option<S>,
}

impl<G: Gateway + Clone, S: Speaker> App<G, S> {
    pub fn new(
        config: Config,
        theme: &'static Theme,
        store: Option<SessionStore>,
        gateway: G,
        speaker: S,
    ) -> Self {
        Self {
            screen: AppScreen::Home,
            config,
            theme,
            home: HomeState::default(),
            practice: None,
            alert: None,
            status: None,
            canvas: Cell::new(None),
            should_quit: false,
            store,
            gateway,
            speaker: Some(speaker),
        }
    }

    pub fn language_options(&self) -> Vec<&str> {
        std::iter::once(SELECT_PLACEHOLDER)
            .chain(self.config.languages.iter().map(String::as_str))
            .collect()
    }

    /// The chosen language, or `None` while the placeholder is selected.
    pub fn selected_language(&self) -> Option<&str> {
        match self.home.selected {
            0 => None,
            i => self.config.languages.get(i - 1).map(String::as_str),
        }
    }

    pub fn select_next(&mut self) {
        let len = self.config.languages.len() + 1;
        self.home.selected = (self.home.selected + 1) % len;
        self.home.error = None;
    }

    pub fn select_prev(&mut self) {
        let len = self.config.languages.len() + 1;
        self.home.selected = (self.home.selected + len - 1) % len;
        self.home.error = None;
    }

    /// Fetch the character set for the selected language.
    pub fn proceed_from_home(&mut self) {
        if self.home.loading {
            return;
        }
        let Some(language) = self.selected_language().map(str::to_string) else {
            self.home.error = Some(INVALID_LANGUAGE_MESSAGE.to_string());
            return;
        };
        self.home.error = None;
        self.home.loading = true;
        self.home.epoch += 1;
        self.home.requested = Some(language.clone());
        log::info!("loading characters for {language}");
        let request = GatewayRequest::Characters { language };
        self.gateway.submit(request.ticket(self.home.epoch), request);
    }

    fn on_characters(&mut self, ticket: Ticket, response: GatewayResponse) {
        if ticket.epoch != self.home.epoch || !self.home.loading {
            log::debug!("dropping stale character set (epoch {})", ticket.epoch);
            return;
        }
        self.home.loading = false;
        let GatewayResponse::Characters(result) = response else {
            return;
        };
        let charset = match result {
            Ok(charset) => charset,
            Err(e) => {
                log::error!("failed to load characters: {e}");
                self.home.error = Some(LOAD_FAILED_MESSAGE.to_string());
                return;
            }
        };
        let Some(language) = self.home.requested.take() else {
            return;
        };
        match self.persist_selection(&language, &charset) {
            Ok(()) => self.start_practice(),
            Err(e) => {
                log::warn!("session storage unavailable, continuing in memory: {e}");
                self.enter_practice(SessionSeed { language, charset });
            }
        }
    }

    fn persist_selection(&self, language: &str, charset: &CharacterSet) -> anyhow::Result<()> {
        let store = self
            .store
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("no session store"))?;
        store.save_selection(language, charset)
    }

    /// Open the practice screen from whatever selection is stored, or fall
    /// back to Home when there is none.
    pub fn start_practice(&mut self) {
        if self.home.loading {
            log::debug!("character set still loading, not resuming");
            return;
        }
        let outcome = match self.store {
            Some(ref store) => bootstrap::load(store),
            None => Bootstrap::Redirect,
        };
        match outcome {
            Bootstrap::Ready(seed) => self.enter_practice(seed),
            Bootstrap::Redirect => self.go_home(),
        }
    }

    fn enter_practice(&mut self, seed: SessionSeed) {
        let surface = match DrawingSurface::new(self.config.canvas_size, self.config.stroke_width) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("{e}");
                self.home.error = Some(e.to_string());
                return;
            }
        };
        if let Some(previous) = self.practice.take() {
            self.speaker = Some(previous.into_speaker());
        }
        let Some(speaker) = self.speaker.take() else {
            log::error!("speaker already in use");
            return;
        };
        // any character set still in flight is for a superseded choice
        self.home.loading = false;
        self.home.requested = None;
        self.home.epoch += 1;
        log::info!("practicing {}", seed.language);
        self.practice = Some(PracticeController::new(
            seed,
            surface,
            self.gateway.clone(),
            speaker,
        ));
        self.status = None;
        self.screen = AppScreen::Practice;
    }

    pub fn go_home(&mut self) {
        if let Some(practice) = self.practice.take() {
            self.speaker = Some(practice.into_speaker());
        }
        self.canvas.set(None);
        self.status = None;
        self.home.loading = false;
        self.screen = AppScreen::Home;
    }

    pub fn go_to_about(&mut self) {
        self.screen = AppScreen::About;
    }

    pub fn go_to_contact(&mut self) {
        self.screen = AppScreen::Contact;
    }

    pub fn choose_mode(&mut self, kind: SequenceKind) {
        let Some(ref mut practice) = self.practice else {
            return;
        };
        if let Err(PracticeError::EmptySequence) = practice.enter_mode(kind) {
            self.alert = Some(EMPTY_SEQUENCE_MESSAGE.to_string());
        }
        self.status = None;
    }

    pub fn dismiss_alert(&mut self) -> bool {
        self.alert.take().is_some()
    }

    pub fn check_drawing(&mut self) {
        if let Some(ref mut practice) = self.practice {
            let result = practice.check_drawing();
            self.status = Self::status_for(result);
        }
    }

    pub fn clear_canvas(&mut self) {
        if let Some(ref mut practice) = self.practice {
            let result = practice.clear_canvas();
            self.status = Self::status_for(result);
        }
    }

    pub fn request_hint(&mut self) {
        if let Some(ref mut practice) = self.practice {
            let result = practice.request_hint();
            self.status = Self::status_for(result);
        }
    }

    fn status_for(result: Result<(), PracticeError>) -> Option<String> {
        match result {
            Ok(()) | Err(PracticeError::Busy(_)) | Err(PracticeError::NotPracticing) => None,
            Err(e) => {
                log::warn!("{e}");
                Some(e.to_string())
            }
        }
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) {
        let (Some(practice), Some(viewport)) = (self.practice.as_mut(), self.canvas.get()) else {
            return;
        };
        practice.handle_pointer(event, &viewport);
    }

    pub fn handle_reply(&mut self, reply: GatewayReply) {
        match reply.ticket.kind {
            RequestKind::Characters => self.on_characters(reply.ticket, reply.response),
            RequestKind::Check | RequestKind::Coach => match self.practice {
                Some(ref mut practice) => {
                    practice.apply_reply(reply);
                }
                None => log::debug!("no practice session for {:?} reply", reply.ticket.kind),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use tempfile::TempDir;

    use super::*;
    use crate::gateway::GatewayError;
    use crate::practice::PracticeMode;
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

    #[derive(Default)]
    struct MuteSpeaker;

    impl Speaker for MuteSpeaker {
        fn speak(&mut self, _text: &str, _language: &str) {}
    }

    fn theme() -> &'static Theme {
        Box::leak(Box::new(Theme::default()))
    }

    fn app() -> (TempDir, App<RecordingGateway, MuteSpeaker>, RecordingGateway) {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        let gateway = RecordingGateway::default();
        let mut config = Config::default();
        config.canvas_size = 64;
        let app = App::new(config, theme(), Some(store), gateway.clone(), MuteSpeaker);
        (dir, app, gateway)
    }

    fn english() -> CharacterSet {
        CharacterSet {
            alphabets: Alphabets {
                general: Some(vec!["a".to_string(), "b".to_string()]),
                ..Alphabets::default()
            },
            digits: Vec::new(),
        }
    }

    fn reply_with(
        gateway: &RecordingGateway,
        result: Result<CharacterSet, GatewayError>,
    ) -> GatewayReply {
        let ticket = gateway.sent.borrow().last().unwrap().0;
        GatewayReply {
            ticket,
            response: GatewayResponse::Characters(result),
        }
    }

    #[test]
    fn test_placeholder_blocks_request() {
        let (_dir, mut app, gateway) = app();
        assert_eq!(app.language_options()[0], SELECT_PLACEHOLDER);
        app.proceed_from_home();
        assert_eq!(app.home.error.as_deref(), Some(INVALID_LANGUAGE_MESSAGE));
        assert!(gateway.sent.borrow().is_empty());
        assert_eq!(app.screen, AppScreen::Home);
    }

    #[test]
    fn test_selection_wraps() {
        let (_dir, mut app, _) = app();
        app.select_prev();
        assert_eq!(app.selected_language(), Some("Nepali"));
        app.select_next();
        assert_eq!(app.selected_language(), None);
        app.select_next();
        assert_eq!(app.selected_language(), Some("English"));
    }

    #[test]
    fn test_loaded_characters_open_practice() {
        let (dir, mut app, gateway) = app();
        app.select_next();
        app.proceed_from_home();
        assert!(app.home.loading);
        match gateway.sent.borrow().last() {
            Some((_, GatewayRequest::Characters { language })) => assert_eq!(language, "English"),
            other => panic!("unexpected request {other:?}"),
        }

        app.handle_reply(reply_with(&gateway, Ok(english())));
        assert_eq!(app.screen, AppScreen::Practice);
        assert!(dir.path().join("chalk_language.json").exists());
        let practice = app.practice.as_ref().unwrap();
        assert_eq!(practice.language(), "English");
        assert_eq!(practice.mode(), PracticeMode::SelectingMode);
    }

    #[test]
    fn test_failed_load_stays_home() {
        let (_dir, mut app, gateway) = app();
        app.select_next();
        app.proceed_from_home();
        app.handle_reply(reply_with(&gateway, Err(GatewayError::Status(500))));
        assert_eq!(app.screen, AppScreen::Home);
        assert_eq!(app.home.error.as_deref(), Some(LOAD_FAILED_MESSAGE));
        assert!(!app.home.loading);
    }

    #[test]
    fn test_practice_without_stored_selection_redirects() {
        let (_dir, mut app, _) = app();
        app.start_practice();
        assert_eq!(app.screen, AppScreen::Home);
        assert!(app.practice.is_none());
    }

    #[test]
    fn test_empty_mode_raises_alert() {
        let (_dir, mut app, gateway) = app();
        app.select_next();
        app.proceed_from_home();
        app.handle_reply(reply_with(&gateway, Ok(english())));
        app.choose_mode(SequenceKind::Numbers);
        assert_eq!(app.alert.as_deref(), Some(EMPTY_SEQUENCE_MESSAGE));
        assert!(app.dismiss_alert());
        assert_eq!(
            app.practice.as_ref().unwrap().mode(),
            PracticeMode::SelectingMode
        );
    }

    #[test]
    fn test_resume_is_ignored_while_loading() {
        let (_dir, mut app, gateway) = app();
        app.select_next();
        app.proceed_from_home();
        app.handle_reply(reply_with(&gateway, Ok(english())));
        app.go_home();

        // pick French, then try to resume before its characters arrive
        app.select_next();
        assert_eq!(app.selected_language(), Some("French"));
        app.proceed_from_home();
        app.start_practice();
        assert_eq!(app.screen, AppScreen::Home);
        assert!(app.practice.is_none());

        app.handle_reply(reply_with(&gateway, Ok(english())));
        assert_eq!(app.screen, AppScreen::Practice);
        assert_eq!(app.practice.as_ref().unwrap().language(), "French");
        assert!(!app.home.loading);
    }

    #[test]
    fn test_entering_practice_fences_pending_fetch() {
        let (_dir, mut app, gateway) = app();
        app.select_next();
        app.proceed_from_home();
        let first = reply_with(&gateway, Ok(english()));
        app.handle_reply(first);
        app.go_home();

        app.select_next();
        app.proceed_from_home();
        let late = reply_with(&gateway, Ok(english()));
        // practice opened by some other path before the reply landed
        app.enter_practice(SessionSeed {
            language: "English".to_string(),
            charset: english(),
        });
        assert!(!app.home.loading);
        app.handle_reply(late);
        assert_eq!(app.practice.as_ref().unwrap().language(), "English");

        // replacing a live session hands its speaker back instead of failing
        app.enter_practice(SessionSeed {
            language: "Spanish".to_string(),
            charset: english(),
        });
        assert_eq!(app.practice.as_ref().unwrap().language(), "Spanish");
    }

    #[test]
    fn test_going_home_and_back_reuses_speaker() {
        let (_dir, mut app, gateway) = app();
        app.select_next();
        app.proceed_from_home();
        app.handle_reply(reply_with(&gateway, Ok(english())));
        app.go_home();
        assert!(app.practice.is_none());
        app.start_practice();
        assert_eq!(app.screen, AppScreen::Practice);
    }
}
