use std::sync::Arc;
use std::sync::mpsc;
use std::thread;

use crate::event::AppEvent;
use crate::gateway::{Backend, CheckResult, CoachHint, GatewayError};
use crate::practice::attempt::Attempt;
use crate::practice::charset::CharacterSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestKind {
    Characters,
    Check,
    Coach,
}

/// Identifies a submitted request. `epoch` is the issuer's view of the
/// practice position when the request went out; replies from an older
/// epoch are stale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket {
    pub kind: RequestKind,
    pub epoch: u64,
}

#[derive(Clone, Debug)]
pub enum GatewayRequest {
    Characters {
        language: String,
    },
    Check {
        image: String,
        expected_char: String,
        language: String,
    },
    Coach {
        history: Vec<Attempt>,
        language: String,
    },
}

impl GatewayRequest {
    pub fn kind(&self) -> RequestKind {
        match self {
            GatewayRequest::Characters { .. } => RequestKind::Characters,
            GatewayRequest::Check { .. } => RequestKind::Check,
            GatewayRequest::Coach { .. } => RequestKind::Coach,
        }
    }

    /// Ticket for sending this request under `epoch`.
    pub fn ticket(&self, epoch: u64) -> Ticket {
        Ticket {
            kind: self.kind(),
            epoch,
        }
    }
}

#[derive(Debug)]
pub enum GatewayResponse {
    Characters(Result<CharacterSet, GatewayError>),
    Check(Result<CheckResult, GatewayError>),
    Coach(Result<CoachHint, GatewayError>),
}

#[derive(Debug)]
pub struct GatewayReply {
    pub ticket: Ticket,
    pub response: GatewayResponse,
}

/// Non-blocking entry point to the backend. Replies arrive later as
/// `AppEvent::Gateway` on the UI event loop.
pub trait Gateway {
    fn submit(&self, ticket: Ticket, request: GatewayRequest);
}

/// Run one request against the backend on the calling thread.
pub fn execute(backend: &dyn Backend, request: GatewayRequest) -> GatewayResponse {
    match request {
        GatewayRequest::Characters { language } => GatewayResponse::Characters(
            backend
                .fetch_character_set(&language)
                .map(CharacterSet::normalized),
        ),
        GatewayRequest::Check {
            image,
            expected_char,
            language,
        } => GatewayResponse::Check(backend.check_drawing(&image, &expected_char, &language)),
        GatewayRequest::Coach { history, language } => {
            GatewayResponse::Coach(backend.request_coach_hint(&history, &language))
        }
    }
}

#[derive(Clone)]
pub struct GatewayClient {
    backend: Arc<dyn Backend>,
    tx: mpsc::Sender<AppEvent>,
}

impl GatewayClient {
    pub fn new(backend: Arc<dyn Backend>, tx: mpsc::Sender<AppEvent>) -> Self {
        Self { backend, tx }
    }
}

impl Gateway for GatewayClient {
    fn submit(&self, ticket: Ticket, request: GatewayRequest) {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        log::debug!("submitting {:?} request (epoch {})", ticket.kind, ticket.epoch);
        thread::spawn(move || {
            let response = execute(backend.as_ref(), request);
            if let Err(e) = response_error(&response) {
                log::warn!("{:?} request failed: {e}", ticket.kind);
            }
            // The receiver only goes away during shutdown.
            let _ = tx.send(AppEvent::Gateway(GatewayReply { ticket, response }));
        });
    }
}

fn response_error(response: &GatewayResponse) -> Result<(), &GatewayError> {
    match response {
        GatewayResponse::Characters(Err(e))
        | GatewayResponse::Check(Err(e))
        | GatewayResponse::Coach(Err(e)) => Err(e),
        _ => Ok(()),
    }
}
