//! The request lifecycle behind the "AI Reply" button.

use crate::control::{BusyGuard, ControlId};
use crate::dom::HostDocument;
use crate::page::Delivery;
use crate::script::ContentScript;
use draftai_api::{ApiError, GeneratedReply, GenerationRequest, ReplyGenerator};
use std::cell::RefCell;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum ReplyError {
    #[error("Email context not detected")]
    MissingContent,

    #[error("Control {0} is already drafting a reply")]
    Busy(ControlId),

    #[error("Control {0} is not mounted")]
    UnknownControl(ControlId),

    #[error(transparent)]
    Generation(#[from] ApiError),
}

/// Something the user must be told about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    MissingContext,
    GenerationFailed,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::MissingContext => {
                "Email context not detected. Please open an email thread first."
            }
            Notice::GenerationFailed => "Failed to generate reply. Please try again.",
        }
    }
}

impl ReplyError {
    /// Busy and unknown controls are swallowed; the user clicked something
    /// that cannot act right now.
    pub fn notice(&self) -> Option<Notice> {
        match self {
            ReplyError::MissingContent => Some(Notice::MissingContext),
            ReplyError::Generation(_) => Some(Notice::GenerationFailed),
            ReplyError::Busy(_) | ReplyError::UnknownControl(_) => None,
        }
    }
}

pub trait Notifier {
    fn notify(&self, notice: Notice);
}

/// A request ready to send. Owns the control's busy state until it settles.
#[derive(Debug)]
pub struct PendingReply {
    guard: BusyGuard,
    request: GenerationRequest,
}

impl PendingReply {
    pub(crate) fn new(guard: BusyGuard, request: GenerationRequest) -> Self {
        Self { guard, request }
    }

    pub fn request(&self) -> &GenerationRequest {
        &self.request
    }

    pub async fn send<G: ReplyGenerator>(self, generator: &G) -> Result<CompletedReply, ReplyError> {
        let PendingReply { guard, request } = self;
        info!(control = %guard.control_id(), tone = %request.tone, "Generating reply");

        match generator.generate(&request).await {
            Ok(reply) => Ok(CompletedReply { guard, reply }),
            Err(e) => {
                error!(control = %guard.control_id(), "Reply generation failed: {}", e);
                Err(e.into())
            }
        }
    }
}

/// A generated reply that has not been delivered yet. The control stays busy
/// until it is.
#[derive(Debug)]
pub struct CompletedReply {
    guard: BusyGuard,
    reply: GeneratedReply,
}

impl CompletedReply {
    pub fn reply(&self) -> &GeneratedReply {
        &self.reply
    }

    pub(crate) fn into_parts(self) -> (BusyGuard, GeneratedReply) {
        (self.guard, self.reply)
    }
}

/// Runs one click of control `id` to completion: extract, generate, insert.
/// The script is only borrowed between awaits, so other events keep flowing
/// while the request is in flight.
pub async fn run_reply<D, G, N>(
    script: &RefCell<ContentScript<D>>,
    id: ControlId,
    generator: &G,
    notifier: &N,
) -> Result<Delivery, ReplyError>
where
    D: HostDocument,
    G: ReplyGenerator,
    N: Notifier,
{
    let result = drive(script, id, generator).await;
    script.borrow_mut().refresh(id);

    if let Err(e) = &result {
        if let Some(notice) = e.notice() {
            notifier.notify(notice);
        }
    }
    result
}

async fn drive<D, G>(
    script: &RefCell<ContentScript<D>>,
    id: ControlId,
    generator: &G,
) -> Result<Delivery, ReplyError>
where
    D: HostDocument,
    G: ReplyGenerator,
{
    let pending = script.borrow_mut().begin_reply(id)?;
    let completed = pending.send(generator).await?;
    let delivery = script.borrow_mut().deliver(completed);
    Ok(delivery)
}
