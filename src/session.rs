//! Upload/display session state machine
//!
//! Owns one user's photo selection, the single in-flight generation
//! request, and the resulting poem or failure message. Transitions are
//! synchronous; the only awaited operation is the model call itself, driven
//! through [`UploadSession::run_generation`] or the
//! `begin_generation`/`finish_generation` pair.
//!
//! Each request is tagged with an identifier so a result arriving after the
//! photo was replaced mid-flight is discarded instead of overwriting the
//! newer selection.

use crate::ai::PoemService;
use crate::photo::{PhotoDataUri, MAX_PHOTO_BYTES};
use thiserror::Error;
use uuid::Uuid;

/// Observable phase of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Selected,
    Generating,
    Completed,
    Failed,
}

/// User-facing reasons a photo selection was refused.
///
/// A refused selection leaves the session exactly as it was.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("File Too Large: please upload an image smaller than {} MB", .limit_bytes / (1024 * 1024))]
    TooLarge {
        size_bytes: usize,
        limit_bytes: usize,
    },

    #[error("Unsupported file type '{mime_type}': please upload an image")]
    UnsupportedType { mime_type: String },
}

/// A generation request handed to the caller to execute.
///
/// Immutable once issued; the identifier must be passed back to
/// [`UploadSession::finish_generation`] with the outcome.
#[derive(Debug, Clone)]
pub struct PendingGeneration {
    pub request_id: Uuid,
    pub photo: PhotoDataUri,
}

#[derive(Debug)]
enum State {
    Idle,
    Selected {
        photo: PhotoDataUri,
    },
    Generating {
        photo: PhotoDataUri,
        request_id: Uuid,
    },
    Completed {
        photo: PhotoDataUri,
        poem: String,
    },
    Failed {
        photo: PhotoDataUri,
        message: String,
    },
}

pub struct UploadSession {
    state: State,
    max_photo_bytes: usize,
}

impl UploadSession {
    pub fn new() -> Self {
        Self::with_photo_limit(MAX_PHOTO_BYTES)
    }

    pub fn with_photo_limit(max_photo_bytes: usize) -> Self {
        Self {
            state: State::Idle,
            max_photo_bytes,
        }
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            State::Idle => Phase::Idle,
            State::Selected { .. } => Phase::Selected,
            State::Generating { .. } => Phase::Generating,
            State::Completed { .. } => Phase::Completed,
            State::Failed { .. } => Phase::Failed,
        }
    }

    pub fn photo(&self) -> Option<&PhotoDataUri> {
        match &self.state {
            State::Idle => None,
            State::Selected { photo }
            | State::Generating { photo, .. }
            | State::Completed { photo, .. }
            | State::Failed { photo, .. } => Some(photo),
        }
    }

    pub fn poem(&self) -> Option<&str> {
        match &self.state {
            State::Completed { poem, .. } => Some(poem),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            State::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Select a photo, replacing any current selection and discarding any
    /// prior poem or error.
    ///
    /// Refuses photos over the byte limit or without an `image/*` MIME
    /// type; on refusal the session state is unchanged. Selecting while a
    /// request is in flight does not cancel it, but its eventual result
    /// will no longer match the current request and gets discarded.
    pub fn select(&mut self, photo: PhotoDataUri) -> std::result::Result<(), SelectionError> {
        if !photo.is_image() {
            return Err(SelectionError::UnsupportedType {
                mime_type: photo.mime_type().to_string(),
            });
        }

        if photo.decoded_len() > self.max_photo_bytes {
            return Err(SelectionError::TooLarge {
                size_bytes: photo.decoded_len(),
                limit_bytes: self.max_photo_bytes,
            });
        }

        if let State::Generating { request_id, .. } = &self.state {
            tracing::debug!(
                "Photo replaced while request {} is in flight; its result will be discarded",
                request_id
            );
        }

        tracing::info!(
            "Selected photo ({} bytes, {})",
            photo.decoded_len(),
            photo.mime_type()
        );
        self.state = State::Selected { photo };
        Ok(())
    }

    /// Drop the photo and any poem or error, returning to `Idle`.
    pub fn clear(&mut self) {
        self.state = State::Idle;
    }

    /// Start a generation attempt for the selected photo.
    ///
    /// Allowed whenever a photo is present and no request is in flight;
    /// entering the generating phase discards any prior poem or error.
    /// Returns `None` with no side effects when there is no photo or a
    /// request is already outstanding.
    pub fn begin_generation(&mut self) -> Option<PendingGeneration> {
        let photo = match &self.state {
            State::Selected { photo }
            | State::Completed { photo, .. }
            | State::Failed { photo, .. } => photo.clone(),
            State::Idle => {
                tracing::debug!("Ignoring generate with no photo selected");
                return None;
            }
            State::Generating { .. } => {
                tracing::debug!("Ignoring generate while a request is in flight");
                return None;
            }
        };

        let request_id = Uuid::new_v4();
        tracing::info!("Starting poem generation request {}", request_id);
        self.state = State::Generating {
            photo: photo.clone(),
            request_id,
        };

        Some(PendingGeneration { photo, request_id })
    }

    /// Apply the outcome of a generation request.
    ///
    /// The outcome only lands if the session is still generating *that*
    /// request; otherwise it is discarded. Returns whether it was applied.
    pub fn finish_generation(
        &mut self,
        request_id: Uuid,
        outcome: crate::Result<String>,
    ) -> bool {
        let photo = match &self.state {
            State::Generating {
                photo,
                request_id: current,
            } if *current == request_id => photo.clone(),
            _ => {
                tracing::debug!("Discarding stale result for request {}", request_id);
                return false;
            }
        };

        self.state = match outcome {
            Ok(poem) => {
                tracing::info!("Request {} completed", request_id);
                State::Completed { photo, poem }
            }
            Err(e) => {
                tracing::warn!("Request {} failed: {}", request_id, e);
                State::Failed {
                    photo,
                    message: format!("Failed to generate poem: {}", e),
                }
            }
        };
        true
    }

    /// Run one generation attempt against the service and apply its result.
    ///
    /// No-op (current phase returned) when generation cannot start.
    pub async fn run_generation(&mut self, service: &dyn PoemService) -> Phase {
        let Some(pending) = self.begin_generation() else {
            return self.phase();
        };

        let outcome = service.generate_poem(&pending.photo.to_uri()).await;
        self.finish_generation(pending.request_id, outcome);
        self.phase()
    }
}

impl Default for UploadSession {
    fn default() -> Self {
        Self::new()
    }
}
