//! Extractor for the per-session [`Visitor`].
//!
//! Handlers take a [`VisitorSession`], mutate `visitor` and call
//! [`VisitorSession::save`] before responding.

use axum::{extract::FromRequestParts, http::request::Parts};
use localazy_core::UserKind;
use localazy_core::user::User;
use localazy_core::visitor::Visitor;
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::{Flash, Layout, session_keys};

/// The visitor loaded from the session, plus the session to write it back.
pub struct VisitorSession {
    session: Session,
    pub visitor: Visitor,
}

impl<S> FromRequestParts<S> for VisitorSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        let visitor = session
            .get::<Visitor>(session_keys::VISITOR)
            .await?
            .unwrap_or_default();

        Ok(Self { session, visitor })
    }
}

impl VisitorSession {
    /// Persist `visitor` back into the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn save(&self) -> Result<(), AppError> {
        self.session
            .insert(session_keys::VISITOR, &self.visitor)
            .await?;
        Ok(())
    }

    /// Write the visitor to the session store now rather than when the
    /// response goes out, so concurrent requests of the same session see it.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn persist(&self) -> Result<(), AppError> {
        self.save().await?;
        self.session.save().await?;
        Ok(())
    }

    /// Re-read the visitor from the session store, picking up changes made
    /// by other requests and dropping unsaved local ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn reload(&mut self) -> Result<(), AppError> {
        self.session.load().await?;
        self.visitor = self
            .session
            .get::<Visitor>(session_keys::VISITOR)
            .await?
            .unwrap_or_default();
        Ok(())
    }

    /// The signed-in user, if it has the given kind.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AuthRequired`] otherwise, which redirects to the
    /// login page for `kind`.
    pub fn require(&self, kind: UserKind) -> Result<&User, AppError> {
        self.visitor
            .user()
            .filter(|user| user.kind == kind)
            .ok_or(AppError::AuthRequired(kind))
    }

    /// Mutable access to the signed-in user of `kind`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::require`].
    pub fn require_mut(&mut self, kind: UserKind) -> Result<&mut User, AppError> {
        self.visitor
            .user_mut()
            .filter(|user| user.kind == kind)
            .ok_or(AppError::AuthRequired(kind))
    }

    /// Queue a message for the next rendered page.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn flash(&self, flash: Flash) -> Result<(), AppError> {
        let mut flashes: Vec<Flash> = self
            .session
            .get(session_keys::FLASH)
            .await?
            .unwrap_or_default();
        flashes.push(flash);
        self.session.insert(session_keys::FLASH, flashes).await?;
        Ok(())
    }

    /// Header data for a full page, consuming pending flash messages.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn layout(&self) -> Result<Layout, AppError> {
        let flashes = self
            .session
            .remove::<Vec<Flash>>(session_keys::FLASH)
            .await?
            .unwrap_or_default();
        Ok(Layout::new(&self.visitor, flashes))
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }
}
