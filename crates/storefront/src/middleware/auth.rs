//! Extractors for pages that need a signed-in user of a given kind.
//!
//! Anonymous visitors and users of another kind are redirected to the login
//! page for the required kind.
//!
//! # Example
//!
//! ```rust,ignore
//! async fn dashboard(RequireStore { user, .. }: RequireStore) -> impl IntoResponse {
//!     format!("Hello, {}!", user.name)
//! }
//! ```

use std::marker::PhantomData;

use axum::{extract::FromRequestParts, http::request::Parts};
use localazy_core::UserKind;
use localazy_core::user::User;

use super::visitor::VisitorSession;
use crate::error::AppError;

/// Marker for the user kind a [`SignedIn`] extractor demands.
pub trait RequiredKind {
    const KIND: UserKind;
}

/// Store owners.
pub struct StoreOwner;

impl RequiredKind for StoreOwner {
    const KIND: UserKind = UserKind::Store;
}

/// Delivery partners.
pub struct Courier;

impl RequiredKind for Courier {
    const KIND: UserKind = UserKind::Delivery;
}

/// A visitor signed in as `K`.
///
/// `user` is a snapshot; to change the stored user go through `visit`.
pub struct SignedIn<K> {
    pub visit: VisitorSession,
    pub user: User,
    kind: PhantomData<K>,
}

impl<S, K> FromRequestParts<S> for SignedIn<K>
where
    S: Send + Sync,
    K: RequiredKind,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let visit = VisitorSession::from_request_parts(parts, state).await?;
        let user = visit.require(K::KIND)?.clone();

        Ok(Self {
            visit,
            user,
            kind: PhantomData,
        })
    }
}

/// Extractor for store dashboard pages.
pub type RequireStore = SignedIn<StoreOwner>;

/// Extractor for delivery partner pages.
pub type RequireCourier = SignedIn<Courier>;
