//! Session access for handlers: the signed-in user and queued flash notices.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, FlashBuffer, FlashNotice, RequestContext, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const FLASHES_KEY: &str = "flashes";

fn write_failed(error: impl std::fmt::Display) -> Error {
    Error::internal(format!("failed to write session: {error}"))
}

fn read_failed(error: impl std::fmt::Display) -> Error {
    Error::internal(format!("failed to read session: {error}"))
}

/// Handler-facing wrapper around the actix session.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Remember `user_id` as the signed-in user, rotating the session.
    pub fn persist_user(&self, user_id: &UserId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user_id.to_string())
            .map_err(write_failed)
    }

    /// Forget the signed-in user while keeping queued notices.
    pub fn forget_user(&self) {
        self.0.remove(USER_ID_KEY);
        self.0.renew();
    }

    /// The signed-in user, if any. Tampered ids count as signed out.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let Some(raw) = self.0.get::<String>(USER_ID_KEY).map_err(read_failed)? else {
            return Ok(None);
        };
        match UserId::new(raw) {
            Ok(id) => Ok(Some(id)),
            Err(error) => {
                warn!(%error, "invalid user id in session cookie");
                Ok(None)
            }
        }
    }

    /// Context for domain calls made on behalf of this session.
    pub fn request_context(&self) -> Result<RequestContext, Error> {
        self.user_id().map(RequestContext::from)
    }

    /// Append every notice buffered during the request.
    pub fn flush(&self, buffer: &FlashBuffer) -> Result<(), Error> {
        let notices = buffer.drain();
        if notices.is_empty() {
            return Ok(());
        }
        let mut queued = self.queued_flashes()?;
        queued.extend(notices);
        self.0.insert(FLASHES_KEY, queued).map_err(write_failed)
    }

    /// Remove and return every queued notice.
    pub fn take_flashes(&self) -> Result<Vec<FlashNotice>, Error> {
        let queued = self.queued_flashes()?;
        self.0.remove(FLASHES_KEY);
        Ok(queued)
    }

    fn queued_flashes(&self) -> Result<Vec<FlashNotice>, Error> {
        Ok(self
            .0
            .get::<Vec<FlashNotice>>(FLASHES_KEY)
            .map_err(read_failed)?
            .unwrap_or_default())
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
