//! Wire contracts shared between the kiosk and the recognition backend.
//!
//! The backend is a small HTTP service with four operations. This crate
//! pins down the routes, the multipart field names and the `{message}` /
//! `{error}` reply bodies so that the client and its tests agree on a
//! single definition.
#![allow(missing_docs)]

pub mod forms;
pub mod replies;
pub mod routes;

pub use forms::{ImagePayload, RegisterForm};
pub use replies::{BackendReply, ErrorReply, MessageReply, ReplyBody};
pub use routes::Operation;
