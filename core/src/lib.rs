//! Client core for the student roster page.
//!
//! # Overview
//! Drives a single-page CRUD interface over the student REST API: a list
//! that is re-fetched after every mutation, a modal creation form, and
//! inline editing of one record at a time.
//!
//! # Design
//! - `StudentClient` builds `HttpRequest`s and parses `HttpResponse`s without
//!   touching the network; a `Transport` performs the round-trip and
//!   `StudentApi` pairs the two.
//! - `RemoteCache` holds the last fetched list per `CacheKey` and is only
//!   refreshed by explicit invalidation.
//! - `StudentStore` is the transient UI state; `StudentPage` owns store,
//!   cache and API and implements the command handlers.
//! - `PageView` is the render model, printed as text or rendered to HTML.

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod html;
pub mod http;
pub mod notify;
pub mod page;
pub mod store;
pub mod transport;
pub mod types;
pub mod view;

pub use api::StudentApi;
pub use cache::{CacheKey, RemoteCache, Snapshot, SubscriptionId};
pub use client::StudentClient;
pub use config::{ApiConfig, ConfigError, Environment};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use notify::{Level, Notification, Notifier};
pub use page::{CommandOutcome, StudentPage};
pub use store::{EditSession, StudentStore};
pub use transport::{Transport, UreqTransport};
pub use types::{Draft, Field, MessageResponse, Student, StudentId, StudentList, StudentPayload};
pub use view::{FormView, PageView, RowMode, RowView, TableView};
