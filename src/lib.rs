//! # CarConnect Client Core
//!
//! Client-side logic for the CarConnect car research app: search
//! orchestration, bounded history, likes, comparison picks, and the mock
//! sign-in flow. UI layers stay thin by driving everything through
//! [`search::SearchOrchestrator`] and reading state back out.
//!
//! ## Overall Payloads
//!
//! One aggregator endpoint does all the work: `POST /api/fetch-car-details`
//! with `{ "carModel": "...", "userLanguage": "..." }` returns the full
//! [`contract::CarFacts`] record. Every response field is always present,
//! `null` and `[]` mean "nobody knew", never "something broke".
//!
//! ## Flow
//!
//! - User submits a model name, the orchestrator trims it and rejects blanks
//! - One in-flight search at a time, state exposes a loading flag
//! - A successful search becomes the active record and lands in history
//! - History keeps the 10 most recent models, case-insensitive, repeat
//!   searches refresh and move to the front
//! - History entries feed the comparison picks, 2 to 5 models side by side
//! - Likes are a plain set of model names toggled from any card
//!
//! ## Persistence
//!
//! History, likes, and the mock session each persist as one JSON blob
//! behind [`storage::ProfileStore`]. The file-backed store keeps them under
//! the platform config directory; corrupt blobs reset to empty instead of
//! wedging startup. Comparison picks are deliberately ephemeral.

pub mod auth;
pub mod comparison;
pub mod fetch;
pub mod history;
pub mod likes;
pub mod search;
pub mod storage;

pub use auth::{AuthError, AuthProvider, Authenticator, Credentials, MockAuthenticator, Session};
pub use comparison::{ComparisonError, ComparisonSet, ToggleOutcome};
pub use fetch::{FactsFetcher, FetchError, HttpFactsFetcher};
pub use history::{HistoryEntry, SearchHistory, HISTORY_CAP};
pub use likes::LikedModels;
pub use search::SearchOrchestrator;
pub use storage::{JsonFileStore, MemoryStore, ProfileStore, StorageError};
