//! # pokerlab_session: Session Registry
//!
//! Holds many independent tables behind one [`SessionManager`]. Each session
//! wraps a [`pokerlab_engine::GameSession`] in its own mutex together with
//! the AI opponents seated at it; after every human action the registry plays
//! AI seats inline until a human is to act again or the hand is over.
//!
//! ```rust
//! use pokerlab_engine::player::ActionKind;
//! use pokerlab_session::{SessionConfig, SessionManager};
//!
//! let manager = SessionManager::new();
//! let id = manager
//!     .create_session(SessionConfig::new(vec!["Alice".into()], 3).with_seed(7))
//!     .unwrap();
//!
//! let state = manager.start_new_hand(&id).unwrap();
//! if state.to_act == Some(0) {
//!     let response = manager.apply_action(&id, 0, ActionKind::Fold, 0).unwrap();
//!     assert!(response.success);
//! }
//! assert_eq!(manager.get_history(&id, 10, 0).unwrap().len(), 1);
//! ```

pub mod errors;
pub mod logging;
pub mod session;
pub mod settings;

pub use errors::{ErrorResponse, ErrorSeverity, IntoErrorResponse};
pub use logging::{init_logging, init_test_logging, LogEntry, TestLogSubscriber};
pub use session::{
    ActionResponse, ManagedSession, SessionConfig, SessionError, SessionId, SessionInfo,
    SessionManager,
};
pub use settings::{SessionSettings, SettingsError};
