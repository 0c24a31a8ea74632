//! Conversation Domain
//!
//! Language-learning dialogue scripts. A [`Conversation`] belongs to one user
//! and is categorized by [`Level`], course and lesson; its [`Sentence`]s are
//! attributed either to one of two speakers or to the narrator.
//!
//! # Examples
//!
//! ```rust
//! use domain_conversation::{NewConversationForm, Level};
//!
//! let form = NewConversationForm {
//!     level: Some("A1".to_string()),
//!     course: Some("2".to_string()),
//!     lesson: Some("14".to_string()),
//! };
//!
//! let request = form.validate().expect("valid form");
//! assert_eq!(request.level, Level::A1);
//! ```

pub mod conversation;
pub mod sentence;
pub mod error;
pub mod validation;
pub mod ports;

pub use conversation::{Conversation, ConversationSummary, Level, NewConversation};
pub use sentence::{NewSentence, Sentence, SpeakerType, MAX_POSITION};
pub use error::ConversationError;
pub use validation::{FieldErrors, NewConversationForm, NewSentenceForm};
pub use ports::ConversationPort;
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::MockConversationPort;
