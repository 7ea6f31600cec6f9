//! # Legend Engine
//!
//! Twenty-questions style guessing over a roster of basketball players.
//!
//! There are no labels saying which question identifies a player best, so
//! questions are scored from the shape of the split they induce alone.
//!
//! ## Architecture
//!
//! ```text
//! Candidate[]
//!     │
//!     ├──> Question Catalogue
//!     │      ├─ list fallback (pool ≤ 5)
//!     │      ├─ team / position / awards / numeric threshold splits
//!     │      └─ balance gain, first maximum wins
//!     │
//!     ├──> Tree Builder (trained once, read-only afterwards)
//!     │
//!     ├──> Session
//!     │      ├─ restrict by id, replay transcript (tree meta, else text → Split)
//!     │      ├─ follow the tree while the transcript matches it
//!     │      └─ otherwise ask the catalogue
//!     │
//!     └──> Guess Heuristic (awards, then points; confidence from pool size)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use legend_engine::{Answered, Candidate, Session, SessionRequest};
//!
//! let pool = vec![
//!     Candidate::new("1", "Ann Lee", "Lakers", "Guard"),
//!     Candidate::new("2", "Bo Diaz", "Celtics", "Forward"),
//! ];
//! let request = SessionRequest {
//!     asked: vec![Answered::new("Is your player on the Lakers?", true)],
//!     candidate_ids: None,
//! };
//!
//! let guess = Session::default().guess(&pool, &request, None).unwrap();
//! assert_eq!(guess.candidate.full_name, "Ann Lee");
//! assert_eq!(guess.confidence, 1.0);
//! ```

mod candidate;
mod config;
mod error;
mod filter;
mod guess;
mod question;
mod scorer;
mod session;
mod tree;

pub use candidate::{normalize_position, Candidate, Conference, Feature};
pub use config::EngineConfig;
pub use error::{EngineError, Result};
pub use filter::{apply_answer_filter, apply_split};
pub use guess::{confidence_for, guess_top_candidate, Guess};
pub use question::{
    choose_best_question, feet_and_inches, PositionBucket, Question, QuestionCatalogue, Split,
};
pub use scorer::{balance_gain, entropy};
pub use session::{
    replay, replay_along, restrict_to_ids, Answered, GuessReply, NextQuestion, Session,
    SessionRequest,
};
pub use tree::{DecisionTree, SharedTree, TreeBuilder, TreeNode, TreeStats};
