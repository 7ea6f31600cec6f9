//! Request-level orchestration: restrict, replay, then ask or guess.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::candidate::Candidate;
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::filter::{apply_answer_filter, apply_split};
use crate::guess::{guess_top_candidate, Guess};
use crate::question::{QuestionCatalogue, Split};
use crate::tree::{DecisionTree, TreeNode};

/// One answered question of the transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answered {
    pub question: String,
    pub answer: bool,
}

impl Answered {
    pub fn new(question: impl Into<String>, answer: bool) -> Self {
        Self {
            question: question.into(),
            answer,
        }
    }
}

/// Everything the caller knows about the game so far
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRequest {
    #[serde(default)]
    pub asked: Vec<Answered>,

    /// Restrict the pool to these ids; absent or empty means no restriction
    #[serde(default)]
    pub candidate_ids: Option<Vec<String>>,
}

impl SessionRequest {
    fn transcript(&self) -> impl Iterator<Item = (&str, bool)> {
        self.asked.iter().map(|qa| (qa.question.as_str(), qa.answer))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextQuestion {
    pub question: String,
    pub meta: Split,

    /// Candidates still consistent with the transcript
    pub remaining: usize,
}

/// What a front end returns for a guess
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuessReply {
    pub player_id: String,
    pub full_name: String,
    pub confidence: f64,
}

impl From<Guess> for GuessReply {
    fn from(guess: Guess) -> Self {
        Self {
            player_id: guess.candidate.id,
            full_name: guess.candidate.full_name,
            confidence: guess.confidence,
        }
    }
}

/// Keep candidates whose id is listed. `None` or an empty list keeps all.
#[must_use]
pub fn restrict_to_ids(pool: &[Candidate], ids: Option<&[String]>) -> Vec<Candidate> {
    match ids {
        Some(ids) if !ids.is_empty() => {
            let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
            pool.iter()
                .filter(|c| wanted.contains(c.id.as_str()))
                .cloned()
                .collect()
        }
        _ => pool.to_vec(),
    }
}

/// Apply every transcript answer in order using the text parser
#[must_use]
pub fn replay(pool: &[Candidate], asked: &[Answered]) -> Vec<Candidate> {
    replay_along(pool, asked, None)
}

/// Apply the transcript, filtering by the stored descriptor while it follows
/// the tree from `root`.
///
/// Once an entry differs from the tree's question, that entry and every later
/// one go through the text parser.
#[must_use]
pub fn replay_along(
    pool: &[Candidate],
    asked: &[Answered],
    root: Option<&TreeNode>,
) -> Vec<Candidate> {
    let mut node = root;
    let mut remaining = pool.to_vec();
    for qa in asked {
        match node {
            Some(TreeNode::Branch {
                question,
                meta,
                yes,
                no,
            }) if *question == qa.question => {
                remaining = apply_split(&remaining, meta, qa.answer);
                node = Some(if qa.answer { yes.as_ref() } else { no.as_ref() });
            }
            _ => {
                node = None;
                remaining = apply_answer_filter(&remaining, &qa.question, qa.answer);
            }
        }
    }
    remaining
}

/// Stateless driver shared by every front end
#[derive(Debug, Clone, Default)]
pub struct Session {
    config: EngineConfig,
}

impl Session {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Pool left after id restriction and transcript replay.
    ///
    /// Answers to the tree's own questions are applied with the tree's exact
    /// thresholds, not the rounded numbers in the question text.
    pub fn narrow(
        &self,
        pool: &[Candidate],
        request: &SessionRequest,
        tree: Option<&DecisionTree>,
    ) -> Result<Vec<Candidate>> {
        let restricted = restrict_to_ids(pool, request.candidate_ids.as_deref());
        let root = tree.filter(|_| self.config.use_tree).map(DecisionTree::root);
        let remaining = replay_along(&restricted, &request.asked, root);
        if remaining.is_empty() {
            return Err(EngineError::EmptyPool);
        }
        Ok(remaining)
    }

    /// The next question to ask.
    ///
    /// A tree question is used while the transcript still follows the tree;
    /// otherwise the catalogue picks one for the narrowed pool.
    pub fn next_question(
        &self,
        pool: &[Candidate],
        request: &SessionRequest,
        tree: Option<&DecisionTree>,
    ) -> Result<NextQuestion> {
        let remaining = self.narrow(pool, request, tree)?;

        if let Some(TreeNode::Branch { question, meta, .. }) = self.tree_node(tree, request) {
            return Ok(NextQuestion {
                question: question.clone(),
                meta: meta.clone(),
                remaining: remaining.len(),
            });
        }

        let split = QuestionCatalogue::new(&self.config).best_split(&remaining);
        Ok(NextQuestion {
            question: split.question(),
            meta: split,
            remaining: remaining.len(),
        })
    }

    /// Commit to a best guess.
    ///
    /// When the transcript ends on a tree leaf, the leaf's candidates that
    /// survived replay take precedence, in leaf order.
    pub fn guess(
        &self,
        pool: &[Candidate],
        request: &SessionRequest,
        tree: Option<&DecisionTree>,
    ) -> Result<Guess> {
        let mut remaining = self.narrow(pool, request, tree)?;

        if let Some(TreeNode::Leaf { candidates }) = self.tree_node(tree, request) {
            let alive: HashSet<&str> = remaining.iter().map(|c| c.id.as_str()).collect();
            let in_leaf: Vec<Candidate> = candidates
                .iter()
                .filter(|c| alive.contains(c.id.as_str()))
                .cloned()
                .collect();
            if !in_leaf.is_empty() {
                remaining = in_leaf;
            }
        }

        guess_top_candidate(&remaining)
    }

    fn tree_node<'t>(
        &self,
        tree: Option<&'t DecisionTree>,
        request: &SessionRequest,
    ) -> Option<&'t TreeNode> {
        if !self.config.use_tree {
            return None;
        }
        tree.map(|tree| tree.navigate(request.transcript()))
    }
}
