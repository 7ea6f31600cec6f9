use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

use crate::candidate::Candidate;
use crate::config::EngineConfig;
use crate::question::{QuestionCatalogue, Split};

/// A node of the trained question tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TreeNode {
    /// Residual candidates once splitting stopped
    Leaf { candidates: Vec<Candidate> },

    /// Internal question with one subtree per answer
    #[serde(rename = "node")]
    Branch {
        question: String,
        meta: Split,
        yes: Box<TreeNode>,
        no: Box<TreeNode>,
    },
}

impl TreeNode {
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf { .. })
    }

    /// Walk a transcript of `(question, answer)` pairs from this node.
    ///
    /// Stops at a leaf or at the first question that differs from the stored
    /// one; the node reached is returned as-is.
    #[must_use]
    pub fn navigate<'a, Q>(&'a self, asked: impl IntoIterator<Item = (Q, bool)>) -> &'a TreeNode
    where
        Q: AsRef<str>,
    {
        let mut current = self;
        for (question, answer) in asked {
            match current {
                TreeNode::Leaf { .. } => break,
                TreeNode::Branch {
                    question: stored,
                    yes,
                    no,
                    ..
                } => {
                    if stored != question.as_ref() {
                        break;
                    }
                    current = if answer { yes.as_ref() } else { no.as_ref() };
                }
            }
        }
        current
    }

    fn stats(&self, depth: usize, stats: &mut TreeStats) {
        stats.depth = stats.depth.max(depth);
        match self {
            TreeNode::Leaf { candidates } => {
                stats.leaves += 1;
                stats.largest_leaf = stats.largest_leaf.max(candidates.len());
            }
            TreeNode::Branch { yes, no, .. } => {
                stats.branches += 1;
                yes.stats(depth + 1, stats);
                no.stats(depth + 1, stats);
            }
        }
    }
}

/// Shape summary of a trained tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    pub branches: usize,
    pub leaves: usize,
    pub depth: usize,
    pub largest_leaf: usize,
}

/// Immutable decision tree trained once from a full pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    root: TreeNode,
}

impl DecisionTree {
    /// Train with the given configuration
    pub fn train(pool: &[Candidate], config: &EngineConfig) -> Self {
        let builder = TreeBuilder::new(config);
        let tree = Self {
            root: builder.build(pool, config.max_depth),
        };
        let stats = tree.stats();
        log::info!(
            "Trained question tree over {} candidates: {} questions, {} leaves, depth {}",
            pool.len(),
            stats.branches,
            stats.leaves,
            stats.depth
        );
        tree
    }

    #[must_use]
    pub const fn root(&self) -> &TreeNode {
        &self.root
    }

    #[must_use]
    pub fn navigate<Q: AsRef<str>>(&self, asked: impl IntoIterator<Item = (Q, bool)>) -> &TreeNode {
        self.root.navigate(asked)
    }

    #[must_use]
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        self.root.stats(0, &mut stats);
        stats
    }
}

/// Recursive partitioner behind [`DecisionTree::train`]
#[derive(Debug, Clone, Copy)]
pub struct TreeBuilder {
    catalogue: QuestionCatalogue,
    list_threshold: usize,
}

impl TreeBuilder {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            catalogue: QuestionCatalogue::new(config),
            list_threshold: config.list_threshold,
        }
    }

    /// Partition `pool` with `depth` levels of budget left.
    #[must_use]
    pub fn build(&self, pool: &[Candidate], depth: usize) -> TreeNode {
        if pool.len() <= self.list_threshold || depth == 0 {
            return leaf(pool);
        }

        let split = self.catalogue.best_split(pool);
        if split.is_list() {
            return leaf(pool);
        }

        let (yes, no): (Vec<Candidate>, Vec<Candidate>) =
            pool.iter().cloned().partition(|c| split.matches(c));
        if yes.is_empty() || no.is_empty() {
            return leaf(pool);
        }

        TreeNode::Branch {
            question: split.question(),
            yes: Box::new(self.build(&yes, depth - 1)),
            no: Box::new(self.build(&no, depth - 1)),
            meta: split,
        }
    }
}

fn leaf(pool: &[Candidate]) -> TreeNode {
    TreeNode::Leaf {
        candidates: pool.to_vec(),
    }
}

/// Shared handle to the current tree.
///
/// Readers clone the inner `Arc` and keep a complete tree even if
/// [`SharedTree::replace`] installs a new one meanwhile.
#[derive(Debug, Default)]
pub struct SharedTree {
    current: RwLock<Option<Arc<DecisionTree>>>,
}

impl SharedTree {
    #[must_use]
    pub fn new(tree: Option<DecisionTree>) -> Self {
        Self {
            current: RwLock::new(tree.map(Arc::new)),
        }
    }

    /// Snapshot of the installed tree, if any
    #[must_use]
    pub fn load(&self) -> Option<Arc<DecisionTree>> {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Install `tree`, returning the previous one
    pub fn replace(&self, tree: Option<DecisionTree>) -> Option<Arc<DecisionTree>> {
        let next = tree.map(Arc::new);
        match self.current.write() {
            Ok(mut guard) => std::mem::replace(&mut *guard, next),
            Err(poisoned) => std::mem::replace(&mut *poisoned.into_inner(), next),
        }
    }
}
