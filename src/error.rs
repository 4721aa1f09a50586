//! Error types surfaced by construction and evaluation APIs.

use thiserror::Error;

use crate::variable::{Variable, VariableAssignment};

/// Errors raised while building variables or n-ary nodes.
///
/// These always indicate a caller bug; the engine never retries or papers
/// over a malformed construction. Null operands have no Rust counterpart:
/// constructors take owned values, so the only checks left are the ones the
/// type system cannot express.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    /// A [`Variable`] was given an empty name.
    #[error("variable names must be non-empty")]
    EmptyVariableName,

    /// An n-ary node was given fewer than two operands.
    #[error("{kind} requires at least two operands, got {got}")]
    NotEnoughOperands {
        /// Which node kind rejected the operands.
        kind: &'static str,
        /// How many operands were actually supplied.
        got: usize,
    },
}

/// Evaluation reached a variable with no binding in the assignment.
///
/// Carries the offending variable and a snapshot of the assignment that was
/// searched. This is the one error a caller may legitimately recover from,
/// by binding the variable and evaluating again; the engine itself surfaces
/// the condition once and performs no retry.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("variable `{variable}` has no value in {assignment}")]
pub struct UndefinedVariableError {
    variable: Variable,
    assignment: VariableAssignment,
}

impl UndefinedVariableError {
    pub(crate) fn new(variable: Variable, assignment: VariableAssignment) -> Self {
        Self {
            variable,
            assignment,
        }
    }

    /// The variable that had no binding.
    pub fn variable(&self) -> &Variable {
        &self.variable
    }

    /// The assignment that was searched when the variable came up unbound.
    pub fn assignment(&self) -> &VariableAssignment {
        &self.assignment
    }
}
