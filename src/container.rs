//! Ordered, kind-unique argument collection.

use crate::argument::{Argument, Kind};
use crate::error::{Error, Result};

/// Holds the arguments of one conversion in insertion order.
///
/// At most one argument per [`Kind`] is admitted; the container does not
/// decide rendering order, that is the build pass's job.
#[derive(Debug, Clone, Default)]
pub struct ArgumentContainer {
    arguments: Vec<Argument>,
}

impl ArgumentContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an argument, rejecting a second argument of the same kind.
    pub fn add(&mut self, argument: Argument) -> Result<()> {
        let kind = argument.kind();
        if self.contains(kind) {
            return Err(Error::DuplicateKind { kind });
        }
        self.arguments.push(argument);
        Ok(())
    }

    pub fn get(&self, kind: Kind) -> Option<&Argument> {
        self.arguments.iter().find(|a| a.kind() == kind)
    }

    pub fn contains(&self, kind: Kind) -> bool {
        self.arguments.iter().any(|a| a.kind() == kind)
    }

    /// True when the container names exactly one source (a plain input or a
    /// concat set, not both) and an output.
    pub fn contains_input_output(&self) -> bool {
        let has_input = self.contains(Kind::Input);
        let has_concat = self.contains(Kind::Concat);
        (has_input ^ has_concat) && self.contains(Kind::Output)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Argument> {
        self.arguments.iter()
    }

    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }
}
