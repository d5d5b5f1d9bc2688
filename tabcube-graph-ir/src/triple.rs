use crate::Term;
use serde::{Deserialize, Serialize};

/// A subject/predicate/object statement
///
/// `list_index` is set for members of a JSON-LD `@list`: the statement
/// `(s, p, o)` is the `list_index`-th element of the list held by `(s, p)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Triple {
    pub s: Term,
    pub p: Term,
    pub list_index: Option<i32>,
    pub o: Term,
}

impl Triple {
    pub fn new(s: Term, p: Term, o: Term) -> Self {
        Self {
            s,
            p,
            list_index: None,
            o,
        }
    }

    pub fn with_list_index(s: Term, p: Term, o: Term, index: i32) -> Self {
        Self {
            s,
            p,
            list_index: Some(index),
            o,
        }
    }

    pub fn is_list_element(&self) -> bool {
        self.list_index.is_some()
    }
}

impl std::fmt::Display for Triple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {} .", self.s, self.p, self.o)
    }
}
