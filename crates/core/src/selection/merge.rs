//! Join of selection requests.
//!
//! Each field lives in the order `absent < partial < full`. Merging takes the
//! least upper bound field by field, recursing into partial relations, so the
//! result is the same whatever the order or grouping of the operands.

use std::collections::BTreeMap;

use crate::error::{SelectionError, SelectionResult};

use super::{Request, Selection};

/// Join two optional selections of the same field.
///
/// `None` is the absent selection.
pub fn merge(a: Option<&Selection>, b: Option<&Selection>) -> SelectionResult<Option<Selection>> {
    match (a, b) {
        (None, None) => Ok(None),
        (Some(x), None) | (None, Some(x)) => Ok(Some(x.clone())),
        (Some(x), Some(y)) => x.join(y).map(Some),
    }
}

impl Selection {
    /// Least upper bound of two selections.
    pub fn join(&self, other: &Selection) -> SelectionResult<Selection> {
        match (self, other) {
            (Selection::Full, _) | (_, Selection::Full) => Ok(Selection::Full),
            (Selection::Partial(p), Selection::Partial(q)) => p.join(q).map(Selection::Partial),
        }
    }
}

impl Request {
    /// Least upper bound of two requests, pointwise over the union of fields.
    ///
    /// Both requests must have been normalized against the same field set;
    /// a variant field present on one side only is kept as is.
    pub fn join(&self, other: &Request) -> SelectionResult<Request> {
        if self.fields != other.fields {
            return Err(SelectionError::DiscriminatorMismatch {
                left: self.fields,
                right: other.fields,
            });
        }

        let mut selected: BTreeMap<&'static str, Selection> = self.selected.clone();
        for (name, theirs) in &other.selected {
            let joined = match selected.get(name) {
                Some(ours) => ours.join(theirs)?,
                None => theirs.clone(),
            };
            selected.insert(*name, joined);
        }

        Ok(Request {
            fields: self.fields,
            selected,
        })
    }
}
