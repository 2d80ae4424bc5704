//! Authenticated identity carried by a token

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Subject recovered from a verified token
///
/// An empty `authorities` set is a valid, verified subject with no roles;
/// "no identity" is represented by the absence of an `Identity` altogether.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    /// Subject identifier
    pub id: String,
    /// Role/permission strings
    pub authorities: BTreeSet<String>,
}

impl Identity {
    pub fn new<I, S>(id: impl Into<String>, authorities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            authorities: authorities.into_iter().map(Into::into).collect(),
        }
    }
}
