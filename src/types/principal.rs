//! The acting principal for a verification call.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The principal attempting a merge or ref mutation.
///
/// Repository ownership is not a property of the principal; the caller resolves
/// it against the target repository and passes it alongside the verify input.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
pub struct Principal {
    pub id: i64,
    pub uid: String,
    /// Instance-administrator flag. Carries no implicit bypass rights.
    #[serde(default)]
    pub admin: bool,
}

impl Principal {
    pub fn new(id: i64, uid: impl Into<String>) -> Self {
        Principal {
            id,
            uid: uid.into(),
            admin: false,
        }
    }

    pub fn admin(id: i64, uid: impl Into<String>) -> Self {
        Principal {
            id,
            uid: uid.into(),
            admin: true,
        }
    }
}

impl Display for Principal {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, r#"Principal::"{}""#, self.uid)
    }
}
