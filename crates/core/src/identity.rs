// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Who a session belongs to, as shown in join announcements

use std::fmt;

/// Only this many leading bytes of an id are shown
const ID_DISPLAY_BYTES: usize = 16;

/// Identity details the session layer knows about a participant
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionIdentity {
    pub display_name: Option<String>,
    /// Stable user id, when the user is logged in
    pub identity_id: Option<Vec<u8>>,
    /// Per-tab id, used when there is no user id
    pub tab_id: Vec<u8>,
}

impl SessionIdentity {
    pub fn anonymous(tab_id: impl Into<Vec<u8>>) -> Self {
        Self {
            tab_id: tab_id.into(),
            ..Self::default()
        }
    }
}

/// Renders as `Alice, user-0a1b...` or `tab-0a1b...`
impl fmt::Display for SessionIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.display_name {
            write!(f, "{}, ", name)?;
        }
        match &self.identity_id {
            Some(id) => write!(f, "user-{}", hex_prefix(id)),
            None => write!(f, "tab-{}", hex_prefix(&self.tab_id)),
        }
    }
}

fn hex_prefix(bytes: &[u8]) -> String {
    bytes
        .iter()
        .take(ID_DISPLAY_BYTES)
        .map(|b| format!("{:02x}", b))
        .collect()
}

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;
