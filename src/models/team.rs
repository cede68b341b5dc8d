//! Team membership and visibility records.

use std::collections::BTreeMap;

use serde::Deserialize;

/// A user's `system` record. Holds their current team reference, if any.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SystemRecord {
    #[serde(default)]
    pub team: Option<String>,
}

/// A user's `user` record. `teamHide` maps teammate ids to the requester's
/// choice to hide them in their own views.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(default)]
    pub team_hide: BTreeMap<String, bool>,
}

/// A `team` record: the ordered roster of member user ids.
#[derive(Debug, Clone, Deserialize)]
pub struct TeamRecord {
    #[serde(default)]
    pub members: Vec<String>,
}
