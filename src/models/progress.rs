//! Player progress models.
//!
//! Stored progress documents are written by clients with no schema
//! enforcement, so every field is optional and scalar fields that carry the
//! wrong JSON type degrade to "absent" instead of failing the whole document.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A user's stored progress document, as found in the `progress` collection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProgress {
    #[serde(default)]
    pub task_completions: BTreeMap<String, RawCompletion>,
    #[serde(default)]
    pub task_objectives: BTreeMap<String, RawCompletion>,
    #[serde(default)]
    pub hideout_modules: BTreeMap<String, RawCompletion>,
    #[serde(default)]
    pub hideout_parts: BTreeMap<String, RawCompletion>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub level: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub game_edition: Option<i64>,
}

/// One raw completion entry keyed by task/objective/module/part id.
#[derive(Debug, Clone, Default)]
pub struct RawCompletion {
    pub complete: Option<bool>,
    pub count: Option<i64>,
}

impl<'de> Deserialize<'de> for RawCompletion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Anything that is not an object with the expected field types
        // degrades to defaults.
        let value = Value::deserialize(deserializer)?;
        Ok(RawCompletion {
            complete: value.get("complete").and_then(Value::as_bool),
            count: value.get("count").and_then(Value::as_i64),
        })
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::String(s) => Some(s),
        _ => None,
    }))
}

fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_i64))
}

/// A single formatted completion entry in the public progress shape.
///
/// `count` is present only on the objective and hideout-part lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveProgress {
    pub id: String,
    pub complete: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
}

/// The public progress shape returned by the v2 API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedProgress {
    pub tasks_progress: Vec<ObjectiveProgress>,
    pub task_objectives_progress: Vec<ObjectiveProgress>,
    pub hideout_modules_progress: Vec<ObjectiveProgress>,
    pub hideout_parts_progress: Vec<ObjectiveProgress>,
    pub display_name: String,
    pub user_id: String,
    pub player_level: i64,
    pub game_edition: i64,
}
