//! Progress formatting and hideout merge logic.
//!
//! Turns raw stored progress documents into the public v2 shape and folds
//! game-edition stash unlocks from the static hideout data into the result.

use std::collections::BTreeMap;

use crate::models::{
    FormattedProgress, HideoutData, ObjectiveProgress, RawCompletion, RawProgress,
    STASH_STATION_ID,
};

/// Number of leading user-id characters used as the fallback display name.
const DISPLAY_NAME_LEN: usize = 6;

/// Normalize a raw completion map into an ordered list of uniform entries.
///
/// One output entry per input key. `complete` defaults to false, `count`
/// (emitted only when `include_count` is set) defaults to 0.
pub fn format_objectives(
    objectives: &BTreeMap<String, RawCompletion>,
    include_count: bool,
) -> Vec<ObjectiveProgress> {
    objectives
        .iter()
        .map(|(id, entry)| ObjectiveProgress {
            id: id.clone(),
            complete: entry.complete.unwrap_or(false),
            count: include_count.then(|| entry.count.unwrap_or(0)),
        })
        .collect()
}

/// Format one user's raw progress document into the public progress shape.
///
/// A missing document yields all defaults: the display name falls back to a
/// prefix of the user id, level and game edition to 1, and every completion
/// list to empty.
pub fn format_progress(
    raw: Option<RawProgress>,
    user_id: &str,
    hideout: Option<&HideoutData>,
) -> FormattedProgress {
    let raw = raw.unwrap_or_default();

    let display_name = raw
        .display_name
        .unwrap_or_else(|| user_id.chars().take(DISPLAY_NAME_LEN).collect());
    let player_level = raw.level.unwrap_or(1);
    let game_edition = raw.game_edition.unwrap_or(1);

    let mut progress = FormattedProgress {
        tasks_progress: format_objectives(&raw.task_completions, false),
        task_objectives_progress: format_objectives(&raw.task_objectives, true),
        hideout_modules_progress: format_objectives(&raw.hideout_modules, false),
        hideout_parts_progress: format_objectives(&raw.hideout_parts, true),
        display_name,
        user_id: user_id.to_string(),
        player_level,
        game_edition,
    };

    if let Some(hideout) = hideout {
        merge_hideout(&mut progress, hideout, game_edition);
    }

    progress
}

/// Mark stash levels unlocked by the user's game edition as complete.
///
/// Every stash level whose tier is at or below `game_edition` is forced
/// complete, along with all of its item requirements. Entries are never
/// flipped back to incomplete. A hideout document without a stash station
/// is logged and leaves the progress untouched.
pub fn merge_hideout(progress: &mut FormattedProgress, hideout: &HideoutData, game_edition: i64) {
    let Some(stash) = hideout
        .hideout_stations
        .iter()
        .find(|station| station.id == STASH_STATION_ID)
    else {
        tracing::warn!("Hideout data has no stash station; skipping edition unlocks");
        return;
    };

    for level in stash.levels.iter().filter(|l| l.level <= game_edition) {
        match progress
            .hideout_modules_progress
            .iter_mut()
            .find(|module| module.id == level.id)
        {
            Some(module) => module.complete = true,
            None => progress.hideout_modules_progress.push(ObjectiveProgress {
                id: level.id.clone(),
                complete: true,
                count: None,
            }),
        }

        for item in &level.item_requirements {
            match progress
                .hideout_parts_progress
                .iter_mut()
                .find(|part| part.id == item.id)
            {
                // An existing entry keeps the user's stored count
                Some(part) => part.complete = true,
                None => progress.hideout_parts_progress.push(ObjectiveProgress {
                    id: item.id.clone(),
                    complete: true,
                    count: Some(item.count),
                }),
            }
        }
    }
}

/// Teammate ids the requester has chosen to hide, restricted to ids that are
/// actually on the roster. Metadata only; hidden members still appear in the
/// aggregated progress list.
pub fn hidden_teammates(team_hide: &BTreeMap<String, bool>, members: &[String]) -> Vec<String> {
    team_hide
        .iter()
        .filter(|(id, hidden)| **hidden && members.iter().any(|member| member == *id))
        .map(|(id, _)| id.clone())
        .collect()
}
