//! Merge classification for consecutive chat messages.
//!
//! Two adjacent messages merge visually when they share a grouping key
//! (actor where present, user otherwise), arrive within the epoch window,
//! and are compatible under the roll policy. Each message carries one of
//! four tags describing its place in a merged run: the first message is
//! the top, the last is the bottom, everything between is a middle, and
//! unmerged messages stay plain.

use crate::settings::{MergeSettings, RollPolicy};
use serde::{Deserialize, Serialize};

/// The metadata of one rendered chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeMessage {
    /// Authoring user.
    pub user_id: String,
    /// Speaking actor, if the message was spoken in character.
    pub actor_id: Option<String>,
    /// Creation time in milliseconds.
    pub timestamp_ms: u64,
    /// Whether the message is a dice roll.
    pub is_roll: bool,
}

/// A message's place within a merged run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeTag {
    /// Not part of a merged run.
    #[default]
    None,
    /// First message of a run.
    Top,
    /// Interior message of a run.
    Middle,
    /// Last message of a run.
    Bottom,
}

/// Check whether `current` may merge onto `previous`.
pub fn can_merge(current: &MergeMessage, previous: &MergeMessage, settings: &MergeSettings) -> bool {
    same_group(current, previous, settings.split_speaker)
        && in_time_frame(current.timestamp_ms, previous.timestamp_ms, settings.epoch_seconds)
        && rolls_compatible(current, previous, settings.allow_rolls)
}

fn same_group(current: &MergeMessage, previous: &MergeMessage, split_speaker: bool) -> bool {
    if !split_speaker {
        return current.user_id == previous.user_id;
    }
    // Group by actors when both messages have one; fall back to the user
    // only when neither does.
    match (&current.actor_id, &previous.actor_id) {
        (Some(curr), Some(prev)) => curr == prev,
        (None, None) => current.user_id == previous.user_id,
        _ => false,
    }
}

fn in_time_frame(current: u64, previous: u64, epoch_seconds: u32) -> bool {
    current > previous && (current - previous) < u64::from(epoch_seconds) * 1000
}

fn rolls_compatible(current: &MergeMessage, previous: &MergeMessage, policy: RollPolicy) -> bool {
    match policy {
        RollPolicy::All => true,
        RollPolicy::Rolls => current.is_roll == previous.is_roll,
        RollPolicy::None => !current.is_roll && !previous.is_roll,
    }
}

#[derive(Debug, Clone)]
struct Entry {
    message: MergeMessage,
    tag: MergeTag,
}

/// The ordered, tagged list of visible chat messages.
#[derive(Debug, Clone, Default)]
pub struct MergeLog {
    entries: Vec<Entry>,
}

impl MergeLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of messages in the log.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the log holds no messages.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The tag of each message, in display order.
    pub fn tags(&self) -> Vec<MergeTag> {
        self.entries.iter().map(|e| e.tag).collect()
    }

    /// The message at `index`, if present.
    pub fn message(&self, index: usize) -> Option<&MergeMessage> {
        self.entries.get(index).map(|e| &e.message)
    }

    /// Append a newly rendered message, tagging it against its predecessor.
    pub fn append(&mut self, message: MergeMessage, settings: &MergeSettings) {
        self.entries.push(Entry {
            message,
            tag: MergeTag::None,
        });
        if settings.enabled && self.entries.len() >= 2 {
            self.style_pair(self.entries.len() - 1, settings);
        }
    }

    /// Recompute every tag from scratch. Called after any setting change.
    pub fn retag_all(&mut self, settings: &MergeSettings) {
        for entry in &mut self.entries {
            entry.tag = MergeTag::None;
        }
        if !settings.enabled {
            return;
        }
        for index in 1..self.entries.len() {
            self.style_pair(index, settings);
        }
        log::debug!("retagged {} chat messages", self.entries.len());
    }

    /// Remove the message at `index`, repairing its former neighbors' tags
    /// so no half-open run is left behind.
    pub fn remove(&mut self, index: usize, settings: &MergeSettings) -> Option<MergeMessage> {
        if index >= self.entries.len() {
            return None;
        }
        if settings.enabled {
            match self.entries[index].tag {
                MergeTag::Top => {
                    // The successor inherits the top of the run, or leaves
                    // the run entirely if it was the bottom.
                    if let Some(next) = self.entries.get_mut(index + 1) {
                        next.tag = match next.tag {
                            MergeTag::Middle => MergeTag::Top,
                            MergeTag::Bottom => MergeTag::None,
                            other => other,
                        };
                    }
                }
                MergeTag::Bottom => {
                    if index > 0 {
                        if let Some(prev) = self.entries.get_mut(index - 1) {
                            prev.tag = match prev.tag {
                                MergeTag::Middle => MergeTag::Bottom,
                                MergeTag::Top => MergeTag::None,
                                other => other,
                            };
                        }
                    }
                }
                // A removed middle lets the run close up around it.
                MergeTag::Middle | MergeTag::None => {}
            }
        }
        Some(self.entries.remove(index).message)
    }

    fn style_pair(&mut self, index: usize, settings: &MergeSettings) {
        let (head, tail) = self.entries.split_at_mut(index);
        let Some(prev) = head.last_mut() else {
            return;
        };
        let Some(curr) = tail.first_mut() else {
            return;
        };
        if !can_merge(&curr.message, &prev.message, settings) {
            return;
        }
        prev.tag = if prev.tag == MergeTag::Bottom {
            MergeTag::Middle
        } else {
            MergeTag::Top
        };
        curr.tag = MergeTag::Bottom;
    }
}
