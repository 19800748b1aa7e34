use std::fs;
use std::path::{Path, PathBuf};

use engine::TileId;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub(crate) enum StoryError {
    #[error("failed to read story file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse story document at {at}: {source}")]
    Parse {
        at: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("story event '{event}' has a meet trigger with no tile ids")]
    EmptyMeetTrigger { event: String },
    #[error("story event id '{event}' is used more than once")]
    DuplicateEvent { event: String },
}

/// Narrative content: the briefing shown before play and every discoverable event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Story {
    pub(crate) intro: String,
    #[serde(default)]
    pub(crate) events: Vec<StoryEvent>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct StoryEvent {
    pub(crate) id: String,
    pub(crate) trigger: Trigger,
    pub(crate) dialog: String,
    #[serde(default)]
    pub(crate) journal: Option<JournalEntry>,
    #[serde(default)]
    pub(crate) kills_player: bool,
}

/// Trigger areas are in tiles; the game scales them by the map's tile size.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub(crate) enum Trigger {
    Meet {
        tiles: Vec<TileId>,
    },
    Region {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct JournalEntry {
    pub(crate) image: TileId,
    pub(crate) description: String,
}

impl Story {
    pub(crate) fn load(path: &Path) -> Result<Self, StoryError> {
        let raw = fs::read_to_string(path).map_err(|source| StoryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let story = Self::from_json_str(&raw)?;
        info!(
            path = %path.display(),
            event_count = story.events.len(),
            "story_loaded"
        );
        Ok(story)
    }

    pub(crate) fn from_json_str(raw: &str) -> Result<Self, StoryError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        let story: Story = serde_path_to_error::deserialize(&mut deserializer).map_err(|error| {
            let at = error.path().to_string();
            StoryError::Parse {
                at,
                source: error.into_inner(),
            }
        })?;
        story.validate()?;
        Ok(story)
    }

    fn validate(&self) -> Result<(), StoryError> {
        for (index, event) in self.events.iter().enumerate() {
            if matches!(&event.trigger, Trigger::Meet { tiles } if tiles.is_empty()) {
                return Err(StoryError::EmptyMeetTrigger {
                    event: event.id.clone(),
                });
            }
            if self.events[..index].iter().any(|other| other.id == event.id) {
                return Err(StoryError::DuplicateEvent {
                    event: event.id.clone(),
                });
            }
        }
        Ok(())
    }
}
