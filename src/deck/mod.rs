pub mod sampler;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Deck bundled into the binary; used when no override is configured.
const DEFAULT_DECK: &str = include_str!("../../assets/deck.toml");

/// A single reflection card. Read-only content loaded with the deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: u32,
    pub title: String,
    pub text: String,
    pub emoji: String,
    /// Message revealed when the card is selected.
    #[serde(default)]
    pub affirmation: String,
}

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("deck has no cards")]
    Empty,
    #[error("duplicate card id {0}")]
    DuplicateId(u32),
}

#[derive(Debug, Deserialize)]
struct DeckFile {
    #[serde(default)]
    cards: Vec<Card>,
}

/// The fixed card pool. Validated once at load, never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    fn new(cards: Vec<Card>) -> Result<Self, DeckError> {
        if cards.is_empty() {
            return Err(DeckError::Empty);
        }
        let mut seen = HashSet::new();
        for card in &cards {
            if !seen.insert(card.id) {
                return Err(DeckError::DuplicateId(card.id));
            }
        }
        Ok(Self { cards })
    }

    /// Parse and validate a deck from TOML content.
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: DeckFile = toml::from_str(content).context("invalid deck TOML")?;
        Ok(Self::new(file.cards)?)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read deck file {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("invalid deck file {}", path.display()))
    }

    /// Path of the optional user deck file
    fn user_deck_path() -> Option<PathBuf> {
        Some(dirs::config_dir()?.join("kokoro").join("deck.toml"))
    }

    /// Load the deck, resolving overrides in order: explicit `--deck` path,
    /// path from config, user deck file, embedded default.
    ///
    /// An explicit path that fails to load is an error; the implicit ones
    /// fall back to the next source with a warning.
    pub fn load(override_path: Option<&Path>, configured: Option<&Path>) -> Result<Self> {
        if let Some(path) = override_path {
            return Self::from_file(path);
        }

        if let Some(path) = configured {
            match Self::from_file(path) {
                Ok(deck) => return Ok(deck),
                Err(e) => tracing::warn!("Ignoring configured deck: {:#}", e),
            }
        }

        if let Some(path) = Self::user_deck_path() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(deck) => return Ok(deck),
                    Err(e) => tracing::warn!("Ignoring user deck: {:#}", e),
                }
            }
        }

        Self::from_toml(DEFAULT_DECK).context("embedded default deck is invalid")
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }
}
