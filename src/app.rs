use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;

use crate::config::AppConfig;
use crate::deck::{sampler, Card, Deck};

/// How long the reveal animation runs, in milliseconds
pub const REVEAL_MS: u64 = 500;

/// Stagger between consecutive cards during the reveal, in milliseconds
const REVEAL_STAGGER_MS: u64 = 100;

/// Status messages auto-clear after this many seconds
const STATUS_SECONDS: u64 = 3;

/// What the main area shows. A selection can only exist while a draw does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Home,
    Cards {
        draw: Vec<Card>,
        selection: Option<u32>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    DeckBrowser,
    Help,
}

pub struct App {
    pub view: View,
    pub popup: Popup,

    // The fixed pool (read-only after load)
    pub deck: Deck,

    // Config
    pub config: AppConfig,

    // Highlighted card in the card view (UI chrome, not the selection)
    pub cursor: usize,

    // Deck browser list position
    pub browser_selected: usize,

    // Reveal animation start; cleared by tick() after REVEAL_MS
    pub animation_started: Option<Instant>,

    // Status message (shown in info line, auto-clears after timeout)
    pub status_message: Option<String>,
    pub status_message_time: Option<Instant>,

    rng: StdRng,
}

impl App {
    pub fn new(deck: Deck, config: AppConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self {
            view: View::Home,
            popup: Popup::None,
            deck,
            config,
            cursor: 0,
            browser_selected: 0,
            animation_started: None,
            status_message: None,
            status_message_time: None,
            rng,
        }
    }

    /// Set a status message (auto-clears after a few seconds)
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_message_time = Some(Instant::now());
    }

    /// Draw a fresh hand and enter the card view.
    /// The view is untouched if the pool cannot cover the draw size.
    pub fn start(&mut self) -> Result<()> {
        let draw = sampler::sample(self.deck.cards(), self.config.draw_size, &mut self.rng)?;
        self.view = View::Cards {
            draw,
            selection: None,
        };
        self.cursor = 0;
        self.animation_started = Some(Instant::now());
        Ok(())
    }

    /// Replace the current draw and clear the selection.
    /// No-op at home and while the reveal animation is still running.
    pub fn reroll(&mut self) -> Result<()> {
        if !matches!(self.view, View::Cards { .. }) || self.is_animating() {
            return Ok(());
        }

        let draw = sampler::sample(self.deck.cards(), self.config.draw_size, &mut self.rng)?;
        self.view = View::Cards {
            draw,
            selection: None,
        };
        self.cursor = 0;
        self.animation_started = Some(Instant::now());
        Ok(())
    }

    /// Toggle the selection. Ids outside the current draw are ignored; the
    /// only key paths that reach here produce in-draw ids, so this guard
    /// enforces the invariant rather than assuming it.
    pub fn select(&mut self, id: u32) {
        if let View::Cards { draw, selection } = &mut self.view {
            if !draw.iter().any(|c| c.id == id) {
                return;
            }
            *selection = if *selection == Some(id) { None } else { Some(id) };
        }
    }

    /// Back to the home view, discarding the draw and selection
    pub fn go_home(&mut self) {
        self.view = View::Home;
        self.cursor = 0;
        self.animation_started = None;
    }

    pub fn is_animating(&self) -> bool {
        self.animation_started
            .is_some_and(|t| t.elapsed().as_millis() < u128::from(REVEAL_MS))
    }

    /// Whether the card at `index` has flipped face-up yet.
    /// Cards reveal one after another, left to right.
    pub fn card_revealed(&self, index: usize) -> bool {
        match self.animation_started {
            None => true,
            Some(started) => {
                let delay = u128::from(REVEAL_STAGGER_MS) * (index as u128 + 1);
                started.elapsed().as_millis() >= delay
            }
        }
    }

    fn draw_len(&self) -> usize {
        match &self.view {
            View::Cards { draw, .. } => draw.len(),
            View::Home => 0,
        }
    }

    fn cursor_card_id(&self) -> Option<u32> {
        match &self.view {
            View::Cards { draw, .. } => draw.get(self.cursor).map(|c| c.id),
            View::Home => None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Handle popups first
        if self.popup != Popup::None {
            self.handle_popup_key(key);
            return Ok(());
        }

        if matches!(self.view, View::Home) {
            self.handle_home_key(key)
        } else {
            self.handle_cards_key(key)
        }
    }

    fn handle_home_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('s') => self.start()?,
            KeyCode::Char('d') => self.open_deck_browser(),
            KeyCode::Char('?') => self.popup = Popup::Help,
            _ => {}
        }
        Ok(())
    }

    fn handle_cards_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            // Cursor movement across the drawn cards
            KeyCode::Left | KeyCode::BackTab => self.move_cursor_left(),
            KeyCode::Right | KeyCode::Tab => self.move_cursor_right(),

            // Toggle the highlighted card's affirmation
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(id) = self.cursor_card_id() {
                    self.select(id);
                }
            }

            // Select by position (1-9)
            KeyCode::Char(c) if c.is_ascii_digit() => {
                let index = (c as usize).wrapping_sub('1' as usize);
                if index < self.draw_len() {
                    self.cursor = index;
                    if let Some(id) = self.cursor_card_id() {
                        self.select(id);
                    }
                }
            }

            KeyCode::Char('r') => self.reroll()?,
            KeyCode::Esc | KeyCode::Char('h') => self.go_home(),
            KeyCode::Char('d') => self.open_deck_browser(),
            KeyCode::Char('?') => self.popup = Popup::Help,
            _ => {}
        }
        Ok(())
    }

    fn handle_popup_key(&mut self, key: KeyEvent) {
        match self.popup {
            Popup::DeckBrowser => match key.code {
                KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('d') => {
                    self.popup = Popup::None;
                }
                KeyCode::Char('j') | KeyCode::Down => {
                    if self.deck.len() > 0 {
                        self.browser_selected = (self.browser_selected + 1) % self.deck.len();
                    }
                }
                KeyCode::Char('k') | KeyCode::Up => {
                    if self.deck.len() > 0 {
                        self.browser_selected = self
                            .browser_selected
                            .checked_sub(1)
                            .unwrap_or(self.deck.len() - 1);
                    }
                }
                _ => {}
            },
            Popup::Help => {
                if matches!(
                    key.code,
                    KeyCode::Esc | KeyCode::Char('?') | KeyCode::Enter | KeyCode::Char('q')
                ) {
                    self.popup = Popup::None;
                }
            }
            Popup::None => {}
        }
    }

    fn move_cursor_left(&mut self) {
        let len = self.draw_len();
        if len > 0 {
            self.cursor = self.cursor.checked_sub(1).unwrap_or(len - 1);
        }
    }

    fn move_cursor_right(&mut self) {
        let len = self.draw_len();
        if len > 0 {
            self.cursor = (self.cursor + 1) % len;
        }
    }

    fn open_deck_browser(&mut self) {
        self.popup = Popup::DeckBrowser;
        self.browser_selected = 0;
    }

    /// Advance timers; called once per event-loop iteration
    pub fn tick(&mut self) {
        if let Some(started) = self.animation_started {
            if started.elapsed().as_millis() >= u128::from(REVEAL_MS) {
                self.animation_started = None;
            }
        }

        if let Some(time) = self.status_message_time {
            if time.elapsed().as_secs() >= STATUS_SECONDS {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn test_deck(n: u32) -> Deck {
        let mut toml = String::new();
        for id in 1..=n {
            toml.push_str(&format!(
                "[[cards]]\nid = {id}\ntitle = \"t{id}\"\ntext = \"x{id}\"\nemoji = \"e\"\naffirmation = \"a{id}\"\n\n"
            ));
        }
        Deck::from_toml(&toml).unwrap()
    }

    fn test_app(pool_size: u32) -> App {
        App::new(test_deck(pool_size), AppConfig::default(), Some(42))
    }

    fn draw_ids(app: &App) -> Vec<u32> {
        match &app.view {
            View::Cards { draw, .. } => draw.iter().map(|c| c.id).collect(),
            View::Home => panic!("not in card view"),
        }
    }

    fn selection(app: &App) -> Option<u32> {
        match &app.view {
            View::Cards { selection, .. } => *selection,
            View::Home => panic!("not in card view"),
        }
    }

    #[test]
    fn test_start_draws_three_distinct_cards() {
        let mut app = test_app(16);
        assert_eq!(app.view, View::Home);

        app.start().unwrap();

        let ids = draw_ids(&app);
        assert_eq!(ids.len(), 3);
        assert_eq!(ids.iter().collect::<HashSet<_>>().len(), 3);
        assert!(ids.iter().all(|id| (1..=16).contains(id)));
        assert_eq!(selection(&app), None);
        assert!(app.is_animating());
    }

    #[test]
    fn test_reroll_replaces_draw_and_clears_selection() {
        let mut app = test_app(16);
        app.start().unwrap();
        app.animation_started = None;

        let first = draw_ids(&app);
        app.select(first[0]);
        assert_eq!(selection(&app), Some(first[0]));

        app.reroll().unwrap();
        assert_eq!(draw_ids(&app).len(), 3);
        assert_eq!(selection(&app), None);
    }

    #[test]
    fn test_reroll_ignored_while_animating_or_at_home() {
        let mut app = test_app(16);

        // At home there is nothing to reroll
        app.reroll().unwrap();
        assert_eq!(app.view, View::Home);

        app.start().unwrap();
        assert!(app.is_animating());
        let first = draw_ids(&app);

        // Mid-reveal the draw must stay put
        app.reroll().unwrap();
        assert_eq!(draw_ids(&app), first);
    }

    #[test]
    fn test_select_toggles() {
        let mut app = test_app(16);
        app.start().unwrap();
        let id = draw_ids(&app)[1];

        app.select(id);
        assert_eq!(selection(&app), Some(id));
        app.select(id);
        assert_eq!(selection(&app), None);
    }

    #[test]
    fn test_select_switches_between_cards() {
        let mut app = test_app(16);
        app.start().unwrap();
        let ids = draw_ids(&app);

        app.select(ids[0]);
        app.select(ids[2]);
        assert_eq!(selection(&app), Some(ids[2]));
    }

    #[test]
    fn test_select_ignores_ids_outside_the_draw() {
        let mut app = test_app(16);
        app.start().unwrap();

        let outside = (1..=16).find(|id| !draw_ids(&app).contains(id)).unwrap();
        app.select(outside);
        assert_eq!(selection(&app), None);

        // And selecting at home does nothing at all
        app.go_home();
        app.select(1);
        assert_eq!(app.view, View::Home);
    }

    #[test]
    fn test_go_home_resets_everything() {
        let mut app = test_app(16);
        app.start().unwrap();
        let id = draw_ids(&app)[0];
        app.select(id);

        app.go_home();
        assert_eq!(app.view, View::Home);
        assert!(!app.is_animating());
    }

    #[test]
    fn test_start_fails_loudly_on_small_pool() {
        let mut app = test_app(2);

        let err = app.start().unwrap_err();
        assert!(err.to_string().contains("only has 2"), "{err}");
        // No partial state change
        assert_eq!(app.view, View::Home);
    }

    #[test]
    fn test_seeded_apps_draw_identically() {
        let mut a = test_app(16);
        let mut b = test_app(16);

        a.start().unwrap();
        b.start().unwrap();
        assert_eq!(draw_ids(&a), draw_ids(&b));
    }

    #[test]
    fn test_cursor_wraps() {
        let mut app = test_app(16);
        app.start().unwrap();

        app.move_cursor_left();
        assert_eq!(app.cursor, 2);
        app.move_cursor_right();
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn test_reveal_is_staggered() {
        let mut app = test_app(16);
        assert!(app.card_revealed(0));

        app.start().unwrap();
        // Immediately after the draw every card is still face-down
        assert!(!app.card_revealed(0));
        assert!(!app.card_revealed(2));

        app.animation_started = None;
        assert!(app.card_revealed(2));
    }
}
