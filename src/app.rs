//! Application state machine.
//!
//! Provides [`Application`], which walks the Title, Instructions, Game and
//! Results screens from debounced button taps, tilt gestures and the round
//! countdown, and draws each screen through a [`Display`].

use core::fmt::Write;

use heapless::{Deque, String};

use crate::config::GameConfig;
use crate::countdown::RoundCountdown;
use crate::display::{Display, Font, Theme};
use crate::tilt::{TiltClassifier, TiltGesture, TiltState};
use crate::time::TimeBase;
use crate::words::WordDeck;

/// Number of past round scores kept for the session.
pub const MAX_PLAYERS: usize = 4;

/// Horizontal center of the 128 pixel wide screen.
const CENTER_X: i16 = 64;

/// Screens of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Screen {
    /// Welcome screen.
    Title,
    /// How to play.
    Instructions,
    /// A round in progress.
    Game,
    /// Final score of the last round.
    Results,
}

impl Screen {
    /// Decodes a raw screen number. Anything unknown decodes to [`Screen::Title`].
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            1 => Screen::Instructions,
            2 => Screen::Game,
            3 => Screen::Results,
            _ => Screen::Title,
        }
    }
}

impl From<u8> for Screen {
    fn from(raw: u8) -> Self {
        Screen::from_raw(raw)
    }
}

/// Everything the application reads in one main-loop pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Inputs {
    /// Button A was tapped.
    pub a_tapped: bool,
    /// Button B was tapped.
    pub b_tapped: bool,
    /// The joystick select button was tapped.
    pub select_tapped: bool,
    /// Latest reading of the tilt axis.
    pub tilt_sample: u16,
}

/// Scores of the most recent rounds this session.
#[derive(Debug, Clone)]
pub struct Scoreboard {
    scores: Deque<u16, MAX_PLAYERS>,
    rounds_played: u32,
}

impl Scoreboard {
    /// Creates an empty scoreboard.
    pub const fn new() -> Self {
        Self {
            scores: Deque::new(),
            rounds_played: 0,
        }
    }

    /// Records a finished round, dropping the oldest score when full.
    pub fn record(&mut self, score: u16) {
        if self.scores.is_full() {
            self.scores.pop_front();
        }
        // Cannot fail, a slot was freed above.
        let _ = self.scores.push_back(score);
        self.rounds_played += 1;
    }

    /// Highest score still on the board.
    pub fn best(&self) -> Option<u16> {
        self.scores.iter().copied().max()
    }

    /// Rounds finished since power-up.
    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    /// Recorded scores, oldest first.
    pub fn scores(&self) -> impl Iterator<Item = u16> + '_ {
        self.scores.iter().copied()
    }
}

impl Default for Scoreboard {
    fn default() -> Self {
        Self::new()
    }
}

/// Top-level game controller.
pub struct Application<'w> {
    screen: Screen,
    entered: bool,
    score: u16,
    tilt: TiltClassifier,
    deck: WordDeck<'w>,
    scoreboard: Scoreboard,
    shown_secs: Option<u64>,
    theme: Theme,
}

impl<'w> Application<'w> {
    /// Creates the application on the title screen, not yet drawn.
    pub fn new(deck: WordDeck<'w>, config: &GameConfig) -> Self {
        Self {
            screen: Screen::Title,
            entered: false,
            score: 0,
            tilt: TiltClassifier::new(config.thresholds),
            deck,
            scoreboard: Scoreboard::new(),
            shown_secs: None,
            theme: config.theme,
        }
    }

    /// Runs one pass of the current screen.
    ///
    /// A freshly entered screen draws itself first, then handles `inputs`.
    pub fn step<T: TimeBase, D: Display>(
        &mut self,
        inputs: &Inputs,
        countdown: &RoundCountdown,
        time: &T,
        display: &mut D,
    ) {
        match self.screen {
            Screen::Title => self.handle_title(inputs, countdown, display),
            Screen::Instructions => self.handle_instructions(inputs, display),
            Screen::Game => self.handle_game(inputs, countdown, time, display),
            Screen::Results => self.handle_results(inputs, countdown, display),
        }
    }

    /// Returns the current screen.
    #[inline]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Returns the score of the current round.
    #[inline]
    pub fn score(&self) -> u16 {
        self.score
    }

    /// Returns the word currently on screen.
    pub fn current_word(&self) -> &'w str {
        self.deck.current()
    }

    /// Returns the tilt classifier state.
    pub fn tilt_state(&self) -> TiltState {
        self.tilt.state()
    }

    /// Returns the session scoreboard.
    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    /// Returns `true` once the current screen has drawn itself.
    pub fn is_drawn(&self) -> bool {
        self.entered
    }

    /// Clears the round and goes back to the title screen.
    ///
    /// Halts the countdown so a late expiry cannot end a future round early.
    pub fn reset(&mut self, countdown: &RoundCountdown) {
        countdown.halt();
        self.score = 0;
        self.tilt.reset();
        self.shown_secs = None;
        self.enter(Screen::Title);
    }

    fn enter(&mut self, screen: Screen) {
        info!("screen {} -> {}", self.screen, screen);
        self.screen = screen;
        self.entered = false;
    }

    /// Returns `true` exactly once per screen entry.
    fn needs_draw(&mut self) -> bool {
        !core::mem::replace(&mut self.entered, true)
    }

    fn handle_title<D: Display>(
        &mut self,
        inputs: &Inputs,
        countdown: &RoundCountdown,
        display: &mut D,
    ) {
        if self.needs_draw() {
            self.draw_title(display);
        }

        if inputs.a_tapped {
            countdown.halt();
            self.enter(Screen::Game);
        } else if inputs.b_tapped {
            self.enter(Screen::Instructions);
        }
    }

    fn handle_instructions<D: Display>(&mut self, inputs: &Inputs, display: &mut D) {
        if self.needs_draw() {
            self.draw_instructions(display);
        }

        if inputs.b_tapped {
            self.enter(Screen::Title);
        }
    }

    fn handle_game<T: TimeBase, D: Display>(
        &mut self,
        inputs: &Inputs,
        countdown: &RoundCountdown,
        time: &T,
        display: &mut D,
    ) {
        if self.needs_draw() {
            countdown.arm(time);
            self.tilt.reset();
            self.shown_secs = None;
            self.deck.reseed(time.now().counter);
            self.deck.advance();

            self.draw_game(display);
            self.draw_word(display);
            self.draw_score(display);
        }

        if let Some(gesture) = self.tilt.step(inputs.tilt_sample) {
            if gesture == TiltGesture::Correct {
                self.score = self.score.saturating_add(1);
            }
            debug!("gesture {}, score {=u16}", gesture, self.score);

            self.deck.advance();
            self.draw_word(display);
            self.draw_score(display);
        }

        let secs = countdown.remaining_secs(time);
        if self.shown_secs != Some(secs) {
            self.shown_secs = Some(secs);
            self.draw_time(display, secs);
        }

        if countdown.take_game_over(time) || inputs.select_tapped {
            self.enter(Screen::Results);
        }
    }

    fn handle_results<D: Display>(
        &mut self,
        inputs: &Inputs,
        countdown: &RoundCountdown,
        display: &mut D,
    ) {
        if self.needs_draw() {
            countdown.halt();
            self.scoreboard.record(self.score);
            info!(
                "round {=u32} over, score {=u16}",
                self.scoreboard.rounds_played(),
                self.score
            );
            self.draw_results(display);
        }

        if inputs.select_tapped {
            self.reset(countdown);
        }
    }

    fn clear<D: Display>(&self, display: &mut D) {
        display.set_colors(self.theme.foreground, self.theme.background);
        display.set_font(Font::Fixed);
        display.clear();
    }

    fn draw_title<D: Display>(&self, display: &mut D) {
        self.clear(display);
        display.draw_centered_text("Welcome to Charades!", CENTER_X, 30);
        display.draw_centered_text("Press A to play.", CENTER_X, 60);
        display.draw_centered_text("Press B for help.", CENTER_X, 90);
    }

    fn draw_instructions<D: Display>(&self, display: &mut D) {
        self.clear(display);
        display.set_font(Font::Italic);
        display.draw_centered_text("Instructions:", CENTER_X, 10);
        display.draw_centered_text("Hold the screen", CENTER_X, 25);
        display.draw_centered_text("to your forehead,", CENTER_X, 40);
        display.draw_centered_text("facing your team.", CENTER_X, 55);
        display.draw_centered_text("Tilt down: got it", CENTER_X, 70);
        display.draw_centered_text("Tilt up: pass", CENTER_X, 85);
        display.draw_centered_text("Press B to go back", CENTER_X, 100);
        display.set_font(Font::Fixed);
    }

    fn draw_game<D: Display>(&self, display: &mut D) {
        self.clear(display);
        display.draw_centered_text("Charades:", CENTER_X, 30);
        display.draw_text("Score:", 40, 90);
        display.draw_text("Time:   s", 30, 110);
    }

    fn draw_word<D: Display>(&self, display: &mut D) {
        display.set_font(Font::Bold);
        display.draw_centered_text("                ", CENTER_X + 1, 65);
        display.draw_centered_text(self.deck.current(), CENTER_X + 1, 65);
        display.set_font(Font::Fixed);
    }

    fn draw_score<D: Display>(&self, display: &mut D) {
        let text: String<8> = format(format_args!("{:<5}", self.score));
        display.draw_text(&text, 80, 90);
    }

    fn draw_time<D: Display>(&self, display: &mut D, secs: u64) {
        let text: String<8> = format(format_args!("{:>2}", secs));
        display.draw_text(&text, 64, 110);
    }

    fn draw_results<D: Display>(&self, display: &mut D) {
        self.clear(display);

        let text: String<32> = format(format_args!("Your final score: {}", self.score));
        display.draw_centered_text(&text, CENTER_X, 50);

        if let Some(best) = self.scoreboard.best() {
            let text: String<32> = format(format_args!("Session best: {}", best));
            display.draw_centered_text(&text, CENTER_X, 70);
        }

        display.draw_centered_text("Select to continue.", CENTER_X, 90);
    }
}

/// Formats into a fixed-capacity string.
///
/// Each formatted piece is appended whole or not at all, so a piece that
/// overflows is dropped along with everything after it.
fn format<const N: usize>(args: core::fmt::Arguments<'_>) -> String<N> {
    let mut text = String::new();
    let _ = text.write_fmt(args);
    text
}
