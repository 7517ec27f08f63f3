//! Word deck for the guessing rounds.

use crate::config::ConfigError;

/// Words used when the firmware does not supply its own list.
pub const DEFAULT_WORDS: [&str; 30] = [
    "Elephant", "Airplane", "Guitar", "Swimming", "Balloon", "Whisper", "Robot", "Spider",
    "Dancing", "Pirate", "Fireworks", "Chef", "Lion", "Sleeping", "Rainbow", "Doctor",
    "Superhero", "Fishing", "Laughing", "Astronaut", "Washer", "Dinosaur", "Painting", "Surfing",
    "Clapping", "Ghost", "Bowling", "Magician", "Juggling", "Campfire",
];

/// xorshift32
#[derive(Debug, Clone, Copy)]
struct Rng(u32);

impl Rng {
    const fn new(seed: u32) -> Self {
        Self(if seed == 0 { 1 } else { seed })
    }

    fn next(&mut self) -> u32 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 17;
        self.0 ^= self.0 << 5;
        self.0
    }

    fn range(&mut self, max: u32) -> u32 {
        self.next() % max
    }
}

/// Pseudo-random walk over a fixed word list.
///
/// Consecutive words always differ when the list has more than one entry.
#[derive(Debug, Clone, Copy)]
pub struct WordDeck<'w> {
    words: &'w [&'w str],
    index: usize,
    rng: Rng,
}

impl<'w> WordDeck<'w> {
    /// Creates a deck positioned on the first word.
    pub fn new(words: &'w [&'w str], seed: u32) -> Result<Self, ConfigError> {
        if words.is_empty() {
            return Err(ConfigError::EmptyWordList);
        }

        Ok(Self {
            words,
            index: 0,
            rng: Rng::new(seed),
        })
    }

    /// Returns the word currently shown.
    #[inline]
    pub fn current(&self) -> &'w str {
        self.words[self.index]
    }

    /// Moves to a different random word and returns it.
    pub fn advance(&mut self) -> &'w str {
        let len = self.words.len() as u32;
        if len > 1 {
            let step = 1 + self.rng.range(len - 1);
            self.index = (self.index + step as usize) % self.words.len();
        }
        self.current()
    }

    /// Mixes `entropy` into the generator.
    ///
    /// Called at round start with the live counter value so rounds do not
    /// replay the same word order.
    pub fn reseed(&mut self, entropy: u32) {
        self.rng = Rng::new(self.rng.0 ^ entropy);
    }

    /// Number of words in the deck.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Always `false`; an empty deck cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
