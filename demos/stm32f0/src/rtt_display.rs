use palette::Srgb;
use rtt_target::rprintln;
use tilt_charades::{Display, Font};

/// Display that mirrors every draw call to the RTT console
///
/// Stands in for the LCD so the game can be played with only a debug probe
/// attached.
pub struct RttDisplay {
    font: Font,
}

impl RttDisplay {
    pub fn new() -> Self {
        Self { font: Font::Fixed }
    }
}

impl Default for RttDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RttDisplay {
    fn clear(&mut self) {
        rprintln!("----------------------------------------");
    }

    fn draw_centered_text(&mut self, text: &str, x: i16, y: i16) {
        rprintln!("[{:>3},{:>3}] ({:?}) {:^24}", x, y, self.font, text);
    }

    fn draw_text(&mut self, text: &str, x: i16, y: i16) {
        rprintln!("[{:>3},{:>3}] ({:?}) {}", x, y, self.font, text);
    }

    fn set_font(&mut self, font: Font) {
        self.font = font;
    }

    fn set_colors(&mut self, foreground: Srgb<u8>, background: Srgb<u8>) {
        rprintln!(
            "colors: #{:02X}{:02X}{:02X} on #{:02X}{:02X}{:02X}",
            foreground.red,
            foreground.green,
            foreground.blue,
            background.red,
            background.green,
            background.blue
        );
    }
}
