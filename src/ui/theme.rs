//! Greyscale theme for planzo
//! A high-contrast monochrome palette with a single cyan accent for code

use ratatui::style::{Color, Modifier, Style};

/// The greyscale color palette
pub struct Theme;

impl Theme {
    // ─────────────────────────────────────────────────────────────────────
    // Core greyscale palette - from brightest to darkest
    // ─────────────────────────────────────────────────────────────────────

    /// Pure white - maximum emphasis
    pub const WHITE: Color = Color::Rgb(255, 255, 255);

    /// Near white - headers, selected items, primary focus
    pub const GREY_50: Color = Color::Rgb(250, 250, 250);

    /// Bright grey - primary text
    pub const GREY_100: Color = Color::Rgb(220, 220, 220);

    /// Light grey - secondary text, active elements
    pub const GREY_200: Color = Color::Rgb(180, 180, 180);

    /// Medium grey - muted text
    pub const GREY_300: Color = Color::Rgb(140, 140, 140);

    /// Dark grey - subtle elements, inactive tabs
    pub const GREY_400: Color = Color::Rgb(100, 100, 100);

    /// Darker grey - borders, separators
    pub const GREY_500: Color = Color::Rgb(70, 70, 70);

    /// Very dark grey - selection background
    pub const GREY_600: Color = Color::Rgb(45, 45, 45);

    /// Near black - panel background
    pub const GREY_800: Color = Color::Rgb(28, 28, 28);

    /// True black - deepest background
    pub const GREY_900: Color = Color::Rgb(18, 18, 18);

    /// Background color alias
    pub const BG: Color = Self::GREY_900;

    /// Code blocks and in-progress status
    pub const CYAN: Color = Color::Rgb(34, 211, 238);

    /// Error status
    pub const RED: Color = Color::Rgb(200, 100, 100);

    // ─────────────────────────────────────────────────────────────────────
    // Pre-built styles for common UI elements
    // ─────────────────────────────────────────────────────────────────────

    pub fn text() -> Style {
        Style::default().fg(Self::GREY_100)
    }

    pub fn text_muted() -> Style {
        Style::default().fg(Self::GREY_300)
    }

    pub fn text_dim() -> Style {
        Style::default().fg(Self::GREY_400)
    }

    pub fn selected() -> Style {
        Style::default()
            .fg(Self::WHITE)
            .bg(Self::GREY_600)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::GREY_500)
    }

    /// Border of the panel that has keyboard focus
    pub fn border_active() -> Style {
        Style::default().fg(Self::GREY_200)
    }

    pub fn title() -> Style {
        Style::default()
            .fg(Self::GREY_50)
            .add_modifier(Modifier::BOLD)
    }

    /// Keybinding highlight
    pub fn key() -> Style {
        Style::default().fg(Self::GREY_900).bg(Self::GREY_400)
    }

    pub fn tab_active() -> Style {
        Style::default()
            .fg(Self::GREY_900)
            .bg(Self::GREY_100)
            .add_modifier(Modifier::BOLD)
    }

    pub fn tab_inactive() -> Style {
        Style::default().fg(Self::GREY_400)
    }

    pub fn code() -> Style {
        Style::default().fg(Self::CYAN)
    }

    /// Tree glyphs
    pub const ARROW_RIGHT: char = '▸';
    pub const ARROW_DOWN: char = '▾';
    pub const FILE_MARK: char = '·';
    pub const BOX_VERTICAL: char = '│';

    pub const LOGO: &'static str = "p l a n z o";

    /// Spinner frames - braille pattern
    pub const SPINNER_BRAILLE: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

    pub fn spinner(tick: usize) -> char {
        Self::SPINNER_BRAILLE[tick % Self::SPINNER_BRAILLE.len()]
    }
}
