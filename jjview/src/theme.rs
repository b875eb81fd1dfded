//! Color theme system for jjview.
//!
//! jj colours its own output, so the theme only covers the chrome around
//! it: borders, the selection band, the file list and the status bar. Two
//! built-in themes are provided:
//!
//! - `dark` uses ANSI 16 colors so it works on any terminal.
//! - `catppuccin_mocha` uses the Catppuccin Mocha palette in RGB and needs
//!   truecolor.

use ratatui::style::Color;

use jjview_core::FileStatus;

/// All color values used across jjview's UI surfaces.
#[derive(Debug, Clone)]
pub struct Theme {
    // Panel borders
    /// Border color for the focused panel.
    pub border_active: Color,
    /// Border color for unfocused panels.
    pub border_inactive: Color,

    // Lists
    /// Background of the lines belonging to the selected entity or file.
    pub selection_bg: Color,
    /// Preview header line (what is being previewed, section position).
    pub preview_header: Color,
    /// Placeholder text such as "loading…" or "no changes".
    pub placeholder: Color,

    // File list
    pub file_added: Color,
    pub file_removed: Color,
    pub file_modified: Color,
    pub file_renamed: Color,

    // Status bar
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    /// Active list source tab.
    pub status_tab_active: Color,
    /// Transient error or warning text.
    pub status_warning: Color,
}

impl Theme {
    /// Returns the built-in dark theme using ANSI 16 colors.
    pub fn dark() -> Self {
        Self {
            border_active: Color::Cyan,
            border_inactive: Color::DarkGray,

            selection_bg: Color::Indexed(236),
            preview_header: Color::Cyan,
            placeholder: Color::DarkGray,

            file_added: Color::Green,
            file_removed: Color::Red,
            file_modified: Color::Yellow,
            file_renamed: Color::Blue,

            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            status_tab_active: Color::Cyan,
            status_warning: Color::LightRed,
        }
    }

    /// Returns the Catppuccin Mocha theme using RGB truecolor values.
    ///
    /// Palette source: <https://github.com/catppuccin/catppuccin> Mocha variant.
    pub fn catppuccin_mocha() -> Self {
        let green = Color::Rgb(166, 227, 161); // #a6e3a1
        let red = Color::Rgb(243, 139, 168); // #f38ba8
        let yellow = Color::Rgb(249, 226, 175); // #f9e2af
        let blue = Color::Rgb(137, 180, 250); // #89b4fa
        let teal = Color::Rgb(148, 226, 213); // #94e2d5
        let lavender = Color::Rgb(180, 190, 254); // #b4befe
        let overlay1 = Color::Rgb(127, 132, 156); // #7f849c
        let surface0 = Color::Rgb(49, 50, 68); // #313244
        let surface1 = Color::Rgb(69, 71, 90); // #45475a
        let text = Color::Rgb(205, 214, 244); // #cdd6f4
        let peach = Color::Rgb(250, 179, 135); // #fab387

        Self {
            border_active: lavender,
            border_inactive: overlay1,

            selection_bg: surface0,
            preview_header: teal,
            placeholder: overlay1,

            file_added: green,
            file_removed: red,
            file_modified: yellow,
            file_renamed: blue,

            status_bar_bg: surface1,
            status_bar_fg: text,
            status_tab_active: lavender,
            status_warning: peach,
        }
    }

    /// Resolves a theme name from config to a built-in theme.
    ///
    /// Unknown names fall back to `dark()` so a typo never prevents startup.
    ///
    /// # Arguments
    ///
    /// * `name` - theme name from config, e.g. `"dark"` or `"catppuccin-mocha"`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "catppuccin-mocha" | "catppuccin_mocha" => Self::catppuccin_mocha(),
            "dark" => Self::dark(),
            other => {
                tracing::warn!(theme = other, "unknown theme, falling back to 'dark'");
                Self::dark()
            }
        }
    }

    /// Color for a file status letter in the files panel.
    pub fn file_status(&self, status: FileStatus) -> Color {
        match status {
            FileStatus::Added => self.file_added,
            FileStatus::Deleted => self.file_removed,
            FileStatus::Modified => self.file_modified,
            FileStatus::Renamed | FileStatus::Copied => self.file_renamed,
        }
    }
}
