use ratatui::style::{Color, Modifier, Style as RatStyle};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Color that can be serialized/deserialized
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThemeColor {
    /// Named color: "red", "blue", "cyan", etc.
    Named(NamedColor),
    /// RGB color: [255, 128, 0]
    Rgb([u8; 3]),
    /// 256-color index: 42
    Indexed(u8),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamedColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    Gray,
    DarkGray,
    LightRed,
    LightGreen,
    LightYellow,
    LightBlue,
    LightMagenta,
    LightCyan,
    White,
    Reset,
}

impl From<ThemeColor> for Color {
    fn from(tc: ThemeColor) -> Color {
        match tc {
            ThemeColor::Named(n) => match n {
                NamedColor::Black => Color::Black,
                NamedColor::Red => Color::Red,
                NamedColor::Green => Color::Green,
                NamedColor::Yellow => Color::Yellow,
                NamedColor::Blue => Color::Blue,
                NamedColor::Magenta => Color::Magenta,
                NamedColor::Cyan => Color::Cyan,
                NamedColor::Gray => Color::Gray,
                NamedColor::DarkGray => Color::DarkGray,
                NamedColor::LightRed => Color::LightRed,
                NamedColor::LightGreen => Color::LightGreen,
                NamedColor::LightYellow => Color::LightYellow,
                NamedColor::LightBlue => Color::LightBlue,
                NamedColor::LightMagenta => Color::LightMagenta,
                NamedColor::LightCyan => Color::LightCyan,
                NamedColor::White => Color::White,
                NamedColor::Reset => Color::Reset,
            },
            ThemeColor::Rgb([r, g, b]) => Color::Rgb(r, g, b),
            ThemeColor::Indexed(i) => Color::Indexed(i),
        }
    }
}

/// Style definition for a single element
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fg: Option<ThemeColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg: Option<ThemeColor>,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub dim: bool,
    #[serde(default)]
    pub reversed: bool,
}

impl ElementStyle {
    pub fn fg(color: ThemeColor) -> Self {
        Self { fg: Some(color), ..Default::default() }
    }

    pub fn with_bg(mut self, color: ThemeColor) -> Self {
        self.bg = Some(color);
        self
    }

    pub fn with_bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn with_reversed(mut self) -> Self {
        self.reversed = true;
        self
    }

    pub fn to_ratatui(&self) -> RatStyle {
        let mut style = RatStyle::default();
        if let Some(fg) = self.fg {
            style = style.fg(fg.into());
        }
        if let Some(bg) = self.bg {
            style = style.bg(bg.into());
        }
        if self.bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        if self.italic {
            style = style.add_modifier(Modifier::ITALIC);
        }
        if self.underline {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        if self.dim {
            style = style.add_modifier(Modifier::DIM);
        }
        if self.reversed {
            style = style.add_modifier(Modifier::REVERSED);
        }
        style
    }
}

/// Colours and text attributes used to draw the table and its frame
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,

    // Frame around the table and the header's bottom rule
    pub border: ElementStyle,

    // Header row
    pub header: ElementStyle,
    pub header_label: ElementStyle,

    // Body
    pub cell: ElementStyle,
    pub row_index: ElementStyle,
    /// Row under the cursor
    pub highlight: ElementStyle,

    // Status bar
    pub status_bar: ElementStyle,
    pub message_warning: ElementStyle,
}

impl Default for Theme {
    fn default() -> Self {
        Self::standard()
    }
}

impl Theme {
    /// 256-colour palette of the classic viewer: grey frame, purple cursor row
    pub fn standard() -> Self {
        use NamedColor::*;
        Self {
            name: "default".to_string(),
            border: ElementStyle::fg(ThemeColor::Indexed(240)),
            header: ElementStyle::default().with_bold(),
            header_label: ElementStyle::fg(ThemeColor::Rgb([255, 255, 255])),
            cell: ElementStyle::default(),
            row_index: ElementStyle::default(),
            highlight: ElementStyle::fg(ThemeColor::Indexed(229)).with_bg(ThemeColor::Indexed(57)),
            status_bar: ElementStyle::fg(ThemeColor::Indexed(250)).with_bg(ThemeColor::Indexed(236)),
            message_warning: ElementStyle::fg(ThemeColor::Named(Yellow)),
        }
    }

    /// Dark theme with cyan accents
    pub fn dark() -> Self {
        use NamedColor::*;
        Self {
            name: "dark".to_string(),
            border: ElementStyle::fg(ThemeColor::Named(DarkGray)),
            header: ElementStyle::fg(ThemeColor::Named(LightGreen)).with_bold(),
            header_label: ElementStyle::fg(ThemeColor::Named(White)),
            cell: ElementStyle::fg(ThemeColor::Named(White)),
            row_index: ElementStyle::fg(ThemeColor::Named(Gray)),
            highlight: ElementStyle::fg(ThemeColor::Named(Black))
                .with_bg(ThemeColor::Named(LightCyan))
                .with_bold(),
            status_bar: ElementStyle::fg(ThemeColor::Named(White))
                .with_bg(ThemeColor::Named(DarkGray)),
            message_warning: ElementStyle::fg(ThemeColor::Named(LightYellow)),
        }
    }

    /// Light theme for bright terminals
    pub fn light() -> Self {
        use NamedColor::*;
        Self {
            name: "light".to_string(),
            border: ElementStyle::fg(ThemeColor::Named(Gray)),
            header: ElementStyle::fg(ThemeColor::Named(Blue)).with_bold(),
            header_label: ElementStyle::fg(ThemeColor::Named(Black)),
            cell: ElementStyle::fg(ThemeColor::Named(Black)),
            row_index: ElementStyle::fg(ThemeColor::Named(Gray)),
            highlight: ElementStyle::default().with_reversed(),
            status_bar: ElementStyle::fg(ThemeColor::Named(Black))
                .with_bg(ThemeColor::Named(Gray)),
            message_warning: ElementStyle::fg(ThemeColor::Named(Red)),
        }
    }

    /// Load theme from TOML file
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read theme file: {}", e))?;
        toml::from_str(&content)
            .map_err(|e| format!("Failed to parse theme file: {}", e))
    }

    /// Get theme by name
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" | "standard" => Some(Self::standard()),
            "dark" => Some(Self::dark()),
            "light" => Some(Self::light()),
            _ => None,
        }
    }

    /// List available built-in themes
    pub fn builtin_names() -> &'static [&'static str] {
        &["default", "dark", "light"]
    }
}
