use crate::config::config::GlyphConfig;
use crate::tasks::columns::{is_long_text, is_visual_channel, PAPER_ID};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellAlign {
    Left,
    Center,
}

/// How a cell should look, independent of the terminal backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCell {
    pub text: String,
    pub align: CellAlign,
    pub emphasis: bool,
    /// Full text is only available in the row detail
    pub truncatable: bool,
}

/// Maps raw dataset values to display text
#[derive(Debug, Clone)]
pub struct CellRenderer {
    glyphs: GlyphConfig,
}

impl CellRenderer {
    pub fn new(glyphs: GlyphConfig) -> Self {
        Self { glyphs }
    }

    pub fn glyphs(&self) -> &GlyphConfig {
        &self.glyphs
    }

    /// Visual channel columns hold booleans in a few spellings; anything
    /// else is shown as-is
    pub fn channel_glyph<'a>(&'a self, value: &'a str) -> &'a str {
        match value {
            "1" | "TRUE" | "true" => &self.glyphs.affirmative,
            "0" | "FALSE" | "false" => &self.glyphs.negative,
            "" => &self.glyphs.neutral,
            other => other,
        }
    }

    pub fn render(&self, column: &str, value: &str) -> RenderedCell {
        if is_visual_channel(column) {
            return RenderedCell {
                text: self.channel_glyph(value).to_string(),
                align: CellAlign::Center,
                emphasis: false,
                truncatable: false,
            };
        }
        RenderedCell {
            text: value.to_string(),
            align: CellAlign::Left,
            emphasis: column == PAPER_ID,
            truncatable: is_long_text(column),
        }
    }
}

impl Default for CellRenderer {
    fn default() -> Self {
        Self::new(GlyphConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_glyphs() {
        let renderer = CellRenderer::default();
        assert_eq!(renderer.channel_glyph("TRUE"), "✓");
        assert_eq!(renderer.channel_glyph("1"), "✓");
        assert_eq!(renderer.channel_glyph("false"), "✗");
        assert_eq!(renderer.channel_glyph(""), "—");
        assert_eq!(renderer.channel_glyph("Maybe"), "Maybe");
    }

    #[test]
    fn test_ascii_glyphs() {
        let renderer = CellRenderer::new(GlyphConfig::simple());
        assert_eq!(renderer.render("Colour", "0").text, "N");
        assert_eq!(renderer.render("Colour", "0").align, CellAlign::Center);
    }

    #[test]
    fn test_plain_columns_pass_through() {
        let renderer = CellRenderer::default();
        let cell = renderer.render("paper_ID", "TRUE");
        assert_eq!(cell.text, "TRUE");
        assert!(cell.emphasis);
        assert!(renderer.render("User Task", "x").truncatable);
    }
}
