use crate::catalog::{CardLayout, PaperCard};
use tracing::debug;

/// Where one visible card sits in the grid, in grid cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardPlacement {
    pub image: String,
    pub column: usize,
    pub x: u16,
    pub y: u16,
    pub height: u16,
}

/// Packs cards into fixed-width columns, each card going to the currently
/// shortest column
#[derive(Debug, Clone)]
pub struct MasonryLayout {
    column_width: u16,
    gutter: u16,
    columns: usize,
    placements: Vec<CardPlacement>,
    total_height: u16,
}

impl MasonryLayout {
    pub fn new(column_width: u16, gutter: u16) -> Self {
        Self {
            column_width: column_width.max(10),
            gutter,
            columns: 1,
            placements: Vec::new(),
            total_height: 0,
        }
    }

    pub fn column_width(&self) -> u16 {
        self.column_width
    }

    /// Fit as many columns as the available width allows. Returns true when
    /// the column count changed and a relayout is needed.
    pub fn set_available_width(&mut self, width: u16) -> bool {
        let per_column = self.column_width + self.gutter;
        let columns = ((width + self.gutter) / per_column).max(1) as usize;
        let changed = columns != self.columns;
        self.columns = columns;
        changed
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn placements(&self) -> &[CardPlacement] {
        &self.placements
    }

    pub fn total_height(&self) -> u16 {
        self.total_height
    }

    pub fn placement_of(&self, image: &str) -> Option<&CardPlacement> {
        self.placements.iter().find(|p| p.image == image)
    }

    /// Rows a card needs: borders, wrapped title, citation, link, button
    pub fn card_height(&self, card: &PaperCard) -> u16 {
        let inner = self.column_width.saturating_sub(2).max(1) as usize;
        let title = wrapped_lines(&card.title, inner);
        let citation = wrapped_lines(&card.citation(), inner);
        (2 + title + citation + 1 + 1) as u16
    }
}

fn wrapped_lines(text: &str, width: usize) -> usize {
    let chars = text.chars().count();
    chars.div_ceil(width).max(1)
}

impl CardLayout for MasonryLayout {
    fn layout(&mut self, cards: &[PaperCard]) {
        let mut heights = vec![0u16; self.columns];
        self.placements.clear();

        for card in cards.iter().filter(|c| c.visible) {
            let (column, top) = heights
                .iter()
                .enumerate()
                .min_by_key(|(i, h)| (**h, *i))
                .map(|(i, h)| (i, *h))
                .unwrap_or((0, 0));
            let height = self.card_height(card);
            self.placements.push(CardPlacement {
                image: card.image.clone(),
                column,
                x: column as u16 * (self.column_width + self.gutter),
                y: top,
                height,
            });
            heights[column] = top + height;
        }

        self.total_height = heights.into_iter().max().unwrap_or(0);
        debug!(
            target: "masonry",
            "Laid out {} cards in {} columns",
            self.placements.len(),
            self.columns
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(image: &str, title: &str, visible: bool) -> PaperCard {
        PaperCard {
            image: image.to_string(),
            title: title.to_string(),
            author: "A".to_string(),
            venue: "V".to_string(),
            year: "2020".to_string(),
            url: String::new(),
            visible,
        }
    }

    #[test]
    fn test_column_count_follows_width() {
        let mut layout = MasonryLayout::new(30, 2);
        assert!(layout.set_available_width(94));
        assert_eq!(layout.columns(), 3);
        assert!(!layout.set_available_width(95));
        layout.set_available_width(5);
        assert_eq!(layout.columns(), 1);
    }

    #[test]
    fn test_cards_go_to_shortest_column() {
        let mut layout = MasonryLayout::new(12, 1);
        layout.set_available_width(25);
        let long_title = "x".repeat(40);
        let cards = vec![
            card("a", &long_title, true),
            card("b", "short", true),
            card("hidden", "short", false),
            card("c", "short", true),
        ];
        layout.layout(&cards);

        assert_eq!(layout.placements().len(), 3);
        assert!(layout.placement_of("hidden").is_none());
        let c = layout.placement_of("c").unwrap();
        // b is shorter than a, so c stacks under b
        assert_eq!(c.column, 1);
        assert_eq!(c.x, 13);
        assert_eq!(c.y, layout.placement_of("b").unwrap().height);
    }
}
