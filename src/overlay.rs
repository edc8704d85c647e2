//! Boxed overlays drawn over the globe: the city hover card and the help box.

use crate::cities::City;
use crate::colors::{rgb, CARD_BORDER, CARD_LABEL, CARD_TEXT};
use crate::interaction::CardLayout;
use crate::terminal::Terminal;
use crossterm::style::Color;

/// Card background, so the globe does not bleed through.
const CARD_BG: Color = Color::Rgb { r: 0x12, g: 0x12, b: 0x14 };

/// Draw a single-line box and blank its interior.
fn draw_box(term: &mut Terminal, x: i32, y: i32, w: i32, h: i32, border: Color, bg: Option<Color>) {
    if w < 2 || h < 2 {
        return;
    }
    for row in y..y + h {
        for col in x..x + w {
            term.set(col, row, ' ', None, false);
            term.set_bg(col, row, bg);
        }
    }

    term.set(x, y, '┌', Some(border), false);
    term.set(x + w - 1, y, '┐', Some(border), false);
    term.set(x, y + h - 1, '└', Some(border), false);
    term.set(x + w - 1, y + h - 1, '┘', Some(border), false);
    for col in x + 1..x + w - 1 {
        term.set(col, y, '─', Some(border), false);
        term.set(col, y + h - 1, '─', Some(border), false);
    }
    for row in y + 1..y + h - 1 {
        term.set(x, row, '│', Some(border), false);
        term.set(x + w - 1, row, '│', Some(border), false);
    }
}

/// Greedy word wrap. Words longer than `width` are split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            lines.push(word.drain(..width).collect());
        }
        if word.is_empty() {
            continue;
        }
        let needed = if line.is_empty() { word.len() } else { line.chars().count() + 1 + word.len() };
        if needed > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.extend(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

enum CardLine {
    Title(String, String),
    Text(String, Color),
    Stat(&'static str, &'static str),
    Blank,
}

fn card_lines(city: &City, inner: usize) -> Vec<CardLine> {
    let mut lines = vec![
        CardLine::Title(city.name.to_string(), city.years.to_string()),
        CardLine::Text(city.country.to_string(), rgb(CARD_LABEL.0, CARD_LABEL.1, CARD_LABEL.2)),
        CardLine::Blank,
    ];
    lines.extend(city.stat_rows().into_iter().map(|(label, value)| CardLine::Stat(label, value)));

    let text = rgb(CARD_TEXT.0, CARD_TEXT.1, CARD_TEXT.2);
    lines.push(CardLine::Blank);
    for l in wrap(&format!("Industries: {}", city.stats.industries), inner) {
        lines.push(CardLine::Text(l, text));
    }
    for l in wrap(city.stats.fact, inner) {
        lines.push(CardLine::Text(l, rgb(CARD_BORDER.0, CARD_BORDER.1, CARD_BORDER.2)));
    }
    lines
}

/// Draw the hover card for a city with its top-left corner at `(left, top)`.
pub fn render_city_card(term: &mut Terminal, city: &City, left: i32, top: i32, layout: CardLayout) {
    let accent = rgb(CARD_BORDER.0, CARD_BORDER.1, CARD_BORDER.2);
    let text = rgb(CARD_TEXT.0, CARD_TEXT.1, CARD_TEXT.2);
    let label = rgb(CARD_LABEL.0, CARD_LABEL.1, CARD_LABEL.2);

    draw_box(term, left, top, layout.width, layout.height, accent, Some(CARD_BG));

    let inner = (layout.width - 4).max(0) as usize;
    let x = left + 2;
    let rows = (layout.height - 2).max(0) as usize;

    for (i, line) in card_lines(city, inner).into_iter().take(rows).enumerate() {
        let y = top + 1 + i as i32;
        match line {
            CardLine::Title(name, years) => {
                term.set_str(x, y, &name, Some(accent), true);
                let years_x = x + inner as i32 - years.chars().count() as i32;
                if years_x > x + name.chars().count() as i32 {
                    term.set_str(years_x, y, &years, Some(label), false);
                }
            }
            CardLine::Text(s, color) => term.set_str(x, y, &s, Some(color), false),
            CardLine::Stat(name, value) => {
                term.set_str(x, y, name, Some(label), false);
                let value_x = x + inner as i32 - value.chars().count() as i32;
                term.set_str(value_x, y, value, Some(text), true);
            }
            CardLine::Blank => {}
        }
    }
}

/// Render a centered help overlay box with the provided text.
pub fn render_help_overlay(term: &mut Terminal, help_text: &str) {
    if help_text.is_empty() {
        return;
    }
    let (width, height) = term.size();

    let lines: Vec<&str> = help_text.lines().collect();
    let max_width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let box_width = max_width + 4;
    let box_height = lines.len() + 2;

    let start_x = (width as usize).saturating_sub(box_width) / 2;
    let start_y = (height as usize).saturating_sub(box_height) / 2;

    draw_box(
        term,
        start_x as i32,
        start_y as i32,
        box_width as i32,
        box_height as i32,
        Color::White,
        None,
    );
    for (i, line) in lines.iter().enumerate() {
        term.set_str(start_x as i32 + 2, (start_y + 1 + i) as i32, line, Some(Color::Grey), false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cities::find;
    use crate::interaction::CARD_LAYOUT;

    #[test]
    fn wrap_respects_width() {
        let lines = wrap("London has over 170 museums, more than any other city", 20);
        assert!(lines.iter().all(|l| l.chars().count() <= 20));
        assert_eq!(lines.join(" "), "London has over 170 museums, more than any other city");
    }

    #[test]
    fn wrap_splits_long_words() {
        assert_eq!(wrap("abcdefgh ij", 3), vec!["abc", "def", "gh", "ij"]);
        assert!(wrap("anything", 0).is_empty());
        assert!(wrap("   ", 10).is_empty());
    }

    #[test]
    fn card_shows_city_details() {
        let london = find("london").unwrap();
        let mut term = Terminal::offscreen(60, 20);
        render_city_card(&mut term, london, 2, 3, CARD_LAYOUT);
        let text = term.to_plain();
        assert!(text.contains("London"));
        assert!(text.contains("2017-present"));
        assert!(text.contains("United Kingdom"));
        assert!(text.contains("$500B"));
        assert!(text.contains("Passport Power"));
        assert_eq!(term.cell(2, 3).unwrap().ch, '┌');
        assert_eq!(term.cell(2 + 45, 3 + 13).unwrap().ch, '┘');
    }

    #[test]
    fn card_content_fits_inside_box() {
        for city in &crate::cities::CITIES {
            let mut term = Terminal::offscreen(50, 16);
            render_city_card(&mut term, city, 0, 0, CARD_LAYOUT);
            let rows: Vec<String> = term.to_plain().lines().map(str::to_string).collect();
            for row in &rows[1..13] {
                let chars: Vec<char> = row.chars().collect();
                assert_eq!(chars[0], '│');
                assert_eq!(chars[45], '│');
            }
        }
    }

    #[test]
    fn help_overlay_is_centered() {
        let mut term = Terminal::offscreen(30, 10);
        render_help_overlay(&mut term, "ab\ncd");
        // 6 wide, 4 tall box centred in 30x10
        assert_eq!(term.cell(12, 3).unwrap().ch, '┌');
        assert_eq!(term.cell(14, 4).unwrap().ch, 'a');
        assert_eq!(term.cell(17, 6).unwrap().ch, '┘');
    }
}
