//! Horizontal sub-tab bar for panels inside a screen (week detail tabs,
//! skill categories, the objective/code toggle).

use ratatui::text::{Line, Span};

use crate::theme::Palette;

/// Renders a tab bar line with the active tab highlighted.
pub fn render_sub_tabs<'a>(labels: &[&'a str], active_index: usize, palette: &Palette) -> Line<'a> {
    let mut spans = Vec::with_capacity(labels.len() * 2);

    for (i, label) in labels.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ", palette.key_hint()));
        }

        if i == active_index {
            spans.push(Span::styled(format!("[{label}]"), palette.tab_active()));
        } else {
            spans.push(Span::styled(*label, palette.tab_inactive()));
        }
    }

    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_tab_is_bracketed() {
        let line = render_sub_tabs(&["Contenido", "Ejemplos", "Recursos"], 1, &Palette::default());
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "Contenido  [Ejemplos]  Recursos");
    }
}
