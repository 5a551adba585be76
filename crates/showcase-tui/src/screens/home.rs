//! Home screen: who the author is.
//!
//! Layout:
//! ┌─ name · role ──────────────────────────────────────────────┐
//! │ tagline / location                                         │
//! ├─ Sobre mí ───────────────────┐┌─ Habilidades ─────────────┤
//! │ bio paragraphs (j/k scroll)  ││ [frontend] backend tool … │
//! │                              ││ React      ████████░░ 80% │
//! ├─ Contacto ───────────────────┘└───────────────────────────┤
//! │ channels                                                   │
//! └────────────────────────────────────────────────────────────┘

use std::cell::Cell;
use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};
use strum::IntoEnumIterator;

use showcase_core::{Carousel, Catalog, ManualTicker, SkillCategory};

use crate::action::Action;
use crate::component::Component;
use crate::screen::ScreenId;
use crate::theme::Palette;
use crate::widgets::sub_tabs;

const BAR_WIDTH: usize = 20;

pub struct HomeScreen {
    catalog: Arc<Catalog>,
    categories: Vec<SkillCategory>,
    /// Skill category tabs.
    tabs: Carousel<ManualTicker>,
    bio_scroll: u16,
    /// Bio viewport from the last frame, for scroll clamping.
    bio_area: Cell<Rect>,
}

impl HomeScreen {
    pub fn new(catalog: Arc<Catalog>) -> Result<Self> {
        let categories: Vec<SkillCategory> = SkillCategory::iter()
            .filter(|c| catalog.profile().skills_in(*c).next().is_some())
            .collect();
        let tabs = Carousel::<ManualTicker>::builder(categories.len().max(1))
            .label("skills")
            .build(ManualTicker::new("skills"))?;
        Ok(Self {
            catalog,
            categories,
            tabs,
            bio_scroll: 0,
            bio_area: Cell::new(Rect::default()),
        })
    }

    fn active_category(&self) -> Option<SkillCategory> {
        self.categories.get(self.tabs.active_index()).copied()
    }

    /// Wrapped line count of the bio at the last rendered width.
    fn bio_lines(&self) -> u16 {
        let width = usize::from(self.bio_area.get().width.max(1));
        let lines: usize = self
            .catalog
            .profile()
            .bio
            .iter()
            .map(|p| p.chars().count().div_ceil(width) + 1)
            .sum();
        u16::try_from(lines).unwrap_or(u16::MAX)
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let profile = self.catalog.profile();
        let block = Block::default()
            .title(format!(" {} ", profile.name))
            .title_style(palette.title())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(palette.border_focused());
        let lines = vec![
            Line::from(Span::styled(profile.role.as_str(), palette.emphasis())),
            Line::from(Span::styled(profile.tagline.as_str(), palette.text())),
            Line::from(vec![
                Span::styled("⌖ ", palette.muted()),
                Span::styled(profile.location.as_str(), palette.muted()),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_bio(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let block = Block::default()
            .title(" Sobre mí ")
            .title_style(palette.title())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(palette.border());
        let inner = block.inner(area);
        self.bio_area.set(inner);

        let mut lines = Vec::new();
        for paragraph in &self.catalog.profile().bio {
            lines.push(Line::from(Span::styled(paragraph.as_str(), palette.text())));
            lines.push(Line::from(""));
        }
        frame.render_widget(
            Paragraph::new(lines)
                .block(block)
                .wrap(Wrap { trim: true })
                .scroll((self.bio_scroll, 0)),
            area,
        );
    }

    fn render_skills(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let block = Block::default()
            .title(" Habilidades ")
            .title_style(palette.title())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(palette.border());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let labels: Vec<String> = self.categories.iter().map(ToString::to_string).collect();
        let label_refs: Vec<&str> = labels.iter().map(String::as_str).collect();

        let [tabs_area, list_area] =
            Layout::vertical([Constraint::Length(2), Constraint::Min(1)]).areas(inner);
        frame.render_widget(
            Paragraph::new(sub_tabs::render_sub_tabs(
                &label_refs,
                self.tabs.active_index(),
                palette,
            )),
            tabs_area,
        );

        let Some(category) = self.active_category() else {
            frame.render_widget(Paragraph::new("Sin habilidades").style(palette.muted()), list_area);
            return;
        };

        let name_width = self
            .catalog
            .profile()
            .skills_in(category)
            .map(|s| s.name.chars().count())
            .max()
            .unwrap_or(0);
        let lines: Vec<Line> = self
            .catalog
            .profile()
            .skills_in(category)
            .map(|skill| {
                let filled = usize::from(skill.level) * BAR_WIDTH / 100;
                Line::from(vec![
                    Span::styled(format!("{:<name_width$}  ", skill.name), palette.text()),
                    Span::styled("█".repeat(filled), palette.emphasis()),
                    Span::styled("░".repeat(BAR_WIDTH - filled), palette.muted()),
                    Span::styled(format!(" {:>3}%", skill.level), palette.muted()),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), list_area);
    }

    fn render_contacts(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let block = Block::default()
            .title(" Contacto ")
            .title_style(palette.title())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(palette.border());
        let lines: Vec<Line> = self
            .catalog
            .profile()
            .contacts
            .iter()
            .map(|channel| {
                Line::from(vec![
                    Span::styled(format!("{:<10}", channel.label), palette.emphasis()),
                    Span::styled(channel.value.as_str(), palette.text()),
                    Span::styled(format!("  {}", channel.note), palette.muted()),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

impl Component for HomeScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('l') | KeyCode::Right => {
                self.tabs.on_next();
            }
            KeyCode::Char('h') | KeyCode::Left => {
                self.tabs.on_previous();
            }
            KeyCode::Char('j') | KeyCode::Down => {
                let max = self.bio_lines().saturating_sub(self.bio_area.get().height);
                self.bio_scroll = (self.bio_scroll + 1).min(max);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.bio_scroll = self.bio_scroll.saturating_sub(1);
            }
            KeyCode::Enter => return Ok(Some(Action::SwitchScreen(ScreenId::Journey))),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let contacts = u16::try_from(self.catalog.profile().contacts.len()).unwrap_or(0) + 2;
        let [header, body, footer] = Layout::vertical([
            Constraint::Length(5),
            Constraint::Min(6),
            Constraint::Length(contacts),
        ])
        .areas(area);
        let [bio, skills] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(body);

        self.render_header(frame, header, palette);
        self.render_bio(frame, bio, palette);
        self.render_skills(frame, skills, palette);
        self.render_contacts(frame, footer, palette);
    }

    fn hints(&self) -> &'static str {
        "h/l categoría  j/k desplazar  Enter semanas"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn category_tabs_wrap() {
        let catalog = Arc::new(Catalog::embedded().unwrap());
        let mut home = HomeScreen::new(catalog).unwrap();
        let first = home.active_category();
        assert!(first.is_some());
        for _ in 0..home.categories.len() {
            home.handle_key_event(key(KeyCode::Right)).unwrap();
        }
        assert_eq!(home.active_category(), first);
        home.handle_key_event(key(KeyCode::Left)).unwrap();
        assert_eq!(home.tabs.active_index(), home.categories.len() - 1);
    }

    #[test]
    fn enter_goes_to_the_journey() {
        let catalog = Arc::new(Catalog::embedded().unwrap());
        let mut home = HomeScreen::new(catalog).unwrap();
        let action = home.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert!(matches!(
            action,
            Some(Action::SwitchScreen(ScreenId::Journey))
        ));
    }
}
