//! Week detail page.
//!
//! Layout:
//! ┌─ ≡ Semana 3 · CSS ─────────────────────────────────────────┐
//! │ subtitle / description / technologies                      │
//! ├────────────────────────────────────────────────────────────┤
//! │ Contenido  [Ejemplos]  Recursos                            │
//! │ ▾ Selectores                                               │
//! │     • topic                                                │
//! │ ▸ Box model                                                │
//! └────────────────────────────────────────────────────────────┘
//!
//! Every list is its own carousel: the panel tabs, the syllabus accordion,
//! the example list and the objective/code toggle. They are rebuilt
//! whenever a different week is opened.

use std::sync::Arc;

use color_eyre::eyre::{Result, eyre};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};
use tracing::debug;

use showcase_core::{Carousel, Catalog, CoreError, ManualTicker, Week};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::theme::{Palette, hex_color};
use crate::widgets::sub_tabs;

/// Panels of the week page, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::VariantArray)]
pub enum Panel {
    Content,
    Examples,
    Resources,
}

impl Panel {
    pub fn label(self) -> &'static str {
        match self {
            Self::Content => "Contenido",
            Self::Examples => "Ejemplos",
            Self::Resources => "Recursos",
        }
    }

    fn from_index(index: usize) -> Self {
        <Self as strum::VariantArray>::VARIANTS
            .get(index)
            .copied()
            .unwrap_or(Self::Content)
    }
}

type PanelRenderer = fn(&WeekScreen, &mut Frame, Rect, &Palette);

const PANEL_RENDERERS: [(Panel, PanelRenderer); 3] = [
    (Panel::Content, WeekScreen::render_content),
    (Panel::Examples, WeekScreen::render_examples),
    (Panel::Resources, WeekScreen::render_resources),
];

const EXAMPLE_VIEWS: [&str; 2] = ["Objetivo", "Código"];

fn list(label: &'static str, len: usize) -> Result<Option<Carousel<ManualTicker>>, CoreError> {
    if len == 0 {
        return Ok(None);
    }
    Carousel::<ManualTicker>::builder(len)
        .label(label)
        .build(ManualTicker::new(label))
        .map(Some)
}

pub struct WeekScreen {
    catalog: Arc<Catalog>,
    index: usize,
    tabs: Carousel<ManualTicker>,
    sections: Option<Carousel<ManualTicker>>,
    examples: Option<Carousel<ManualTicker>>,
    example_view: Carousel<ManualTicker>,
    resources: Option<Carousel<ManualTicker>>,
}

impl WeekScreen {
    pub fn new(catalog: Arc<Catalog>) -> Result<Self> {
        let tabs = Carousel::<ManualTicker>::builder(PANEL_RENDERERS.len())
            .label("week-panels")
            .build(ManualTicker::new("week-panels"))?;
        let example_view = Carousel::<ManualTicker>::builder(EXAMPLE_VIEWS.len())
            .label("example-view")
            .build(ManualTicker::new("example-view"))?;
        let mut screen = Self {
            catalog,
            index: 0,
            tabs,
            sections: None,
            examples: None,
            example_view,
            resources: None,
        };
        screen.load(0)?;
        Ok(screen)
    }

    /// Show the week at `index`, rebuilding every per-week carousel.
    pub fn load(&mut self, index: usize) -> Result<()> {
        let week = self.catalog.week_at(index).ok_or(CoreError::OutOfRange {
            index,
            len: self.catalog.len(),
        })?;
        self.sections = list("sections", week.sections.len())?;
        self.examples = list("examples", week.examples.len())?;
        self.resources = list("resources", week.resources.len())?;
        self.tabs.on_jump_to(0)?;
        self.example_view.on_jump_to(0)?;
        self.index = index;
        debug!(week = %week.slug, "week page loaded");
        Ok(())
    }

    pub fn panel(&self) -> Panel {
        Panel::from_index(self.tabs.active_index())
    }

    fn week(&self) -> Result<&Week> {
        self.catalog
            .week_at(self.index)
            .ok_or_else(|| eyre!("week {} missing from catalog", self.index))
    }

    /// The list the cursor keys move through on the current panel.
    fn cursor_mut(&mut self) -> Option<&mut Carousel<ManualTicker>> {
        match self.panel() {
            Panel::Content => self.sections.as_mut(),
            Panel::Examples => self.examples.as_mut(),
            Panel::Resources => self.resources.as_mut(),
        }
    }

    fn activate(&mut self) -> Result<Option<Action>> {
        match self.panel() {
            Panel::Content => {
                if let Some(sections) = self.sections.as_mut() {
                    sections.on_toggle_expand(sections.active_index())?;
                }
            }
            Panel::Examples => {
                if let Some(examples) = self.examples.as_mut() {
                    let active = examples.active_index();
                    // One example detail open at a time.
                    if !examples.is_expanded(active) {
                        examples.collapse_all();
                    }
                    examples.on_toggle_expand(active)?;
                }
            }
            Panel::Resources => {
                let Some(cursor) = self.resources.as_ref().map(Carousel::active_index) else {
                    return Ok(None);
                };
                let week = self.week()?;
                if let Some(resource) = week.resources.get(cursor) {
                    return Ok(Some(Action::Notify(Notification::info(format!(
                        "{}: {}",
                        resource.name, resource.url
                    )))));
                }
            }
        }
        Ok(None)
    }

    fn step_week(&self, forward: bool) -> Action {
        let len = self.catalog.len();
        let next = if forward {
            (self.index + 1) % len
        } else {
            (self.index + len - 1) % len
        };
        Action::OpenWeek(next)
    }

    // ── Panels ───────────────────────────────────────────────────────

    fn render_content(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let (Ok(week), Some(sections)) = (self.week(), self.sections.as_ref()) else {
            empty(frame, area, "Sin contenido", palette);
            return;
        };

        let mut lines = Vec::new();
        let mut active_line = 0;
        for (i, section) in week.sections.iter().enumerate() {
            let open = sections.is_expanded(i);
            let marker = if open { "▾ " } else { "▸ " };
            let style = if i == sections.active_index() {
                active_line = lines.len();
                palette.selected()
            } else {
                palette.text()
            };
            lines.push(Line::from(Span::styled(format!("{marker}{}", section.name), style)));
            if open {
                lines.extend(section.topics.iter().map(|topic| {
                    Line::from(vec![
                        Span::styled("    • ", palette.muted()),
                        Span::styled(topic.as_str(), palette.text()),
                    ])
                }));
            }
        }
        frame.render_widget(
            Paragraph::new(lines).scroll((scroll_for(active_line, area.height), 0)),
            area,
        );
    }

    fn render_examples(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let (Ok(week), Some(examples)) = (self.week(), self.examples.as_ref()) else {
            empty(frame, area, "Sin ejemplos", palette);
            return;
        };

        let list_height = u16::try_from(week.examples.len() * 2).unwrap_or(u16::MAX);
        let [list_area, detail_area] =
            Layout::vertical([Constraint::Length(list_height), Constraint::Min(0)]).areas(area);

        let mut lines = Vec::new();
        for (i, example) in week.examples.iter().enumerate() {
            let marker = if examples.is_expanded(i) { "▾ " } else { "▸ " };
            let style = if i == examples.active_index() {
                palette.selected()
            } else {
                palette.text()
            };
            lines.push(Line::from(Span::styled(
                format!("{marker}{} {}", week.glyph.symbol(), example.title),
                style,
            )));
            lines.push(Line::from(Span::styled(
                format!("    {}", example.description),
                palette.muted(),
            )));
        }
        frame.render_widget(Paragraph::new(lines), list_area);

        let Some(open) = examples.expanded().iter().next().copied() else {
            return;
        };
        let Some(example) = week.examples.get(open) else {
            return;
        };
        let block = Block::default()
            .title(format!(" {} ", example.title))
            .title_style(palette.title())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(palette.border_focused());
        let inner = block.inner(detail_area);
        frame.render_widget(block, detail_area);

        let [tabs_area, body_area] =
            Layout::vertical([Constraint::Length(2), Constraint::Min(0)]).areas(inner);
        frame.render_widget(
            Paragraph::new(sub_tabs::render_sub_tabs(
                &EXAMPLE_VIEWS,
                self.example_view.active_index(),
                palette,
            )),
            tabs_area,
        );
        let body = if self.example_view.active_index() == 0 {
            Paragraph::new(example.objective.as_str())
                .style(palette.text())
                .wrap(Wrap { trim: true })
        } else {
            Paragraph::new(example.code.as_str()).style(palette.emphasis())
        };
        frame.render_widget(body, body_area);
    }

    fn render_resources(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let (Ok(week), Some(resources)) = (self.week(), self.resources.as_ref()) else {
            empty(frame, area, "Sin recursos", palette);
            return;
        };
        let lines: Vec<Line> = week
            .resources
            .iter()
            .enumerate()
            .flat_map(|(i, resource)| {
                let style = if i == resources.active_index() {
                    palette.selected()
                } else {
                    palette.text()
                };
                [
                    Line::from(Span::styled(format!("↗ {}", resource.name), style)),
                    Line::from(Span::styled(format!("  {}", resource.url), palette.muted())),
                ]
            })
            .collect();
        let active_line = resources.active_index() * 2;
        frame.render_widget(
            Paragraph::new(lines).scroll((scroll_for(active_line, area.height), 0)),
            area,
        );
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, week: &Week, palette: &Palette) {
        let accent = hex_color(&week.accent, palette.accent);
        let block = Block::default()
            .title(format!(
                " {} Semana {} · {} ",
                week.glyph.symbol(),
                week.number,
                week.title
            ))
            .title_style(Style::default().fg(accent).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(accent));
        let mut lines = vec![
            Line::from(Span::styled(week.subtitle.as_str(), palette.emphasis())),
            Line::from(Span::styled(week.description.as_str(), palette.text())),
        ];
        if !week.technologies.is_empty() {
            lines.push(Line::from(Span::styled(
                week.technologies.join(" · "),
                palette.muted(),
            )));
        }
        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
            area,
        );
    }
}

fn empty(frame: &mut Frame, area: Rect, text: &'static str, palette: &Palette) {
    frame.render_widget(Paragraph::new(text).style(palette.muted()), area);
}

/// Scroll offset that keeps `line` inside a viewport of `height` rows.
fn scroll_for(line: usize, height: u16) -> u16 {
    let line = u16::try_from(line).unwrap_or(u16::MAX);
    if line < height {
        0
    } else {
        line + 1 - height
    }
}

impl Component for WeekScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('l') | KeyCode::Right => {
                self.tabs.on_next();
            }
            KeyCode::Char('h') | KeyCode::Left => {
                self.tabs.on_previous();
            }
            KeyCode::Char('j') | KeyCode::Down => {
                if let Some(cursor) = self.cursor_mut() {
                    cursor.on_next();
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if let Some(cursor) = self.cursor_mut() {
                    cursor.on_previous();
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => return self.activate(),
            KeyCode::Char('o') if self.panel() == Panel::Examples => {
                self.example_view.on_next();
            }
            KeyCode::Char('c') => {
                if let Some(cursor) = self.cursor_mut() {
                    cursor.collapse_all();
                }
            }
            KeyCode::Char(']') => return Ok(Some(self.step_week(true))),
            KeyCode::Char('[') => return Ok(Some(self.step_week(false))),
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::OpenWeek(index) = action {
            self.load(*index)?;
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let Ok(week) = self.week() else {
            return;
        };
        let [header, tabs, body] = Layout::vertical([
            Constraint::Length(6),
            Constraint::Length(2),
            Constraint::Min(3),
        ])
        .areas(area);

        self.render_header(frame, header, week, palette);

        let labels: Vec<&str> = PANEL_RENDERERS.iter().map(|(p, _)| p.label()).collect();
        frame.render_widget(
            Paragraph::new(sub_tabs::render_sub_tabs(
                &labels,
                self.tabs.active_index(),
                palette,
            )),
            tabs,
        );

        let panel = self.panel();
        if let Some((_, renderer)) = PANEL_RENDERERS.iter().find(|(p, _)| *p == panel) {
            renderer(self, frame, body, palette);
        }
    }

    fn hints(&self) -> &'static str {
        "h/l pestaña  j/k mover  Enter abrir  o objetivo/código  [/] semana  Esc volver"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn screen() -> WeekScreen {
        WeekScreen::new(Arc::new(Catalog::embedded().unwrap())).unwrap()
    }

    #[test]
    fn tabs_cycle_through_panels() {
        let mut s = screen();
        assert_eq!(s.panel(), Panel::Content);
        s.handle_key_event(key(KeyCode::Right)).unwrap();
        assert_eq!(s.panel(), Panel::Examples);
        s.handle_key_event(key(KeyCode::Right)).unwrap();
        assert_eq!(s.panel(), Panel::Resources);
        s.handle_key_event(key(KeyCode::Right)).unwrap();
        assert_eq!(s.panel(), Panel::Content);
    }

    #[test]
    fn sections_expand_independently() {
        let mut s = screen();
        s.handle_key_event(key(KeyCode::Enter)).unwrap();
        s.handle_key_event(key(KeyCode::Down)).unwrap();
        s.handle_key_event(key(KeyCode::Enter)).unwrap();
        let sections = s.sections.as_ref().unwrap();
        assert!(sections.is_expanded(0));
        assert!(sections.is_expanded(1));

        s.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert!(!s.sections.as_ref().unwrap().is_expanded(1));
        assert!(s.sections.as_ref().unwrap().is_expanded(0));
    }

    #[test]
    fn one_example_open_at_a_time() {
        let mut s = screen();
        s.handle_key_event(key(KeyCode::Right)).unwrap();
        s.handle_key_event(key(KeyCode::Enter)).unwrap();
        s.handle_key_event(key(KeyCode::Down)).unwrap();
        s.handle_key_event(key(KeyCode::Enter)).unwrap();
        let examples = s.examples.as_ref().unwrap();
        assert_eq!(examples.expanded().iter().copied().collect::<Vec<_>>(), vec![1]);

        s.handle_key_event(key(KeyCode::Char('o'))).unwrap();
        assert_eq!(s.example_view.active_index(), 1);
        s.handle_key_event(key(KeyCode::Char('o'))).unwrap();
        assert_eq!(s.example_view.active_index(), 0);
    }

    #[test]
    fn resource_enter_reports_the_link() {
        let mut s = screen();
        s.handle_key_event(key(KeyCode::Left)).unwrap();
        assert_eq!(s.panel(), Panel::Resources);
        let action = s.handle_key_event(key(KeyCode::Enter)).unwrap();
        let Some(Action::Notify(n)) = action else {
            panic!("expected a notification, got {action:?}");
        };
        assert!(n.message.contains("http"), "got: {}", n.message);
    }

    #[test]
    fn opening_another_week_rebuilds_state() {
        let mut s = screen();
        s.handle_key_event(key(KeyCode::Enter)).unwrap();
        s.handle_key_event(key(KeyCode::Right)).unwrap();
        assert!(s.sections.as_ref().unwrap().is_expanded(0));

        s.update(&Action::OpenWeek(3)).unwrap();
        assert_eq!(s.index, 3);
        assert_eq!(s.panel(), Panel::Content);
        assert!(s.sections.as_ref().unwrap().expanded().is_empty());
        assert_eq!(s.sections.as_ref().unwrap().active_index(), 0);
    }

    #[test]
    fn bracket_keys_step_weeks_with_wrap() {
        let mut s = screen();
        let len = s.catalog.len();
        assert!(matches!(
            s.handle_key_event(key(KeyCode::Char('['))).unwrap(),
            Some(Action::OpenWeek(i)) if i == len - 1
        ));
        assert!(matches!(
            s.handle_key_event(key(KeyCode::Char(']'))).unwrap(),
            Some(Action::OpenWeek(1))
        ));
    }

    #[test]
    fn unknown_week_is_rejected() {
        let mut s = screen();
        assert!(s.load(99).is_err());
        assert_eq!(s.index, 0);
    }

    #[test]
    fn empty_lists_have_no_carousel() {
        assert!(list("x", 0).unwrap().is_none());
        assert_eq!(list("x", 3).unwrap().unwrap().len(), 3);
    }

    #[test]
    fn scroll_keeps_line_visible() {
        assert_eq!(scroll_for(2, 10), 0);
        assert_eq!(scroll_for(10, 10), 1);
        assert_eq!(scroll_for(25, 10), 16);
    }
}
