//! Journey screen: the week carousel.
//!
//! Layout:
//! ┌─ Recorrido del curso ─────────────────────── ▶ auto · 5s ─┐
//! │  ‹ 1 Sílabo  │ ┌─ ≡ Semana 2 ───────────────┐ │ 3 CSS ›    │
//! │              │ │ title / subtitle / summary  │ │            │
//! │              │ │ technologies                │ │            │
//! │              │ └─────────────────────────────┘ │            │
//! │                      ○ ● ○ ○ ○ ○ ○                         │
//! │ ━━━━━━━━━━━━━━━━━━━━━━━━━━━━──────────────── Semana 2 de 7 │
//! └────────────────────────────────────────────────────────────┘
//!
//! Autoplay pauses while the mouse is over the card or the dots, and while
//! the week page opened from this card is showing.

use std::cell::Cell;
use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, LineGauge, Paragraph, Wrap};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use showcase_core::{Carousel, Catalog, TokioTicker, Week};

use crate::action::Action;
use crate::component::Component;
use crate::theme::{Palette, hex_color};
use crate::widgets::indicator::{self, DOT_WIDTH};

/// Ticker source for the week carousel.
pub const WEEKS_SOURCE: &str = "weeks";

pub struct JourneyScreen {
    catalog: Arc<Catalog>,
    weeks: Carousel<TokioTicker<Action>>,
    /// Hover targets from the last frame.
    card_area: Cell<Rect>,
    dots_area: Cell<Rect>,
    hovered: bool,
}

impl JourneyScreen {
    /// Mounts the carousel; arms its ticker when `autoplay` is on, so this
    /// must run inside the tokio runtime.
    pub fn new(
        catalog: Arc<Catalog>,
        action_tx: UnboundedSender<Action>,
        interval: Duration,
        autoplay: bool,
    ) -> Result<Self> {
        let ticker = TokioTicker::new(WEEKS_SOURCE, action_tx, Action::AutoplayTick);
        let weeks = Carousel::<TokioTicker<Action>>::builder(catalog.len())
            .label(WEEKS_SOURCE)
            .interval(interval)
            .autoplay(autoplay)
            .build(ticker)?;
        Ok(Self {
            catalog,
            weeks,
            card_area: Cell::new(Rect::default()),
            dots_area: Cell::new(Rect::default()),
            hovered: false,
        })
    }

    fn week_at(&self, offset: isize) -> Option<&Week> {
        let len = self.weeks.len();
        let active = self.weeks.active_index();
        let index = match offset {
            -1 => (active + len - 1) % len,
            1 => (active + 1) % len,
            _ => active,
        };
        self.catalog.week_at(index)
    }

    fn set_hovered(&mut self, hovered: bool) {
        if hovered == self.hovered {
            return;
        }
        self.hovered = hovered;
        if hovered {
            self.weeks.on_pointer_enter();
        } else {
            self.weeks.on_pointer_leave();
        }
    }

    fn open_active(&self) -> Action {
        Action::OpenWeek(self.weeks.active_index())
    }

    fn render_card(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let Some(week) = self.week_at(0) else {
            return;
        };
        let accent = hex_color(&week.accent, palette.accent);
        let block = Block::default()
            .title(format!(" {} Semana {} ", week.glyph.symbol(), week.number))
            .title_style(Style::default().fg(accent).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_type(BorderType::Thick)
            .border_style(Style::default().fg(accent));

        let mut lines = vec![
            Line::from(Span::styled(
                week.title.as_str(),
                palette.text().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(week.subtitle.as_str(), Style::default().fg(accent))),
            Line::from(""),
            Line::from(Span::styled(week.summary.as_str(), palette.text())),
            Line::from(""),
        ];
        if !week.technologies.is_empty() {
            lines.push(Line::from(vec![
                Span::styled("Tecnologías: ", palette.muted()),
                Span::styled(week.technologies.join(" · "), palette.emphasis()),
            ]));
            lines.push(Line::from(""));
        }
        lines.push(Line::from(vec![
            Span::styled("Enter", palette.key_hint_key()),
            Span::styled(" ver detalles", palette.key_hint()),
        ]));

        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
            area,
        );
    }

    fn render_peek(&self, frame: &mut Frame, area: Rect, offset: isize, palette: &Palette) {
        if self.weeks.len() < 2 {
            return;
        }
        let Some(week) = self.week_at(offset) else {
            return;
        };
        let arrow = if offset < 0 { "‹" } else { "›" };
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("{arrow} {}", week.number),
                palette.muted().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(week.title.as_str(), palette.muted())),
        ];
        let alignment = if offset < 0 {
            Alignment::Left
        } else {
            Alignment::Right
        };
        frame.render_widget(
            Paragraph::new(lines)
                .alignment(alignment)
                .wrap(Wrap { trim: true }),
            area,
        );
    }

    fn render_dots(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let len = self.weeks.len();
        let width = u16::try_from(len)
            .unwrap_or(u16::MAX)
            .saturating_mul(DOT_WIDTH)
            .min(area.width);
        let dots_area = Rect::new(area.x + (area.width - width) / 2, area.y, width, 1);
        self.dots_area.set(dots_area);
        frame.render_widget(
            Paragraph::new(indicator::dots(len, self.weeks.active_index(), palette)),
            dots_area,
        );
    }

    fn render_progress(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let len = self.weeks.len();
        let active = self.weeks.active_index();
        let gauge = LineGauge::default()
            .ratio(indicator::progress_ratio(active, len))
            .label(Span::styled(
                format!("Semana {} de {len}", active + 1),
                palette.muted(),
            ))
            .filled_style(Style::default().fg(palette.accent))
            .unfilled_style(palette.muted());
        frame.render_widget(gauge, area);
    }
}

impl Component for JourneyScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('l') | KeyCode::Right => {
                self.weeks.on_next();
            }
            KeyCode::Char('h') | KeyCode::Left => {
                self.weeks.on_previous();
            }
            KeyCode::Char('g') | KeyCode::Home => {
                self.weeks.on_jump_to(0)?;
            }
            KeyCode::Char('G') | KeyCode::End => {
                self.weeks.on_jump_to(self.weeks.len() - 1)?;
            }
            KeyCode::Char('p') => {
                self.weeks.on_toggle_autoplay();
                debug!(phase = %self.weeks.phase(), "week autoplay toggled");
            }
            KeyCode::Enter | KeyCode::Char(' ') => return Ok(Some(self.open_active())),
            _ => {}
        }
        Ok(None)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        let at = Position::new(mouse.column, mouse.row);
        let on_card = self.card_area.get().contains(at);
        let on_dots = self.dots_area.get().contains(at);

        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                self.set_hovered(on_card || on_dots);
            }
            MouseEventKind::Down(MouseButton::Left) if on_dots => {
                if let Some(index) = indicator::dot_at(self.dots_area.get(), mouse.column, self.weeks.len()) {
                    self.weeks.on_jump_to(index)?;
                }
            }
            MouseEventKind::Down(MouseButton::Left) if on_card => {
                return Ok(Some(self.open_active()));
            }
            MouseEventKind::ScrollDown if on_card => {
                self.weeks.on_next();
            }
            MouseEventKind::ScrollUp if on_card => {
                self.weeks.on_previous();
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::AutoplayTick(tick) if tick.source == WEEKS_SOURCE => {
                self.weeks.on_tick(*tick);
            }
            Action::OpenWeek(index) => {
                self.weeks.on_jump_to(*index)?;
                self.weeks.on_focus_enter();
            }
            Action::CloseWeek => {
                self.weeks.on_focus_leave();
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let interval = humantime::format_duration(self.weeks.autoplay().interval());
        let block = Block::default()
            .title(" Recorrido del curso ")
            .title_style(palette.title())
            .title(
                Line::from(vec![
                    Span::raw(" "),
                    indicator::autoplay_badge(self.weeks.phase(), palette),
                    Span::styled(format!(" · {interval} "), palette.muted()),
                ])
                .right_aligned(),
            )
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(palette.border());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [body, _, dots, progress] = Layout::vertical([
            Constraint::Min(8),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);
        let [left, card, right] = Layout::horizontal([
            Constraint::Length(16),
            Constraint::Min(30),
            Constraint::Length(16),
        ])
        .spacing(1)
        .areas(body);

        self.card_area.set(card);
        self.render_peek(frame, left, -1, palette);
        self.render_card(frame, card, palette);
        self.render_peek(frame, right, 1, palette);
        self.render_dots(frame, dots, palette);
        self.render_progress(frame, progress, palette);
    }

    fn set_focused(&mut self, focused: bool) {
        if !focused {
            self.set_hovered(false);
        }
    }

    fn hints(&self) -> &'static str {
        "h/l semana  g/G inicio/fin  p autoplay  Enter detalles"
    }
}
