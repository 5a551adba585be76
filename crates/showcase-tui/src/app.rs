//! Application core: event loop, screen management and action dispatch.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use showcase_core::{Carousel, Catalog, ContactMessage, CoreError, MessageSender, TokioTicker};
use showcase_mail::EmailJsClient;

use crate::action::{Action, Notification, NotificationLevel};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::{ScreenContext, create_screens};
use crate::theme::{Palette, ThemeName};
use crate::tui::Tui;
use crate::widgets::indicator;

/// Ticker source for the theme switcher.
pub const THEMES_SOURCE: &str = "themes";

const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

/// Startup settings resolved from config and CLI flags.
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub catalog: Arc<Catalog>,
    pub week_interval: Duration,
    pub week_autoplay: bool,
    pub theme: ThemeName,
    pub theme_interval: Duration,
    pub theme_autoplay: bool,
}

/// Top-level application state and event loop.
pub struct App {
    active_screen: ScreenId,
    /// Previous screen for GoBack.
    previous_screen: Option<ScreenId>,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    running: bool,
    help_visible: bool,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Theme switcher; the active index is the active theme.
    themes: Carousel<TokioTicker<Action>>,
    /// Contact delivery; `None` when no credentials are configured.
    mailer: Option<Arc<EmailJsClient>>,
    notification: Option<(Notification, Instant)>,
}

impl App {
    /// Build every screen and both autoplay carousels. Must run inside the
    /// tokio runtime, since autoplay arms its ticker immediately.
    pub fn new(options: AppOptions, mailer: Option<Arc<EmailJsClient>>) -> Result<Self> {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        let ctx = ScreenContext {
            catalog: options.catalog,
            action_tx: action_tx.clone(),
            week_interval: options.week_interval,
            week_autoplay: options.week_autoplay,
            delivery_configured: mailer.is_some(),
        };
        let screens: HashMap<ScreenId, Box<dyn Component>> =
            create_screens(&ctx)?.into_iter().collect();

        let themes = Carousel::<TokioTicker<Action>>::builder(ThemeName::count())
            .label(THEMES_SOURCE)
            .interval(options.theme_interval)
            .active(options.theme.index())
            .autoplay(options.theme_autoplay)
            .build(TokioTicker::new(
                THEMES_SOURCE,
                action_tx.clone(),
                Action::AutoplayTick,
            ))?;

        Ok(Self {
            active_screen: ScreenId::Home,
            previous_screen: None,
            screens,
            running: true,
            help_visible: false,
            action_tx,
            action_rx,
            themes,
            mailer,
            notification: None,
        })
    }

    pub fn theme(&self) -> ThemeName {
        ThemeName::from_index(self.themes.active_index())
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        let (width, height) = tui.size().unwrap_or((80, 24));
        info!(width, height, theme = %self.theme(), "TUI event loop started");

        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Mouse(mouse) => {
                    if let Some(action) = self.handle_mouse_event(mouse)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize | Event::Render => {
                    self.action_tx.send(Action::Render)?;
                }
                Event::Tick => {
                    self.action_tx.send(Action::Tick)?;
                }
            }

            // Drain everything queued, including autoplay ticks and
            // delivery results posted by background tasks.
            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        tui.exit();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key event to an action. Global keys are handled here;
    /// screen-specific keys are delegated to the active screen component.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        // A screen taking text input gets every key.
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            if screen.captures_input() {
                return screen.handle_key_event(key);
            }
        }

        if self.help_visible {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Ok(Some(Action::ToggleHelp)),
                _ => Ok(None),
            };
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),

            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='9')) => {
                let n = u8::try_from(u32::from(c) - u32::from('0')).unwrap_or(0);
                if let Some(screen) = ScreenId::from_number(n) {
                    return Ok(Some(Action::SwitchScreen(screen)));
                }
            }

            (KeyModifiers::NONE, KeyCode::Tab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.tab().next())));
            }
            (KeyModifiers::SHIFT, KeyCode::BackTab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.tab().prev())));
            }

            (KeyModifiers::NONE, KeyCode::Char('t')) => return Ok(Some(Action::NextTheme)),
            (KeyModifiers::SHIFT, KeyCode::Char('T')) => {
                return Ok(Some(Action::ToggleThemeAutoplay));
            }

            (KeyModifiers::NONE, KeyCode::Esc) => return Ok(Some(Action::GoBack)),

            _ => {}
        }

        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_key_event(key);
        }
        Ok(None)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_mouse_event(mouse);
        }
        Ok(None)
    }

    /// Process a single action: update app state and propagate to components.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.running = false;
            }

            Action::Render => {}

            Action::Tick => {
                if self
                    .notification
                    .as_ref()
                    .is_some_and(|(_, shown)| shown.elapsed() > NOTIFICATION_TTL)
                {
                    self.notification = None;
                }
            }

            Action::SwitchScreen(target) => {
                if *target != self.active_screen {
                    if self.active_screen == ScreenId::Week {
                        self.forward(ScreenId::Journey, &Action::CloseWeek)?;
                    }
                    self.focus(*target);
                }
            }

            Action::GoBack => {
                if self.active_screen == ScreenId::Week {
                    self.action_tx.send(Action::CloseWeek)?;
                } else if let Some(prev) = self.previous_screen.take() {
                    self.action_tx.send(Action::SwitchScreen(prev))?;
                }
            }

            Action::OpenWeek(_) => {
                self.forward(ScreenId::Journey, action)?;
                self.forward(ScreenId::Week, action)?;
                if self.active_screen != ScreenId::Week {
                    self.focus(ScreenId::Week);
                }
            }

            Action::CloseWeek => {
                self.forward(ScreenId::Journey, action)?;
                self.focus(ScreenId::Journey);
                self.previous_screen = None;
            }

            Action::AutoplayTick(tick) if tick.source == THEMES_SOURCE => {
                if self.themes.on_tick(*tick) {
                    debug!(theme = %self.theme(), "theme advanced");
                }
            }

            // Any other ticker belongs to a screen; each filters by source.
            Action::AutoplayTick(_) => {
                for screen in self.screens.values_mut() {
                    if let Some(follow_up) = screen.update(action)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
            }

            Action::NextTheme => {
                self.themes.on_next();
            }

            Action::ToggleThemeAutoplay => {
                self.themes.on_toggle_autoplay();
                let message = if self.themes.autoplay().enabled() {
                    "Cambio automático de tema activado"
                } else {
                    "Cambio automático de tema desactivado"
                };
                self.action_tx.send(Action::Notify(Notification::info(message)))?;
            }

            Action::SubmitContact(message) => {
                self.deliver(message.clone());
            }

            Action::ContactDelivered(_) => {
                self.forward(ScreenId::Contact, action)?;
            }

            Action::ToggleHelp => {
                self.help_visible = !self.help_visible;
            }

            Action::Notify(n) => {
                self.notification = Some((n.clone(), Instant::now()));
            }
        }

        Ok(())
    }

    fn focus(&mut self, target: ScreenId) {
        debug!("switching screen: {} → {}", self.active_screen, target);
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(false);
        }
        self.previous_screen = Some(self.active_screen);
        self.active_screen = target;
        if let Some(screen) = self.screens.get_mut(&target) {
            screen.set_focused(true);
        }
    }

    /// Send an action to one screen and queue its follow-up.
    fn forward(&mut self, target: ScreenId, action: &Action) -> Result<()> {
        if let Some(screen) = self.screens.get_mut(&target) {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    /// Deliver a contact message in the background; the outcome comes back
    /// as `ContactDelivered`.
    fn deliver(&self, message: ContactMessage) {
        let tx = self.action_tx.clone();
        let Some(mailer) = self.mailer.clone() else {
            warn!("contact delivery requested but not configured");
            let _ = tx.send(Action::ContactDelivered(Arc::new(Err(CoreError::Delivery {
                message: "contact delivery is not configured".into(),
                status: None,
            }))));
            return;
        };
        tokio::spawn(async move {
            let outcome = MessageSender::send(mailer.as_ref(), &message).await;
            match &outcome {
                Ok(()) => info!("contact message delivered"),
                Err(e) => warn!(error = %e, "contact delivery failed"),
            }
            let _ = tx.send(Action::ContactDelivered(Arc::new(outcome)));
        });
    }

    // ── Rendering ────────────────────────────────────────────────────

    /// Render the full application frame.
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let palette = self.theme().palette();
        frame.render_widget(Block::default().style(palette.base()), area);

        let [content_area, tab_area, status_area] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, content_area, &palette);
        }
        self.render_tab_bar(frame, tab_area, &palette);
        self.render_status_bar(frame, status_area, &palette);

        if let Some((ref notif, _)) = self.notification {
            render_notification(frame, area, notif, &palette);
        }
        if self.help_visible {
            render_help_overlay(frame, area, &palette);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let current = self.active_screen.tab();
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|&id| {
                let style = if id == current {
                    palette.tab_active()
                } else {
                    palette.tab_inactive()
                };
                Line::from(Span::styled(format!(" {} {} ", id.number(), id.label()), style))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", palette.key_hint()))
            .select(ScreenId::ALL.iter().position(|&s| s == current).unwrap_or(0));
        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let hints = self
            .screens
            .get(&self.active_screen)
            .map_or("", |s| s.hints());

        let line = Line::from(vec![
            Span::styled(format!(" ◐ {}", self.theme()), palette.emphasis()),
            Span::raw(" "),
            indicator::autoplay_badge(self.themes.phase(), palette),
            Span::styled(" │ ", palette.key_hint()),
            Span::styled(hints, palette.key_hint()),
            Span::styled("  t tema  ? ayuda  q salir", palette.key_hint()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(4));
    let x = (area.width.saturating_sub(width)) / 2;
    let y = (area.height.saturating_sub(height)) / 2;
    Rect::new(area.x + x, area.y + y, width, height)
}

fn render_help_overlay(frame: &mut Frame, area: Rect, palette: &Palette) {
    let help_area = centered(area, 58, 20);
    frame.render_widget(Clear, help_area);

    let block = Block::default()
        .title(" Atajos de teclado ")
        .title_style(palette.title())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(palette.border_focused())
        .style(palette.base());
    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let row = |keys: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {keys:<12}"), palette.key_hint_key()),
            Span::styled(what, palette.key_hint()),
        ])
    };
    let heading = |text: &'static str| Line::from(Span::styled(format!("  {text}"), palette.title()));

    let help_text = vec![
        Line::from(""),
        heading("Global"),
        row("1-3 Tab", "Cambiar de pantalla"),
        row("t / T", "Siguiente tema / tema automático"),
        row("Esc", "Volver"),
        row("? q", "Ayuda / salir"),
        Line::from(""),
        heading("Semanas"),
        row("h/l ←/→", "Semana anterior / siguiente"),
        row("p", "Autoplay on/off (pausa con el ratón)"),
        row("Enter", "Abrir la semana"),
        Line::from(""),
        heading("Detalle de semana"),
        row("h/l  j/k", "Pestaña / elemento"),
        row("Enter  o", "Expandir / objetivo-código"),
        row("[ ]", "Semana anterior / siguiente"),
        Line::from(""),
        Line::from(Span::styled("  Esc o ? para cerrar", palette.key_hint())),
    ];
    frame.render_widget(Paragraph::new(help_text), inner);
}

/// Toast in the bottom-right corner, above the status bar.
fn render_notification(frame: &mut Frame, area: Rect, notif: &Notification, palette: &Palette) {
    let msg_len = u16::try_from(notif.message.chars().count()).unwrap_or(u16::MAX);
    let width = msg_len.saturating_add(6).clamp(20, 70).min(area.width);
    let height = 3u16.min(area.height);
    let x = area.width.saturating_sub(width + 1);
    let y = area.height.saturating_sub(height + 2);
    let toast_area = Rect::new(area.x + x, area.y + y, width, height);

    let (style, icon) = match notif.level {
        NotificationLevel::Success => (palette.success(), "✓"),
        NotificationLevel::Error => (palette.error(), "✗"),
        NotificationLevel::Info => (palette.emphasis(), "·"),
    };

    frame.render_widget(Clear, toast_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(style)
        .style(palette.base());
    let inner = block.inner(toast_area);
    frame.render_widget(block, toast_area);

    let line = Line::from(vec![
        Span::styled(format!(" {icon} "), style),
        Span::styled(notif.message.as_str(), palette.text()),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}
