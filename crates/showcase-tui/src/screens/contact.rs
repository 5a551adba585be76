//! Contact screen: the message form plus the author's channels.
//!
//! Layout:
//! ┌─ Escríbeme ─────────────────────────┐┌─ Canales ──────────────┐
//! │ Nombre *                             ││ Email   …             │
//! │ > Ada Lovelace▏                      ││ GitHub  …             │
//! │ Email *                              ││                        │
//! │   ada@example.com                    ││                        │
//! │ …                                    ││                        │
//! │ [ Enviar ]   status                  ││                        │
//! └──────────────────────────────────────┘└────────────────────────┘
//!
//! Enter on a field starts editing; while editing every key goes to the
//! form and Esc stops. Enter on the send button (or Ctrl+S anywhere)
//! submits.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};
use strum::IntoEnumIterator;
use tracing::info;

use showcase_core::{Carousel, Catalog, ContactField, ContactForm, CoreError, FormStatus, ManualTicker};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::theme::Palette;

fn label(field: ContactField) -> &'static str {
    match field {
        ContactField::Name => "Nombre",
        ContactField::Email => "Email",
        ContactField::Subject => "Asunto",
        ContactField::Message => "Mensaje",
        ContactField::Company => "Empresa",
    }
}

pub struct ContactScreen {
    catalog: Arc<Catalog>,
    form: ContactForm,
    fields: Vec<ContactField>,
    /// Over every field plus the send button.
    cursor: Carousel<ManualTicker>,
    editing: bool,
    /// Validation problems from the last submit attempt, by field key.
    problems: Vec<(&'static str, String)>,
    just_sent: bool,
    delivery_configured: bool,
}

impl ContactScreen {
    pub fn new(catalog: Arc<Catalog>, delivery_configured: bool) -> Result<Self> {
        let fields: Vec<ContactField> = ContactField::iter().collect();
        let cursor = Carousel::<ManualTicker>::builder(fields.len() + 1)
            .label("contact-fields")
            .build(ManualTicker::new("contact-fields"))?;
        Ok(Self {
            catalog,
            form: ContactForm::new(),
            fields,
            cursor,
            editing: false,
            problems: Vec::new(),
            just_sent: false,
            delivery_configured,
        })
    }

    #[cfg(test)]
    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    /// Field under the cursor; `None` when the send button is selected.
    fn selected_field(&self) -> Option<ContactField> {
        self.fields.get(self.cursor.active_index()).copied()
    }

    fn problem_for(&self, field: ContactField) -> Option<&str> {
        self.problems
            .iter()
            .find(|(key, _)| *key == field.key())
            .map(|(_, reason)| reason.as_str())
    }

    fn submit(&mut self) -> Option<Action> {
        self.editing = false;
        match self.form.begin_submit() {
            Ok(message) => {
                self.problems.clear();
                info!("contact message submitted");
                Some(Action::SubmitContact(message))
            }
            Err(CoreError::Validation { .. }) => {
                self.problems = self
                    .form
                    .message()
                    .problems()
                    .into_iter()
                    .filter_map(|p| match p {
                        CoreError::Validation { field, reason } => Some((field, reason)),
                        _ => None,
                    })
                    .collect();
                Some(Action::Notify(Notification::error(
                    "Revisa los campos marcados",
                )))
            }
            Err(other) => Some(Action::Notify(Notification::error(other.to_string()))),
        }
    }

    fn edit_key(&mut self, key: KeyEvent) -> Option<Action> {
        let Some(field) = self.selected_field() else {
            self.editing = false;
            return None;
        };
        match key.code {
            KeyCode::Esc => self.editing = false,
            KeyCode::Enter | KeyCode::Tab => {
                self.cursor.on_next();
                self.editing = self.selected_field().is_some();
            }
            KeyCode::Backspace => {
                self.just_sent = false;
                self.form.pop_char(field);
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.just_sent = false;
                self.form.push_char(field, c);
            }
            _ => {}
        }
        None
    }

    fn render_form(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let block = Block::default()
            .title(" Escríbeme ")
            .title_style(palette.title())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.editing {
                palette.border_focused()
            } else {
                palette.border()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let message = self.form.message();
        let mut lines = Vec::new();
        for (i, field) in self.fields.iter().copied().enumerate() {
            let selected = i == self.cursor.active_index();
            let mut title = vec![Span::styled(label(field), palette.emphasis())];
            if field.is_required() {
                title.push(Span::styled(" *", palette.muted()));
            }
            if let Some(reason) = self.problem_for(field) {
                title.push(Span::styled(format!("  {reason}"), palette.error()));
            }
            lines.push(Line::from(title));

            let value = message.get(field);
            let mut row = vec![Span::styled(
                if selected { "> " } else { "  " },
                palette.key_hint_key(),
            )];
            if value.is_empty() && !(selected && self.editing) {
                let hint = if field == ContactField::Company {
                    "(opcional)"
                } else {
                    "…"
                };
                row.push(Span::styled(hint, palette.muted()));
            } else {
                row.push(Span::styled(
                    value,
                    if selected { palette.selected() } else { palette.text() },
                ));
            }
            if selected && self.editing {
                row.push(Span::styled("▏", palette.emphasis()));
            }
            lines.push(Line::from(row));
        }

        lines.push(Line::from(""));
        let on_button = self.selected_field().is_none();
        let mut footer = vec![Span::styled(
            "[ Enviar ]",
            if on_button {
                palette.selected()
            } else {
                palette.text().add_modifier(Modifier::BOLD)
            },
        )];
        footer.push(Span::raw("  "));
        footer.push(match self.form.status() {
            FormStatus::Submitting => Span::styled("Enviando…", palette.warning()),
            FormStatus::Failed(reason) => {
                Span::styled(format!("No se pudo enviar: {reason}"), palette.error())
            }
            FormStatus::Sent | FormStatus::Idle if self.just_sent => {
                Span::styled("¡Mensaje enviado!", palette.success())
            }
            FormStatus::Sent | FormStatus::Idle => Span::raw(""),
        });
        lines.push(Line::from(footer));

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }

    fn render_channels(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let block = Block::default()
            .title(" Canales ")
            .title_style(palette.title())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(palette.border());

        let mut lines = Vec::new();
        for channel in &self.catalog.profile().contacts {
            lines.push(Line::from(Span::styled(channel.label.as_str(), palette.emphasis())));
            lines.push(Line::from(Span::styled(channel.value.as_str(), palette.text())));
            lines.push(Line::from(Span::styled(channel.note.as_str(), palette.muted())));
            lines.push(Line::from(""));
        }
        if !self.delivery_configured {
            lines.push(Line::from(Span::styled(
                "El envío de mensajes no está configurado.",
                palette.warning(),
            )));
        }
        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
            area,
        );
    }
}

impl Component for ContactScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
            return Ok(self.submit());
        }
        if self.editing {
            return Ok(self.edit_key(key));
        }
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.cursor.on_next();
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.cursor.on_previous();
            }
            KeyCode::Enter | KeyCode::Char('i') => {
                if self.selected_field().is_some() {
                    self.editing = true;
                } else {
                    return Ok(self.submit());
                }
            }
            KeyCode::Char('r') => {
                self.form.reset();
                self.problems.clear();
                self.just_sent = false;
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        let Action::ContactDelivered(outcome) = action else {
            return Ok(None);
        };
        self.form.finish(outcome);
        let follow_up = match self.form.status().clone() {
            FormStatus::Sent => {
                self.form.reset();
                self.cursor.on_jump_to(0)?;
                self.just_sent = true;
                Notification::success("Mensaje enviado, ¡gracias!")
            }
            FormStatus::Failed(reason) => {
                Notification::error(format!("No se pudo enviar: {reason}"))
            }
            FormStatus::Idle | FormStatus::Submitting => return Ok(None),
        };
        Ok(Some(Action::Notify(follow_up)))
    }

    fn render(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let [form, channels] =
            Layout::horizontal([Constraint::Percentage(62), Constraint::Percentage(38)]).areas(area);
        self.render_form(frame, form, palette);
        self.render_channels(frame, channels, palette);
    }

    fn set_focused(&mut self, focused: bool) {
        if !focused {
            self.editing = false;
        }
    }

    fn captures_input(&self) -> bool {
        self.editing
    }

    fn hints(&self) -> &'static str {
        if self.editing {
            "escribir  Enter siguiente  Esc terminar  Ctrl+S enviar"
        } else {
            "j/k campo  Enter editar/enviar  r limpiar  Ctrl+S enviar"
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn screen() -> ContactScreen {
        ContactScreen::new(Arc::new(Catalog::embedded().unwrap()), true).unwrap()
    }

    fn type_text(s: &mut ContactScreen, text: &str) {
        for c in text.chars() {
            s.handle_key_event(key(KeyCode::Char(c))).unwrap();
        }
    }

    fn fill(s: &mut ContactScreen) {
        s.handle_key_event(key(KeyCode::Enter)).unwrap();
        type_text(s, "Ada Lovelace");
        s.handle_key_event(key(KeyCode::Enter)).unwrap();
        type_text(s, "ada@example.com");
        s.handle_key_event(key(KeyCode::Enter)).unwrap();
        type_text(s, "Curso");
        s.handle_key_event(key(KeyCode::Enter)).unwrap();
        type_text(s, "Quisiera más información.");
        s.handle_key_event(key(KeyCode::Esc)).unwrap();
    }

    #[test]
    fn editing_captures_global_keys() {
        let mut s = screen();
        assert!(!s.captures_input());
        s.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert!(s.captures_input());
        type_text(&mut s, "q1");
        s.handle_key_event(key(KeyCode::Backspace)).unwrap();
        assert_eq!(s.form().message().name, "q");
        s.handle_key_event(key(KeyCode::Esc)).unwrap();
        assert!(!s.captures_input());
    }

    #[test]
    fn invalid_submit_marks_fields() {
        let mut s = screen();
        let ctrl_s = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        let action = s.handle_key_event(ctrl_s).unwrap();
        assert!(matches!(action, Some(Action::Notify(_))));
        assert_eq!(s.form().status(), &FormStatus::Idle);
        assert!(s.problem_for(ContactField::Name).is_some());
        assert!(s.problem_for(ContactField::Company).is_none());
    }

    #[test]
    fn valid_submit_emits_message() {
        let mut s = screen();
        fill(&mut s);
        let ctrl_s = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        let Some(Action::SubmitContact(message)) = s.handle_key_event(ctrl_s).unwrap() else {
            panic!("expected SubmitContact");
        };
        assert_eq!(message.email, "ada@example.com");
        assert!(s.form().is_submitting());
    }

    #[test]
    fn delivery_success_clears_the_form() {
        let mut s = screen();
        fill(&mut s);
        s.submit();
        let follow_up = s
            .update(&Action::ContactDelivered(Arc::new(Ok(()))))
            .unwrap();
        assert!(matches!(follow_up, Some(Action::Notify(_))));
        assert_eq!(s.form().message().name, "");
        assert_eq!(s.form().status(), &FormStatus::Idle);
        assert!(s.just_sent);
    }

    #[test]
    fn delivery_failure_keeps_fields() {
        let mut s = screen();
        fill(&mut s);
        s.submit();
        let outcome = Err(CoreError::Delivery {
            message: "boom".into(),
            status: Some(500),
        });
        s.update(&Action::ContactDelivered(Arc::new(outcome))).unwrap();
        assert!(matches!(s.form().status(), FormStatus::Failed(_)));
        assert_eq!(s.form().message().name, "Ada Lovelace");
    }

    #[test]
    fn enter_on_send_button_submits() {
        let mut s = screen();
        s.handle_key_event(key(KeyCode::Up)).unwrap();
        assert!(s.selected_field().is_none());
        let action = s.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert!(matches!(action, Some(Action::Notify(_))));
    }
}
