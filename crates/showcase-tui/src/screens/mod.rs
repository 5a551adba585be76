//! Screen implementations. Each screen is a top-level Component.

pub mod contact;
pub mod home;
pub mod journey;
pub mod week;

use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::Result;
use tokio::sync::mpsc::UnboundedSender;

use showcase_core::Catalog;

use crate::action::Action;
use crate::component::Component;
use crate::screen::ScreenId;

/// Inputs every screen is built from.
pub struct ScreenContext {
    pub catalog: Arc<Catalog>,
    pub action_tx: UnboundedSender<Action>,
    pub week_interval: Duration,
    pub week_autoplay: bool,
    pub delivery_configured: bool,
}

/// Create every screen component, including the week page.
pub fn create_screens(ctx: &ScreenContext) -> Result<Vec<(ScreenId, Box<dyn Component>)>> {
    Ok(vec![
        (
            ScreenId::Home,
            Box::new(home::HomeScreen::new(ctx.catalog.clone())?),
        ),
        (
            ScreenId::Journey,
            Box::new(journey::JourneyScreen::new(
                ctx.catalog.clone(),
                ctx.action_tx.clone(),
                ctx.week_interval,
                ctx.week_autoplay,
            )?),
        ),
        (
            ScreenId::Week,
            Box::new(week::WeekScreen::new(ctx.catalog.clone())?),
        ),
        (
            ScreenId::Contact,
            Box::new(contact::ContactScreen::new(
                ctx.catalog.clone(),
                ctx.delivery_configured,
            )?),
        ),
    ])
}
