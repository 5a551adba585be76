//! Small rendering helpers shared by screens.

pub mod indicator;
pub mod sub_tabs;
