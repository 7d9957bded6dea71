pub mod app;
pub mod console;
pub mod events;
pub mod screens;
pub mod selection;
pub mod theme;

pub use app::{App, SelectionOutcome};
pub use console::Console;
pub use events::{Event, EventHandler, KeyAction};
pub use theme::Theme;
