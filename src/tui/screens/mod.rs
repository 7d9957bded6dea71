pub mod select_screen;

pub use select_screen::SelectScreen;
