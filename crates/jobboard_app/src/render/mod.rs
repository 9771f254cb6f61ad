pub mod html;
pub mod terminal;
