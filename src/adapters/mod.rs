pub mod health_handler;
pub mod html;
pub mod jedi_editor;
pub mod preview_handler;
pub mod script;
pub mod view;
