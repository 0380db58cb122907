pub mod content_guard;
pub mod decode;
pub mod fetch;
pub mod html_text;
pub mod pdf;
