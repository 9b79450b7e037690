//! Server-rendered pages for the browser UI.

pub mod html;
pub mod pages;
pub mod state;
