#![forbid(unsafe_code)]

pub mod context;
pub mod markup;
pub mod routes;
pub mod sink;
pub mod vm;
pub mod views;

pub use context::{AppContext, UiApp, build_app_context};
pub use routes::Route;
pub use sink::{RecordingSink, Region, RenderSink};
pub use views::{FlashcardKey, FlashcardWidget, IndexPage, TopicPage, ViewError, render_document};
