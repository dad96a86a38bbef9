//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into four layers:
//!
//! - **[`app`]**: application state, tabs, keyboard event loop, background catalogue fetches
//! - **[`panes`]**: stateless render functions for each tab and the status bar
//! - **[`editor`]**: the text buffer behind the code exercise
//! - **[`theme`]**: light and dark color palettes used by all panes
//!
//! The entry point for consumers is [`App`]: construct it from a [`VlabConfig`],
//! a [`PreferenceStore`], a [`Grader`] and a [`MockDataService`], then call
//! [`App::run`] to start the event loop. It must be created inside a tokio
//! runtime because the catalogue is fetched on spawned tasks.
//!
//! [`VlabConfig`]: crate::config::VlabConfig
//! [`PreferenceStore`]: crate::prefs::PreferenceStore
//! [`Grader`]: crate::grader::Grader
//! [`MockDataService`]: crate::catalog::MockDataService
//! [`App::run`]: app::App::run

pub mod app;
pub mod editor;
pub mod panes;
pub mod theme;

pub use app::App;
