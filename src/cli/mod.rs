mod app;
mod args;
mod markdown;
mod terminal;
#[doc(hidden)]
pub mod test_support;
pub(crate) mod theme;
mod view;

pub use app::{Action, AppState, Focus, Notice, NoticeKind};
pub use args::CliArgs;
pub use terminal::run_app;
pub use theme::Theme;
pub use view::{ScreenRegions, layout};
