pub mod app;
pub mod screen;
pub mod viewport;

pub use app::App;
pub use viewport::Viewport;
