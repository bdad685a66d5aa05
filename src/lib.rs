mod app;
mod args;
mod config;
mod ui;

pub mod catalog;
pub mod chart;
pub mod history;
pub mod market;
pub mod selection;
pub mod session;

pub use app::Application;
pub use config::{
    ApiConfig, ApiConfigBuilder, AppConfig, ChartMode, SessionConfig, SessionConfigBuilder,
};
pub use ui::io_input::{InputSource, StdinInputSource, VecInputSource};

pub async fn run() -> anyhow::Result<()> {
    let app = Application::init()?;
    app.run().await
}
