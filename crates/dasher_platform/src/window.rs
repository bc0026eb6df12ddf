use std::sync::Arc;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

pub struct PlatformConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            title: "Dapper Dasher".to_string(),
            width: 512,
            height: 380,
            resizable: false,
        }
    }
}

/// Open the game window at a fixed logical size.
pub fn create_window(
    event_loop: &ActiveEventLoop,
    config: &PlatformConfig,
) -> Result<Arc<Window>, String> {
    let attrs = WindowAttributes::default()
        .with_title(&config.title)
        .with_resizable(config.resizable)
        .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));

    let window = event_loop
        .create_window(attrs)
        .map_err(|e| format!("Failed to create window: {e}"))?;
    log::debug!(
        "Window scale factor: {:.2}, physical size: {:?}",
        window.scale_factor(),
        window.inner_size()
    );
    Ok(Arc::new(window))
}
