use winit::dpi::LogicalSize;
use winit::error::OsError;
use winit::event_loop::EventLoop;
use winit::window::{Window, WindowBuilder};

use crate::gapi::vulkan::extensions::ExtensionStr;
use crate::gapi::vulkan::surface::SurfaceSource;

pub struct MyWindow {
    winit_window: Window,
}

impl MyWindow {
    pub fn new(event_loop: &EventLoop<()>, title: &str) -> Result<Self, OsError> {
        let window = WindowBuilder::new()
            .with_title(title)
            .with_inner_size(LogicalSize::new(1024, 768))
            .build(event_loop)?;
        Ok(Self {
            winit_window: window,
        })
    }
}

impl SurfaceSource for MyWindow {
    fn required_extensions(&self) -> Vec<ExtensionStr> {
        self.winit_window.required_extensions()
    }
}
