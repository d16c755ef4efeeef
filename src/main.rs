use ::log::{debug, error, info};
use anyhow::{Context, Result};
use ignition::gapi::vulkan::config::{API_DUMP_ENABLED, RENDERDOC_ENABLED, VALIDATION_ENABLED};
use ignition::log::log::init_log;
use ignition::window::window::MyWindow;
use ignition::{info_success, Entry, InstanceBuilder};
use winit::event_loop::EventLoop;

fn main() {
    if let Err(err) = run() {
        error!("Oops! Something went wrong: {}", err);

        for cause in err.chain().skip(1) {
            error!("Caused by: {}", cause);
        }

        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    init_log()?;

    let event_loop = EventLoop::new()?;
    debug!("Creating Window...");
    let window = MyWindow::new(&event_loop, "Ignition").context("Failed to create window")?;
    info_success!("Window Created!");

    let entry = Entry::new().context("Vulkan is not available on this system")?;
    let mut builder = InstanceBuilder::new(entry, &window)
        .with_application_name("Ignition")
        .with_engine_name("Ignition");
    if VALIDATION_ENABLED {
        builder = builder.with_defaults();
    }
    if API_DUMP_ENABLED {
        builder = builder.enable_api_dump();
    }
    if RENDERDOC_ENABLED {
        builder = builder.enable_renderdoc_capture();
    }
    if cfg!(target_os = "macos") {
        builder = builder.enable_portability();
    }

    let instance = builder.build().context("Failed to create Vulkan instance")?;
    info!(
        "Instance {:?} ready, debug messenger attached: {}",
        instance.to_handle(),
        instance.debug_messenger().is_some_and(|messenger| messenger.is_attached())
    );

    instance.destroy();
    info_success!("Instance destroyed!");
    Ok(())
}
