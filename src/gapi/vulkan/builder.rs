use std::collections::HashSet;
use std::ffi::{c_char, CString};

use log::{debug, info, trace, warn};
use vulkanalia::vk::{self, HasBuilder};
use vulkanalia::Version;

use crate::gapi::vulkan::config::{
    DEFAULT_API_VERSION, DEFAULT_APPLICATION_NAME, DEFAULT_APPLICATION_VERSION,
    DEFAULT_ENGINE_NAME, DEFAULT_ENGINE_VERSION,
};
use crate::gapi::vulkan::debug::DebugMessenger;
use crate::gapi::vulkan::driver::{DebugUtilsOf, Driver, NativeInstance};
use crate::gapi::vulkan::errors::InstanceError;
use crate::gapi::vulkan::extensions::{resolve_extensions, ExtensionStr};
use crate::gapi::vulkan::instance::Instance;
use crate::gapi::vulkan::layers::{find_unavailable_layers, layer_name, InstanceLayer, LayerStr};
use crate::gapi::vulkan::surface::SurfaceSource;
use crate::{debug_success, info_success, trace_success, vk_check};

/// # Instance Builder
/// Accumulates the configuration of an [`Instance`] without touching the driver, then performs
/// the whole native creation sequence in [`build`](Self::build).
///
/// # Details
/// ```ignore
/// let instance = InstanceBuilder::new(Entry::new()?, &window)
///     .with_application_name("Ignition")
///     .with_defaults()
///     .build()?;
/// ```
///
/// The builder is meant to be configured and built on a single thread.
pub struct InstanceBuilder<D: Driver, S: SurfaceSource> {
    driver: D,
    surface: S,

    validation: bool,
    api_dump: bool,
    portability: bool,
    renderdoc: bool,
    layers: Vec<String>,
    debug_messenger: Option<DebugMessenger<DebugUtilsOf<D>>>,

    application_name: String,
    application_version: Version,
    engine_name: String,
    engine_version: Version,
    api_version: Version,
}

impl<D: Driver, S: SurfaceSource> InstanceBuilder<D, S> {
    pub fn new(driver: D, surface: S) -> Self {
        Self {
            driver,
            surface,
            validation: false,
            api_dump: false,
            portability: false,
            renderdoc: false,
            layers: Vec::new(),
            debug_messenger: None,
            application_name: DEFAULT_APPLICATION_NAME.to_owned(),
            application_version: DEFAULT_APPLICATION_VERSION,
            engine_name: DEFAULT_ENGINE_NAME.to_owned(),
            engine_version: DEFAULT_ENGINE_VERSION,
            api_version: DEFAULT_API_VERSION,
        }
    }

    /// Validation with the Khronos validation layer.
    pub fn with_defaults(self) -> Self {
        let validation = InstanceLayer::Validation.name();
        self.enable_validation_layers([validation.to_string_lossy()])
    }

    /// Enables validation with the given layers.
    ///
    /// # Details
    /// Only the first call counts: once validation is enabled, later calls are ignored, including
    /// their layer list. Names are checked in [`build`](Self::build). A default [`DebugMessenger`] is created unless one was already supplied
    /// through [`with_debug_messenger`](Self::with_debug_messenger).
    pub fn enable_validation_layers<I, L>(mut self, layers: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: AsRef<str>,
    {
        if self.validation {
            debug!("Validation layers already enabled, ignoring the new layer list.");
            return self;
        }

        self.validation = true;
        self.layers
            .extend(layers.into_iter().map(|layer| layer.as_ref().to_owned()));
        self.debug_messenger.get_or_insert_with(DebugMessenger::default);
        self
    }

    /// Adds `VK_LAYER_LUNARG_api_dump` next to the validation layers. Has no effect unless
    /// validation is enabled.
    pub fn enable_api_dump(mut self) -> Self {
        self.api_dump = true;
        self
    }

    /// Adds `VK_LAYER_RENDERDOC_Capture` so RenderDoc can capture frames. Independent of
    /// validation.
    pub fn enable_renderdoc_capture(mut self) -> Self {
        self.renderdoc = true;
        self
    }

    /// Enumerates portability-subset devices (MoltenVK): enables
    /// `VK_KHR_portability_enumeration`, `VK_KHR_get_physical_device_properties2` and the
    /// `ENUMERATE_PORTABILITY_KHR` flag.
    pub fn enable_portability(mut self) -> Self {
        self.portability = true;
        self
    }

    /// Uses `messenger` (typically with a custom [`DebugFilter`](crate::DebugFilter)) instead of the
    /// default one. Only attached if validation is enabled. The messenger must not be attached
    /// yet, otherwise [`build`](Self::build) fails without creating anything.
    pub fn with_debug_messenger(mut self, messenger: DebugMessenger<DebugUtilsOf<D>>) -> Self {
        self.debug_messenger = Some(messenger);
        self
    }

    pub fn with_application_name(mut self, name: impl Into<String>) -> Self {
        self.application_name = name.into();
        self
    }

    pub fn with_application_version(mut self, version: Version) -> Self {
        self.application_version = version;
        self
    }

    pub fn with_engine_name(mut self, name: impl Into<String>) -> Self {
        self.engine_name = name.into();
        self
    }

    pub fn with_engine_version(mut self, version: Version) -> Self {
        self.engine_version = version;
        self
    }

    pub fn with_api_version(mut self, version: Version) -> Self {
        self.api_version = version;
        self
    }

    pub fn is_validation_enabled(&self) -> bool {
        self.validation
    }

    /// The layers that will be enabled, in order.
    ///
    /// # Errors
    /// [`InstanceError::InvalidLayerName`] for the first name that cannot be passed to Vulkan as is.
    pub fn requested_layers(&self) -> Result<Vec<LayerStr>, InstanceError> {
        let mut layers = self
            .layers
            .iter()
            .map(|layer| layer_name(layer))
            .collect::<Result<Vec<_>, _>>()?;

        let api_dump = (self.validation && self.api_dump).then_some(InstanceLayer::ApiDump);
        let renderdoc = self.renderdoc.then_some(InstanceLayer::RenderDoc);
        for layer in api_dump.into_iter().chain(renderdoc).map(|layer| layer.name()) {
            if !layers.contains(&layer) {
                layers.push(layer);
            }
        }
        Ok(layers)
    }

    /// The extensions the instance will be created with: platform first, then debug utilities
    /// (if validation is enabled), then portability (if requested).
    pub fn resolved_extensions(&self) -> Vec<ExtensionStr> {
        let platform = self.surface.required_extensions();
        resolve_extensions(&platform, self.validation, self.portability)
    }

    /// # Instance Creation
    ///
    /// # Details
    /// In order, stopping at the first error:
    /// 0. Rejects a supplied [`DebugMessenger`] that is already attached elsewhere.
    /// 1. Checks that every requested layer name is well formed, then that every requested layer
    /// is available. The availability query is skipped if no layer is requested.
    /// 2. Resolves the extension list.
    /// 3. Creates the native instance. With validation enabled, the debug messenger configuration
    /// is chained into the create info so that messages emitted during creation are captured.
    /// 4. With validation enabled, attaches the [`DebugMessenger`] to the new instance.
    ///
    /// # Errors
    /// - [`InstanceError::MessengerAlreadyAttached`] before any native call. The supplied
    /// messenger is destroyed.
    /// - [`InstanceError::InvalidLayerName`] before any native call.
    /// - [`InstanceError::LayersUnavailable`] before any native object is created.
    /// - [`InstanceError::InvalidName`] if the application or engine name contains a NUL byte.
    /// - [`InstanceError::ApiResult`] if a native call fails.
    /// - [`InstanceError::ExtensionUnavailable`] if `VK_EXT_debug_utils` cannot be loaded.
    ///
    /// If step 4 fails the native instance is destroyed before the error is returned.
    pub fn build(mut self) -> Result<Instance<D>, InstanceError> {
        if let Some(messenger) = self.debug_messenger.as_mut() {
            if messenger.is_attached() {
                warn!("Supplied debug messenger is already attached, destroying it.");
                messenger.destroy();
                return Err(InstanceError::MessengerAlreadyAttached);
            }
        }

        debug!("Getting configured instance layers...");
        let layers = self.requested_layers()?;
        debug!("Checking if layers are available...");
        self.check_layer_support(&layers)?;
        if !layers.is_empty() {
            info_success!("Requested Instance layers are available!");
        }

        debug!("Getting configured instance extensions...");
        let extensions = self.resolved_extensions();
        info!("Requested extensions: \n\t{:?}", display_names(&extensions));

        trace!("Creating vulkan instance...");
        let native = self.create_native_instance(&layers, &extensions)?;
        info_success!("Vulkan Instance created!");

        let Self {
            driver,
            validation,
            debug_messenger,
            ..
        } = self;

        if !validation {
            if debug_messenger.is_some() {
                trace!("Validation disabled, the supplied debug messenger is not attached.");
            }
            return Ok(Instance::new(driver, native, None));
        }

        let mut messenger = debug_messenger.unwrap_or_default();
        if let Err(error) = messenger.attach(&native) {
            warn!("Debug messenger attachment failed, destroying the instance: {}", error);
            native.destroy();
            return Err(error);
        }
        debug_success!("Debug messenger attached!");

        Ok(Instance::new(driver, native, Some(messenger)))
    }

    fn check_layer_support(&self, layers: &[LayerStr]) -> Result<(), InstanceError> {
        if layers.is_empty() {
            return Ok(());
        }

        let available_layers = vk_check!(
            self.driver.enumerate_instance_layers(),
            "Failed to enumerate instance layers."
        )?
        .into_iter()
        .collect::<HashSet<_>>();
        debug!("All Available layers: \n\t{:?}", display_names(&available_layers));

        let missing_layers = find_unavailable_layers(&available_layers, layers);
        if missing_layers.is_empty() {
            Ok(())
        } else {
            Err(InstanceError::LayersUnavailable(display_names(&missing_layers)))
        }
    }

    /// Creates the native instance. The name buffers and pointer arrays marshalled here are
    /// released when this returns, on success and on failure alike.
    fn create_native_instance(
        &self,
        layers: &[LayerStr],
        extensions: &[ExtensionStr],
    ) -> Result<D::Instance, InstanceError> {
        let application_name = CString::new(self.application_name.as_str())?;
        let engine_name = CString::new(self.engine_name.as_str())?;

        trace!("Building application info");
        let application_info = vk::ApplicationInfo::builder()
            .application_name(application_name.as_bytes_with_nul())
            .application_version(pack_version(self.application_version))
            .engine_name(engine_name.as_bytes_with_nul())
            .engine_version(pack_version(self.engine_version))
            .api_version(pack_version(self.api_version))
            .build();
        trace_success!("Application info built!: \n\t{:?}", application_info);

        let layer_names = layers.iter().map(|layer| layer.as_ptr()).collect::<Vec<*const c_char>>();
        let extension_names = extensions
            .iter()
            .map(|extension| extension.as_ptr())
            .collect::<Vec<*const c_char>>();

        let flags = if self.portability {
            vk::InstanceCreateFlags::ENUMERATE_PORTABILITY_KHR
        } else {
            vk::InstanceCreateFlags::empty()
        };

        let mut info = vk::InstanceCreateInfo::builder()
            .application_info(&application_info)
            .enabled_layer_names(&layer_names)
            .enabled_extension_names(&extension_names)
            .flags(flags);

        // Captures messages emitted by vkCreateInstance and vkDestroyInstance themselves.
        let mut lifetime_debug_info = match (&self.debug_messenger, self.validation) {
            (Some(messenger), true) => Some(messenger.populate_create_info()),
            _ => None,
        };
        if let Some(debug_info) = lifetime_debug_info.as_mut() {
            debug!("Adding lifetime messenger to Instance.");
            info = info.push_next(debug_info);
        }

        let native = vk_check!(self.driver.create_instance(&info), "Failed to create Instance.")?;
        Ok(native)
    }
}

/// Packs a three-part version into the `u32` layout Vulkan expects.
pub fn pack_version(version: Version) -> u32 {
    vk::make_version(version.major, version.minor, version.patch)
}

fn display_names<'a>(names: impl IntoIterator<Item = &'a vk::ExtensionName>) -> Vec<String> {
    names
        .into_iter()
        .map(|name| name.to_string_lossy().into_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versions_pack_like_vulkan() {
        assert_eq!(pack_version(Version::new(1, 2, 0)), vk::make_version(1, 2, 0));
        assert_eq!(pack_version(Version::new(1, 0, 0)), 1 << 22);
    }
}
