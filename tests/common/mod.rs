//! A recording stand-in for the Vulkan loader.
//!
//! Every native call lands in a shared [`CallLog`], so tests can assert on what was called and in
//! which order without a GPU.

#![allow(dead_code)]

use std::cell::RefCell;
use std::ffi::{c_char, CStr};
use std::rc::Rc;

use ignition::{DebugUtilsExtension, Driver, ExtensionStr, LayerStr, NativeInstance};
use vulkanalia::VkResult;
use vulkanalia::vk::{self, Handle};

pub const INSTANCE_HANDLE: usize = 0x1000;
pub const MESSENGER_HANDLE: u64 = 0x2000;

/// What the builder handed to `vkCreateInstance`, read back out of the raw create info.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateInstanceCall {
    pub application_name: String,
    pub engine_name: String,
    pub api_version: u32,
    pub layers: Vec<String>,
    pub extensions: Vec<String>,
    pub flags: vk::InstanceCreateFlags,
    /// Severity and type filters of a chained `VkDebugUtilsMessengerCreateInfoEXT`, if any.
    pub chained_debug_filter: Option<(
        vk::DebugUtilsMessageSeverityFlagsEXT,
        vk::DebugUtilsMessageTypeFlagsEXT,
    )>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    EnumerateLayers,
    CreateInstance(CreateInstanceCall),
    LoadDebugUtils,
    CreateMessenger {
        instance: vk::Instance,
        severity: vk::DebugUtilsMessageSeverityFlagsEXT,
        message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    },
    DestroyMessenger {
        instance: vk::Instance,
        messenger: vk::DebugUtilsMessengerEXT,
    },
    DestroyInstance(vk::Instance),
    ReleaseLoader,
}

#[derive(Debug, Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<Call>>>);

impl CallLog {
    fn push(&self, call: Call) {
        self.0.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.0.borrow().iter().filter(|&call| matches(call)).count()
    }

    pub fn position(&self, matches: impl Fn(&Call) -> bool) -> Option<usize> {
        self.0.borrow().iter().position(matches)
    }

    pub fn create_instance_calls(&self) -> Vec<CreateInstanceCall> {
        self.0
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::CreateInstance(create) => Some(create.clone()),
                _ => None,
            })
            .collect()
    }
}

pub fn is_create_instance(call: &Call) -> bool {
    matches!(call, Call::CreateInstance(_))
}

pub fn is_create_messenger(call: &Call) -> bool {
    matches!(call, Call::CreateMessenger { .. })
}

pub fn is_destroy_messenger(call: &Call) -> bool {
    matches!(call, Call::DestroyMessenger { .. })
}

pub fn is_destroy_instance(call: &Call) -> bool {
    matches!(call, Call::DestroyInstance(_))
}

/// How the fake loader answers.
#[derive(Debug, Clone)]
pub struct FakeConfig {
    pub available_layers: Vec<LayerStr>,
    pub enumerate_error: Option<vk::ErrorCode>,
    pub create_error: Option<vk::ErrorCode>,
    pub debug_utils_loadable: bool,
    pub messenger_error: Option<vk::ErrorCode>,
}

impl Default for FakeConfig {
    fn default() -> Self {
        Self {
            available_layers: vec![LayerStr::from_bytes(b"VK_LAYER_KHRONOS_validation")],
            enumerate_error: None,
            create_error: None,
            debug_utils_loadable: true,
            messenger_error: None,
        }
    }
}

pub struct FakeDriver {
    config: FakeConfig,
    log: CallLog,
}

impl FakeDriver {
    pub fn new(config: FakeConfig) -> (Self, CallLog) {
        let log = CallLog::default();
        (
            Self {
                config,
                log: log.clone(),
            },
            log,
        )
    }
}

impl Drop for FakeDriver {
    fn drop(&mut self) {
        self.log.push(Call::ReleaseLoader);
    }
}

impl Driver for FakeDriver {
    type Instance = FakeInstance;

    fn enumerate_instance_layers(&self) -> VkResult<Vec<LayerStr>> {
        self.log.push(Call::EnumerateLayers);
        match self.config.enumerate_error {
            Some(error) => Err(error),
            None => Ok(self.config.available_layers.clone()),
        }
    }

    fn create_instance(&self, info: &vk::InstanceCreateInfo) -> VkResult<FakeInstance> {
        self.log.push(Call::CreateInstance(unsafe { read_create_info(info) }));
        if let Some(error) = self.config.create_error {
            return Err(error);
        }
        Ok(FakeInstance {
            handle: vk::Instance::from_raw(INSTANCE_HANDLE),
            debug_utils_loadable: self.config.debug_utils_loadable,
            messenger_error: self.config.messenger_error,
            log: self.log.clone(),
        })
    }
}

pub struct FakeInstance {
    handle: vk::Instance,
    debug_utils_loadable: bool,
    messenger_error: Option<vk::ErrorCode>,
    log: CallLog,
}

impl NativeInstance for FakeInstance {
    type DebugUtils = FakeDebugUtils;

    fn handle(&self) -> vk::Instance {
        self.handle
    }

    fn load_debug_utils(&self) -> Option<FakeDebugUtils> {
        self.log.push(Call::LoadDebugUtils);
        self.debug_utils_loadable.then(|| FakeDebugUtils {
            error: self.messenger_error,
            log: self.log.clone(),
        })
    }

    fn destroy(&self) {
        self.log.push(Call::DestroyInstance(self.handle));
    }
}

pub struct FakeDebugUtils {
    error: Option<vk::ErrorCode>,
    log: CallLog,
}

impl DebugUtilsExtension for FakeDebugUtils {
    fn create_debug_utils_messenger(
        &self,
        instance: vk::Instance,
        info: &vk::DebugUtilsMessengerCreateInfoEXT,
    ) -> VkResult<vk::DebugUtilsMessengerEXT> {
        self.log.push(Call::CreateMessenger {
            instance,
            severity: info.message_severity,
            message_type: info.message_type,
        });
        match self.error {
            Some(error) => Err(error),
            None => Ok(vk::DebugUtilsMessengerEXT::from_raw(MESSENGER_HANDLE)),
        }
    }

    fn destroy_debug_utils_messenger(
        &self,
        instance: vk::Instance,
        messenger: vk::DebugUtilsMessengerEXT,
    ) {
        self.log.push(Call::DestroyMessenger { instance, messenger });
    }
}

/// Platform extensions of a typical X11 window.
pub fn platform_extensions() -> Vec<ExtensionStr> {
    vec![
        vk::KHR_SURFACE_EXTENSION.name,
        vk::KHR_XLIB_SURFACE_EXTENSION.name,
    ]
}

pub fn names(names: &[ExtensionStr]) -> Vec<String> {
    names
        .iter()
        .map(|name| name.to_string_lossy().into_owned())
        .collect()
}

unsafe fn read_string(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
}

unsafe fn read_strings(ptr: *const *const c_char, count: u32) -> Vec<String> {
    if ptr.is_null() {
        return Vec::new();
    }
    unsafe { std::slice::from_raw_parts(ptr, count as usize) }
        .iter()
        .map(|name| unsafe { read_string(*name) })
        .collect()
}

/// # Safety
/// `info` must be a create info whose pointers are valid for the duration of the call, which is
/// what `vkCreateInstance` guarantees too.
unsafe fn read_create_info(info: &vk::InstanceCreateInfo) -> CreateInstanceCall {
    let (application_name, engine_name, api_version) = if info.application_info.is_null() {
        (String::new(), String::new(), 0)
    } else {
        let application = unsafe { &*info.application_info };
        unsafe {
            (
                read_string(application.application_name),
                read_string(application.engine_name),
                application.api_version,
            )
        }
    };

    let chained_debug_filter = if info.next.is_null() {
        None
    } else {
        let s_type = unsafe { *(info.next as *const vk::StructureType) };
        if s_type == vk::StructureType::DEBUG_UTILS_MESSENGER_CREATE_INFO_EXT {
            let debug = unsafe { &*(info.next as *const vk::DebugUtilsMessengerCreateInfoEXT) };
            Some((debug.message_severity, debug.message_type))
        } else {
            None
        }
    };

    CreateInstanceCall {
        application_name,
        engine_name,
        api_version,
        layers: unsafe { read_strings(info.enabled_layer_names, info.enabled_layer_count) },
        extensions: unsafe {
            read_strings(info.enabled_extension_names, info.enabled_extension_count)
        },
        flags: info.flags,
        chained_debug_filter,
    }
}
