//! App registry consumed by the window manager for titles, default sizes, and instance policy.
//!
//! The registry is an explicitly constructed value handed to the runtime at startup; nothing reads
//! it through ambient module state.

use desktop_app_contract::{AppDescriptor, ApplicationId};

use crate::model::OpenWindowRequest;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppRegistry {
    descriptors: Vec<AppDescriptor>,
}

impl AppRegistry {
    pub fn new(descriptors: Vec<AppDescriptor>) -> Self {
        Self { descriptors }
    }

    /// Placeholder apps shipped with the simulated desktop.
    pub fn builtin() -> Self {
        let app = |id: &str, title: &str, icon: &str| {
            AppDescriptor::new(ApplicationId::trusted(format!("system.{id}")), title, icon)
        };
        Self::new(vec![
            app("calculator", "Calculator", "calculator")
                .single_instance()
                .default_size(320.0, 480.0),
            app("settings", "Settings", "settings").single_instance(),
            app("store", "Store", "store").single_instance(),
            app("music", "Music", "music").single_instance(),
            app("mail", "Mail", "mail").single_instance(),
            app("calendar", "Calendar", "calendar").single_instance(),
            app("weather", "Weather", "weather").single_instance(),
            app("clock", "Clock", "clock").single_instance(),
            app("about", "About", "info")
                .max_instances(8)
                .default_size(360.0, 240.0),
            app("notepad", "Notepad", "notepad").max_instances(6),
            app("explorer", "Explorer", "folder").max_instances(4),
            app("browser", "Browser", "globe").max_instances(4),
            app("terminal", "Terminal", "terminal").max_instances(4),
            app("photos", "Photos", "image").max_instances(2),
            app("paint", "Paint", "paint").max_instances(2),
            app("video", "Video", "video").max_instances(2),
        ])
    }

    pub fn descriptors(&self) -> &[AppDescriptor] {
        &self.descriptors
    }

    pub fn descriptor(&self, app_id: &ApplicationId) -> Option<&AppDescriptor> {
        self.descriptors.iter().find(|entry| &entry.app_id == app_id)
    }

    /// Concurrent window limit for `app_id`; unknown apps may not open at all.
    pub fn max_instances(&self, app_id: &ApplicationId) -> u32 {
        self.descriptor(app_id)
            .map(|entry| entry.instance_policy.max_instances())
            .unwrap_or(0)
    }

    /// Builds an open request carrying the descriptor's title, icon, and preferred size.
    pub fn default_open_request(&self, app_id: &ApplicationId) -> OpenWindowRequest {
        let mut req = OpenWindowRequest::new(app_id.clone());
        if let Some(descriptor) = self.descriptor(app_id) {
            req.title = Some(descriptor.title.clone());
            req.icon_id = Some(descriptor.icon_id.clone());
            req.size = descriptor.default_size;
        }
        req
    }
}
