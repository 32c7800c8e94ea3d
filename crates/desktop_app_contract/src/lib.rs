//! Shared contract types between the desktop window manager and the apps it hosts.
//!
//! Apps are external collaborators: the window manager only consumes their descriptors (title,
//! icon, default size, and instance policy) and reports lifecycle transitions back to them.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use serde::{Deserialize, Serialize};

/// Stable identifier for an app package/module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApplicationId(String);

impl ApplicationId {
    /// Returns an app identifier when `raw` conforms to the `segment.segment...` policy.
    pub fn new(raw: impl Into<String>) -> Result<Self, String> {
        let raw = raw.into();
        if is_valid_application_id(&raw) {
            Ok(Self(raw))
        } else {
            Err(format!(
                "invalid application id `{raw}`; expected namespaced dotted segments"
            ))
        }
    }

    /// Returns the string form of the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Creates an id without validation for compile-time/runtime trusted constants.
    pub fn trusted(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }
}

impl std::fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn is_valid_application_id(raw: &str) -> bool {
    if raw.is_empty() || raw.len() > 120 {
        return false;
    }

    let mut count = 0usize;
    for part in raw.split('.') {
        count += 1;
        if part.is_empty() || part.len() > 32 {
            return false;
        }
        let bytes = part.as_bytes();
        if !bytes[0].is_ascii_lowercase() {
            return false;
        }
        if !bytes
            .iter()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-')
        {
            return false;
        }
        if part.ends_with('-') {
            return false;
        }
    }

    count >= 2
}

/// Preferred initial window size declared by an app.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSize {
    /// Width in screen pixels.
    pub w: f64,
    /// Height in screen pixels.
    pub h: f64,
}

/// How many concurrent windows an app may own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum InstancePolicy {
    /// At most one window; opening again focuses the existing one.
    Single,
    /// Up to `max_instances` windows; further opens are refused.
    Multiple {
        /// Concurrent window limit (at least one).
        max_instances: u32,
    },
}

impl InstancePolicy {
    /// Returns `true` for single-instance apps.
    pub const fn is_single_instance(self) -> bool {
        matches!(self, Self::Single)
    }

    /// Returns the concurrent window limit implied by the policy.
    pub const fn max_instances(self) -> u32 {
        match self {
            Self::Single => 1,
            Self::Multiple { max_instances } => {
                if max_instances == 0 {
                    1
                } else {
                    max_instances
                }
            }
        }
    }
}

/// Registry entry describing an app the window manager can open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppDescriptor {
    /// Stable app identifier.
    pub app_id: ApplicationId,
    /// Default window title.
    pub title: String,
    /// Icon token used by the taskbar and title bar.
    pub icon_id: String,
    /// Preferred initial size; `None` fills the assigned quadrant slot.
    pub default_size: Option<WindowSize>,
    /// Concurrent instance policy.
    pub instance_policy: InstancePolicy,
}

impl AppDescriptor {
    /// Creates a descriptor with a multi-instance policy and no preferred size.
    pub fn new(
        app_id: ApplicationId,
        title: impl Into<String>,
        icon_id: impl Into<String>,
    ) -> Self {
        Self {
            app_id,
            title: title.into(),
            icon_id: icon_id.into(),
            default_size: None,
            instance_policy: InstancePolicy::Multiple { max_instances: 4 },
        }
    }

    /// Marks the app as single-instance.
    pub fn single_instance(mut self) -> Self {
        self.instance_policy = InstancePolicy::Single;
        self
    }

    /// Sets the concurrent instance limit for a multi-instance app.
    pub fn max_instances(mut self, max_instances: u32) -> Self {
        self.instance_policy = InstancePolicy::Multiple { max_instances };
        self
    }

    /// Sets the preferred initial window size.
    pub fn default_size(mut self, w: f64, h: f64) -> Self {
        self.default_size = Some(WindowSize { w, h });
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Lifecycle events emitted by the desktop window manager.
pub enum AppLifecycleEvent {
    /// Window was created and mounted.
    Mounted,
    /// Window became focused.
    Focused,
    /// Window lost focus.
    Blurred,
    /// Window was minimized.
    Minimized,
    /// Window was restored from the minimized state.
    Restored,
    /// Window was removed from the collection.
    Closed,
}

impl AppLifecycleEvent {
    /// Returns a stable string token for logging hooks.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Mounted => "mounted",
            Self::Focused => "focused",
            Self::Blurred => "blurred",
            Self::Minimized => "minimized",
            Self::Restored => "restored",
            Self::Closed => "closed",
        }
    }
}
