use indexmap::IndexMap;

/// Named payload slots of a platform clipboard
pub trait ClipboardData {
    /// Names of the payloads currently available
    fn types(&self) -> Vec<String>;

    fn get_data(&self, format: &str) -> Option<String>;

    fn set_data(&mut self, format: &str, payload: &str);

    fn has_type(&self, format: &str) -> bool {
        self.types().iter().any(|t| t == format)
    }
}

/// A copy, cut or paste event raised by the host
pub trait ClipboardEvent {
    /// Clipboard access, if the platform exposes one for this event
    fn clipboard_data(&self) -> Option<&dyn ClipboardData>;

    fn clipboard_data_mut(&mut self) -> Option<&mut dyn ClipboardData>;

    /// Stop the platform from writing its own payloads afterwards
    fn prevent_default(&mut self);
}

/// The host's serializations of the live selection
pub trait HostSelection {
    fn plain_text(&self) -> String;

    fn html(&self) -> String;
}

/// Clipboard held in memory, preserving write order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryClipboard {
    payloads: IndexMap<String, String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clipboard pre-filled with a single payload
    pub fn with_payload(format: &str, payload: &str) -> Self {
        let mut clipboard = Self::new();
        clipboard.set_data(format, payload);
        clipboard
    }
}

impl ClipboardData for MemoryClipboard {
    fn types(&self) -> Vec<String> {
        self.payloads.keys().cloned().collect()
    }

    fn get_data(&self, format: &str) -> Option<String> {
        self.payloads.get(format).cloned()
    }

    fn set_data(&mut self, format: &str, payload: &str) {
        self.payloads.insert(format.to_string(), payload.to_string());
    }
}

/// Clipboard event backed by a [`MemoryClipboard`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryClipboardEvent {
    clipboard: Option<MemoryClipboard>,
    default_prevented: bool,
}

impl MemoryClipboardEvent {
    pub fn new(clipboard: MemoryClipboard) -> Self {
        Self {
            clipboard: Some(clipboard),
            default_prevented: false,
        }
    }

    /// Event on a platform without clipboard access
    pub fn without_clipboard() -> Self {
        Self::default()
    }

    pub fn clipboard(&self) -> Option<&MemoryClipboard> {
        self.clipboard.as_ref()
    }

    pub fn into_clipboard(self) -> Option<MemoryClipboard> {
        self.clipboard
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

impl ClipboardEvent for MemoryClipboardEvent {
    fn clipboard_data(&self) -> Option<&dyn ClipboardData> {
        self.clipboard.as_ref().map(|c| c as &dyn ClipboardData)
    }

    fn clipboard_data_mut(&mut self) -> Option<&mut dyn ClipboardData> {
        self.clipboard.as_mut().map(|c| c as &mut dyn ClipboardData)
    }

    fn prevent_default(&mut self) {
        self.default_prevented = true;
    }
}
