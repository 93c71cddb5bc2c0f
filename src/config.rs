use serde::Deserialize;

/// Configuration for one upstream proxy target.
///
/// Handlers receive this at construction time instead of reading the
/// process environment per request; mock mode is an explicit flag here
/// rather than an implicit "no key configured" check.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Upstream endpoint URL.
    pub endpoint: String,
    /// Upstream API key, sent as the `api-key` header.
    pub api_key: Option<String>,
    /// Answer with a canned response instead of calling the upstream.
    #[serde(default)]
    pub mock: bool,
    /// Form field holding the uploaded file.
    #[serde(default = "default_field_name")]
    pub field_name: String,
    /// Filename to report when the part carries none.
    #[serde(default = "default_filename")]
    pub default_filename: String,
    /// Content type forwarded when the part carries none.
    #[serde(default = "default_forward_content_type")]
    pub forward_content_type: String,
}

impl UpstreamConfig {
    /// Creates a config for `endpoint` with all defaults.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: None,
            mock: false,
            field_name: default_field_name(),
            default_filename: default_filename(),
            forward_content_type: default_forward_content_type(),
        }
    }

    /// Sets the API key.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key.replace(key.into());
        self
    }

    /// Enables or disables mock mode.
    #[must_use]
    pub fn mock(mut self, on: bool) -> Self {
        self.mock = on;
        self
    }

    /// Sets the form field holding the uploaded file.
    #[must_use]
    pub fn field_name(mut self, name: impl Into<String>) -> Self {
        self.field_name = name.into();
        self
    }

    /// Sets the fallback filename.
    #[must_use]
    pub fn default_filename(mut self, filename: impl Into<String>) -> Self {
        self.default_filename = filename.into();
        self
    }

    /// Sets the fallback forward content type.
    #[must_use]
    pub fn forward_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.forward_content_type = content_type.into();
        self
    }
}

fn default_field_name() -> String {
    "file".to_owned()
}

fn default_filename() -> String {
    "audio.webm".to_owned()
}

fn default_forward_content_type() -> String {
    "audio/webm".to_owned()
}
