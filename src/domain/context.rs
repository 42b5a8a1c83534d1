use std::collections::HashMap;

const FORWARDED_FOR: &str = "x-forwarded-for";

/// Capabilities of the environment a client runs in.
///
/// The caller decides these up front instead of the client sniffing its
/// surroundings: a server rendering a page can forward the visitor's address
/// but cannot navigate, a browser-like shell can navigate but has no inbound
/// request to forward from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionContext {
    pub can_forward_client_ip: bool,
    pub can_navigate: bool,
    /// Locale forwarded under the configured locale header, when known.
    pub locale: Option<String>,
    // Keys are stored lowercased.
    inbound_headers: HashMap<String, String>,
}

impl ExecutionContext {
    /// Context for code handling an inbound request (no navigation).
    pub fn server<K, V>(inbound_headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut context = Self {
            can_forward_client_ip: true,
            ..Self::default()
        };
        for (name, value) in inbound_headers {
            context = context.with_inbound_header(name.as_ref(), value);
        }
        context
    }

    /// Context for an interactive shell that can follow redirects.
    pub fn interactive() -> Self {
        Self {
            can_navigate: true,
            ..Self::default()
        }
    }

    pub fn with_inbound_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.inbound_headers
            .insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn inbound_header(&self, name: &str) -> Option<&str> {
        self.inbound_headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Client address to forward upstream, if this context may forward it.
    pub fn forwarded_for(&self) -> Option<&str> {
        if !self.can_forward_client_ip {
            return None;
        }
        self.inbound_header(FORWARDED_FOR)
            .filter(|value| !value.trim().is_empty())
    }
}
