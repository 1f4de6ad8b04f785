/// Upstream endpoint declared in the plugin's `http_service.endpoint` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointDescriptor {
    pub service_name: String,
    pub service_port: u16,
    /// Falls back to `service_name` when the payload omits it.
    pub service_host: String,
}

impl EndpointDescriptor {
    pub fn new(service_name: String, service_port: u16, service_host: Option<String>) -> Self {
        let service_host = service_host.unwrap_or_else(|| service_name.clone());
        Self {
            service_name,
            service_port,
            service_host,
        }
    }
}
