//! API-model documentation rendered by the DocGen service.

use edgemgmt_client::{ApiClient, HTML, JSON, Result};

use crate::controller::OrganizationAware;

/// Locates one operation inside an API model revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRef {
    pub revision: String,
    pub resource: String,
    pub operation: String,
}

/// Reader for `/o/{org}/apimodels`.
#[derive(Debug, Clone)]
pub struct DocGenDoc {
    client: ApiClient,
}

impl DocGenDoc {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Fetch one operation of model `mid`.
    ///
    /// Without a template the operation description is returned as JSON text;
    /// with one, the rendered HTML page for that template.
    pub async fn request_operation(
        &self,
        data: &OperationRef,
        mid: &str,
        template: Option<&str>,
    ) -> Result<String> {
        let mut segments = vec![
            "o",
            self.client.org_name(),
            "apimodels",
            mid,
            "revisions",
            data.revision.as_str(),
            "resources",
            data.resource.as_str(),
            "methods",
            data.operation.as_str(),
        ];

        match template.filter(|name| !name.is_empty()) {
            None => self.client.get_text(&segments, &[], JSON).await,
            Some(name) => {
                segments.push("doc");
                self.client
                    .get_text(&segments, &[("template", name)], HTML)
                    .await
            }
        }
    }
}

impl OrganizationAware for DocGenDoc {
    fn organisation(&self) -> &str {
        self.client.org_name()
    }

    fn set_organisation(&mut self, org_name: &str) {
        self.client = self.client.for_org(org_name);
    }
}
