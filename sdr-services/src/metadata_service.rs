//! Company metadata lookup

use std::collections::BTreeMap;
use std::sync::Arc;

use sdr_research::{
    apply_vocabularies, default_metadata, normalize_with_stage, MetadataProvider, METADATA_FIELDS,
};
use tracing::{debug, info, instrument};

pub struct MetadataService {
    provider: Arc<dyn MetadataProvider>,
}

impl MetadataService {
    pub fn new(provider: Arc<dyn MetadataProvider>) -> Self {
        Self { provider }
    }

    /// Structured metadata for a company; every field is always present
    #[instrument(skip(self))]
    pub async fn get_company_metadata(&self, company_name: &str) -> BTreeMap<String, String> {
        let company_name = company_name.trim();
        if company_name.is_empty() {
            return default_metadata(METADATA_FIELDS);
        }

        let Some(raw) = self.provider.company_metadata_text(company_name).await else {
            info!("No metadata available for {}, returning defaults", company_name);
            return default_metadata(METADATA_FIELDS);
        };

        let normalized = normalize_with_stage(&raw, METADATA_FIELDS);
        debug!(stage = ?normalized.stage, "Normalized metadata for {}", company_name);

        let mut fields = normalized.fields;
        apply_vocabularies(&mut fields);
        fields
    }
}
