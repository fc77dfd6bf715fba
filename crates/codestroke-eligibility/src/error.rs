use thiserror::Error;

#[derive(Debug, Error)]
pub enum EligibilityError {
    #[error("unknown catalog: {0}")]
    UnknownCatalog(String),

    #[error("unknown finding '{finding_id}' for catalog '{catalog_id}'")]
    UnknownFinding {
        catalog_id: String,
        finding_id: String,
    },

    #[error("finding '{finding_id}' is not offered outside 3 to 4.5 hours from onset")]
    FindingNotOffered { finding_id: String },
}
