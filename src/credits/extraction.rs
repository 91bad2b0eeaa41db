use serde::{Deserialize, Serialize};

use super::domain::{CreditSheet, CulturalNewPoints, ModeSplit};

/// Upload ceiling for submitted credit certificates.
pub const MAX_DOCUMENT_BYTES: usize = 10 * 1024 * 1024;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Boundary to the external document-analysis service that reads credit
/// certificates. Implementations may return any subset of fields; the merge
/// below treats absent fields as "leave the member's value alone".
pub trait DocumentExtractor: Send + Sync {
    fn extract(&self, document: &[u8]) -> Result<PartialCreditSheet, ExtractionError>;
}

/// Failure modes at the extraction boundary.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("only PDF documents are accepted")]
    NotPdf,
    #[error("document exceeds the {limit} byte upload limit")]
    TooLarge { limit: usize },
    #[error("extraction service returned unusable data: {0}")]
    Malformed(String),
    #[error("extraction service unavailable: {0}")]
    Unavailable(String),
}

/// Reject documents the extraction service would choke on before they leave
/// the process.
pub fn check_document(document: &[u8]) -> Result<(), ExtractionError> {
    if document.len() > MAX_DOCUMENT_BYTES {
        return Err(ExtractionError::TooLarge {
            limit: MAX_DOCUMENT_BYTES,
        });
    }
    if !document.starts_with(PDF_MAGIC) {
        return Err(ExtractionError::NotPdf);
    }
    Ok(())
}

/// Stand-in extractor for deployments where no document-analysis service is
/// wired in. Uploads are rejected with a clear message instead of hanging.
pub struct UnconfiguredExtractor;

impl DocumentExtractor for UnconfiguredExtractor {
    fn extract(&self, _document: &[u8]) -> Result<PartialCreditSheet, ExtractionError> {
        Err(ExtractionError::Unavailable(
            "no document extraction service configured".to_string(),
        ))
    }
}

/// Mode-split category as extracted from a document, where either leaf may
/// be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialModeSplit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub online: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialCulturalNewPoints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indigenous: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multicultural: Option<f64>,
}

/// Subset of a credit sheet produced by document extraction.
///
/// The merge is field-wise: a present leaf overwrites the member's current
/// value, an absent leaf preserves it. This keeps a partial extraction from
/// wiping out numbers the member already typed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialCreditSheet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub professional: Option<PartialModeSplit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<PartialModeSplit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ethics: Option<PartialModeSplit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regulations: Option<PartialModeSplit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fire_safety: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_response: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infection_control: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender_sensitivity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cultural_old: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cultural_new: Option<PartialCulturalNewPoints>,
}

impl PartialCreditSheet {
    /// Fold the extracted fields into an existing sheet.
    pub fn merge_into(&self, sheet: &mut CreditSheet) {
        merge_split(&mut sheet.professional, self.professional);
        merge_split(&mut sheet.quality, self.quality);
        merge_split(&mut sheet.ethics, self.ethics);
        merge_split(&mut sheet.regulations, self.regulations);

        merge_leaf(&mut sheet.fire_safety, self.fire_safety);
        merge_leaf(&mut sheet.emergency_response, self.emergency_response);
        merge_leaf(&mut sheet.infection_control, self.infection_control);
        merge_leaf(&mut sheet.gender_sensitivity, self.gender_sensitivity);
        merge_leaf(&mut sheet.cultural_old, self.cultural_old);

        if let Some(cultural) = self.cultural_new {
            merge_cultural(&mut sheet.cultural_new, cultural);
        }
    }

    /// The merged result without mutating the original sheet.
    pub fn merged_with(&self, sheet: &CreditSheet) -> CreditSheet {
        let mut merged = *sheet;
        self.merge_into(&mut merged);
        merged
    }
}

fn merge_leaf(target: &mut f64, extracted: Option<f64>) {
    if let Some(value) = extracted {
        *target = value;
    }
}

fn merge_split(target: &mut ModeSplit, extracted: Option<PartialModeSplit>) {
    if let Some(split) = extracted {
        merge_leaf(&mut target.physical, split.physical);
        merge_leaf(&mut target.online, split.online);
    }
}

fn merge_cultural(target: &mut CulturalNewPoints, extracted: PartialCulturalNewPoints) {
    merge_leaf(&mut target.indigenous, extracted.indigenous);
    merge_leaf(&mut target.multicultural, extracted.multicultural);
}
