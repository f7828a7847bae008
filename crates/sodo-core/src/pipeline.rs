use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::extract::{Extraction, ExtractorConfig, FieldExtractor};
use crate::normalize::TextNormalizer;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    pub fields_found: usize,
    pub persons_found: usize,
    pub duration_ms: u64,
}

/// Pipeline output for one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub normalized_text: String,
    pub extraction: Extraction,
    pub stats: ExtractionStats,
}

/// Normalize-then-extract for one document at a time. Holds no state
/// across documents; one instance can be reused, or cloned per thread
/// by callers who want cross-document parallelism.
#[derive(Debug, Clone)]
pub struct ExtractionPipeline {
    normalizer: TextNormalizer,
    extractor: FieldExtractor,
}

impl ExtractionPipeline {
    /// A pipeline with the default repair table and field catalog.
    pub fn new() -> Result<Self> {
        Ok(Self {
            normalizer: TextNormalizer::default(),
            extractor: FieldExtractor::new(&ExtractorConfig::default())?,
        })
    }

    pub fn with_config(config: &ExtractorConfig) -> Result<Self> {
        Ok(Self {
            normalizer: TextNormalizer::default(),
            extractor: FieldExtractor::new(config)?,
        })
    }

    #[must_use]
    pub fn with_normalizer(mut self, normalizer: TextNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    #[must_use]
    pub fn with_extractor(mut self, extractor: FieldExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Runs normalization then extraction. Never fails: a document the
    /// catalog does not match yields a record of empty strings.
    #[must_use]
    pub fn run(&self, raw_text: &str) -> PipelineOutput {
        let start = std::time::Instant::now();

        let normalized_text = self.normalizer.normalize(raw_text);
        let extraction = self.extractor.extract(&normalized_text);

        let stats = ExtractionStats {
            fields_found: extraction.record.found_count(),
            persons_found: extraction.persons.len(),
            duration_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        };
        tracing::debug!(
            "Extracted {} fields and {} person entries in {}ms",
            stats.fields_found,
            stats.persons_found,
            stats.duration_ms
        );

        PipelineOutput {
            normalized_text,
            extraction,
            stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Thửa đất số: 123   tờ bản đồ số: 45
Diện tích:  100.5 m 2
Loại đất: Đất ở tại nông thôn.
Địa chỉ: Thôn 3, xã Tân Phú
Thời hạn: Lâu dài.

Ông: Nguyen Van A, CCCD sô: 001, Địa chỉ: Ha Noi.

CHI NHÁNH VĂN PHÒNG ĐĂNG KÝ ĐẤT ĐAI HUYỆN
Số phát hành: AB 123456
ký ngày 5 tháng 3 năm 2020";

    #[test]
    fn test_end_to_end_noisy_document() {
        let output = ExtractionPipeline::new().unwrap().run(SAMPLE);
        let record = &output.extraction.record;

        assert_eq!(record.parcel_no, "123");
        assert_eq!(record.map_sheet_no, "45");
        assert_eq!(record.area, "100.5");
        assert_eq!(record.land_type, "Đất ở tại nông thôn");
        assert_eq!(record.usage_term, "Lâu dài");
        assert_eq!(record.issue_no, "AB 123456");
        assert_eq!(record.issued_at, "05/03/2020");

        assert_eq!(output.extraction.persons.len(), 1);
        assert_eq!(output.extraction.persons[0].name, "Nguyen Van A");
        assert_eq!(output.extraction.persons[0].id_no, "001");

        assert_eq!(output.stats.persons_found, 1);
        assert!(output.stats.fields_found >= 7);
    }

    #[test]
    fn test_empty_document() {
        let output = ExtractionPipeline::new().unwrap().run("");
        assert_eq!(output.normalized_text, "");
        assert_eq!(output.stats.fields_found, 0);
        assert!(output.extraction.persons.is_empty());
    }

    #[test]
    fn test_rerun_is_stable() {
        let pipeline = ExtractionPipeline::new().unwrap();
        let first = pipeline.run(SAMPLE);
        let second = pipeline.run(first.normalized_text.as_str());
        assert_eq!(first.extraction, second.extraction);
        assert_eq!(first.normalized_text, second.normalized_text);
    }
}
