mod label_deduplication;
mod label_normalizer;

pub use label_deduplication::{deduplicate_labels, dedup_winner};
pub use label_normalizer::{normalize_labels, LabelNormalizer, NormalizationSummary};
