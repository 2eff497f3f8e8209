pub mod assay_pipeline;
pub mod logger;
