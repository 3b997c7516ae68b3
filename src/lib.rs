pub mod genotype;
pub mod output;
pub mod selection;
pub mod statistics;
pub mod subsample;
pub mod types;
pub mod vcf_parser;
