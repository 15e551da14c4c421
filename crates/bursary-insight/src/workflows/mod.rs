pub mod bursary;
pub mod ingest;
