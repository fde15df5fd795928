pub mod enrich;
pub mod load;
pub mod output;
pub mod query;
pub mod rasterize;
pub mod render;
pub mod report;
