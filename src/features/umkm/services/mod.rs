mod export_service;
mod umkm_service;

pub use export_service::records_to_csv;
pub use umkm_service::UmkmService;
