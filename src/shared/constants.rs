/// Default directory for uploaded photos, relative to the working directory
pub const DEFAULT_UPLOAD_DIR: &str = "static/uploads";

/// Public URL prefix under which stored photos are served
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

/// Filename offered to the browser for the CSV export
pub const EXPORT_FILENAME: &str = "data_umkm.csv";

/// Column headers of the CSV export, in record field order
pub const EXPORT_HEADERS: [&str; 10] = [
    "ID",
    "Latitude",
    "Longitude",
    "Nama",
    "NIM",
    "Kelas",
    "UMKM",
    "Kategori",
    "Pegawai",
    "Foto",
];

/// Prefix format of stored photo names (second resolution, sortable)
pub const PHOTO_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Fallback stem when an uploaded filename sanitizes to nothing
pub const FALLBACK_PHOTO_NAME: &str = "upload";
