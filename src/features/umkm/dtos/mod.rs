mod umkm_dto;

pub use umkm_dto::{UmkmForm, UmkmResponseDto, UmkmSubmission, UploadedPhoto};
