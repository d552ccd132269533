mod umkm;

pub use umkm::{NewUmkm, Umkm, UmkmFields};
pub(crate) use umkm::deserialize_id;
