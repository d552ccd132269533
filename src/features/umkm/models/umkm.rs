use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// A surveyed UMKM record as stored by a backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Umkm {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: i64,
    #[serde(default)]
    pub latitude: Option<String>,
    #[serde(default)]
    pub longitude: Option<String>,
    pub nama: String,
    pub nim: String,
    pub kelas: String,
    pub umkm: String,
    pub kategori: String,
    pub pegawai: String,
    #[serde(default)]
    pub foto: Option<String>,
}

/// Validated text fields of a record, shared by create and update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UmkmFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<String>,
    pub nama: String,
    pub nim: String,
    pub kelas: String,
    pub umkm: String,
    pub kategori: String,
    pub pegawai: String,
}

/// A record ready for insertion, its photo already stored
#[derive(Debug, Clone, Serialize)]
pub struct NewUmkm {
    #[serde(flatten)]
    pub fields: UmkmFields,
    pub foto: String,
}

impl Umkm {
    pub fn from_new(id: i64, new: NewUmkm) -> Self {
        let NewUmkm { fields, foto } = new;
        Self {
            id,
            latitude: fields.latitude,
            longitude: fields.longitude,
            nama: fields.nama,
            nim: fields.nim,
            kelas: fields.kelas,
            umkm: fields.umkm,
            kategori: fields.kategori,
            pegawai: fields.pegawai,
            foto: Some(foto),
        }
    }

    /// Apply an update the way every backend does: required fields always,
    /// coordinates only when supplied, photo only when replaced
    pub fn apply(&mut self, fields: &UmkmFields, new_foto: Option<&str>) {
        if fields.latitude.is_some() {
            self.latitude = fields.latitude.clone();
        }
        if fields.longitude.is_some() {
            self.longitude = fields.longitude.clone();
        }
        self.nama = fields.nama.clone();
        self.nim = fields.nim.clone();
        self.kelas = fields.kelas.clone();
        self.umkm = fields.umkm.clone();
        self.kategori = fields.kategori.clone();
        self.pegawai = fields.pegawai.clone();
        if let Some(foto) = new_foto {
            self.foto = Some(foto.to_string());
        }
    }
}

/// Remote APIs may send ids as numbers or numeric strings
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(id) => Ok(id),
        RawId::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}
