use csv::Writer;

use crate::core::error::{AppError, Result};
use crate::features::umkm::models::Umkm;
use crate::shared::constants::EXPORT_HEADERS;

/// Serialize records to CSV, one row per record in the given order
pub fn records_to_csv(records: &[Umkm]) -> Result<Vec<u8>> {
    let mut writer = Writer::from_writer(Vec::new());

    writer
        .write_record(EXPORT_HEADERS)
        .map_err(|e| AppError::Internal(format!("Failed to write CSV header: {}", e)))?;

    for r in records {
        let id = r.id.to_string();
        writer
            .write_record([
                id.as_str(),
                r.latitude.as_deref().unwrap_or(""),
                r.longitude.as_deref().unwrap_or(""),
                r.nama.as_str(),
                r.nim.as_str(),
                r.kelas.as_str(),
                r.umkm.as_str(),
                r.kategori.as_str(),
                r.pegawai.as_str(),
                r.foto.as_deref().unwrap_or(""),
            ])
            .map_err(|e| AppError::Internal(format!("Failed to write CSV row: {}", e)))?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("Failed to finish CSV export: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, nama: &str, latitude: Option<&str>) -> Umkm {
        Umkm {
            id,
            latitude: latitude.map(String::from),
            longitude: latitude.map(|_| "106.8456".to_string()),
            nama: nama.into(),
            nim: format!("NIM{}", id),
            kelas: "A".into(),
            umkm: "Warung".into(),
            kategori: "Makanan".into(),
            pegawai: "2".into(),
            foto: Some(format!("20250101_12000{}_photo.jpg", id)),
        }
    }

    #[test]
    fn test_export_has_header_and_one_line_per_record() {
        let records = vec![
            record(3, "Budi", Some("-6.2088")),
            record(2, "Siti", None),
            record(1, "Andi", None),
        ];

        let bytes = records_to_csv(&records).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "ID,Latitude,Longitude,Nama,NIM,Kelas,UMKM,Kategori,Pegawai,Foto"
        );
        assert_eq!(
            lines[1],
            "3,-6.2088,106.8456,Budi,NIM3,A,Warung,Makanan,2,20250101_120003_photo.jpg"
        );
        assert_eq!(lines[2], "2,,,Siti,NIM2,A,Warung,Makanan,2,20250101_120002_photo.jpg");
    }

    #[test]
    fn test_export_columns_map_back_to_fields() {
        let mut tricky = record(9, "Toko \"Maju\", Jaya", None);
        tricky.umkm = "Kopi\nSusu".into();

        let bytes = records_to_csv(&[tricky.clone()]).unwrap();
        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(&row[0], "9");
        assert_eq!(&row[3], tricky.nama);
        assert_eq!(&row[6], tricky.umkm);
        assert_eq!(&row[9], tricky.foto.unwrap());
    }

    #[test]
    fn test_export_empty_list_is_header_only() {
        let bytes = records_to_csv(&[]).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap().lines().count(), 1);
    }
}
