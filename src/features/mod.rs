pub mod umkm;
