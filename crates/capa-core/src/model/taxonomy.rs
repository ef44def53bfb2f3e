//! Static Fishbone cause taxonomy.
//!
//! Each sub-category descriptor reads `"<label> → <annotation>"`. Only the
//! label is shown in reports; the annotation is guidance for whoever picks the
//! category.

/// Sentinel category name meaning "use the category's custom name instead".
pub const CUSTOM_CATEGORY: &str = "Lainnya...";

/// Separates a sub-category label from its descriptive annotation.
pub const ANNOTATION_DELIMITER: char = '→';

/// A named family of cause categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryGroup {
    pub name: &'static str,
    pub sub_categories: &'static [&'static str],
}

pub static CATEGORY_GROUPS: &[CategoryGroup] = &[
    CategoryGroup {
        name: "1. Produksi / Operasional (6M klasik)",
        sub_categories: &[
            "Manusia (Man) → tenaga kerja, keterampilan, motivasi",
            "Mesin (Machine) → kondisi mesin, perawatan, downtime",
            "Metode (Method) → SOP, instruksi kerja, teknik produksi",
            "Material (Material) → bahan baku, kualitas, pemasok",
            "Pengukuran (Measurement) → standar mutu, kalibrasi, KPI produksi",
            "Lingkungan (Mother Nature/Environment) → suhu, kelembapan, kondisi tempat kerja",
        ],
    },
    CategoryGroup {
        name: "2. Manajemen Umum",
        sub_categories: &[
            "Kepemimpinan & Pengambilan Keputusan → arahan, kecepatan keputusan",
            "Kebijakan & Tata Kelola → aturan, regulasi, kepatuhan",
            "Strategi → visi, misi, roadmap tidak jelas",
            "Komunikasi → koordinasi antar divisi",
            "Budaya Organisasi → resistensi terhadap perubahan, budaya kerja",
        ],
    },
    CategoryGroup {
        name: "3. Keuangan (Finance & Akuntansi)",
        sub_categories: &[
            "Penganggaran & Kontrol → alokasi dana, arus kas",
            "Pendapatan & Biaya → penjualan, biaya operasional",
            "Kebijakan & Kepatuhan → pajak, audit, regulasi",
            "Sistem & Alat → software akuntansi, ERP",
            "SDM → kompetensi staf keuangan",
        ],
    },
    CategoryGroup {
        name: "4. Sumber Daya Manusia (HRD)",
        sub_categories: &[
            "Rekrutmen → kesalahan seleksi, gap keterampilan",
            "Pelatihan & Pengembangan → kurangnya program peningkatan skill",
            "Kinerja & Penilaian → penilaian tidak objektif",
            "Kompensasi & Benefit → gaji, tunjangan, insentif",
            "Hubungan Industrial → serikat pekerja, konflik tenaga kerja",
            "Keterlibatan & Budaya Kerja → kepuasan kerja, moral, motivasi",
        ],
    },
    CategoryGroup {
        name: "5. Pemasaran & Penjualan",
        sub_categories: &[
            "Kebutuhan Pelanggan → tren pasar berubah, ekspektasi tidak jelas",
            "Produk & Layanan → kualitas, inovasi, diferensiasi",
            "Harga (Price) → strategi harga tidak kompetitif",
            "Distribusi (Place) → saluran distribusi terbatas",
            "Promosi → iklan, branding, digital marketing",
            "SDM Penjualan (People) → keterampilan tim sales, motivasi",
        ],
    },
    CategoryGroup {
        name: "6. Riset & Pengembangan (R&D)",
        sub_categories: &[
            "Ide & Kreativitas → kurang riset pasar, minim inovasi",
            "Teknologi → alat, software, metode terbatas",
            "Proses → siklus inovasi lambat",
            "Pendanaan → anggaran terbatas",
            "Kolaborasi → kurang kerja sama eksternal (universitas, mitra)",
            "SDM → keterampilan tim riset",
        ],
    },
    CategoryGroup {
        name: "7. Teknologi Informasi (IT)",
        sub_categories: &[
            "Infrastruktur → jaringan, server, hardware",
            "Perangkat Lunak → bug, aplikasi usang",
            "Manajemen Data → keamanan, integritas, backup",
            "Kebijakan & Keamanan → cyber security, kontrol akses",
            "SDM IT → keterampilan staf, kecepatan support",
        ],
    },
    CategoryGroup {
        name: "8. Mutu, K3 & Lingkungan",
        sub_categories: &[
            "Standar Mutu → ISO, SOP mutu",
            "Keselamatan Kerja (K3) → kecelakaan, APD",
            "Lingkungan → limbah, polusi, regulasi lingkungan",
            "Kepatuhan → audit, sertifikasi",
            "Pelatihan & Kesadaran → training mutu & safety",
        ],
    },
    CategoryGroup {
        name: "9. Logistik & Rantai Pasok",
        sub_categories: &[
            "Pemasok (Supplier) → keterlambatan, kualitas rendah",
            "Transportasi → armada, biaya distribusi",
            "Pergudangan → stok menumpuk, sistem FIFO tidak jalan",
            "Aliran Informasi → data supply tidak update",
            "Biaya → ongkos transportasi, gudang, impor",
        ],
    },
    CategoryGroup {
        name: "10. Layanan Pelanggan",
        sub_categories: &[
            "Waktu Tanggap (Response Time) → kecepatan pelayanan",
            "Pengetahuan → keterampilan staf customer service",
            "Alat & Sistem → CRM, ticketing system",
            "Komunikasi → empati, bahasa, follow-up",
            "Kebijakan → retur, garansi, fleksibilitas layanan",
        ],
    },
];

/// Name given to a freshly added category: the first descriptor of the first
/// group.
#[must_use]
pub fn default_category() -> &'static str {
    CATEGORY_GROUPS
        .first()
        .and_then(|group| group.sub_categories.first())
        .copied()
        .unwrap_or(CUSTOM_CATEGORY)
}

/// Strip the descriptive annotation from a descriptor.
///
/// `"Mesin (Machine) → kondisi mesin"` becomes `"Mesin (Machine)"`. Names
/// without a delimiter are returned trimmed.
#[must_use]
pub fn display_label(descriptor: &str) -> &str {
    descriptor
        .split(ANNOTATION_DELIMITER)
        .next()
        .unwrap_or(descriptor)
        .trim()
}

/// The annotation part of a descriptor, if any.
#[must_use]
pub fn annotation(descriptor: &str) -> Option<&str> {
    descriptor
        .split_once(ANNOTATION_DELIMITER)
        .map(|(_, note)| note.trim())
        .filter(|note| !note.is_empty())
}
