use serde::{Deserialize, Serialize};

/// Scalar fields of a land-title certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    ParcelNo,
    MapSheetNo,
    Area,
    LandType,
    UsageForm,
    Address,
    UsageTerm,
    Origin,
    RegisteredAt,
    IssueNo,
    BookNo,
    IssuedAt,
    Notes,
}

impl Field {
    pub const ALL: [Self; 13] = [
        Self::ParcelNo,
        Self::MapSheetNo,
        Self::Area,
        Self::LandType,
        Self::UsageForm,
        Self::Address,
        Self::UsageTerm,
        Self::Origin,
        Self::RegisteredAt,
        Self::IssueNo,
        Self::BookNo,
        Self::IssuedAt,
        Self::Notes,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ParcelNo => "parcel_no",
            Self::MapSheetNo => "map_sheet_no",
            Self::Area => "area",
            Self::LandType => "land_type",
            Self::UsageForm => "usage_form",
            Self::Address => "address",
            Self::UsageTerm => "usage_term",
            Self::Origin => "origin",
            Self::RegisteredAt => "registered_at",
            Self::IssueNo => "issue_no",
            Self::BookNo => "book_no",
            Self::IssuedAt => "issued_at",
            Self::Notes => "notes",
        }
    }

    /// Placeholder key used by the external document-template renderer.
    #[must_use]
    pub fn context_key(&self) -> &'static str {
        match self {
            Self::ParcelNo => "SoThua",
            Self::MapSheetNo => "SoToBanDo",
            Self::Area => "DienTich",
            Self::LandType => "LoaiDat",
            Self::UsageForm => "HinhThucSuDung",
            Self::Address => "DiaChi",
            Self::UsageTerm => "ThoiHanSuDung",
            Self::Origin => "NguonGocSuDung",
            Self::RegisteredAt => "ThoiDiemDangKy",
            Self::IssueNo => "SoPhatHanhGCN",
            Self::BookNo => "SoVaoSoCapGCN",
            Self::IssuedAt => "ThoiDiemDangKyGCN",
            Self::Notes => "NoiDung",
        }
    }

    /// Vietnamese label as printed on the certificate, for display output.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::ParcelNo => "Thửa đất số",
            Self::MapSheetNo => "Tờ bản đồ số",
            Self::Area => "Diện tích",
            Self::LandType => "Loại đất",
            Self::UsageForm => "Hình thức sử dụng",
            Self::Address => "Địa chỉ",
            Self::UsageTerm => "Thời hạn sử dụng",
            Self::Origin => "Nguồn gốc sử dụng",
            Self::RegisteredAt => "Thời điểm đăng ký",
            Self::IssueNo => "Số phát hành GCN",
            Self::BookNo => "Số vào sổ cấp GCN",
            Self::IssuedAt => "Ngày cấp GCN",
            Self::Notes => "Ghi chú",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One extracted certificate. Every field defaults to an empty string;
/// a missing field is a normal outcome, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandRecord {
    pub parcel_no: String,
    pub map_sheet_no: String,
    pub area: String,
    pub land_type: String,
    pub usage_form: String,
    pub address: String,
    pub usage_term: String,
    pub origin: String,
    pub registered_at: String,
    pub issue_no: String,
    pub book_no: String,
    pub issued_at: String,
    pub notes: String,
}

impl LandRecord {
    #[must_use]
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::ParcelNo => &self.parcel_no,
            Field::MapSheetNo => &self.map_sheet_no,
            Field::Area => &self.area,
            Field::LandType => &self.land_type,
            Field::UsageForm => &self.usage_form,
            Field::Address => &self.address,
            Field::UsageTerm => &self.usage_term,
            Field::Origin => &self.origin,
            Field::RegisteredAt => &self.registered_at,
            Field::IssueNo => &self.issue_no,
            Field::BookNo => &self.book_no,
            Field::IssuedAt => &self.issued_at,
            Field::Notes => &self.notes,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::ParcelNo => self.parcel_no = value,
            Field::MapSheetNo => self.map_sheet_no = value,
            Field::Area => self.area = value,
            Field::LandType => self.land_type = value,
            Field::UsageForm => self.usage_form = value,
            Field::Address => self.address = value,
            Field::UsageTerm => self.usage_term = value,
            Field::Origin => self.origin = value,
            Field::RegisteredAt => self.registered_at = value,
            Field::IssueNo => self.issue_no = value,
            Field::BookNo => self.book_no = value,
            Field::IssuedAt => self.issued_at = value,
            Field::Notes => self.notes = value,
        }
    }

    /// Number of fields that were actually found in the document.
    #[must_use]
    pub fn found_count(&self) -> usize {
        Field::ALL
            .iter()
            .filter(|f| !self.get(**f).is_empty())
            .count()
    }
}

/// One land user named on the certificate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    pub name: String,
    pub id_no: String,
    pub address: String,
}

impl PersonRecord {
    #[must_use]
    pub fn new(name: String, id_no: String, address: String) -> Self {
        Self {
            name,
            id_no,
            address,
        }
    }
}
