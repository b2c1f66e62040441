//! Error type shared by the analysis, storage and HTTP layers.

use actix_web::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("لم يتم إرفاق ملف")]
    MissingFile,

    #[error("لم يتم اختيار ملف")]
    EmptyFilename,

    #[error("نوع الملف غير مدعوم. يرجى رفع ملف Excel")]
    UnsupportedFileType { filename: String },

    #[error("حجم الملف يتجاوز الحد المسموح ({limit} بايت)")]
    PayloadTooLarge { limit: usize },

    #[error("الرجاء تحديد الشهر والسنة للتصدير")]
    MissingPeriod,

    /// Malformed multipart body.
    #[error("طلب غير صالح: {0}")]
    InvalidForm(String),

    /// The workbook could not be read as tabular data.
    #[error("خطأ في تحليل الملف: {0}")]
    Analysis(String),

    #[error("الإحصائية غير موجودة: {0}")]
    NotFound(i64),

    #[error("لا توجد بيانات لهذا الشهر والسنة ({month}/{year})")]
    NoRecords { month: u32, year: i32 },

    #[error("لا توجد فرص تطوعية مفصلة لهذا الشهر والسنة ({month}/{year})")]
    NoDetails { month: u32, year: i32 },

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("export error: {0}")]
    Export(String),
}

impl StatsError {
    /// Input rejected before any analysis or query ran.
    pub fn is_input_rejection(&self) -> bool {
        matches!(
            self,
            Self::MissingFile
                | Self::EmptyFilename
                | Self::UnsupportedFileType { .. }
                | Self::PayloadTooLarge { .. }
                | Self::MissingPeriod
                | Self::InvalidForm(_)
        )
    }

    /// Expected empty result, not a fault.
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoRecords { .. } | Self::NoDetails { .. })
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            e if e.is_input_rejection() => StatusCode::BAD_REQUEST,
            Self::NotFound(_) | Self::NoRecords { .. } | Self::NoDetails { .. } => {
                StatusCode::NOT_FOUND
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type StatsResult<T> = Result<T, StatsError>;
