// Attachments
pub const MAX_PREVIEW_FILES: usize = 5;

// WhatsApp
pub const COUNTRY_CODE: &str = "966";
pub const DESCRIPTION_PREVIEW_CHARS: usize = 100;
pub const WHATSAPP_BASE_URL: &str = "https://wa.me/";

// Beneficiary autocomplete
pub const AUTOCOMPLETE_MIN_CHARS: usize = 2;

// Sentinel "none" option value used by the classic create-ticket variant
pub const NONE_OPTION_VALUE: &str = "0";

// Custom priority is selected through this value in the priority dropdowns
pub const CUSTOM_PRIORITY_VALUE: &str = "0";

// Overdue badge refresh interval (ms)
pub const DUE_DATE_REFRESH_MS: u32 = 60_000;

// Setup progress pacing (ms)
pub const SETUP_STEP_MIN_MS: u32 = 500;
pub const SETUP_STEP_MAX_MS: u32 = 1_500;
pub const SETUP_COMPLETE_DELAY_MS: u32 = 1_000;

// ---------------------------------------------------------------------------
// User-facing strings (Arabic UI)
// ---------------------------------------------------------------------------

pub const MSG_SECTION_PLACEHOLDER: &str = "-- اختر القسم --";
pub const MSG_NO_SECTIONS: &str = "-- لا توجد أقسام --";
pub const MSG_NONE_SECTION: &str = "-- بدون قسم --";
pub const MSG_SECTIONS_FAILED: &str = "-- تعذر تحميل الأقسام --";

pub const MSG_SUBCATEGORY_PLACEHOLDER: &str = "-- اختر التصنيف الفرعي --";
pub const MSG_NO_SUBCATEGORIES: &str = "-- لا توجد تصنيفات فرعية --";
pub const MSG_NONE_SUBCATEGORY: &str = "-- بدون تصنيف فرعي --";
pub const MSG_SUBCATEGORIES_FAILED: &str = "-- تعذر تحميل التصنيفات الفرعية --";

pub const MSG_UNSPECIFIED: &str = "غير محدد";
pub const MSG_NO_TECH_PHONE: &str = "لا يوجد رقم هاتف مسجل لهذا الفني.";
pub const MSG_SELECT_TECH_FIRST: &str = "يرجى اختيار فني أولاً.";
pub const MSG_SELECT_CATEGORY_FIRST: &str = "يرجى اختيار التصنيف قبل حفظ التغييرات.";
pub const MSG_OVERDUE: &str = "متأخر";

pub const MSG_USERNAME_REQUIRED: &str = "يرجى إدخال اسم المستخدم";
pub const MSG_PASSWORD_REQUIRED: &str = "يرجى إدخال كلمة المرور";
