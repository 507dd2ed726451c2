// Server configuration
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: &str = "3000";
pub const DEFAULT_DATA_PATH: &str = "data";

// Session configuration
pub const SESSION_NAME: &str = "axum_session";
pub const SESSION_EXPIRY_DAYS: i64 = 3;
pub const MIN_SESSION_SECRET_LENGTH: usize = 64;

// Per-user resource documents
pub const EXPENSES_FILE: &str = "expenses.json";
pub const SETTINGS_FILE: &str = "settings.json";
pub const NOTIFICATIONS_FILE: &str = "notifications.json";
pub const CATEGORIES_FILE: &str = "categories.json";
pub const USERS_FILE: &str = "users.json";

// Remote storage
pub const DEFAULT_BUCKET: &str = "user-files";

// The account registry lives in the storage layer under this reserved scope,
// so both backends carry it without a second persistence mechanism.
pub const REGISTRY_SCOPE: i64 = 0;

// Categories seeded on a user's first access
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Food & Dining",
    "Transportation",
    "Shopping",
    "Entertainment",
    "Bills & Utilities",
    "Healthcare",
    "Travel",
    "Education",
    "Personal Care",
];

// Validation limits
pub const MAX_DESCRIPTION_LENGTH: usize = 255;
pub const MAX_CATEGORY_NAME_LENGTH: usize = 100;
pub const MAX_USERNAME_LENGTH: usize = 50;
pub const MIN_USERNAME_LENGTH: usize = 4;
pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const MAX_IMPORT_ROWS: usize = 10_000;

// Error messages
pub const ERR_STORAGE_WRITE: &str = "Storage write failed";
pub const ERR_INTERNAL: &str = "Internal server error";
pub const ERR_UNAUTHORIZED: &str = "Not logged in";
pub const ERR_EXPENSE_NOT_FOUND: &str = "Expense not found";
