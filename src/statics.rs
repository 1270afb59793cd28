// Central place for UI strings, field names and configuration defaults.
// Keep these out of gui.rs to reduce duplication and make tweaks safer.

// Configuration defaults and environment keys.
pub const DEFAULT_USERS_URL: &str = "https://microsoftedge.github.io/Demos/json-dummy-data/64KB.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_LOG_FILTER: &str = "info";
pub const USER_AGENT: &str = concat!("acme-users/", env!("CARGO_PKG_VERSION"));

pub const ENV_USERS_URL: &str = "ACME_USERS_URL";
pub const ENV_USERS_FILE: &str = "ACME_USERS_FILE";
pub const ENV_TIMEOUT_SECS: &str = "ACME_USERS_TIMEOUT_SECS";
pub const ENV_LOG: &str = "ACME_USERS_LOG";

// Record field names (FIELD_ prefix).
pub const FIELD_ID: &str = "id";

// Searched in this order for a display name.
pub const FIELD_NAME_PRIORITY: [&str; 5] = ["name", "fullName", "displayName", "firstName", "title"];
pub const FIELD_FIRST_NAME: [&str; 2] = ["firstName", "first_name"];
pub const FIELD_LAST_NAME: [&str; 2] = ["lastName", "last_name"];

// System-managed fields that never get an input box.
pub const NON_EDITABLE_FIELDS: [&str; 4] = ["id", "_id", "createdAt", "updatedAt"];

// Formatting thresholds.
pub const FIELD_VALUE_MAX_CHARS: usize = 100;
pub const TABLE_VALUE_TRUNCATE_CHARS: usize = 50;
pub const ELLIPSIS: &str = "...";

// English UI strings (EN_ prefix to make future localization easier)
pub const EN_APP_TITLE: &str = "User Management";
pub const EN_APP_SUBTITLE: &str = "Manage and view user information";

pub const EN_UNKNOWN_USER: &str = "Unknown User";
pub const EN_USER_PREFIX: &str = "User ";
pub const EN_UNKNOWN: &str = "Unknown";
pub const EN_NOT_SPECIFIED: &str = "Not specified";
pub const EN_YES: &str = "Yes";
pub const EN_NO: &str = "No";
pub const EN_COMPLEX_OBJECT: &str = "[Complex Object]";
pub const EN_TABLE_MISSING: &str = "-";

pub const EN_HEADING_USERS_LIST: &str = "Users List";
pub const EN_LABEL_TOTAL_USERS: &str = "Total users:";
pub const EN_BADGE_EDITING: &str = "Editing Mode";
pub const EN_COL_ACTIONS: &str = "Actions";
pub const EN_LOADING_USERS: &str = "Loading users...";
pub const EN_EDITED_USER_GONE: &str = "The user being edited is no longer in the list.";

pub const EN_BTN_EDIT: &str = "Edit";
pub const EN_BTN_SAVE: &str = "Save";
pub const EN_BTN_CANCEL: &str = "Cancel";
pub const EN_BTN_REVERT: &str = "Revert";
pub const EN_BTN_RELOAD: &str = "Reload";
pub const EN_BTN_BACK: &str = "<- Back to Users";
pub const EN_BTN_EDIT_USER: &str = "Edit User";

pub const EN_HEADING_USER_DETAILS: &str = "User Details";
pub const EN_USER_DETAILS_SUBTITLE: &str = "Detailed information for the selected user";
pub const EN_PREFIX_ID: &str = "ID: ";
pub const EN_HEADING_NOT_FOUND: &str = "User Not Found";
pub const EN_NOT_FOUND_BODY: &str = "The requested user could not be found.";

pub const EN_STATUS_LOADING: &str = "Fetching users...";
pub const EN_STATUS_EDITING: &str = "Editing user";
pub const EN_STATUS_SAVED: &str = "Saved";
pub const EN_STATUS_CANCELLED: &str = "Edit cancelled";
pub const EN_STATUS_REVERTED: &str = "Edits reverted";
