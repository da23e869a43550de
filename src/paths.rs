//! Navigable page paths of the portal.

// Auth pages
pub const LOGIN: &str = "/login";
pub const REGISTER: &str = "/register";
pub const FORGOT_PASSWORD: &str = "/forgot-password";
pub const OTP_VERIFICATION: &str = "/verify-otp";
pub const RESET_PASSWORD: &str = "/reset-password";

pub const HOME: &str = "/";

// Donor pages
pub const DONOR_INDEX: &str = "/donor";
pub const DONOR_HOMEPAGE: &str = "/donor/homepage";
pub const DONOR_ABOUT_US: &str = "/donor/aboutus";
pub const DONOR_DASHBOARD: &str = "/donor/dashboard";
pub const DONOR_DONATIONS: &str = "/donor/donations";
pub const DONOR_PROFILE: &str = "/donor/profile";

// Organizer pages
pub const ORGANIZER_INDEX: &str = "/organizer";
pub const ORGANIZER_DASHBOARD: &str = "/organizer/dashboard";
pub const ORGANIZER_CAMPAIGNS: &str = "/organizer/campaigns";
pub const ORGANIZER_CREATE_CAMPAIGN: &str = "/organizer/campaigns/create";
pub const ORGANIZER_EDIT_CAMPAIGN: &str = "/organizer/campaigns/{id}/edit";
pub const ORGANIZER_WITHDRAWALS: &str = "/organizer/withdrawals";
pub const ORGANIZER_PROFILE: &str = "/organizer/profile";

// Admin pages
pub const ADMIN_INDEX: &str = "/admin";
pub const ADMIN_DASHBOARD: &str = "/admin/dashboard";
pub const ADMIN_USERS: &str = "/admin/users";
pub const ADMIN_CAMPAIGNS: &str = "/admin/campaigns";
pub const ADMIN_ORGANIZERS: &str = "/admin/organizers";
pub const ADMIN_DONATIONS: &str = "/admin/donations";
pub const ADMIN_WITHDRAWALS: &str = "/admin/withdrawals";
