pub mod capture_session;
pub mod device_claims;
