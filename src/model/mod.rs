pub mod attendance;
pub mod client;
pub mod company_settings;
pub mod employee;
pub mod expense;
pub mod leave_request;
pub mod payroll;
pub mod position;
pub mod role;
