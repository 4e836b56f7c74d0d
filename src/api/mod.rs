pub mod attendance;
pub mod client;
pub mod dashboard;
pub mod employee;
pub mod expense;
pub mod leave_request;
pub mod payroll;
pub mod position;
pub mod settings;
