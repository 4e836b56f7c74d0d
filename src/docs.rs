use crate::error::FieldError;
use crate::model::{
    attendance::AttendanceRecord,
    client::{Client, ClientStatus},
    company_settings::CompanySettings,
    employee::{Employee, EmployeeStatus},
    expense::Expense,
    leave_request::{LeaveRequest, LeaveStatus, LeaveType},
    payroll::{PayrollRecord, PayrollRun},
    position::Position,
    role::Role,
};
use crate::models::{LoginReqDto, Session};
use crate::service::{
    attendance::{AttendanceHistory, AttendanceWarning},
    client::{ClientStatusChange, CreateClient},
    dashboard::{Dashboard, DepartmentGroup},
    employee::{ChangePassword, EmployeeListResponse, RegisterEmployee, UpdateEmployee, UpdateProfile},
    expense::{ExpenseReport, LogExpense},
    leave::{LeaveListResponse, SubmitLeave},
    payroll::{PayrollBatch, PayrollListResponse, Payslip, RunPayroll},
    position::{CreatePosition, UpdatePosition},
    settings::UpdateSettings,
};
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRM System API",
        version = "1.0.0",
        description = r#"
## Human Resource Management (HRM) System

Role-gated HR workflows for a single company.

### 🔹 Key Features
- **Employee Lifecycle**
  - Self-registration, HR approval or rejection, activation toggles
- **Leave Management**
  - Apply for leave; HR, Managers and the Owner approve or reject
- **Attendance**
  - Clock in and clock out, one open session at a time
- **Payroll**
  - Monthly runs paying a twelfth of each position's base salary, payslips
- **Company**
  - Positions, clients, expenses, settings, dashboard and org chart

### 🔐 Security
Protected endpoints need a **JWT Bearer** access token from `/auth/login`.
Roles: Employee, HR Team, Manager, Finance, Company Owner.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::auth::handlers::register,
        crate::auth::handlers::login,
        crate::auth::handlers::refresh_token,
        crate::auth::handlers::logout,
        crate::auth::handlers::me,
        crate::auth::handlers::update_profile,
        crate::auth::handlers::change_password,

        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::update_employee,
        crate::api::employee::approve_employee,
        crate::api::employee::reject_employee,
        crate::api::employee::toggle_status,

        crate::api::leave_request::leave_list,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::create_leave,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,

        crate::api::attendance::clock_in,
        crate::api::attendance::clock_out,
        crate::api::attendance::history,

        crate::api::payroll::run_payroll,
        crate::api::payroll::list_payrolls,
        crate::api::payroll::list_runs,
        crate::api::payroll::get_payslip,

        crate::api::position::list_positions,
        crate::api::position::list_departments,
        crate::api::position::create_position,
        crate::api::position::update_position,

        crate::api::client::list_clients,
        crate::api::client::create_client,
        crate::api::client::update_client_status,

        crate::api::expense::list_expenses,
        crate::api::expense::log_expense,

        crate::api::settings::get_settings,
        crate::api::settings::update_settings,

        crate::api::dashboard::dashboard,
        crate::api::dashboard::org_chart
    ),
    components(
        schemas(
            FieldError,
            Role,
            Employee,
            EmployeeStatus,
            EmployeeListResponse,
            RegisterEmployee,
            UpdateEmployee,
            UpdateProfile,
            ChangePassword,
            LoginReqDto,
            Session,
            LeaveRequest,
            LeaveType,
            LeaveStatus,
            LeaveListResponse,
            SubmitLeave,
            AttendanceRecord,
            AttendanceWarning,
            AttendanceHistory,
            PayrollRecord,
            PayrollRun,
            PayrollBatch,
            PayrollListResponse,
            Payslip,
            RunPayroll,
            Position,
            CreatePosition,
            UpdatePosition,
            Client,
            ClientStatus,
            ClientStatusChange,
            CreateClient,
            Expense,
            ExpenseReport,
            LogExpense,
            CompanySettings,
            UpdateSettings,
            Dashboard,
            DepartmentGroup
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration, login and self-service"),
        (name = "Employee", description = "Employee lifecycle APIs"),
        (name = "Leave", description = "Leave management APIs"),
        (name = "Attendance", description = "Attendance management APIs"),
        (name = "Payroll", description = "Payroll management APIs"),
        (name = "Position", description = "Positions and departments"),
        (name = "Client", description = "Client management APIs"),
        (name = "Expense", description = "Expense tracking APIs"),
        (name = "Settings", description = "Company settings"),
        (name = "Dashboard", description = "Dashboard and org chart"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
