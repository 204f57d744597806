//! The dashboard view registry.
//!
//! Every navigable view is a variant of [`ViewId`], so an invalid view
//! identifier is a compile-time concern everywhere except the outermost
//! edge, where free-form selection strings are parsed once. Role
//! requirements are part of the registry and immutable at runtime.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use staffdeck_core::AppError;

use crate::user::Role;

const MANAGEMENT_ROLES: &[Role] = &[Role::Admin, Role::Manager];
const ADMIN_ONLY: &[Role] = &[Role::Admin];
const ANY_AUTHENTICATED: &[Role] = &[];

/// A navigable dashboard view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewId {
    /// Landing overview.
    Dashboard,
    /// Candidate pipeline.
    Recruitment,
    /// Staff directory administration.
    EmployeeManagement,
    /// Clock-in and absence tracking.
    Attendance,
    /// Leave requests and approvals.
    LeaveManagement,
    /// Pay runs.
    Payroll,
    /// Gross-to-net estimation.
    SalaryCalculator,
    /// Tax and budget planning.
    TaxBudget,
    /// Benefits and expense claims.
    Benefits,
    /// Project portfolio.
    Projects,
    /// Task board.
    Tasks,
    /// Review cycles.
    Performance,
    /// Course catalog and enrollment.
    Training,
    /// Reports and analytics.
    Reporting,
    /// Internal job applications.
    JobApplication,
    /// Profile and account settings.
    Settings,
}

impl ViewId {
    /// Returns the stable view identifier used in selections and links.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Recruitment => "recruitment",
            Self::EmployeeManagement => "employee-management",
            Self::Attendance => "attendance",
            Self::LeaveManagement => "leave-management",
            Self::Payroll => "payroll",
            Self::SalaryCalculator => "salary-calculator",
            Self::TaxBudget => "tax-budget",
            Self::Benefits => "benefits",
            Self::Projects => "projects",
            Self::Tasks => "tasks",
            Self::Performance => "performance",
            Self::Training => "training",
            Self::Reporting => "reporting",
            Self::JobApplication => "job-application",
            Self::Settings => "settings",
        }
    }

    /// Returns the human-readable title shown in navigation and headers.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Recruitment => "Recruitment",
            Self::EmployeeManagement => "Employee Management",
            Self::Attendance => "Attendance",
            Self::LeaveManagement => "Leave Management",
            Self::Payroll => "Payroll",
            Self::SalaryCalculator => "Salary Calculator",
            Self::TaxBudget => "Tax & Budget",
            Self::Benefits => "Benefits & Expenses",
            Self::Projects => "Projects",
            Self::Tasks => "Tasks",
            Self::Performance => "Performance",
            Self::Training => "Training",
            Self::Reporting => "Reports & Analytics",
            Self::JobApplication => "Apply for Jobs",
            Self::Settings => "Settings",
        }
    }

    /// Returns the roles required to open this view.
    ///
    /// An empty slice means any authenticated user may open it.
    #[must_use]
    pub fn required_roles(&self) -> &'static [Role] {
        match self {
            Self::Recruitment
            | Self::EmployeeManagement
            | Self::Payroll
            | Self::SalaryCalculator
            | Self::Performance
            | Self::Reporting => MANAGEMENT_ROLES,
            Self::TaxBudget => ADMIN_ONLY,
            Self::Dashboard
            | Self::Attendance
            | Self::LeaveManagement
            | Self::Benefits
            | Self::Projects
            | Self::Tasks
            | Self::Training
            | Self::JobApplication
            | Self::Settings => ANY_AUTHENTICATED,
        }
    }

    /// Returns all registered views in navigation order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[ViewId] = &[
            ViewId::Dashboard,
            ViewId::Recruitment,
            ViewId::EmployeeManagement,
            ViewId::Attendance,
            ViewId::LeaveManagement,
            ViewId::Payroll,
            ViewId::SalaryCalculator,
            ViewId::TaxBudget,
            ViewId::Benefits,
            ViewId::Projects,
            ViewId::Tasks,
            ViewId::Performance,
            ViewId::Training,
            ViewId::Reporting,
            ViewId::JobApplication,
            ViewId::Settings,
        ];

        ALL
    }
}

impl Display for ViewId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for ViewId {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|view| view.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown view '{value}'")))
    }
}
