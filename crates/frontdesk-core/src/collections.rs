//! Collection and field naming conventions.
//!
//! These are the names the documents are persisted under. Field names keep
//! the camelCase spelling the front desk UI writes.

pub const QUEUE: &str = "queue";
pub const EMPLOYEES: &str = "employees";
pub const MEDICINES: &str = "medicines";
pub const DIAGNOSES: &str = "diagnoses";

/// Field names inside queue and employee documents.
pub mod field {
    pub const TIMESTAMP: &str = "timestamp";
    pub const EMPLOYEE_ID: &str = "employeeID";
    pub const STATUS: &str = "status";
    pub const QUEUE_NUMBER: &str = "queueNumber";
    pub const CONSULTATION_DATA: &str = "consultationData";
    pub const NAME: &str = "name";
    pub const DEPARTMENT: &str = "department";
    pub const AMOUNT: &str = "amount";
    pub const DIAGNOSIS: &str = "diagnosis";
    pub const MEDICINES: &str = "medicines";
    pub const VALUE: &str = "value";
}
