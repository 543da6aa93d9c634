pub mod columns;
pub mod csv_export;
pub mod dispatch;
pub mod email;
pub mod error;
pub mod mailer;

pub use columns::{cell_value, table_columns, DERIVED_COLUMNS, RAW_COLUMNS};
pub use csv_export::export_csv;
pub use dispatch::{dispatch, DispatchOutcome, Recipients};
pub use email::{compose_no_results_email, compose_results_email, EmailContent, EMAIL_COLUMNS};
pub use error::ExportError;
pub use mailer::{Mailer, SmtpMailer};
