pub mod appointment;
pub mod enums;
pub mod patient;

pub use appointment::{parse_wire_datetime, Appointment};
pub use enums::AppointmentStatus;
pub use patient::{Patient, PatientSummary};
