mod event_create_table;
mod registration_create_idx;
mod registration_create_table;

use sqlx_migrator::vec_box;

pub struct Migration;

sqlx_migrator::sqlite_migration!(
    Migration,
    "arbe-events",
    "m0_1",
    vec_box![],
    vec_box![
        event_create_table::Operation,
        registration_create_table::Operation,
        registration_create_idx::Operation {
            name: "idx_registration_event_id",
            column: crate::table::AeRegistration::EventId,
        },
        registration_create_idx::Operation {
            name: "idx_registration_email",
            column: crate::table::AeRegistration::Email,
        },
        registration_create_idx::Operation {
            name: "idx_registration_status",
            column: crate::table::AeRegistration::Status,
        },
        registration_create_idx::Operation {
            name: "idx_registration_registration_date",
            column: crate::table::AeRegistration::RegistrationDate,
        },
    ]
);
